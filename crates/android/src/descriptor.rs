//! Raw build descriptor model
//!
//! Mirrors the `android { ... }` block of an application module's
//! `build.gradle.kts`, with SDK and version values either written
//! literally or pointing at a toolchain symbol:
//!
//! ```toml
//! [android]
//! namespace = "com.example.app"
//! compile_sdk = { from = "flutter.compileSdkVersion" }
//! ```

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Gradle configuration used for the desugaring library
pub const DESUGARING_CONFIGURATION: &str = "coreLibraryDesugaring";

/// A value written literally or resolved from the toolchain provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValueRef<T> {
    /// Symbolic reference such as `flutter.compileSdkVersion`
    Symbolic {
        /// Symbol looked up in the toolchain provider
        from: String,
    },
    /// Concrete value
    Literal(T),
}

impl<T> ValueRef<T> {
    /// Build a symbolic reference
    pub fn symbol(name: impl Into<String>) -> Self {
        Self::Symbolic { from: name.into() }
    }

    /// The referenced symbol, if any
    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Self::Symbolic { from } => Some(from),
            Self::Literal(_) => None,
        }
    }
}

/// Java language level for compiled sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "String")]
pub enum JavaVersion {
    /// Java 1.8
    Java8,
    /// Java 11
    Java11,
    /// Java 17
    Java17,
    /// Java 21
    Java21,
}

/// Accepted spellings: `17`, `"17"`, `"VERSION_17"`, `"1.8"`
#[derive(Deserialize)]
#[serde(untagged)]
enum JavaLevel {
    Number(u32),
    Text(String),
}

impl JavaVersion {
    /// Value used for Kotlin's `jvmTarget`
    pub fn jvm_target(self) -> &'static str {
        match self {
            Self::Java8 => "1.8",
            Self::Java11 => "11",
            Self::Java17 => "17",
            Self::Java21 => "21",
        }
    }

    /// Name of the matching `org.gradle.api.JavaVersion` constant
    pub fn gradle_constant(self) -> &'static str {
        match self {
            Self::Java8 => "VERSION_1_8",
            Self::Java11 => "VERSION_11",
            Self::Java17 => "VERSION_17",
            Self::Java21 => "VERSION_21",
        }
    }

    fn from_number(n: u32) -> Option<Self> {
        match n {
            8 => Some(Self::Java8),
            11 => Some(Self::Java11),
            17 => Some(Self::Java17),
            21 => Some(Self::Java21),
            _ => None,
        }
    }
}

impl Default for JavaVersion {
    fn default() -> Self {
        Self::Java8
    }
}

impl fmt::Display for JavaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.jvm_target())
    }
}

impl std::str::FromStr for JavaVersion {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("JavaVersion.")
            .unwrap_or(trimmed)
            .strip_prefix("VERSION_")
            .map(|rest| rest.replace('_', "."))
            .unwrap_or_else(|| trimmed.to_string());

        let number = match digits.as_str() {
            "1.8" => Some(8),
            other => other.parse().ok(),
        };

        number
            .and_then(Self::from_number)
            .ok_or_else(|| format!("unsupported Java version '{}' (expected 1.8, 11, 17 or 21)", s))
    }
}

impl<'de> Deserialize<'de> for JavaVersion {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let parsed = match JavaLevel::deserialize(deserializer)? {
            JavaLevel::Number(n) => Self::from_number(n)
                .ok_or_else(|| format!("unsupported Java version {} (expected 8, 11, 17 or 21)", n)),
            JavaLevel::Text(s) => s.parse(),
        };
        parsed.map_err(serde::de::Error::custom)
    }
}

impl From<JavaVersion> for String {
    fn from(v: JavaVersion) -> Self {
        v.jvm_target().to_string()
    }
}

/// The declarative build descriptor, as read from disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildDescriptor {
    /// Gradle plugin ids, in application order
    #[serde(default)]
    pub plugins: Vec<String>,

    /// The `android { }` block
    pub android: AndroidConfig,

    /// The `flutter { }` block
    #[serde(default)]
    pub flutter: FlutterConfig,

    /// The `dependencies { }` block
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
}

/// Settings of the `android { }` block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AndroidConfig {
    /// Package of the generated `R` and `BuildConfig` classes
    pub namespace: String,
    /// API level compiled against
    pub compile_sdk: ValueRef<u32>,
    /// NDK version; omitted from the build when unset
    #[serde(default)]
    pub ndk_version: Option<ValueRef<String>>,
    /// The `compileOptions { }` block
    #[serde(default)]
    pub compile_options: CompileOptions,
    /// The `kotlinOptions { }` block, when Kotlin is applied
    #[serde(default)]
    pub kotlin_options: Option<KotlinOptions>,
    /// The `defaultConfig { }` block
    pub default_config: DefaultConfig,
    /// Declared build types; `debug` and `release` are added when missing
    #[serde(default)]
    pub build_types: BTreeMap<String, BuildType>,
}

/// Java compilation settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompileOptions {
    /// Language level of the sources
    #[serde(default)]
    pub source_compatibility: JavaVersion,
    /// Bytecode level produced
    #[serde(default)]
    pub target_compatibility: JavaVersion,
    /// `isCoreLibraryDesugaringEnabled`
    #[serde(default)]
    pub core_library_desugaring: bool,
}

/// Kotlin compiler settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KotlinOptions {
    /// JVM bytecode target
    pub jvm_target: JavaVersion,
}

/// Settings shared by every variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DefaultConfig {
    /// Play Store identity of the app
    pub application_id: String,
    /// Lowest API level the app installs on
    pub min_sdk: ValueRef<u32>,
    /// API level the app is tested against
    pub target_sdk: ValueRef<u32>,
    /// Monotonic integer version
    pub version_code: ValueRef<u32>,
    /// Version shown to users
    pub version_name: ValueRef<String>,
}

/// One entry of `buildTypes { }`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildType {
    /// Signing profile name; `debug` when unset
    #[serde(default)]
    pub signing_config: Option<String>,
    /// `isMinifyEnabled`
    #[serde(default)]
    pub minify: bool,
}

/// The Flutter Gradle plugin's `flutter { }` block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlutterConfig {
    /// Path from the app module to the Flutter project root
    #[serde(default = "default_flutter_source")]
    pub source: String,
}

impl Default for FlutterConfig {
    fn default() -> Self {
        Self {
            source: default_flutter_source(),
        }
    }
}

fn default_flutter_source() -> String {
    "../..".to_string()
}

/// A dependency declaration rendered into the `dependencies { }` block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Dependency {
    /// Gradle configuration, e.g. `implementation` or `coreLibraryDesugaring`
    pub configuration: String,
    /// `group:artifact:version`
    pub coordinate: String,
}

impl BuildDescriptor {
    /// Parse a descriptor from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Read and parse a descriptor file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let descriptor = Self::from_toml_str(&content)?;
        tracing::debug!(
            path = %path.display(),
            application_id = %descriptor.android.default_config.application_id,
            "loaded build descriptor"
        );
        Ok(descriptor)
    }

    /// The desugaring library coordinate, if declared
    pub fn desugaring_library(&self) -> Option<&str> {
        self.dependencies
            .iter()
            .find(|d| d.configuration == DESUGARING_CONFIGURATION)
            .map(|d| d.coordinate.as_str())
    }
}
