//! Build descriptor resolution
//!
//! Turns a [`BuildDescriptor`] into a [`ResolvedDescriptor`] in one pass:
//! identifiers are validated, symbolic SDK and version references are
//! looked up in the toolchain provider, SDK levels are cross-checked, every
//! build type is bound to exactly one signing profile, and dependency
//! declarations are checked. Either every step succeeds or nothing is
//! returned; the first failure wins.

use crate::descriptor::{
    BuildDescriptor, BuildType, Dependency, JavaVersion, ValueRef, DESUGARING_CONFIGURATION,
};
use crate::error::{ResolutionError, Result};
use crate::identifier::{validate_application_id, validate_namespace};
use crate::signing::{SigningProfile, DEBUG_PROFILE};
use crate::toolchain::ToolchainProvider;
use appdesc_core::validation::{ValidationResult, Validator};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;

/// Build types the Android Gradle plugin always defines
pub const IMPLICIT_BUILD_TYPES: &[&str] = &["debug", "release"];

/// `group:artifact:version`, optionally followed by `:classifier` and `@ext`
static COORDINATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_.\-]+:[A-Za-z0-9_.\-]+:[A-Za-z0-9_.\-+]+(:[A-Za-z0-9_.\-]+)?(@[A-Za-z0-9]+)?$")
        .unwrap()
});

/// Gradle configuration names are plain Kotlin identifiers
static CONFIGURATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// Core library desugaring settings after resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Desugaring {
    /// `isCoreLibraryDesugaringEnabled`
    pub enabled: bool,
    /// Coordinate of the `coreLibraryDesugaring` dependency, if declared
    pub library: Option<String>,
}

/// A build type bound to its signing profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedBuildType {
    /// Build type name, e.g. `release`
    pub name: String,
    /// Profile the build is signed with
    pub signing: SigningProfile,
    /// `isMinifyEnabled`
    pub minify: bool,
}

/// A descriptor with every symbolic reference replaced by a concrete value.
///
/// Only obtainable through [`resolve`] and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedDescriptor {
    plugins: Vec<String>,
    application_id: String,
    namespace: String,
    compile_sdk: u32,
    min_sdk: u32,
    target_sdk: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    ndk_version: Option<String>,
    version_code: u32,
    version_name: String,
    source_compatibility: JavaVersion,
    target_compatibility: JavaVersion,
    #[serde(skip_serializing_if = "Option::is_none")]
    jvm_target: Option<JavaVersion>,
    desugaring: Desugaring,
    build_types: Vec<ResolvedBuildType>,
    flutter_source: String,
    dependencies: Vec<Dependency>,
}

impl ResolvedDescriptor {
    /// Gradle plugin ids, in application order
    pub fn plugins(&self) -> &[String] {
        &self.plugins
    }

    /// Resolved `applicationId`
    pub fn application_id(&self) -> &str {
        &self.application_id
    }

    /// Resolved `namespace`
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Concrete `compileSdk`
    pub fn compile_sdk(&self) -> u32 {
        self.compile_sdk
    }

    /// Concrete `minSdk`
    pub fn min_sdk(&self) -> u32 {
        self.min_sdk
    }

    /// Concrete `targetSdk`
    pub fn target_sdk(&self) -> u32 {
        self.target_sdk
    }

    /// NDK version, if the descriptor sets one
    pub fn ndk_version(&self) -> Option<&str> {
        self.ndk_version.as_deref()
    }

    /// Concrete `versionCode`
    pub fn version_code(&self) -> u32 {
        self.version_code
    }

    /// Concrete `versionName`
    pub fn version_name(&self) -> &str {
        &self.version_name
    }

    /// Java source level
    pub fn source_compatibility(&self) -> JavaVersion {
        self.source_compatibility
    }

    /// Java bytecode level
    pub fn target_compatibility(&self) -> JavaVersion {
        self.target_compatibility
    }

    /// Kotlin `jvmTarget`, if Kotlin options were given
    pub fn jvm_target(&self) -> Option<JavaVersion> {
        self.jvm_target
    }

    /// Core library desugaring settings
    pub fn desugaring(&self) -> &Desugaring {
        &self.desugaring
    }

    /// Build types sorted by name
    pub fn build_types(&self) -> &[ResolvedBuildType] {
        &self.build_types
    }

    /// Look up a build type by name
    pub fn build_type(&self, name: &str) -> Option<&ResolvedBuildType> {
        self.build_types.iter().find(|bt| bt.name == name)
    }

    /// Path from the app module to the Flutter project
    pub fn flutter_source(&self) -> &str {
        &self.flutter_source
    }

    /// Dependencies in declaration order
    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }
}

/// Resolve a descriptor against a toolchain provider
pub fn resolve(
    descriptor: &BuildDescriptor,
    provider: &dyn ToolchainProvider,
) -> Result<ResolvedDescriptor> {
    let android = &descriptor.android;
    let defaults = &android.default_config;

    let application_id = &defaults.application_id;
    check_identifier("applicationId", application_id, validate_application_id(application_id))?;
    check_identifier("namespace", &android.namespace, validate_namespace(&android.namespace))?;

    let compile_sdk = resolve_number("compileSdk", &android.compile_sdk, provider)?;
    let min_sdk = resolve_number("minSdk", &defaults.min_sdk, provider)?;
    let target_sdk = resolve_number("targetSdk", &defaults.target_sdk, provider)?;
    let ndk_version = android
        .ndk_version
        .as_ref()
        .map(|v| resolve_text("ndkVersion", v, provider))
        .transpose()?;
    let version_code = resolve_number("versionCode", &defaults.version_code, provider)?;
    let version_name = resolve_text("versionName", &defaults.version_name, provider)?;

    check_sdk_levels(min_sdk, target_sdk, compile_sdk)?;

    let build_types = resolve_build_types(&android.build_types, provider)?;
    let desugaring = resolve_desugaring(descriptor)?;
    check_dependencies(&descriptor.dependencies)?;

    tracing::debug!(
        application_id = %defaults.application_id,
        compile_sdk,
        min_sdk,
        target_sdk,
        version_code,
        "descriptor resolved"
    );

    Ok(ResolvedDescriptor {
        plugins: descriptor.plugins.clone(),
        application_id: defaults.application_id.clone(),
        namespace: android.namespace.clone(),
        compile_sdk,
        min_sdk,
        target_sdk,
        ndk_version,
        version_code,
        version_name,
        source_compatibility: android.compile_options.source_compatibility,
        target_compatibility: android.compile_options.target_compatibility,
        jvm_target: android.kotlin_options.as_ref().map(|k| k.jvm_target),
        desugaring,
        build_types,
        flutter_source: descriptor.flutter.source.clone(),
        dependencies: descriptor.dependencies.clone(),
    })
}

fn check_identifier(field: &str, value: &str, result: ValidationResult) -> Result<()> {
    for warning in result.warnings() {
        tracing::warn!(field, value, "{}", warning.message);
    }

    match result.errors().first() {
        None => Ok(()),
        Some(error) => Err(ResolutionError::InvalidIdentifier {
            field: field.to_string(),
            value: value.to_string(),
            reason: error.message.clone(),
        }),
    }
}

fn lookup(field: &str, symbol: &str, provider: &dyn ToolchainProvider) -> Result<String> {
    let token = provider
        .resolve(symbol)
        .ok_or_else(|| ResolutionError::UnknownSymbolicReference {
            field: field.to_string(),
            symbol: symbol.to_string(),
        })?;

    tracing::debug!(field, symbol, token = %token, "resolved symbolic reference");
    Ok(token)
}

fn resolve_number(field: &str, value: &ValueRef<u32>, provider: &dyn ToolchainProvider) -> Result<u32> {
    let token = match value {
        ValueRef::Literal(n) => return Ok(*n),
        ValueRef::Symbolic { from } => lookup(field, from, provider)?,
    };

    token.trim().parse().map_err(|_| ResolutionError::InvalidVersionToken {
        field: field.to_string(),
        token,
        expected: "non-negative integer",
    })
}

fn resolve_text(field: &str, value: &ValueRef<String>, provider: &dyn ToolchainProvider) -> Result<String> {
    let text = match value {
        ValueRef::Literal(s) => s.clone(),
        ValueRef::Symbolic { from } => lookup(field, from, provider)?,
    };

    if text.trim().is_empty() {
        return Err(ResolutionError::InvalidVersionToken {
            field: field.to_string(),
            token: text,
            expected: "non-empty version string",
        });
    }
    Ok(text)
}

fn check_sdk_levels(min_sdk: u32, target_sdk: u32, compile_sdk: u32) -> Result<()> {
    let result = Validator::new()
        .range("minSdk", min_sdk, 1, target_sdk)
        .range("targetSdk", target_sdk, min_sdk, compile_sdk)
        .validate();

    match result.errors().first() {
        None => Ok(()),
        Some(_) => Err(ResolutionError::InconsistentSdkLevels(format!(
            "expected minSdk ({}) <= targetSdk ({}) <= compileSdk ({})",
            min_sdk, target_sdk, compile_sdk
        ))),
    }
}

fn resolve_build_types(
    declared: &BTreeMap<String, BuildType>,
    provider: &dyn ToolchainProvider,
) -> Result<Vec<ResolvedBuildType>> {
    let mut build_types: BTreeMap<&str, BuildType> = IMPLICIT_BUILD_TYPES
        .iter()
        .map(|name| (*name, BuildType::default()))
        .collect();
    for (name, build_type) in declared {
        build_types.insert(name.as_str(), build_type.clone());
    }

    build_types
        .into_iter()
        .map(|(name, build_type)| {
            let profile = build_type.signing_config.as_deref().unwrap_or(DEBUG_PROFILE);
            let signing = provider.signing_profile(profile).cloned().ok_or_else(|| {
                ResolutionError::MissingSigningProfile {
                    build_type: name.to_string(),
                    profile: profile.to_string(),
                }
            })?;

            tracing::debug!(build_type = name, profile, "bound signing profile");
            Ok(ResolvedBuildType {
                name: name.to_string(),
                signing,
                minify: build_type.minify,
            })
        })
        .collect()
}

fn resolve_desugaring(descriptor: &BuildDescriptor) -> Result<Desugaring> {
    let enabled = descriptor.android.compile_options.core_library_desugaring;
    let declared: Vec<&Dependency> = descriptor
        .dependencies
        .iter()
        .filter(|d| d.configuration == DESUGARING_CONFIGURATION)
        .collect();

    match (enabled, declared.as_slice()) {
        (true, [library]) => Ok(Desugaring {
            enabled,
            library: Some(library.coordinate.clone()),
        }),
        (false, []) => Ok(Desugaring {
            enabled,
            library: None,
        }),
        (true, []) => Err(ResolutionError::InvalidDependency(format!(
            "core library desugaring is enabled but no {} dependency is declared",
            DESUGARING_CONFIGURATION
        ))),
        (false, _) => Err(ResolutionError::InvalidDependency(format!(
            "{} dependency declared but core_library_desugaring is not enabled",
            DESUGARING_CONFIGURATION
        ))),
        (true, _) => Err(ResolutionError::InvalidDependency(format!(
            "{} dependencies declared; exactly one is allowed",
            declared.len()
        ))),
    }
}

fn check_dependencies(dependencies: &[Dependency]) -> Result<()> {
    for dependency in dependencies {
        let result = Validator::new()
            .required("configuration", &dependency.configuration)
            .matches(
                "configuration",
                &dependency.configuration,
                &CONFIGURATION,
                "Gradle configuration name",
            )
            .matches(
                "coordinate",
                &dependency.coordinate,
                &COORDINATE,
                "group:artifact:version",
            )
            .validate();

        if let Some(error) = result.errors().first() {
            return Err(ResolutionError::InvalidDependency(format!(
                "{}(\"{}\"): {}",
                dependency.configuration, dependency.coordinate, error
            )));
        }
    }
    Ok(())
}
