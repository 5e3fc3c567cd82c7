//! Toolchain providers
//!
//! A provider answers symbolic version lookups (`compileSdkVersion`,
//! `versionCode`, ...) and owns the signing profile registry. Symbols may be
//! written bare or qualified with the provider name, as in
//! `flutter.compileSdkVersion`.

use crate::error::Result;
use crate::signing::{SigningProfile, SigningRegistry};
use appdesc_core::config::Config;
use std::collections::BTreeMap;
use std::path::Path;

/// Default `compileSdkVersion` exposed by the Flutter Gradle plugin
pub const DEFAULT_COMPILE_SDK: u32 = 34;

/// Default `minSdkVersion` exposed by the Flutter Gradle plugin
pub const DEFAULT_MIN_SDK: u32 = 21;

/// Default `targetSdkVersion` exposed by the Flutter Gradle plugin
pub const DEFAULT_TARGET_SDK: u32 = 34;

/// Default `ndkVersion` exposed by the Flutter Gradle plugin
pub const DEFAULT_NDK: &str = "23.1.7779620";

/// Used when `local.properties` has no `flutter.versionCode`
pub const DEFAULT_VERSION_CODE: u32 = 1;

/// Used when `local.properties` has no `flutter.versionName`
pub const DEFAULT_VERSION_NAME: &str = "1.0";

/// Symbols the Flutter toolchain understands
pub const FLUTTER_SYMBOLS: &[&str] = &[
    "compileSdkVersion",
    "minSdkVersion",
    "targetSdkVersion",
    "ndkVersion",
    "versionCode",
    "versionName",
];

/// Source of concrete values for symbolic descriptor references
pub trait ToolchainProvider {
    /// Qualifier accepted in front of symbols, e.g. `flutter`
    fn name(&self) -> &str;

    /// Version token for a bare symbol
    fn lookup(&self, symbol: &str) -> Option<String>;

    /// Signing profile registered under `name`
    fn signing_profile(&self, name: &str) -> Option<&SigningProfile>;

    /// Resolve a bare or provider-qualified symbol.
    ///
    /// A qualifier naming a different provider never resolves.
    fn resolve(&self, symbol: &str) -> Option<String> {
        let bare = match symbol.split_once('.') {
            Some((qualifier, rest)) if qualifier == self.name() => rest,
            Some(_) => return None,
            None => symbol,
        };
        self.lookup(bare)
    }
}

/// The values the Flutter Gradle plugin exposes as `flutter.*`
#[derive(Debug, Clone)]
pub struct FlutterToolchain {
    values: BTreeMap<String, String>,
    signing: SigningRegistry,
}

impl Default for FlutterToolchain {
    fn default() -> Self {
        Self::new()
    }
}

impl FlutterToolchain {
    /// Toolchain with the Flutter plugin defaults and the debug signing profile
    pub fn new() -> Self {
        let values = [
            ("compileSdkVersion", DEFAULT_COMPILE_SDK.to_string()),
            ("minSdkVersion", DEFAULT_MIN_SDK.to_string()),
            ("targetSdkVersion", DEFAULT_TARGET_SDK.to_string()),
            ("ndkVersion", DEFAULT_NDK.to_string()),
            ("versionCode", DEFAULT_VERSION_CODE.to_string()),
            ("versionName", DEFAULT_VERSION_NAME.to_string()),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        Self {
            values,
            signing: SigningRegistry::new(),
        }
    }

    /// Build from the tool configuration.
    ///
    /// `local_properties` takes precedence over `[general] local_properties`;
    /// `[toolchain]` overrides are applied last.
    pub fn from_config(config: &Config, local_properties: Option<&Path>) -> Result<Self> {
        let mut toolchain = Self::new();

        let configured = config
            .schema
            .general
            .local_properties
            .as_deref()
            .map(|p| config.resolve_path(p));
        if let Some(path) = local_properties.map(Path::to_path_buf).or(configured) {
            toolchain = toolchain.with_local_properties(&path)?;
        }

        Ok(toolchain
            .with_overrides(config.schema.toolchain_tokens())
            .with_signing(SigningRegistry::from_config(config)))
    }

    /// Apply `flutter.*` entries from a Flutter `local.properties` file
    pub fn with_local_properties(mut self, path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let properties = parse_properties(&content);

        for symbol in FLUTTER_SYMBOLS {
            if let Some(value) = properties.get(&format!("flutter.{}", symbol)) {
                tracing::debug!(
                    path = %path.display(),
                    symbol,
                    value = %value,
                    "toolchain value from local.properties"
                );
                self.values.insert((*symbol).to_string(), value.clone());
            }
        }
        Ok(self)
    }

    /// Override individual symbols, e.g. from the `[toolchain]` config section
    pub fn with_overrides(mut self, overrides: BTreeMap<String, String>) -> Self {
        for (symbol, value) in overrides {
            let bare = symbol
                .strip_prefix("flutter.")
                .map(str::to_string)
                .unwrap_or(symbol);
            self.values.insert(bare, value);
        }
        self
    }

    /// Replace the signing profiles build types may refer to
    pub fn with_signing(mut self, signing: SigningRegistry) -> Self {
        self.signing = signing;
        self
    }

    /// Registered signing profiles
    pub fn signing(&self) -> &SigningRegistry {
        &self.signing
    }
}

impl ToolchainProvider for FlutterToolchain {
    fn name(&self) -> &str {
        "flutter"
    }

    fn lookup(&self, symbol: &str) -> Option<String> {
        self.values.get(symbol).cloned()
    }

    fn signing_profile(&self, name: &str) -> Option<&SigningProfile> {
        self.signing.get(name)
    }
}

/// Map-backed provider with no built-in values
#[derive(Debug, Clone)]
pub struct StaticToolchain {
    name: String,
    values: BTreeMap<String, String>,
    signing: SigningRegistry,
}

impl StaticToolchain {
    /// Empty provider reporting itself as `name`, with only the debug profile
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: BTreeMap::new(),
            signing: SigningRegistry::new(),
        }
    }

    /// Answer `symbol` with the raw `token`
    pub fn with_value(mut self, symbol: impl Into<String>, token: impl Into<String>) -> Self {
        self.values.insert(symbol.into(), token.into());
        self
    }

    /// Replace the signing profiles
    pub fn with_signing(mut self, signing: SigningRegistry) -> Self {
        self.signing = signing;
        self
    }
}

impl ToolchainProvider for StaticToolchain {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookup(&self, symbol: &str) -> Option<String> {
        self.values.get(symbol).cloned()
    }

    fn signing_profile(&self, name: &str) -> Option<&SigningProfile> {
        self.signing.get(name)
    }
}

/// Parse Java `.properties` text (`key=value` or `key: value`, `#`/`!` comments)
pub fn parse_properties(content: &str) -> BTreeMap<String, String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('!'))
        .filter_map(|line| {
            let split = line.find(|c: char| c == '=' || c == ':')?;
            let key = line[..split].trim();
            let value = unescape(line[split + 1..].trim());
            Some((key.to_string(), value))
        })
        .collect()
}

fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flutter_defaults() {
        let toolchain = FlutterToolchain::new();
        assert_eq!(toolchain.resolve("compileSdkVersion").as_deref(), Some("34"));
        assert_eq!(toolchain.resolve("flutter.minSdkVersion").as_deref(), Some("21"));
        assert_eq!(toolchain.resolve("flutter.ndkVersion").as_deref(), Some(DEFAULT_NDK));
        assert_eq!(toolchain.resolve("versionName").as_deref(), Some("1.0"));
    }

    #[test]
    fn test_foreign_qualifier_does_not_resolve() {
        let toolchain = FlutterToolchain::new();
        assert!(toolchain.resolve("android.compileSdkVersion").is_none());
        assert!(toolchain.resolve("flutter.bogus").is_none());
        assert!(toolchain.resolve("").is_none());
    }

    #[test]
    fn test_parse_properties() {
        let props = parse_properties(
            "# generated by flutter\n\
             sdk.dir=C\\:\\\\Android\\\\sdk\n\
             flutter.versionName = 2.3.1\n\
             ! legacy comment\n\
             flutter.versionCode: 42\n\
             \n",
        );
        assert_eq!(props["sdk.dir"], "C:\\Android\\sdk");
        assert_eq!(props["flutter.versionName"], "2.3.1");
        assert_eq!(props["flutter.versionCode"], "42");
        assert_eq!(props.len(), 3);
    }

    #[test]
    fn test_local_properties_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local.properties");
        std::fs::write(
            &path,
            "flutter.sdk=/opt/flutter\nflutter.versionCode=12\nflutter.versionName=1.4.0\n",
        )
        .unwrap();

        let toolchain = FlutterToolchain::new().with_local_properties(&path).unwrap();
        assert_eq!(toolchain.resolve("versionCode").as_deref(), Some("12"));
        assert_eq!(toolchain.resolve("versionName").as_deref(), Some("1.4.0"));
        assert!(toolchain.resolve("sdk").is_none());
    }

    #[test]
    fn test_missing_local_properties_is_an_error() {
        let result = FlutterToolchain::new().with_local_properties(Path::new("/nope/local.properties"));
        assert!(result.is_err());
    }

    #[test]
    fn test_overrides_accept_qualified_names() {
        let mut overrides = BTreeMap::new();
        overrides.insert("flutter.compileSdkVersion".to_string(), "35".to_string());
        overrides.insert("targetSdkVersion".to_string(), "35".to_string());

        let toolchain = FlutterToolchain::new().with_overrides(overrides);
        assert_eq!(toolchain.resolve("compileSdkVersion").as_deref(), Some("35"));
        assert_eq!(toolchain.resolve("targetSdkVersion").as_deref(), Some("35"));
    }

    #[test]
    fn test_from_config_applies_overrides_and_signing() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("appdesc.toml");
        std::fs::write(dir.path().join("local.properties"), "flutter.versionCode=9\n").unwrap();
        std::fs::write(
            &config_path,
            r#"
[general]
local_properties = "local.properties"

[toolchain]
minSdkVersion = 23

[signing.release]
store_file = "/keys/release.jks"
key_alias = "release"
"#,
        )
        .unwrap();

        let config = Config::load(Some(&config_path)).unwrap();
        let toolchain = FlutterToolchain::from_config(&config, None).unwrap();

        assert_eq!(toolchain.resolve("versionCode").as_deref(), Some("9"));
        assert_eq!(toolchain.resolve("minSdkVersion").as_deref(), Some("23"));
        assert!(toolchain.signing_profile("release").is_some());
        assert!(toolchain.signing_profile("debug").is_some());
    }

    #[test]
    fn test_static_toolchain() {
        let toolchain = StaticToolchain::new("ci").with_value("compileSdk", "34");
        assert_eq!(toolchain.resolve("ci.compileSdk").as_deref(), Some("34"));
        assert_eq!(toolchain.resolve("compileSdk").as_deref(), Some("34"));
        assert!(toolchain.resolve("flutter.compileSdk").is_none());
        assert!(toolchain.signing_profile("debug").is_some());
    }
}
