//! Configuration schema definitions
//!
//! Tool configuration for `appdesc`, read from `.appdesc.toml`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Top-level keys accepted in the configuration file
pub const KNOWN_SECTIONS: &[&str] = &["general", "toolchain", "signing", "logging"];

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigSchema {
    #[serde(default)]
    pub general: GeneralConfig,

    /// Toolchain overrides, keyed by symbolic name
    #[serde(default)]
    pub toolchain: BTreeMap<String, toml::Value>,

    /// Named signing profiles
    #[serde(default)]
    pub signing: BTreeMap<String, SigningConfig>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ConfigSchema {
    /// Toolchain overrides rendered as version tokens.
    ///
    /// Integers and strings are accepted; anything else is skipped.
    pub fn toolchain_tokens(&self) -> BTreeMap<String, String> {
        self.toolchain
            .iter()
            .filter_map(|(name, value)| {
                let token = match value {
                    toml::Value::String(s) => s.clone(),
                    toml::Value::Integer(i) => i.to_string(),
                    other => {
                        tracing::warn!(
                            key = %name,
                            kind = other.type_str(),
                            "ignoring toolchain override that is neither string nor integer"
                        );
                        return None;
                    }
                };
                Some((name.clone(), token))
            })
            .collect()
    }
}

/// General project configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Descriptor file used when none is given on the command line
    #[serde(default = "default_descriptor")]
    pub descriptor: String,

    /// Flutter `local.properties` file supplying version code and name
    #[serde(default)]
    pub local_properties: Option<String>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            descriptor: default_descriptor(),
            local_properties: None,
        }
    }
}

fn default_descriptor() -> String {
    "android/app/descriptor.toml".to_string()
}

/// A signing profile as written in the configuration file.
///
/// Passwords are never stored in the file; only the names of the
/// environment variables holding them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningConfig {
    /// Keystore path, `~` is expanded
    pub store_file: String,

    /// Key alias inside the keystore
    pub key_alias: String,

    /// Environment variable holding the keystore password
    #[serde(default)]
    pub store_password_env: Option<String>,

    /// Environment variable holding the key password
    #[serde(default)]
    pub key_password_env: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default log level when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}
