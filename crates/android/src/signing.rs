//! Signing profile registry
//!
//! Every registry carries the implicit `debug` profile backed by the
//! Android debug keystore, the same one the Android Gradle plugin creates.

use appdesc_core::config::{Config, SigningConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Name of the implicit debug profile
pub const DEBUG_PROFILE: &str = "debug";

/// Location of the debug keystore, before `~` expansion
pub const DEBUG_KEYSTORE: &str = "~/.android/debug.keystore";

/// A named signing configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningProfile {
    /// Name build types refer to
    pub name: String,
    /// Keystore location, `~`-expanded and anchored at the config directory
    pub store_file: PathBuf,
    /// Key alias inside the keystore
    pub key_alias: String,
    /// Environment variable holding the store password, never the secret itself
    pub store_password_env: Option<String>,
    /// Environment variable holding the key password
    pub key_password_env: Option<String>,
}

impl SigningProfile {
    /// The Android debug signing profile
    pub fn debug() -> Self {
        Self {
            name: DEBUG_PROFILE.to_string(),
            store_file: expand(DEBUG_KEYSTORE),
            key_alias: "androiddebugkey".to_string(),
            store_password_env: None,
            key_password_env: None,
        }
    }

    /// Build a profile from its `[signing.<name>]` entry.
    ///
    /// Relative store files are resolved against the config file's directory.
    pub fn from_config(name: &str, entry: &SigningConfig, config: &Config) -> Self {
        Self {
            name: name.to_string(),
            store_file: config.resolve_path(&entry.store_file),
            key_alias: entry.key_alias.clone(),
            store_password_env: entry.store_password_env.clone(),
            key_password_env: entry.key_password_env.clone(),
        }
    }

    /// Whether this profile is registered under the debug name
    pub fn is_debug(&self) -> bool {
        self.name == DEBUG_PROFILE
    }

    /// Whether this is exactly the Android debug keystore profile
    pub fn is_builtin_debug(&self) -> bool {
        *self == Self::debug()
    }
}

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

/// Named signing profiles available to a build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningRegistry {
    profiles: BTreeMap<String, SigningProfile>,
}

impl Default for SigningRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SigningRegistry {
    /// A registry holding only the debug profile
    pub fn new() -> Self {
        let mut profiles = BTreeMap::new();
        profiles.insert(DEBUG_PROFILE.to_string(), SigningProfile::debug());
        Self { profiles }
    }

    /// Registry populated from the `[signing.*]` configuration sections.
    ///
    /// A configured `debug` section replaces the built-in debug profile.
    pub fn from_config(config: &Config) -> Self {
        let mut registry = Self::new();
        for (name, entry) in &config.schema.signing {
            registry.insert(SigningProfile::from_config(name, entry, config));
        }
        registry
    }

    /// Add a profile, replacing any profile of the same name
    pub fn insert(&mut self, profile: SigningProfile) {
        tracing::trace!(profile = %profile.name, "registered signing profile");
        self.profiles.insert(profile.name.clone(), profile);
    }

    /// Profile registered under `name`
    pub fn get(&self, name: &str) -> Option<&SigningProfile> {
        self.profiles.get(name)
    }

    /// Profile names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    /// Profiles in name order
    pub fn iter(&self) -> impl Iterator<Item = &SigningProfile> {
        self.profiles.values()
    }
}
