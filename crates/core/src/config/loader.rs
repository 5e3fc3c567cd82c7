//! Configuration file loading

use super::schema::{ConfigSchema, KNOWN_SECTIONS};
use crate::error::{Error, ErrorCode, Result};
use crate::validation::validate_config_keys;
use std::path::{Path, PathBuf};

/// Configuration wrapper
#[derive(Debug, Clone)]
pub struct Config {
    pub schema: ConfigSchema,
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file path or use defaults.
    ///
    /// An explicit path must exist. Without one, the standard locations are
    /// searched and defaults are used when nothing is found.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) if !p.exists() => return Err(Error::config_not_found(p)),
            Some(p) => Some(p.to_path_buf()),
            None => find_config_file(),
        };

        let schema = if let Some(ref p) = config_path {
            load_config_file(p)?
        } else {
            tracing::debug!("no configuration file found, using defaults");
            ConfigSchema::default()
        };

        Ok(Self {
            schema,
            path: config_path,
        })
    }

    /// Load with defaults only (no file)
    pub fn default() -> Self {
        Self {
            schema: ConfigSchema::default(),
            path: None,
        }
    }

    /// Directory relative paths in the configuration are resolved against
    pub fn base_dir(&self) -> PathBuf {
        self.path
            .as_deref()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Expand `~` and resolve a configured path against the config directory.
    ///
    /// The result is absolute whenever the working directory is readable.
    pub fn resolve_path(&self, value: &str) -> PathBuf {
        let expanded = PathBuf::from(shellexpand::tilde(value).into_owned());
        if expanded.is_absolute() {
            return expanded;
        }
        let anchored = self.base_dir().join(expanded);
        std::path::absolute(&anchored).unwrap_or(anchored)
    }
}

/// Find configuration file in standard locations
fn find_config_file() -> Option<PathBuf> {
    let candidates = [".appdesc.toml", "appdesc.toml", ".config/appdesc.toml"];

    for candidate in candidates {
        let path = Path::new(candidate);
        if path.exists() {
            return Some(path.to_path_buf());
        }
    }

    dirs::config_dir()
        .map(|dir| dir.join("appdesc").join("config.toml"))
        .filter(|p| p.exists())
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &Path) -> Result<ConfigSchema> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::config(format!("Failed to read config file {}: {}", path.display(), e))
            .with_source(e)
    })?;

    let table: toml::Table = toml::from_str(&content).map_err(|e| {
        Error::new(
            ErrorCode::ConfigParseError,
            format!("Failed to parse config file {}: {}", path.display(), e),
        )
    })?;

    for warning in validate_config_keys(&table, KNOWN_SECTIONS).warnings() {
        tracing::warn!(path = %path.display(), "{}", warning);
    }

    let schema = toml::from_str(&content).map_err(|e| {
        Error::new(
            ErrorCode::InvalidConfigValue,
            format!("Invalid config file {}: {}", path.display(), e),
        )
    })?;

    tracing::debug!(path = %path.display(), "loaded configuration");
    Ok(schema)
}
