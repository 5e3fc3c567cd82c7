//! Coded errors shared by the appdesc crates
//!
//! Every error carries an [`ErrorCode`] whose thousands digit selects the
//! category and the process exit status. Reports serialize to JSON for
//! `--format json`.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Stable error codes, rendered as `E<code>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// A bug or an output failure inside the tool
    Internal = 1001,

    /// Any other filesystem failure
    IoError = 2000,
    /// A named input file does not exist
    FileNotFound = 2001,
    /// A file exists but cannot be read or written
    PermissionDenied = 2002,

    /// The config file could not be read
    ConfigError = 3000,
    /// An explicitly requested config file does not exist
    ConfigNotFound = 3001,
    /// A config or descriptor file is not valid TOML
    ConfigParseError = 3002,
    /// A config value has the wrong shape
    InvalidConfigValue = 3004,

    /// The toolchain cannot answer a symbolic reference
    UnknownSymbolicReference = 9001,
    /// applicationId or namespace is malformed
    InvalidIdentifier = 9002,
    /// A build type names a signing profile nobody registered
    MissingSigningProfile = 9003,
    /// A toolchain token does not parse as the field's type
    InvalidVersionToken = 9004,
    /// minSdk, targetSdk and compileSdk are out of order
    InconsistentSdkLevels = 9005,
    /// A dependency declaration is malformed or inconsistent
    InvalidDependency = 9006,
}

impl ErrorCode {
    /// Numeric value of the code
    pub fn code(self) -> u32 {
        self as u32
    }

    /// Category name used in reports
    pub fn category(self) -> &'static str {
        match self.code() / 1000 {
            2 => "IO",
            3 => "Configuration",
            9 => "Resolution",
            _ => "Internal",
        }
    }

    /// Process exit status for this code
    pub fn exit_code(self) -> i32 {
        match self.code() / 1000 {
            3 => exit_codes::CONFIG_ERROR,
            9 => exit_codes::VALIDATION_ERROR,
            _ => exit_codes::FAILURE,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

/// Error with a code, optional context and a hint for the user
#[derive(Error, Debug)]
pub struct Error {
    /// What went wrong, as a stable code
    pub code: ErrorCode,
    /// One-line description
    pub message: String,
    /// Where it happened, e.g. the descriptor path
    pub context: Option<String>,
    /// How to fix it
    pub suggestion: Option<String>,
    /// Underlying cause
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(context) = &self.context {
            write!(f, " ({})", context)?;
        }
        Ok(())
    }
}

impl Error {
    /// Error with just a code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: None,
            suggestion: None,
            source: None,
        }
    }

    /// Config file could not be read
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// `--config` pointed at a missing file
    pub fn config_not_found(path: impl AsRef<std::path::Path>) -> Self {
        Self::new(
            ErrorCode::ConfigNotFound,
            format!("Configuration file not found: {}", path.as_ref().display()),
        )
        .with_suggestion("Create an .appdesc.toml file or use --config to specify a path")
    }

    /// Descriptor resolution failed with `code`
    pub fn resolution(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::new(code, message)
    }

    /// Attach where the error happened
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Attach a hint for the user
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Attach the underlying cause
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Flatten into a serializable report
    pub fn to_report(&self) -> ErrorReport {
        ErrorReport {
            code: self.code,
            code_str: self.code.to_string(),
            category: self.code.category(),
            message: self.message.clone(),
            context: self.context.clone(),
            suggestion: self.suggestion.clone(),
            source: self.source.as_ref().map(ToString::to_string),
        }
    }
}

/// JSON shape of an [`Error`]
#[derive(Debug, Clone, Serialize)]
pub struct ErrorReport {
    /// Code name, e.g. `MISSING_SIGNING_PROFILE`
    pub code: ErrorCode,
    /// Code as printed, e.g. `E9003`
    pub code_str: String,
    /// Category name
    pub category: &'static str,
    /// One-line description
    pub message: String,
    /// Where it happened
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// How to fix it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Underlying cause
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Process exit statuses
pub mod exit_codes {
    /// Everything resolved
    pub const SUCCESS: i32 = 0;
    /// IO or internal failure
    pub const FAILURE: i32 = 1;
    /// The descriptor does not resolve
    pub const VALIDATION_ERROR: i32 = 2;
    /// The tool configuration is unusable
    pub const CONFIG_ERROR: i32 = 3;
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        let code = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorCode::FileNotFound,
            std::io::ErrorKind::PermissionDenied => ErrorCode::PermissionDenied,
            _ => ErrorCode::IoError,
        };
        Error::new(code, err.to_string()).with_source(err)
    }
}
