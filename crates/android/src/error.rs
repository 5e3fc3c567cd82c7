//! Errors raised while loading and resolving a descriptor

use appdesc_core::error::{Error, ErrorCode};
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, ResolutionError>;

/// Why a descriptor could not be resolved
#[derive(Error, Debug)]
pub enum ResolutionError {
    #[error("Unknown symbolic reference '{symbol}' for {field}")]
    /// The toolchain has no value for `symbol`
    UnknownSymbolicReference {
        /// Descriptor field holding the reference
        field: String,
        /// The unanswered symbol
        symbol: String,
    },

    #[error("Invalid identifier for {field}: '{value}' ({reason})")]
    /// applicationId or namespace is malformed
    InvalidIdentifier {
        /// `applicationId` or `namespace`
        field: String,
        /// The rejected value
        value: String,
        /// First failed rule
        reason: String,
    },

    #[error("Missing signing profile '{profile}' for build type '{build_type}'")]
    /// A build type names an unregistered signing profile
    MissingSigningProfile {
        /// Build type that needs signing
        build_type: String,
        /// Profile it asked for
        profile: String,
    },

    #[error("Invalid version token for {field}: '{token}' is not a valid {expected}")]
    /// A toolchain token does not parse as the field's type
    InvalidVersionToken {
        /// Descriptor field being resolved
        field: String,
        /// Raw token from the toolchain
        token: String,
        /// Type the field needs
        expected: &'static str,
    },

    #[error("Inconsistent SDK levels: {0}")]
    /// minSdk, targetSdk and compileSdk are out of order
    InconsistentSdkLevels(String),

    #[error("Invalid dependency: {0}")]
    /// A dependency is malformed or disagrees with the compile options
    InvalidDependency(String),

    #[error("Failed to parse descriptor: {0}")]
    /// The descriptor is not valid TOML for this schema
    Parse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    /// The descriptor could not be read
    Io(#[from] std::io::Error),
}

impl ResolutionError {
    /// Error code used when reporting through the core error type
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::UnknownSymbolicReference { .. } => ErrorCode::UnknownSymbolicReference,
            Self::InvalidIdentifier { .. } => ErrorCode::InvalidIdentifier,
            Self::MissingSigningProfile { .. } => ErrorCode::MissingSigningProfile,
            Self::InvalidVersionToken { .. } => ErrorCode::InvalidVersionToken,
            Self::InconsistentSdkLevels(_) => ErrorCode::InconsistentSdkLevels,
            Self::InvalidDependency(_) => ErrorCode::InvalidDependency,
            Self::Parse(_) => ErrorCode::ConfigParseError,
            Self::Io(e) if e.kind() == std::io::ErrorKind::NotFound => ErrorCode::FileNotFound,
            Self::Io(_) => ErrorCode::IoError,
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            Self::UnknownSymbolicReference { symbol, .. } => Some(format!(
                "Define '{}' under [toolchain] in .appdesc.toml or use a literal value",
                symbol
            )),
            Self::MissingSigningProfile { profile, .. } => Some(format!(
                "Add a [signing.{}] section to .appdesc.toml",
                profile
            )),
            Self::InvalidIdentifier { .. } => Some(
                "Use dot-separated segments that start with a letter, e.g. com.example.app"
                    .to_string(),
            ),
            Self::InvalidDependency(_) => Some(
                "Declare coreLibraryDesugaring(\"com.android.tools:desugar_jdk_libs:<version>\") \
                 together with core_library_desugaring = true"
                    .to_string(),
            ),
            _ => None,
        }
    }
}

impl From<ResolutionError> for Error {
    fn from(err: ResolutionError) -> Self {
        let code = err.code();
        let mut converted = Error::resolution(code, err.to_string());
        if let Some(suggestion) = err.suggestion() {
            converted = converted.with_suggestion(suggestion);
        }
        converted.with_source(err)
    }
}
