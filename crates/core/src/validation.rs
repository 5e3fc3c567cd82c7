//! Fluent field validation
//!
//! A [`Validator`] runs every check it is given and collects failures and
//! warnings in a [`ValidationResult`], so callers can report the first
//! failure or all of them.
//!
//! # Example
//!
//! ```rust
//! use appdesc_core::validation::Validator;
//!
//! let result = Validator::new()
//!     .required("namespace", "com.example.app")
//!     .max_length("namespace", "com.example.app", 255)
//!     .validate();
//!
//! assert!(result.is_valid());
//! ```

use regex::Regex;
use std::fmt;

/// A single failed check or warning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    /// Field the check ran against
    pub field: String,
    /// Human-readable description
    pub message: String,
    /// Which check produced it, e.g. `REQUIRED`
    pub code: &'static str,
}

impl Issue {
    fn new(field: &str, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
            code,
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Outcome of a validation run
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    errors: Vec<Issue>,
    warnings: Vec<Issue>,
}

impl ValidationResult {
    /// True when no check failed; warnings do not count
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Failed checks in the order they ran
    pub fn errors(&self) -> &[Issue] {
        &self.errors
    }

    /// Non-blocking findings
    pub fn warnings(&self) -> &[Issue] {
        &self.warnings
    }
}

/// Builder that chains checks over named fields
#[derive(Debug, Default)]
pub struct Validator {
    result: ValidationResult,
}

impl Validator {
    /// Validator with no checks run yet
    pub fn new() -> Self {
        Self::default()
    }

    fn fail(mut self, issue: Issue) -> Self {
        self.result.errors.push(issue);
        self
    }

    /// Value must contain something other than whitespace
    pub fn required(self, field: &str, value: &str) -> Self {
        if value.trim().is_empty() {
            return self.fail(Issue::new(field, "REQUIRED", "Field is required"));
        }
        self
    }

    /// Value must be at most `max` bytes long
    pub fn max_length(self, field: &str, value: &str, max: usize) -> Self {
        if value.len() > max {
            return self.fail(Issue::new(
                field,
                "MAX_LENGTH",
                format!("Must be at most {} characters, got {}", max, value.len()),
            ));
        }
        self
    }

    /// Value must match `re`; `description` names the expected shape
    pub fn matches(self, field: &str, value: &str, re: &Regex, description: &str) -> Self {
        if !re.is_match(value) {
            return self.fail(Issue::new(field, "PATTERN", format!("Must match {}", description)));
        }
        self
    }

    /// Value must lie in `min..=max`
    pub fn range<T: PartialOrd + fmt::Display>(self, field: &str, value: T, min: T, max: T) -> Self {
        if value < min || value > max {
            return self.fail(Issue::new(
                field,
                "RANGE",
                format!("Must be between {} and {}, got {}", min, max, value),
            ));
        }
        self
    }

    /// Run `check`; a returned message is a failure
    pub fn custom<F>(self, field: &str, check: F) -> Self
    where
        F: FnOnce() -> Option<String>,
    {
        match check() {
            Some(message) => self.fail(Issue::new(field, "CUSTOM", message)),
            None => self,
        }
    }

    /// Record a warning when `condition` holds
    pub fn warn_if(mut self, field: &str, condition: bool, message: &str) -> Self {
        if condition {
            self.result.warnings.push(Issue::new(field, "WARNING", message));
        }
        self
    }

    /// Finish and hand back everything collected
    pub fn validate(self) -> ValidationResult {
        self.result
    }
}

/// Warn about top-level config keys outside `known_keys`
pub fn validate_config_keys(config: &toml::Table, known_keys: &[&str]) -> ValidationResult {
    let warnings = config
        .keys()
        .filter(|key| !known_keys.contains(&key.as_str()))
        .map(|key| {
            Issue::new(
                key,
                "UNKNOWN_KEY",
                format!("Unknown configuration key (expected one of {})", known_keys.join(", ")),
            )
        })
        .collect();

    ValidationResult {
        errors: Vec::new(),
        warnings,
    }
}
