//! Application id and namespace syntax rules

use appdesc_core::validation::{ValidationResult, Validator};
use once_cell::sync::Lazy;
use regex::Regex;

/// At least two segments, each starting with a letter
static APPLICATION_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]*(\.[A-Za-z][A-Za-z0-9_]*)+$").unwrap());

/// Java package name: one or more Java identifiers
static NAMESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*$").unwrap());

const JAVA_RESERVED: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class",
    "const", "continue", "default", "do", "double", "else", "enum", "extends", "false",
    "final", "finally", "float", "for", "goto", "if", "implements", "import", "instanceof",
    "int", "interface", "long", "native", "new", "null", "package", "private", "protected",
    "public", "return", "short", "static", "strictfp", "super", "switch", "synchronized",
    "this", "throw", "throws", "transient", "true", "try", "void", "volatile", "while", "_",
];

/// Longest application id the Play Store accepts
pub const MAX_APPLICATION_ID_LEN: usize = 150;

fn reserved_segment(value: &str) -> Option<String> {
    value
        .split('.')
        .find(|segment| JAVA_RESERVED.contains(segment))
        .map(|segment| format!("'{}' is a reserved Java keyword", segment))
}

/// Validate an Android application id such as `com.example.app`
pub fn validate_application_id(value: &str) -> ValidationResult {
    let validator = Validator::new().required("applicationId", value);
    if value.trim().is_empty() {
        return validator.validate();
    }

    validator
        .max_length("applicationId", value, MAX_APPLICATION_ID_LEN)
        .matches(
            "applicationId",
            value,
            &APPLICATION_ID,
            "two or more dot-separated segments starting with a letter",
        )
        .custom("applicationId", || reserved_segment(value))
        .validate()
}

/// Validate a namespace against Java package naming rules
pub fn validate_namespace(value: &str) -> ValidationResult {
    let validator = Validator::new().required("namespace", value);
    if value.trim().is_empty() {
        return validator.validate();
    }

    validator
        .matches(
            "namespace",
            value,
            &NAMESPACE,
            "a Java package name (dot-separated Java identifiers)",
        )
        .custom("namespace", || reserved_segment(value))
        .warn_if(
            "namespace",
            !value.contains('.'),
            "single-segment namespaces clash with other libraries",
        )
        .validate()
}
