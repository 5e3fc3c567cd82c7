//! Terminal output utilities
//!
//! Provides consistent formatting for CLI output.

use clap::ValueEnum;
use owo_colors::OwoColorize;

/// How command results are printed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// Pretty-printed JSON on stdout
    Json,
}

impl OutputFormat {
    /// Whether output is meant for another program
    pub fn is_json(self) -> bool {
        self == Self::Json
    }
}

/// Status message helpers
pub struct Status;

impl Status {
    /// Print a success message
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Print an error message
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Print a hint under an error
    pub fn hint(message: &str) {
        eprintln!("  {} {}", "hint:".cyan(), message);
    }

    /// Print a header
    pub fn header(message: &str) {
        println!();
        println!("{}", message.bold());
        println!("{}", "─".repeat(message.chars().count()));
    }

    /// Print an aligned `label  value` line
    pub fn field(label: &str, value: impl std::fmt::Display) {
        println!("  {}  {}", format_label(label).dimmed(), value);
    }
}

/// Pad a label to the common field width
pub fn format_label(label: &str) -> String {
    const WIDTH: usize = 22;
    format!("{:<width$}", label, width = WIDTH)
}

/// Format a count with singular/plural
pub fn format_count(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_label_pads() {
        assert_eq!(format_label("minSdk").len(), 22);
        assert!(format_label("minSdk").starts_with("minSdk "));
    }

    #[test]
    fn test_format_label_keeps_long_labels() {
        let long = "a".repeat(30);
        assert_eq!(format_label(&long), long);
    }

    #[test]
    fn test_format_count_singular() {
        assert_eq!(format_count(1, "profile", "profiles"), "1 profile");
    }

    #[test]
    fn test_format_count_plural() {
        assert_eq!(format_count(3, "build type", "build types"), "3 build types");
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Text);
        assert!(OutputFormat::Json.is_json());
    }
}
