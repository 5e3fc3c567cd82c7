//! CLI utilities for appdesc
//!
//! Provides shared CLI functionality:
//! - Terminal output formatting
//! - Output format selection

#![warn(missing_docs)]

pub mod output;

pub use output::{OutputFormat, Status};
