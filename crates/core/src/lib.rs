//! Core utilities for the appdesc build descriptor tools
//!
//! This crate provides shared functionality used by the descriptor resolver
//! and the command-line front end:
//!
//! - **Error handling**: errors with codes, context, and recovery suggestions
//! - **Validation**: a fluent validator that collects every failure
//! - **Configuration**: TOML-based tool configuration (`.appdesc.toml`)
//!
//! # Example
//!
//! ```rust,no_run
//! use appdesc_core::config::Config;
//!
//! let config = Config::load(None).expect("invalid configuration");
//! println!("descriptor: {}", config.schema.general.descriptor);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod validation;

pub use error::{Error, ErrorCode, Result};
