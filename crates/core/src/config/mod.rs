//! Configuration loading and schema definitions
//!
//! The tool configuration supplies toolchain overrides, signing profiles
//! and logging defaults.

mod loader;
mod schema;

pub use loader::Config;
pub use schema::*;
