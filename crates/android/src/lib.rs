//! Android build descriptor resolution
//!
//! This crate turns a declarative app-module descriptor into concrete build
//! settings:
//! - Descriptor parsing with literal and symbolic values
//! - Toolchain providers (Flutter defaults, `local.properties`, overrides)
//! - Signing profile lookup per build type
//! - Gradle Kotlin DSL rendering of the resolved result

#![warn(missing_docs)]

pub mod descriptor;
pub mod error;
pub mod gradle;
pub mod identifier;
pub mod resolver;
pub mod signing;
pub mod toolchain;

#[cfg(test)]
mod testutil;

pub use descriptor::{BuildDescriptor, JavaVersion, ValueRef};
pub use error::{ResolutionError, Result};
pub use resolver::{resolve, ResolvedBuildType, ResolvedDescriptor};
pub use signing::{SigningProfile, SigningRegistry};
pub use toolchain::{FlutterToolchain, StaticToolchain, ToolchainProvider};
