//! # ninjaconf - Ninja build file generator for C/C++ projects
//!
//! ninjaconf turns a short list of programs, tests and fuzz targets into a
//! single `build.ninja` holding several build configurations side by side.
//!
//! ## Features
//!
//! - **Object Deduplication**: a source shared by several programs compiles once per config
//! - **Config Namespacing**: `debug`, `release` and sanitizer builds coexist in one file
//! - **Toolchain Discovery**: compile and link flags come from `llvm-config`
//! - **Self-Reconfiguration**: Ninja re-runs `configure` when the descriptor changes
//!
//! ## Quick Start
//!
//! ```bash
//! # Generate build.ninja from artefacts.toml
//! configure --sanitizers address,undefined
//!
//! # Build everything
//! ninja
//! ```
//!
//! ## Module Organization
//!
//! - [`env`] - Registration API and build file emission
//! - [`config`] - Build modes and per-config variables
//! - [`sanitizer`] - Sanitizer selection parsing
//! - [`toolchain`] - `llvm-config` introspection
//! - [`descriptor`] - `artefacts.toml` loading

/// CLI command handlers.
pub mod commands;

/// Build modes and per-configuration variable namespaces.
pub mod config;

/// Artefact descriptor parsing.
pub mod descriptor;

/// Registration API and Ninja emission.
pub mod env;

/// Configuration errors.
pub mod error;

/// Ordered flag token lists.
pub mod flags;

/// Host platform queries.
pub mod host;

/// Low-level Ninja syntax writer.
pub mod ninja;

/// Object file identities.
pub mod object;

/// Linked programs.
pub mod program;

/// Sanitizer selection.
pub mod sanitizer;

/// Toolchain introspection.
pub mod toolchain;

pub use config::{BuildConfig, BuildMode};
pub use descriptor::Artefacts;
pub use env::{BuildEnv, Reconfigure};
pub use error::ConfigError;
pub use host::Host;
pub use sanitizer::{SanitizerKind, SanitizerSelection};
pub use toolchain::{Introspect, LlvmConfig, Toolchain, ToolchainError};
