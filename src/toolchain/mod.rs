//! Toolchain introspection
//!
//! The C++ sources are compiled against LLVM, so the flags needed to build
//! and link them come from `llvm-config`. Discovery happens once per run,
//! before any output is produced; a missing or failing tool aborts the
//! whole configuration.

pub mod types;

pub use types::{Toolchain, ToolchainError};

use crate::flags::FlagList;
use std::process::Command;

/// Source of compile and link flags for the configured toolchain.
pub trait Introspect {
    fn introspect(&self) -> Result<Toolchain, ToolchainError>;
}

/// Queries an `llvm-config` executable.
#[derive(Debug, Clone)]
pub struct LlvmConfig {
    exe: String,
}

impl LlvmConfig {
    pub fn new(exe: impl Into<String>) -> Self {
        Self { exe: exe.into() }
    }

    fn query(&self, args: &[&str]) -> Result<FlagList, ToolchainError> {
        let output = Command::new(&self.exe)
            .args(args)
            .output()
            .map_err(|source| ToolchainError::NotFound {
                exe: self.exe.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ToolchainError::Failed {
                exe: format!("{} {}", self.exe, args.join(" ")),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            });
        }

        Ok(FlagList::from_whitespace(&String::from_utf8_lossy(
            &output.stdout,
        )))
    }
}

impl Introspect for LlvmConfig {
    fn introspect(&self) -> Result<Toolchain, ToolchainError> {
        let cxxflags = self.query(&["--cxxflags"])?;
        let ldflags = self.query(&["--ldflags", "--system-libs", "--libs", "core"])?;
        Ok(Toolchain::clang(cxxflags, ldflags))
    }
}

/// A toolchain whose flags are already known.
impl Introspect for Toolchain {
    fn introspect(&self) -> Result<Toolchain, ToolchainError> {
        Ok(self.clone())
    }
}
