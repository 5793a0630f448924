use crate::flags::FlagList;
use serde::Serialize;

/// Compilers and the flags discovered for them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toolchain {
    /// C compiler bound to `$cc`
    pub cc: String,

    /// C++ compiler bound to `$cxx`, also used as the linker
    pub cxx: String,

    /// Extra C++ compile flags reported by the toolchain
    pub cxxflags: FlagList,

    /// Link flags and libraries reported by the toolchain
    pub ldflags: FlagList,
}

impl Toolchain {
    /// Clang toolchain with the given introspected flags.
    pub fn clang(cxxflags: FlagList, ldflags: FlagList) -> Self {
        Self {
            cc: "clang".to_string(),
            cxx: "clang++".to_string(),
            cxxflags,
            ldflags,
        }
    }
}

/// Error type for toolchain introspection
#[derive(Debug)]
pub enum ToolchainError {
    /// The introspection tool could not be started
    NotFound { exe: String, source: std::io::Error },
    /// The tool ran but exited unsuccessfully
    Failed {
        exe: String,
        status: String,
        stderr: String,
    },
}

impl std::fmt::Display for ToolchainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToolchainError::NotFound { exe, source } => {
                write!(f, "could not run '{}': {}", exe, source)
            }
            ToolchainError::Failed {
                exe,
                status,
                stderr,
            } => {
                write!(f, "'{}' failed ({})", exe, status)?;
                if !stderr.trim().is_empty() {
                    write!(f, ": {}", stderr.trim())?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ToolchainError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ToolchainError::NotFound { source, .. } => Some(source),
            ToolchainError::Failed { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_error_includes_stderr() {
        let err = ToolchainError::Failed {
            exe: "llvm-config".to_string(),
            status: "exit status: 1".to_string(),
            stderr: "unknown component\n".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "'llvm-config' failed (exit status: 1): unknown component"
        );
    }

    #[test]
    fn test_clang_compilers() {
        let tc = Toolchain::clang(FlagList::new(), FlagList::new());
        assert_eq!(tc.cc, "clang");
        assert_eq!(tc.cxx, "clang++");
    }
}
