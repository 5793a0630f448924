//! Configuration errors.

/// A fatal problem with the requested configuration or the descriptor.
///
/// Every variant is raised before any output file is touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Build mode other than `debug` or `release`
    UnsupportedMode(String),
    /// Configuration name that is neither a mode nor `<mode>-<letters>san`
    UnknownConfig(String),
    /// Sanitizer name not in {address, undefined, fuzzer}
    UnknownSanitizer(String),
    /// Source path without a base name or extension
    MalformedSource(String),
    /// Source extension with no compile rule
    UnsupportedExtension { source: String, ext: String },
    /// Same object base name registered from two different sources
    ConflictingSource { name: String, first: String, second: String },
    /// Program without a name or without sources
    EmptyProgram(String),
    /// Two programs linking to the same output
    DuplicateProgram(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::UnsupportedMode(mode) => {
                write!(f, "unsupported build mode '{}' (expected debug or release)", mode)
            }
            ConfigError::UnknownConfig(name) => write!(
                f,
                "unknown configuration '{}' (expected e.g. debug, release or debug-ausan)",
                name
            ),
            ConfigError::UnknownSanitizer(name) => {
                write!(f, "sanitizer '{}' not supported", name)
            }
            ConfigError::MalformedSource(src) => {
                write!(f, "malformed source file name '{}'", src)
            }
            ConfigError::UnsupportedExtension { source, ext } => {
                write!(f, "bad extension '{}' for source '{}'", ext, source)
            }
            ConfigError::ConflictingSource {
                name,
                first,
                second,
            } => write!(
                f,
                "object '{}' is built from both '{}' and '{}'",
                name, first, second
            ),
            ConfigError::EmptyProgram(name) => {
                write!(f, "program '{}' needs a name and at least one source", name)
            }
            ConfigError::DuplicateProgram(name) => {
                write!(f, "program '{}' is registered twice", name)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_messages() {
        let err = ConfigError::UnsupportedExtension {
            source: "main.rs".to_string(),
            ext: "rs".to_string(),
        };
        assert_eq!(err.to_string(), "bad extension 'rs' for source 'main.rs'");

        let err = ConfigError::UnknownSanitizer("thread".to_string());
        assert!(err.to_string().contains("thread"));
    }
}
