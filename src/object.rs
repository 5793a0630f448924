//! Compiled object identities.

use crate::error::ConfigError;
use serde::Serialize;

/// Language of a source file, decided by its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceLang {
    C,
    Cpp,
}

impl SourceLang {
    pub fn from_ext(ext: &str) -> Option<Self> {
        match ext {
            "c" => Some(SourceLang::C),
            "cpp" => Some(SourceLang::Cpp),
            _ => None,
        }
    }

    /// Name of the Ninja rule that compiles this language.
    pub fn compile_rule(self) -> &'static str {
        match self {
            SourceLang::C => "cc",
            SourceLang::Cpp => "cxx",
        }
    }

    /// Per-config flag variable the compile rule reads.
    pub fn flag_var(self) -> &'static str {
        match self {
            SourceLang::C => "cflags",
            SourceLang::Cpp => "cxxflags",
        }
    }
}

/// One object file, identified by its source path without extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectFile {
    pub name: String,
    pub ext: String,
    #[serde(skip)]
    lang: SourceLang,
}

impl ObjectFile {
    /// Splits `src` at its last `.` into base name and extension.
    ///
    /// The base name becomes a path under every config's build directory,
    /// so it must be relative and stay below it: empty, `.` and `..`
    /// components are rejected.
    pub fn parse(src: &str) -> Result<Self, ConfigError> {
        let (name, ext) = src
            .rsplit_once('.')
            .filter(|(name, ext)| !ext.is_empty() && !ext.contains('/') && is_relative_below(name))
            .ok_or_else(|| ConfigError::MalformedSource(src.to_string()))?;

        let lang = SourceLang::from_ext(ext).ok_or_else(|| ConfigError::UnsupportedExtension {
            source: src.to_string(),
            ext: ext.to_string(),
        })?;

        Ok(Self {
            name: name.to_string(),
            ext: ext.to_string(),
            lang,
        })
    }

    pub fn is_cpp(&self) -> bool {
        self.lang == SourceLang::Cpp
    }

    pub fn compile_rule(&self) -> &'static str {
        self.lang.compile_rule()
    }

    pub fn source(&self) -> String {
        format!("{}.{}", self.name, self.ext)
    }

    pub fn object_name(&self) -> String {
        format!("{}.o", self.name)
    }
}

fn is_relative_below(name: &str) -> bool {
    name.split('/')
        .all(|component| !matches!(component, "" | "." | ".."))
}
