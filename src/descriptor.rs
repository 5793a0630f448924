//! Artefact descriptor (`artefacts.toml`).
//!
//! The descriptor lists what to build; [`Artefacts::describe`] replays it
//! against a [`BuildEnv`] through the same registration calls a hand-written
//! description would use.

use crate::env::BuildEnv;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const DESCRIPTOR_FILE: &str = "artefacts.toml";

#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Artefacts {
    #[serde(default, rename = "test")]
    pub tests: Vec<TestEntry>,
    #[serde(default, rename = "program")]
    pub programs: Vec<ProgramEntry>,
    #[serde(default, rename = "fuzz")]
    pub fuzz_targets: Vec<TestEntry>,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ProgramEntry {
    pub name: String,
    pub sources: Vec<String>,
    #[serde(default)]
    pub ldflags: Vec<String>,
}

/// Tests and fuzz targets take no extra link flags.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TestEntry {
    pub name: String,
    pub sources: Vec<String>,
}

impl Artefacts {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read descriptor {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Registers every entry: tests first, then programs, then fuzz targets.
    pub fn describe(&self, env: &mut BuildEnv) -> Result<()> {
        for test in &self.tests {
            env.test(&test.name, &test.sources)
                .with_context(|| format!("in test '{}'", test.name))?;
        }
        for prog in &self.programs {
            let ldflags: Vec<&str> = prog.ldflags.iter().map(String::as_str).collect();
            env.program(&prog.name, &prog.sources, &ldflags)
                .with_context(|| format!("in program '{}'", prog.name))?;
        }
        for fuzz in &self.fuzz_targets {
            env.fuzz_target(&fuzz.name, &fuzz.sources)
                .with_context(|| format!("in fuzz target '{}'", fuzz.name))?;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty() && self.programs.is_empty() && self.fuzz_targets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BuildConfig;
    use crate::error::ConfigError;
    use crate::host::Host;

    const TOY: &str = r#"
[[test]]
name = "test_lexer"
sources = ["test/lexer.cpp", "lexer.cpp"]

[[test]]
name = "test_parser"
sources = ["test/parser.cpp", "lexer.cpp", "parser.cpp"]

[[program]]
name = "toy"
sources = ["toy.cpp", "parser.cpp", "lexer.cpp", "codegen.cpp"]
"#;

    #[test]
    fn test_parse_and_describe() {
        let artefacts = Artefacts::parse(TOY).unwrap();
        assert_eq!(artefacts.tests.len(), 2);
        assert_eq!(artefacts.programs[0].ldflags, Vec::<String>::new());

        let mut env = BuildEnv::new(BuildConfig::defaults(), Host::Linux);
        artefacts.describe(&mut env).unwrap();
        let names: Vec<&str> = env.programs().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["test/test_lexer", "test/test_parser", "toy"]);
        let objects: Vec<&str> = env.objects().map(|o| o.name.as_str()).collect();
        assert_eq!(
            objects,
            ["test/lexer", "lexer", "test/parser", "parser", "toy", "codegen"]
        );
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let err = Artefacts::parse("[[program]]\nname = \"x\"\nsrcs = [\"x.c\"]\n").unwrap_err();
        assert!(err.to_string().contains("srcs"), "{err}");
    }

    #[test]
    fn test_describe_reports_config_error() {
        let artefacts = Artefacts::parse(
            "[[program]]\nname = \"bad\"\nsources = [\"bad.f90\"]\nldflags = [\"-lm\"]\n",
        )
        .unwrap();
        let mut env = BuildEnv::new(BuildConfig::defaults(), Host::Linux);
        let err = artefacts.describe(&mut env).unwrap_err();
        assert!(err.to_string().contains("in program 'bad'"));
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::UnsupportedExtension { .. })
        ));
    }

    #[test]
    fn test_empty_descriptor() {
        assert!(Artefacts::parse("").unwrap().is_empty());
    }
}
