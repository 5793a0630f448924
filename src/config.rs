//! Build configurations.
//!
//! A configuration is a build mode plus a sanitizer selection. Each one owns
//! a namespace of Ninja variables (`debug_cflags`, `release-ausan_ldflags`,
//! ...) so that any number of configurations can live in one build file.

use crate::error::ConfigError;
use crate::flags::FlagList;
use crate::ninja::escape_value;
use crate::sanitizer::{SanitizerKind, SanitizerSelection};
use crate::toolchain::Toolchain;
use indexmap::IndexMap;
use serde::Serialize;
use std::str::FromStr;

/// Warnings and diagnostics shared by every configuration.
pub const BASE_FLAGS: &[&str] = &[
    "-g",
    "-Wall",
    "-Wextra",
    "-Wpedantic",
    "-Werror",
    "-fcolor-diagnostics",
    "-Wno-unused-parameter",
    "-Wno-error=unused-function",
    "-Wno-gnu-zero-variadic-macro-arguments",
    "-Wno-error=unused-private-field",
    // llvm on ubuntu
    "-Wno-unused-command-line-argument",
    "-Wno-unknown-warning-option",
];

pub const INCLUDE_FLAG: &str = "-Iinclude";
pub const C_STD_FLAG: &str = "-std=c11";
pub const RELEASE_OPT_FLAG: &str = "-O3";
pub const DEFAULT_BUILD_ROOT: &str = "build";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    #[default]
    Debug,
    Release,
}

impl BuildMode {
    pub fn as_str(self) -> &'static str {
        match self {
            BuildMode::Debug => "debug",
            BuildMode::Release => "release",
        }
    }
}

impl FromStr for BuildMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "debug" => Ok(BuildMode::Debug),
            "release" => Ok(BuildMode::Release),
            _ => Err(ConfigError::UnsupportedMode(s.to_string())),
        }
    }
}

impl std::fmt::Display for BuildMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BuildConfig {
    pub mode: BuildMode,
    pub sanitizers: SanitizerSelection,
}

impl BuildConfig {
    pub fn new(mode: BuildMode, sanitizers: SanitizerSelection) -> Self {
        Self { mode, sanitizers }
    }

    /// Parses both halves from their command line spelling.
    pub fn parse(mode: &str, sanitizers: &str) -> Result<Self, ConfigError> {
        Ok(Self::new(mode.parse()?, SanitizerSelection::parse(sanitizers)?))
    }

    /// Parses a canonical name as produced by [`BuildConfig::name`], e.g.
    /// `release` or `debug-ausan`.
    pub fn from_name(name: &str) -> Result<Self, ConfigError> {
        let unknown = || ConfigError::UnknownConfig(name.to_string());
        match name.split_once('-') {
            None => Ok(Self::new(name.parse()?, SanitizerSelection::none())),
            Some((mode, suffix)) => {
                let mode = mode.parse::<BuildMode>().map_err(|_| unknown())?;
                let sanitizers = suffix
                    .strip_suffix("san")
                    .and_then(SanitizerSelection::from_short_name)
                    .ok_or_else(unknown)?;
                Ok(Self::new(mode, sanitizers))
            }
        }
    }

    /// The four configurations generated when nothing is requested.
    pub fn defaults() -> Vec<BuildConfig> {
        let ausan =
            SanitizerSelection::from_kinds(&[SanitizerKind::Address, SanitizerKind::Undefined]);
        vec![
            BuildConfig::new(BuildMode::Debug, SanitizerSelection::none()),
            BuildConfig::new(BuildMode::Release, SanitizerSelection::none()),
            BuildConfig::new(BuildMode::Debug, ausan),
            BuildConfig::new(BuildMode::Release, ausan),
        ]
    }

    /// `debug`, `release`, or e.g. `debug-ausan` with sanitizers.
    pub fn name(&self) -> String {
        if self.sanitizers.is_empty() {
            return self.mode.to_string();
        }
        format!("{}-{}san", self.mode, self.sanitizers.short_name())
    }

    /// Namespaced variable name, e.g. `debug_cflags`.
    pub fn var(&self, key: &str) -> String {
        format!("{}_{}", self.name(), key)
    }

    /// Reference to a namespaced variable, e.g. `$debug_cflags`.
    pub fn var_ref(&self, key: &str) -> String {
        format!("${}", self.var(key))
    }

    pub fn baseflags(&self) -> FlagList {
        let mut flags: FlagList = BASE_FLAGS.iter().copied().collect();
        flags.push(INCLUDE_FLAG);
        flags.append(&self.sanitizers.compile_flags());
        if self.mode == BuildMode::Release {
            flags.push(RELEASE_OPT_FLAG);
        }
        flags
    }

    pub fn builddir(&self, root: &str) -> String {
        format!("{}/{}", root.trim_end_matches('/'), self.name())
    }

    pub fn cflags(&self) -> FlagList {
        let mut flags = FlagList::new();
        flags.push_var(&self.var("baseflags"));
        flags.push(C_STD_FLAG);
        flags
    }

    pub fn cxxflags(&self, toolchain: &Toolchain) -> FlagList {
        let mut flags = FlagList::new();
        flags.push_var(&self.var("baseflags"));
        flags.append(&toolchain.cxxflags);
        flags
    }

    pub fn ldflags(&self, toolchain: &Toolchain, root: &str) -> FlagList {
        let mut flags = FlagList::new();
        flags.push(format!("-L{}", self.builddir(root)));
        flags.append(&toolchain.ldflags);
        flags.append(&self.sanitizers.link_flags());
        flags
    }

    /// Every binding of this configuration, keyed without the namespace
    /// prefix, in emission order.
    pub fn vars(&self, toolchain: &Toolchain, root: &str) -> IndexMap<&'static str, String> {
        let mut vars = IndexMap::new();
        vars.insert("baseflags", self.baseflags().join());
        vars.insert("builddir", escape_value(&self.builddir(root)));
        vars.insert("cflags", self.cflags().join());
        vars.insert("cxxflags", self.cxxflags(toolchain).join());
        vars.insert("ldflags", self.ldflags(toolchain, root).join());
        vars
    }
}

impl Serialize for BuildConfig {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let sanitizers: Vec<&str> = self.sanitizers.kinds().map(|k| k.name()).collect();
        let mut state = serializer.serialize_struct("BuildConfig", 3)?;
        state.serialize_field("name", &self.name())?;
        state.serialize_field("mode", &self.mode)?;
        state.serialize_field("sanitizers", &sanitizers)?;
        state.end()
    }
}
