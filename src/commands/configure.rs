//! Configure command handler
//!
//! Handles `configure`: loads the descriptor, registers every artefact,
//! discovers the toolchain and writes the Ninja file. Every fallible step
//! runs before the output file is touched.

use anyhow::{Context, Result};
use colored::*;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::config::{BuildConfig, BuildMode, DEFAULT_BUILD_ROOT};
use crate::descriptor::{Artefacts, DESCRIPTOR_FILE};
use crate::env::{BuildEnv, NINJA_FILE, Reconfigure};
use crate::error::ConfigError;
use crate::host::Host;
use crate::sanitizer::SanitizerSelection;
use crate::toolchain::Introspect;

/// Everything a single `configure` run needs.
#[derive(Debug, Clone)]
pub struct ConfigureOptions {
    pub descriptor: PathBuf,
    pub output: PathBuf,
    pub build_root: String,
    pub configs: Vec<BuildConfig>,
    pub host: Host,
    /// Command line replayed when Ninja regenerates the build file
    pub command: Vec<String>,
    /// Path of the configure program, a regeneration input
    pub program: String,
}

impl Default for ConfigureOptions {
    fn default() -> Self {
        Self {
            descriptor: PathBuf::from(DESCRIPTOR_FILE),
            output: PathBuf::from(NINJA_FILE),
            build_root: DEFAULT_BUILD_ROOT.to_string(),
            configs: BuildConfig::defaults(),
            host: Host::current(),
            command: vec!["./configure".to_string()],
            program: "configure".to_string(),
        }
    }
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigureReport {
    pub configs: Vec<String>,
    pub objects: usize,
    pub programs: usize,
}

/// Picks the configurations to generate.
///
/// `names` are canonical config names (`debug`, `release-ausan`, ...) in the
/// order they should be emitted; `sanitizers` is added to each of them.
/// With neither given, the four defaults are used. With only sanitizers,
/// a single debug configuration is generated. Repeated configurations are
/// emitted once.
pub fn resolve_configs<S: AsRef<str>>(
    names: &[S],
    sanitizers: Option<&str>,
) -> Result<Vec<BuildConfig>, ConfigError> {
    if names.is_empty() && sanitizers.is_none() {
        return Ok(BuildConfig::defaults());
    }
    let extra = sanitizers
        .map(SanitizerSelection::parse)
        .transpose()?
        .unwrap_or_default();

    let mut base = names
        .iter()
        .map(|name| BuildConfig::from_name(name.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;
    if base.is_empty() {
        base.push(BuildConfig::new(BuildMode::Debug, SanitizerSelection::none()));
    }

    let mut configs: Vec<BuildConfig> = Vec::with_capacity(base.len());
    for cfg in base {
        let cfg = BuildConfig::new(cfg.mode, cfg.sanitizers.union(extra));
        if !configs.contains(&cfg) {
            configs.push(cfg);
        }
    }
    Ok(configs)
}

/// Loads the descriptor and registers it against a fresh environment.
pub fn load_env(options: &ConfigureOptions) -> Result<BuildEnv> {
    let artefacts = Artefacts::load(&options.descriptor)?;
    if artefacts.is_empty() {
        eprintln!(
            "   {} {} describes no artefacts",
            "!".yellow(),
            options.descriptor.display()
        );
    }

    let reconfigure = Reconfigure {
        command: options.command.clone(),
        inputs: vec![
            options.program.clone(),
            options.descriptor.to_string_lossy().to_string(),
        ],
        output: options.output.to_string_lossy().to_string(),
    };

    let mut env = BuildEnv::new(options.configs.clone(), options.host)
        .with_build_root(options.build_root.clone())
        .with_reconfigure(reconfigure);
    artefacts.describe(&mut env)?;
    Ok(env)
}

/// Runs the whole configuration and writes the Ninja file.
pub fn run_configure(
    options: &ConfigureOptions,
    introspect: &dyn Introspect,
) -> Result<ConfigureReport> {
    let env = load_env(options)?;

    let toolchain = introspect
        .introspect()
        .context("Toolchain discovery failed")?;
    println!(
        "   {} Toolchain: {} / {} ({} compile, {} link flags)",
        "🔧".cyan(),
        toolchain.cc,
        toolchain.cxx,
        toolchain.cxxflags.len(),
        toolchain.ldflags.len()
    );

    let ninja = env.write_ninja(&toolchain);
    write_output(&options.output, &ninja)?;

    Ok(ConfigureReport {
        configs: env.configs().iter().map(BuildConfig::name).collect(),
        objects: env.objects().count(),
        programs: env.programs().len(),
    })
}

/// Writes through a uniquely named temporary file in the target directory,
/// so a failed write never leaves a truncated build file or a stray
/// temporary behind.
fn write_output(path: &Path, content: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create a temporary file in {}", dir.display()))?;
    tmp.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write {}", tmp.path().display()))?;
    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to replace {}", path.display()))?;
    Ok(())
}
