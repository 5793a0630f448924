//! # configure CLI Entry Point
//!
//! Parses CLI arguments using clap, runs the configuration and writes
//! `build.ninja`. Ninja re-runs this program with the same arguments when
//! the descriptor changes.

use anyhow::Result;
use clap::Parser;
use colored::*;
use std::path::PathBuf;

use ninjaconf::commands::configure::{self, ConfigureOptions};
use ninjaconf::config::DEFAULT_BUILD_ROOT;
use ninjaconf::descriptor::DESCRIPTOR_FILE;
use ninjaconf::env::NINJA_FILE;
use ninjaconf::host::Host;
use ninjaconf::toolchain::LlvmConfig;

#[derive(Parser)]
#[command(name = "configure")]
#[command(about = "Generate a multi-configuration build.ninja", version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
struct Cli {
    /// Sanitizers to enable (comma list of address, undefined, fuzzer)
    #[arg(long, visible_alias = "san")]
    sanitizers: Option<String>,
    /// Configuration to generate, e.g. debug, release or debug-ausan (repeatable)
    #[arg(long)]
    config: Vec<String>,
    /// Artefact descriptor
    #[arg(long, default_value = DESCRIPTOR_FILE)]
    descriptor: PathBuf,
    /// Ninja file to write
    #[arg(short, long, default_value = NINJA_FILE)]
    output: PathBuf,
    /// Root directory for per-config build outputs
    #[arg(long, default_value = DEFAULT_BUILD_ROOT)]
    builddir: String,
    /// llvm-config executable used for toolchain flags
    #[arg(long, default_value = "llvm-config")]
    llvm_config: String,
    /// Print the registered artefacts as JSON instead of writing the Ninja file
    #[arg(long)]
    dump: bool,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "x".red(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let configs = configure::resolve_configs(cli.config.as_slice(), cli.sanitizers.as_deref())?;

    let program = std::env::current_exe()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|_| "configure".to_string());

    let options = ConfigureOptions {
        descriptor: cli.descriptor,
        output: cli.output,
        build_root: cli.builddir,
        configs,
        host: Host::current(),
        command: std::env::args().collect(),
        program,
    };

    if cli.dump {
        let env = configure::load_env(&options)?;
        println!("{}", serde_json::to_string_pretty(&env.summary())?);
        return Ok(());
    }

    let report = configure::run_configure(&options, &LlvmConfig::new(cli.llvm_config))?;
    println!(
        "{} Wrote {} ({}; {} objects, {} programs)",
        "✓".green(),
        options.output.display(),
        report.configs.join(", "),
        report.objects,
        report.programs
    );
    Ok(())
}
