//! # tfpgen CLI entry point
//!
//! Parses command-line arguments, installs logging, and dispatches to the
//! subcommand handlers in `tfpgen_cli`.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tfpgen_cli::generate::{run_generate, GenerateArgs};
use tfpgen_cli::inspect::{run_inspect, InspectArgs};

/// Generate provider code inputs from Kubernetes CRD schemas.
#[derive(Parser, Debug)]
#[command(name = "tfpgen", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to the configuration file.
    #[arg(long, global = true, default_value = "tfpgen.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compile every schema file and write IR documents and the manifest.
    Generate(GenerateArgs),

    /// Compile one schema file and print its IR document.
    Inspect(InspectArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over -v.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    tracing::debug!(config = %cli.config.display(), "tfpgen starting");

    let result = match cli.command {
        Commands::Generate(args) => run_generate(&args, &cli.config),
        Commands::Inspect(args) => run_inspect(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
