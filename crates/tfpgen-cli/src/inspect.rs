//! # Inspect Subcommand
//!
//! Compiles a single CRD file and prints its IR document as JSON. Does not
//! read the config file or write anything.

use std::path::PathBuf;

use anyhow::{ensure, Result};
use clap::Args;

use tfpgen_core::Document;
use tfpgen_schema::{compile_file, CompileOptions, DEFAULT_MAX_DEPTH};

/// Arguments for `tfpgen inspect`.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// CRD file to compile.
    pub file: PathBuf,

    /// Struct nesting ceiling.
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    /// Print on a single line.
    #[arg(long)]
    pub compact: bool,
}

/// Execute `tfpgen inspect`.
pub fn run_inspect(args: &InspectArgs) -> Result<u8> {
    ensure!(args.max_depth > 0, "--max-depth must be at least 1");

    let options = CompileOptions {
        max_depth: args.max_depth,
    };
    let document = compile_file(&args.file, &options)?;
    println!("{}", render(&document, args.compact)?);
    Ok(0)
}

/// Serialize a document for display.
pub fn render(document: &Document, compact: bool) -> Result<String> {
    let json = if compact {
        serde_json::to_string(document)?
    } else {
        serde_json::to_string_pretty(document)?
    };
    Ok(json)
}
