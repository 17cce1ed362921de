//! # Generate Subcommand
//!
//! Walks the schemas directory, compiles every file, and hands the results
//! to the renderer as JSON:
//!
//! ```text
//! <outputDir>/
//!   packages.json                    manifest, in walk order
//!   prc_com_bucket_v1/document.json  one IR document per CRD
//! ```
//!
//! Files are visited in file-name order so repeated runs produce the same
//! manifest. With `onError: abort` the first failing file ends the run and
//! no manifest is written; with `onError: skip` failures are logged,
//! summarized at the end, and left out of the manifest.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use tfpgen_core::{CompileError, Document};
use tfpgen_schema::{compile_file, CompileOptions};

use crate::config::{Config, OnErrorPolicy};

/// File name of the per-package IR document.
pub const DOCUMENT_FILE: &str = "document.json";

/// File name of the package manifest.
pub const MANIFEST_FILE: &str = "packages.json";

/// Arguments for `tfpgen generate`.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Directory of CRD files. Overrides `schemasDir`.
    #[arg(long)]
    pub schemas_dir: Option<PathBuf>,

    /// Directory for generated documents. Overrides `outputDir`.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Failure policy. Overrides `onError`.
    #[arg(long, value_enum)]
    pub on_error: Option<OnErrorPolicy>,
}

/// One compiled CRD as written to `document.json`.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct DocumentFile<'a> {
    /// Module the generated package belongs to.
    pub module_name: &'a str,
    /// The compiled IR.
    pub document: &'a Document,
}

/// `packages.json`: every package generated in this run.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PackageManifest {
    /// Module the generated packages belong to.
    pub module_name: String,
    /// Provider name.
    pub provider_name: String,
    /// Provider registry address.
    pub address: String,
    /// Package identifiers, in walk order.
    pub packages: Vec<String>,
}

/// Outcome of a generate run.
#[derive(Debug, Default)]
pub struct GenerateReport {
    /// Files visited.
    pub files: usize,
    /// Packages written, in walk order.
    pub packages: Vec<String>,
    /// Files that failed to compile.
    pub failures: Vec<(PathBuf, CompileError)>,
    /// The run stopped at the first failure.
    pub aborted: bool,
}

impl GenerateReport {
    /// Process exit code: 0 only when every file compiled.
    pub fn exit_code(&self) -> u8 {
        if self.failures.is_empty() {
            0
        } else {
            1
        }
    }
}

/// Execute `tfpgen generate`.
pub fn run_generate(args: &GenerateArgs, config_path: &Path) -> Result<u8> {
    let mut config = Config::load(config_path)?;
    config.apply_overrides(
        args.schemas_dir.clone(),
        args.output_dir.clone(),
        args.on_error,
    );

    tracing::info!(
        schemas_dir = %config.schemas_dir.display(),
        output_dir = %config.output_dir.display(),
        on_error = ?config.on_error,
        "generating provider documents"
    );

    let report = generate(&config)?;

    println!(
        "Compiled {} of {} schema file(s) into {}",
        report.packages.len(),
        report.files,
        config.output_dir.display()
    );
    if !report.failures.is_empty() {
        println!("{} file(s) failed:", report.failures.len());
        for (file, err) in &report.failures {
            println!("  {}: {err}", file.display());
        }
    }
    if report.aborted {
        println!("Stopped at the first failure; no manifest written.");
    }

    Ok(report.exit_code())
}

/// Compile every schema under `config.schemas_dir` and write the outputs.
///
/// Compile failures are reported in the returned [`GenerateReport`];
/// I/O failures on the output side end the run with an error.
pub fn generate(config: &Config) -> Result<GenerateReport> {
    let files = schema_files(&config.schemas_dir)?;
    let options = CompileOptions {
        max_depth: config.max_depth,
    };

    std::fs::create_dir_all(&config.output_dir)
        .with_context(|| format!("creating {}", config.output_dir.display()))?;

    let mut report = GenerateReport {
        files: files.len(),
        ..GenerateReport::default()
    };

    for file in files {
        tracing::info!(path = %file.display(), "compiling schema");

        let document = match compile_file(&file, &options) {
            Ok(document) => document,
            Err(err) => {
                tracing::error!(path = %file.display(), kind = err.kind(), "{err}");
                report.failures.push((file, err));
                if config.on_error == OnErrorPolicy::Abort {
                    report.aborted = true;
                    return Ok(report);
                }
                continue;
            }
        };

        write_document(config, &document)?;

        if report.packages.contains(&document.package_identifier) {
            tracing::warn!(
                package = %document.package_identifier,
                path = %file.display(),
                "package generated twice; the later file wins"
            );
        } else {
            report.packages.push(document.package_identifier);
        }
    }

    write_manifest(config, &report.packages)?;
    Ok(report)
}

/// Every non-directory entry under `dir`, in file-name order.
pub fn schema_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.with_context(|| format!("walking {}", dir.display()))?;
        if !entry.file_type().is_dir() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn write_document(config: &Config, document: &Document) -> Result<()> {
    let dir = config.output_dir.join(&document.package_identifier);
    std::fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;

    let file = DocumentFile {
        module_name: &config.module_name,
        document,
    };
    let path = dir.join(DOCUMENT_FILE);
    write_json(&path, &file)?;
    tracing::debug!(path = %path.display(), "wrote document");
    Ok(())
}

fn write_manifest(config: &Config, packages: &[String]) -> Result<()> {
    let manifest = PackageManifest {
        module_name: config.module_name.clone(),
        provider_name: config.name.clone(),
        address: config.address.clone(),
        packages: packages.to_vec(),
    };
    write_json(&config.output_dir.join(MANIFEST_FILE), &manifest)
}

fn write_json(path: &Path, value: &impl Serialize) -> Result<()> {
    let mut json = serde_json::to_string_pretty(value)
        .with_context(|| format!("serializing {}", path.display()))?;
    json.push('\n');
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))
}
