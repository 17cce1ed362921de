//! # tfpgen-cli — Provider Generator Command-Line Interface
//!
//! Provides the `tfpgen` binary, which turns a directory of Kubernetes CRD
//! schemas into IR documents for the provider renderer.
//!
//! ## Subcommands
//!
//! - `tfpgen generate`: compile every schema under `schemasDir`, write one
//!   `document.json` per package plus a `packages.json` manifest.
//! - `tfpgen inspect <file>`: compile one file and print its IR.
//!
//! ```bash
//! tfpgen --config tfpgen.yaml generate
//! tfpgen generate --on-error skip --output-dir /tmp/out
//! tfpgen inspect schemas/bucket.yaml --compact
//! ```
//!
//! ## Crate Policy
//!
//! - Argument parsing lives in the binary; handlers live here and return
//!   the process exit code.
//! - Compilation is delegated to `tfpgen-schema`; this crate only walks
//!   directories, applies the failure policy, and writes files.

pub mod config;
pub mod generate;
pub mod inspect;
