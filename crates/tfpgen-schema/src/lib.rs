//! # tfpgen-schema — CRD Schema Compiler
//!
//! Compiles one Kubernetes `CustomResourceDefinition` file into a
//! [`Document`](tfpgen_core::Document): a typed, deterministic description
//! of the resource's `spec` and `status` fields that a provider renderer
//! can turn into source code without consulting the original schema.
//!
//! ## Pipeline
//!
//! - [`crd`] parses the first YAML document into a typed CRD model.
//! - [`resolve`] classifies every schema node and builds the property tree.
//! - [`metadata`] derives descriptions, defaults and validators.
//! - [`order`] keeps siblings in canonical order.
//! - [`assemble`] ties it together for the first CRD version.
//!
//! ## Crate Policy
//!
//! - Compilation of one file either returns a complete document or the
//!   first error encountered. There is no partial output.
//! - No global state: the helper summary is folded from the finished tree.
//! - Output depends only on schema content, never on key order in the input.

pub mod assemble;
pub mod crd;
pub mod metadata;
pub mod order;
pub mod resolve;

use std::path::Path;

use tfpgen_core::{CompileResult, Document};

pub use assemble::{assemble, CompileOptions, CROSSPLANE_SPEC_FIELDS, CROSSPLANE_STATUS_FIELDS};
pub use crd::{load_crd, parse_crd, AdditionalProperties, CustomResourceDefinition, SchemaNode};
pub use order::is_canonical;
pub use resolve::{Resolver, DEFAULT_MAX_DEPTH};

/// Load and compile one CRD file.
///
/// # Errors
///
/// Any [`CompileError`](tfpgen_core::CompileError) raised while loading or
/// compiling the file.
pub fn compile_file(path: &Path, options: &CompileOptions) -> CompileResult<Document> {
    let crd = load_crd(path)?;
    assemble(crd, options)
}

/// Compile a CRD held in memory. `file` only labels errors.
///
/// # Errors
///
/// See [`compile_file`].
pub fn compile_str(content: &str, file: &str, options: &CompileOptions) -> CompileResult<Document> {
    let crd = parse_crd(content, file)?;
    assemble(crd, options)
}
