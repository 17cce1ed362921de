//! # Document Assembly
//!
//! Turns a parsed CRD into a [`Document`]:
//!
//! 1. take the first entry of `spec.versions` (others are logged and
//!    skipped);
//! 2. split the root schema into its `spec` and `status` subtrees;
//! 3. drop the fields Crossplane injects into every composite resource;
//! 4. resolve `spec` as configurable and `status` as computed;
//! 5. fold the finished trees into a [`HelperSet`].

use tfpgen_core::{CompileError, CompileResult, Document, HelperSet, NodePath};

use crate::crd::{CustomResourceDefinition, SchemaNode};
use crate::resolve::{Resolver, DEFAULT_MAX_DEPTH};

/// Fields Crossplane injects into composite resource `spec`s.
pub const CROSSPLANE_SPEC_FIELDS: [&str; 9] = [
    "compositeDeletePolicy",
    "compositionRef",
    "compositionRevisionRef",
    "compositionRevisionSelector",
    "compositionSelector",
    "compositionUpdatePolicy",
    "publishConnectionDetailsTo",
    "resourceRef",
    "writeConnectionSecretToRef",
];

/// Fields Crossplane injects into composite resource `status`es.
pub const CROSSPLANE_STATUS_FIELDS: [&str; 2] = ["connectionDetails", "conditions"];

/// Knobs for compiling one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileOptions {
    /// Struct nesting ceiling.
    pub max_depth: usize,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Build the IR document for a CRD.
///
/// # Errors
///
/// `CompileError::SchemaShape` if the CRD has no versions, no schema, or
/// no `spec`/`status` subtree, or if either subtree is not a plain object;
/// otherwise whatever resolution reports.
pub fn assemble(crd: CustomResourceDefinition, options: &CompileOptions) -> CompileResult<Document> {
    let crd_spec = crd.spec;
    let kind = crd_spec.names.kind;
    let versions_path = NodePath::root("spec").child("versions");

    let mut versions = crd_spec.versions.into_iter();
    let version = versions
        .next()
        .ok_or_else(|| CompileError::shape(&versions_path, "CRD declares no versions"))?;

    let ignored: Vec<String> = versions.map(|v| v.name).collect();
    if !ignored.is_empty() {
        tracing::warn!(
            kind = %kind,
            compiled = %version.name,
            ignored = ?ignored,
            "CRD declares several versions; only the first is compiled"
        );
    }

    let schema_path = versions_path.child(version.name.as_str()).child("schema");
    let mut root = version
        .schema
        .ok_or_else(|| CompileError::shape(&schema_path, "version has no openAPIV3Schema"))?
        .open_api_v3_schema;

    let spec_path = NodePath::root("spec");
    let mut spec = root
        .properties
        .shift_remove("spec")
        .ok_or_else(|| CompileError::shape(&spec_path, "schema has no spec property"))?;
    let status_path = NodePath::root("status");
    let mut status = root
        .properties
        .shift_remove("status")
        .ok_or_else(|| CompileError::shape(&status_path, "schema has no status property"))?;

    check_subtree_root(&spec, &spec_path)?;
    check_subtree_root(&status, &status_path)?;

    for field in CROSSPLANE_SPEC_FIELDS {
        spec.properties.shift_remove(field);
    }
    for field in CROSSPLANE_STATUS_FIELDS {
        status.properties.shift_remove(field);
    }

    let spec_properties =
        Resolver::new(false, options.max_depth).resolve_properties(&spec, &spec_path)?;
    let status_properties =
        Resolver::new(true, options.max_depth).resolve_properties(&status, &status_path)?;

    let helpers = HelperSet::collect([spec_properties.as_slice(), status_properties.as_slice()]);
    let package_identifier = Document::package_identifier_for(&crd_spec.group, &kind, &version.name);

    tracing::debug!(
        package = %package_identifier,
        spec = spec_properties.len(),
        status = status_properties.len(),
        "assembled document"
    );

    Ok(Document {
        group: crd_spec.group,
        version: version.name,
        resource_name: kind.to_lowercase(),
        kind,
        resource_name_plural: crd_spec.names.plural,
        package_identifier,
        spec_properties,
        status_properties,
        helpers,
    })
}

/// `spec` and `status` become property lists, so each must be an object
/// described by `properties` alone.
fn check_subtree_root(node: &SchemaNode, path: &NodePath) -> CompileResult<()> {
    match node.schema_type.as_deref() {
        Some("object") => {}
        Some(other) => {
            return Err(CompileError::shape(
                path,
                format!("subtree root must be an object, found '{other}'"),
            ))
        }
        None => return Err(CompileError::shape(path, "node has no type")),
    }

    if node.additional_properties_schema(path)?.is_some() {
        let reason = if node.properties.is_empty() {
            "subtree root must declare properties, not additionalProperties"
        } else {
            "object declares both properties and additionalProperties"
        };
        return Err(CompileError::shape(path, reason));
    }
    Ok(())
}
