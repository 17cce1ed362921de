//! # CRD Model & Loader
//!
//! Typed view of the parts of a `CustomResourceDefinition` the compiler
//! reads, and the loader that parses one from a YAML (or JSON) stream.
//!
//! Only the first document of a multi-document stream is read. Keywords the
//! compiler does not use (`x-kubernetes-*`, `nullable`, `oneOf`, ...) are
//! accepted and ignored; checking that a schema is well-formed JSON Schema
//! is not the compiler's job.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use tfpgen_core::{CompileError, CompileResult, NodePath};

/// The subset of a CustomResourceDefinition used for compilation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomResourceDefinition {
    /// `apiextensions.k8s.io/v1` for well-formed inputs.
    #[serde(default)]
    pub api_version: Option<String>,
    /// `CustomResourceDefinition` for well-formed inputs.
    #[serde(default)]
    pub kind: Option<String>,
    /// Definition body.
    pub spec: CrdSpec,
}

/// `spec` of a CustomResourceDefinition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrdSpec {
    /// API group of the resource.
    pub group: String,
    /// Resource names.
    pub names: CrdNames,
    /// Served versions, in declaration order.
    #[serde(default)]
    pub versions: Vec<CrdVersion>,
}

/// `spec.names` of a CustomResourceDefinition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrdNames {
    /// CamelCase kind, e.g. `Bucket`.
    pub kind: String,
    /// Lower-case plural, e.g. `buckets`.
    pub plural: String,
}

/// One entry of `spec.versions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrdVersion {
    /// Version name, e.g. `v1`.
    pub name: String,
    /// Validation schema.
    #[serde(default)]
    pub schema: Option<CrdValidation>,
}

/// `spec.versions[].schema`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrdValidation {
    /// Root schema of the resource.
    #[serde(rename = "openAPIV3Schema")]
    pub open_api_v3_schema: SchemaNode,
}

/// One node of an OpenAPI v3 structural schema.
///
/// `properties` keeps the document order; the compiler never relies on it
/// and sorts siblings explicitly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaNode {
    /// `type` keyword.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,
    /// Named child schemas.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, SchemaNode>,
    /// Schema of map values, or a boolean.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<AdditionalProperties>,
    /// Schema of array elements.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaNode>>,
    /// Names of required children.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Raw encoded default value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Raw encoded allowed values, in declaration order.
    #[serde(default, rename = "enum", skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<Value>,
    /// Numeric lower bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    /// Numeric upper bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    /// Whether `minimum` itself is excluded.
    #[serde(default)]
    pub exclusive_minimum: bool,
    /// Whether `maximum` itself is excluded.
    #[serde(default)]
    pub exclusive_maximum: bool,
    /// Minimum string length.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    /// Maximum string length.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    /// Regular expression strings must match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// String format (`byte`, `date-time`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

/// `additionalProperties` is either a schema or a boolean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    /// `true` allows arbitrary values; `false` is the same as absent.
    Bool(bool),
    /// Schema every map value must satisfy.
    Schema(Box<SchemaNode>),
}

impl SchemaNode {
    /// Node with only a `type`.
    pub fn of_type(schema_type: impl Into<String>) -> Self {
        Self {
            schema_type: Some(schema_type.into()),
            ..Self::default()
        }
    }

    /// The schema of map values, if this node declares one.
    ///
    /// # Errors
    ///
    /// `additionalProperties: true` without a schema cannot be typed and is
    /// reported as a shape error at `path`.
    pub fn additional_properties_schema(
        &self,
        path: &NodePath,
    ) -> CompileResult<Option<&SchemaNode>> {
        match &self.additional_properties {
            None | Some(AdditionalProperties::Bool(false)) => Ok(None),
            Some(AdditionalProperties::Bool(true)) => Err(CompileError::shape(
                path,
                "additionalProperties: true without a value schema cannot be typed",
            )),
            Some(AdditionalProperties::Schema(schema)) => Ok(Some(schema)),
        }
    }

    /// Whether `name` is listed in this node's `required` set.
    pub fn requires(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }
}

/// Load a CRD from a file.
///
/// # Errors
///
/// Returns `CompileError::FileRead` if the file cannot be read or its first
/// document does not parse as a CustomResourceDefinition.
pub fn load_crd(path: &Path) -> CompileResult<CustomResourceDefinition> {
    let content = std::fs::read_to_string(path).map_err(|e| CompileError::FileRead {
        file: path.display().to_string(),
        reason: format!("cannot read file: {e}"),
    })?;
    parse_crd(&content, &path.display().to_string())
}

/// Parse a CRD from the first document of a YAML or JSON stream.
///
/// `file` is only used to label errors.
///
/// # Errors
///
/// Returns `CompileError::FileRead` if the stream is empty or the first
/// document does not parse.
pub fn parse_crd(content: &str, file: &str) -> CompileResult<CustomResourceDefinition> {
    let first = serde_yaml::Deserializer::from_str(content)
        .next()
        .ok_or_else(|| CompileError::FileRead {
            file: file.to_string(),
            reason: "document stream is empty".to_string(),
        })?;

    CustomResourceDefinition::deserialize(first).map_err(|e| CompileError::FileRead {
        file: file.to_string(),
        reason: format!("invalid CustomResourceDefinition: {e}"),
    })
}
