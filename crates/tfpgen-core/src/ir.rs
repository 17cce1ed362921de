//! # Schema IR
//!
//! The intermediate representation handed from the compiler to the
//! renderer. One [`Document`] per CRD file; each document owns two
//! property trees (`spec` and `status`) built from [`Property`] nodes.
//!
//! ## Invariants
//!
//! - `required` and `optional` are mutually exclusive and exhaustive.
//! - `children` is non-empty only when the type is struct-bearing:
//!   `Struct`, `Map` of `Struct`, or `Array` of `Struct`.
//! - Siblings are sorted ascending by `name` at every level.
//! - `computed` holds for every status property and every defaulted property.
//!
//! The compiler in `tfpgen-schema` is the only producer of these values;
//! renderers treat them as read-only.

use std::fmt;

use serde::{Deserialize, Serialize};

// ─── Scalars and literals ────────────────────────────────────────────

/// Kind of a scalar leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarKind {
    /// `type: string`
    String,
    /// `type: integer`
    Int64,
    /// `type: number`
    Float64,
    /// `type: boolean`
    Bool,
}

impl ScalarKind {
    /// Map a schema `type` keyword to a scalar kind.
    ///
    /// Returns `None` for `object`, `array` and anything unrecognized.
    pub fn from_schema_type(schema_type: &str) -> Option<Self> {
        match schema_type {
            "string" => Some(Self::String),
            "integer" => Some(Self::Int64),
            "number" => Some(Self::Float64),
            "boolean" => Some(Self::Bool),
            _ => None,
        }
    }

    /// The schema `type` keyword for this kind.
    pub fn schema_type(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int64 => "integer",
            Self::Float64 => "number",
            Self::Bool => "boolean",
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::String => "string",
            Self::Int64 => "int64",
            Self::Float64 => "float64",
            Self::Bool => "bool",
        };
        f.write_str(s)
    }
}

/// A decoded scalar value: a default, an enum member, or a numeric bound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Literal {
    /// String value.
    String(String),
    /// 64-bit signed integer value.
    Int64(i64),
    /// 64-bit float value.
    Float64(f64),
    /// Boolean value.
    Bool(bool),
}

impl Literal {
    /// The scalar kind this literal belongs to.
    pub fn kind(&self) -> ScalarKind {
        match self {
            Self::String(_) => ScalarKind::String,
            Self::Int64(_) => ScalarKind::Int64,
            Self::Float64(_) => ScalarKind::Float64,
            Self::Bool(_) => ScalarKind::Bool,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "{s:?}"),
            Self::Int64(i) => write!(f, "{i}"),
            Self::Float64(x) => write!(f, "{x}"),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

// ─── Type descriptors ────────────────────────────────────────────────

/// Resolved shape of a property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum TypeDescriptor {
    /// A scalar leaf.
    Scalar {
        /// Scalar kind.
        kind: ScalarKind,
    },
    /// A string-keyed map. Struct values keep their fields in the owning
    /// property's `children`.
    Map {
        /// Type of the map values.
        value_type: Box<TypeDescriptor>,
    },
    /// A nested object. Fields live in the owning property's `children`.
    Struct,
    /// A list. Struct elements keep their fields in the owning property's
    /// `children`.
    Array {
        /// Type of the list elements.
        element_type: Box<TypeDescriptor>,
    },
}

impl TypeDescriptor {
    /// Scalar descriptor.
    pub fn scalar(kind: ScalarKind) -> Self {
        Self::Scalar { kind }
    }

    /// Map descriptor with the given value type.
    pub fn map_of(value_type: TypeDescriptor) -> Self {
        Self::Map {
            value_type: Box::new(value_type),
        }
    }

    /// Array descriptor with the given element type.
    pub fn array_of(element_type: TypeDescriptor) -> Self {
        Self::Array {
            element_type: Box::new(element_type),
        }
    }

    /// The kind, if this descriptor is itself a scalar.
    pub fn scalar_kind(&self) -> Option<ScalarKind> {
        match self {
            Self::Scalar { kind } => Some(*kind),
            _ => None,
        }
    }

    /// The kind of map values or array elements, when they are scalars.
    pub fn element_kind(&self) -> Option<ScalarKind> {
        match self {
            Self::Map { value_type } => value_type.scalar_kind(),
            Self::Array { element_type } => element_type.scalar_kind(),
            _ => None,
        }
    }

    /// Whether properties of this shape carry `children`.
    pub fn is_struct_bearing(&self) -> bool {
        match self {
            Self::Struct => true,
            Self::Map { value_type } => matches!(**value_type, Self::Struct),
            Self::Array { element_type } => matches!(**element_type, Self::Struct),
            Self::Scalar { .. } => false,
        }
    }

    /// The provider attribute family a renderer should emit for this shape.
    pub fn attribute_kind(&self) -> AttributeKind {
        match self {
            Self::Scalar { kind } => match kind {
                ScalarKind::String => AttributeKind::String,
                ScalarKind::Int64 => AttributeKind::Int64,
                ScalarKind::Float64 => AttributeKind::Float64,
                ScalarKind::Bool => AttributeKind::Bool,
            },
            Self::Struct => AttributeKind::SingleNested,
            Self::Map { value_type } => match value_type.scalar_kind() {
                Some(element) => AttributeKind::Map { element },
                None => AttributeKind::MapNested,
            },
            Self::Array { element_type } => match element_type.scalar_kind() {
                Some(element) => AttributeKind::List { element },
                None => AttributeKind::ListNested,
            },
        }
    }
}

/// Provider attribute family for a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "attribute", rename_all = "snake_case")]
pub enum AttributeKind {
    /// Scalar string attribute.
    String,
    /// Scalar int64 attribute.
    Int64,
    /// Scalar float64 attribute.
    Float64,
    /// Scalar bool attribute.
    Bool,
    /// Map of scalars.
    Map {
        /// Value kind.
        element: ScalarKind,
    },
    /// Map of nested objects.
    MapNested,
    /// Single nested object.
    SingleNested,
    /// List of scalars.
    List {
        /// Element kind.
        element: ScalarKind,
    },
    /// List of nested objects.
    ListNested,
}

// ─── Constraints ─────────────────────────────────────────────────────

/// A validation rule derived from a scalar schema node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Constraint {
    /// Value must be one of the listed literals, in schema order.
    OneOf {
        /// Allowed values.
        values: Vec<Literal>,
    },
    /// String length lower bound.
    LengthAtLeast {
        /// Minimum length.
        min: u64,
    },
    /// String length upper bound.
    LengthAtMost {
        /// Maximum length.
        max: u64,
    },
    /// String must match a regular expression.
    RegexMatches {
        /// Pattern as written in the schema.
        pattern: String,
        /// Pattern as a backtick-delimited source literal, with embedded
        /// backticks spliced in as `"`"` segments.
        literal: String,
    },
    /// String must be base64 (`format: byte`).
    Base64,
    /// String must be an RFC3339 timestamp (`format: date-time`).
    DateTime,
    /// Inclusive numeric lower bound.
    AtLeast {
        /// Bound after exclusive adjustment.
        bound: Literal,
    },
    /// Inclusive numeric upper bound.
    AtMost {
        /// Bound after exclusive adjustment.
        bound: Literal,
    },
}

// ─── Properties and documents ────────────────────────────────────────

/// One field of a resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    /// Original schema key.
    pub name: String,
    /// Title-cased identifier (`forProvider` → `ForProvider`).
    pub normalized_name: String,
    /// Snake-case attribute name (`forProvider` → `for_provider`).
    pub attribute_name: String,
    /// Cleaned description, immutability marker removed.
    pub description: String,
    /// Resolved shape.
    #[serde(rename = "type")]
    pub ty: TypeDescriptor,
    /// Listed in the parent's `required` set.
    pub required: bool,
    /// Not listed in the parent's `required` set.
    pub optional: bool,
    /// Value may be populated by the server.
    pub computed: bool,
    /// Changing the value forces replacement.
    pub immutable: bool,
    /// Decoded default literal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Literal>,
    /// Validation rules, in derivation order.
    #[serde(default)]
    pub validators: Vec<Constraint>,
    /// Nested fields of struct-bearing shapes, sorted by name.
    #[serde(default)]
    pub children: Vec<Property>,
}

impl Property {
    /// Provider attribute family for this property.
    pub fn attribute_kind(&self) -> AttributeKind {
        self.ty.attribute_kind()
    }
}

/// IR root for one CRD file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// API group, e.g. `prc.com`.
    pub group: String,
    /// Name of the compiled version, e.g. `v1`.
    pub version: String,
    /// Resource kind, e.g. `Bucket`.
    pub kind: String,
    /// Lower-cased kind.
    pub resource_name: String,
    /// Plural resource name, e.g. `buckets`.
    pub resource_name_plural: String,
    /// Package identifier, e.g. `prc_com_bucket_v1`.
    pub package_identifier: String,
    /// Properties of the `spec` subtree.
    pub spec_properties: Vec<Property>,
    /// Properties of the `status` subtree.
    pub status_properties: Vec<Property>,
    /// Helper families the renderer must import.
    pub helpers: HelperSet,
}

impl Document {
    /// Build the package identifier from group, kind and version.
    ///
    /// Dots in the group become underscores; kind and version are
    /// lower-cased: `prc.com` + `Bucket` + `v1` → `prc_com_bucket_v1`.
    pub fn package_identifier_for(group: &str, kind: &str, version: &str) -> String {
        format!(
            "{}_{}_{}",
            group.replace('.', "_"),
            kind.to_lowercase(),
            version.to_lowercase()
        )
    }
}

// ─── Helper summary ──────────────────────────────────────────────────

/// Which renderer helper families a document needs.
///
/// Built by folding over a finished property tree; resolution never
/// mutates a shared summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HelperSet {
    /// Static string defaults.
    pub defaults_string: bool,
    /// Static int64 defaults.
    pub defaults_int64: bool,
    /// Static float64 defaults.
    pub defaults_float64: bool,
    /// Static bool defaults.
    pub defaults_bool: bool,
    /// String validators (enum, length, regex).
    pub validator_string: bool,
    /// Int64 validators (enum, bounds).
    pub validator_int64: bool,
    /// Float64 validators (enum, bounds).
    pub validator_float64: bool,
    /// Bool validators (enum).
    pub validator_bool: bool,
    /// Custom base64 validator.
    pub validator_base64: bool,
    /// Custom RFC3339 validator.
    pub validator_date_time: bool,
}

impl HelperSet {
    /// Summarize every property of both trees, at every level.
    pub fn collect<'a>(trees: impl IntoIterator<Item = &'a [Property]>) -> Self {
        let mut helpers = Self::default();
        for tree in trees {
            for property in tree {
                helpers.record(property);
            }
        }
        helpers
    }

    /// Fold one property and its descendants into the summary.
    pub fn record(&mut self, property: &Property) {
        match &property.default {
            Some(Literal::String(_)) => self.defaults_string = true,
            Some(Literal::Int64(_)) => self.defaults_int64 = true,
            Some(Literal::Float64(_)) => self.defaults_float64 = true,
            Some(Literal::Bool(_)) => self.defaults_bool = true,
            None => {}
        }

        for constraint in &property.validators {
            match constraint {
                Constraint::Base64 => self.validator_base64 = true,
                Constraint::DateTime => self.validator_date_time = true,
                _ => match property.ty.scalar_kind() {
                    Some(ScalarKind::String) => self.validator_string = true,
                    Some(ScalarKind::Int64) => self.validator_int64 = true,
                    Some(ScalarKind::Float64) => self.validator_float64 = true,
                    Some(ScalarKind::Bool) => self.validator_bool = true,
                    None => {}
                },
            }
        }

        for child in &property.children {
            self.record(child);
        }
    }

    /// True when no helper family is needed.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
