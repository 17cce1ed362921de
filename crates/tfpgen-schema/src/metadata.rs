//! # Property Metadata
//!
//! Everything about a property that is not its shape: description,
//! immutability, required/optional, default, and the validator list.
//!
//! Validators are derived in a fixed order so the IR is reproducible:
//!
//! | kind            | order                                                    |
//! |-----------------|----------------------------------------------------------|
//! | string          | enum, minLength, maxLength, pattern, byte, date-time     |
//! | int64 / float64 | enum, minimum, maximum                                   |
//! | bool            | enum                                                     |
//!
//! Exclusive integer bounds are tightened by one (`minimum: 3` with
//! `exclusiveMinimum` becomes `AtLeast(4)`); exclusive number bounds are
//! adjusted by `1.0` the same way.

use serde_json::Value;

use tfpgen_core::{CompileError, CompileResult, Constraint, Literal, NodePath, ScalarKind};

use crate::crd::SchemaNode;

/// Prefix marking a property as immutable.
pub const IMMUTABLE_MARKER: &str = "(immutable)";

/// Metadata of one property, ready to merge into a `Property`.
#[derive(Debug, Clone, PartialEq)]
pub struct Metadata {
    /// Cleaned description without the immutability marker.
    pub description: String,
    /// Description started with [`IMMUTABLE_MARKER`].
    pub immutable: bool,
    /// Listed in the parent's `required` set.
    pub required: bool,
    /// Decoded default, scalars only.
    pub default: Option<Literal>,
    /// Validators in derivation order.
    pub validators: Vec<Constraint>,
}

/// Derive metadata for the property `name` of a parent node.
///
/// `kind` is the property's own scalar kind, or `None` for maps, arrays and
/// structs. Defaults and validators are only derived for scalars.
///
/// # Errors
///
/// `CompileError::SchemaValue` when a default, enum member or bound cannot
/// be decoded as `kind`.
pub fn derive_metadata(
    name: &str,
    node: &SchemaNode,
    parent: &SchemaNode,
    kind: Option<ScalarKind>,
    path: &NodePath,
) -> CompileResult<Metadata> {
    let (description, immutable) =
        split_immutable(&clean_description(node.description.as_deref().unwrap_or_default()));

    let (default, validators) = match kind {
        Some(kind) => (decode_default(node, kind, path)?, validators(node, kind, path)?),
        None => {
            if node.default.is_some() {
                tracing::debug!(path = %path, "ignoring default on non-scalar property");
            }
            (None, Vec::new())
        }
    };

    Ok(Metadata {
        description,
        immutable,
        required: parent.requires(name),
        default,
        validators,
    })
}

/// Normalize a description for embedding in generated source.
///
/// Backticks and double quotes become single quotes; line breaks and
/// backslashes are removed.
pub fn clean_description(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(*c, '\n' | '\r' | '\\'))
        .map(|c| if c == '`' || c == '"' { '\'' } else { c })
        .collect()
}

/// Strip the immutability marker from a cleaned description and trim it.
pub fn split_immutable(cleaned: &str) -> (String, bool) {
    match cleaned.strip_prefix(IMMUTABLE_MARKER) {
        Some(rest) => (rest.trim().to_string(), true),
        None => (cleaned.trim().to_string(), false),
    }
}

/// Render a regular expression as a backtick-delimited source literal.
///
/// Backticks cannot appear inside such a literal, so each one is spliced in
/// as a quoted `"`"` segment joined with `+`:
/// ``a`b`` → `` `a`+"`"+`b` ``.
pub fn escape_pattern(pattern: &str) -> String {
    if !pattern.contains('`') {
        return format!("`{pattern}`");
    }

    let mut parts = Vec::new();
    for (i, segment) in pattern.split('`').enumerate() {
        if i > 0 {
            parts.push("\"`\"".to_string());
        }
        if !segment.is_empty() {
            parts.push(format!("`{segment}`"));
        }
    }
    parts.join("+")
}

/// Decode a raw schema value as a literal of `kind`.
///
/// Integers must be exact; `1.0` is not an int64. Numbers accept any JSON
/// number.
pub fn decode_literal(
    raw: &Value,
    kind: ScalarKind,
    path: &NodePath,
    what: &str,
) -> CompileResult<Literal> {
    let decoded = match (kind, raw) {
        (ScalarKind::String, Value::String(s)) => Some(Literal::String(s.clone())),
        (ScalarKind::Int64, Value::Number(n)) => n.as_i64().map(Literal::Int64),
        (ScalarKind::Float64, Value::Number(n)) => n.as_f64().map(Literal::Float64),
        (ScalarKind::Bool, Value::Bool(b)) => Some(Literal::Bool(*b)),
        _ => None,
    };
    decoded.ok_or_else(|| CompileError::value(path, format!("{what} {raw} is not a valid {kind}")))
}

fn decode_default(
    node: &SchemaNode,
    kind: ScalarKind,
    path: &NodePath,
) -> CompileResult<Option<Literal>> {
    node.default
        .as_ref()
        .map(|raw| decode_literal(raw, kind, path, "default"))
        .transpose()
}

fn validators(node: &SchemaNode, kind: ScalarKind, path: &NodePath) -> CompileResult<Vec<Constraint>> {
    let mut validators = Vec::new();

    if !node.enum_values.is_empty() {
        let values = node
            .enum_values
            .iter()
            .map(|raw| decode_literal(raw, kind, path, "enum value"))
            .collect::<CompileResult<Vec<_>>>()?;
        validators.push(Constraint::OneOf { values });
    }

    match kind {
        ScalarKind::String => string_validators(node, &mut validators),
        ScalarKind::Int64 | ScalarKind::Float64 => {
            if let Some(minimum) = node.minimum {
                let shift = if node.exclusive_minimum { 1.0 } else { 0.0 };
                let bound = numeric_bound(minimum + shift, kind, path, "minimum")?;
                validators.push(Constraint::AtLeast { bound });
            }
            if let Some(maximum) = node.maximum {
                let shift = if node.exclusive_maximum { 1.0 } else { 0.0 };
                let bound = numeric_bound(maximum - shift, kind, path, "maximum")?;
                validators.push(Constraint::AtMost { bound });
            }
        }
        ScalarKind::Bool => {}
    }

    Ok(validators)
}

fn string_validators(node: &SchemaNode, validators: &mut Vec<Constraint>) {
    if let Some(min) = node.min_length {
        validators.push(Constraint::LengthAtLeast { min });
    }
    if let Some(max) = node.max_length {
        validators.push(Constraint::LengthAtMost { max });
    }
    if let Some(pattern) = node.pattern.as_deref().filter(|p| !p.is_empty()) {
        validators.push(Constraint::RegexMatches {
            pattern: pattern.to_string(),
            literal: escape_pattern(pattern),
        });
    }
    match node.format.as_deref() {
        Some("byte") => validators.push(Constraint::Base64),
        Some("date-time") => validators.push(Constraint::DateTime),
        _ => {}
    }
}

/// Bound literal of `kind`. Integer bounds must be integral and fit i64.
fn numeric_bound(value: f64, kind: ScalarKind, path: &NodePath, which: &str) -> CompileResult<Literal> {
    if !value.is_finite() {
        return Err(CompileError::value(path, format!("{which} {value} is not finite")));
    }
    if kind == ScalarKind::Float64 {
        return Ok(Literal::Float64(value));
    }
    // i64::MAX as f64 rounds up to 2^63, which is out of range.
    if value.fract() != 0.0 || value < i64::MIN as f64 || value >= i64::MAX as f64 {
        return Err(CompileError::value(
            path,
            format!("{which} {value} is not a valid int64 bound"),
        ));
    }
    Ok(Literal::Int64(value as i64))
}
