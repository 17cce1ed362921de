//! # Error Types — Compile Error Hierarchy
//!
//! Defines the errors raised while turning one CRD file into a
//! [`Document`](crate::Document). All errors use `thiserror` for
//! derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Every error is fatal to the document being built. Partially built
//!   documents are never returned.
//! - Shape and value errors include the node path from the subtree root,
//!   so a failure deep inside `spec.forProvider.rules[]` is diagnosable
//!   without re-reading the schema.
//! - Whether a multi-file run continues past a failing file is decided by
//!   the caller, not here.

use thiserror::Error;

use crate::path::NodePath;

/// Result alias used throughout the compiler.
pub type CompileResult<T> = Result<T, CompileError>;

/// Error produced while loading or compiling a single schema file.
#[derive(Error, Debug)]
pub enum CompileError {
    /// The document could not be read or parsed.
    #[error("failed to read schema '{file}': {reason}")]
    FileRead {
        /// File the loader was reading.
        file: String,
        /// Reason the file could not be loaded.
        reason: String,
    },

    /// A node violates the structural rules of the schema dialect: both
    /// `additionalProperties` and `properties`, an array without `items`,
    /// an unrecognized `type`, or nesting beyond the depth ceiling.
    #[error("schema shape error at '{path}': {reason}")]
    SchemaShape {
        /// Path of the offending node.
        path: NodePath,
        /// What is wrong with the node.
        reason: String,
    },

    /// A `default`, `enum` or bound value could not be decoded as the
    /// property's declared scalar kind.
    #[error("schema value error at '{path}': {reason}")]
    SchemaValue {
        /// Path of the offending node.
        path: NodePath,
        /// What could not be decoded.
        reason: String,
    },
}

impl CompileError {
    /// Shorthand for a [`CompileError::SchemaShape`].
    pub fn shape(path: &NodePath, reason: impl Into<String>) -> Self {
        Self::SchemaShape {
            path: path.clone(),
            reason: reason.into(),
        }
    }

    /// Shorthand for a [`CompileError::SchemaValue`].
    pub fn value(path: &NodePath, reason: impl Into<String>) -> Self {
        Self::SchemaValue {
            path: path.clone(),
            reason: reason.into(),
        }
    }

    /// The node path, for shape and value errors.
    pub fn path(&self) -> Option<&NodePath> {
        match self {
            Self::FileRead { .. } => None,
            Self::SchemaShape { path, .. } | Self::SchemaValue { path, .. } => Some(path),
        }
    }

    /// Stable kind label used in logs and summaries.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::FileRead { .. } => "FileReadError",
            Self::SchemaShape { .. } => "SchemaShapeError",
            Self::SchemaValue { .. } => "SchemaValueError",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_error_display_includes_path() {
        let path = NodePath::root("spec").child("forProvider").child("region");
        let err = CompileError::shape(&path, "array node has no items");
        assert_eq!(
            err.to_string(),
            "schema shape error at 'spec.forProvider.region': array node has no items"
        );
        assert_eq!(err.kind(), "SchemaShapeError");
    }

    #[test]
    fn value_error_exposes_path() {
        let path = NodePath::root("status").child("size");
        let err = CompileError::value(&path, "default is not an int64");
        assert_eq!(err.path(), Some(&path));
        assert_eq!(err.kind(), "SchemaValueError");
    }

    #[test]
    fn file_read_error_has_no_path() {
        let err = CompileError::FileRead {
            file: "schemas/bucket.yaml".to_string(),
            reason: "no such file".to_string(),
        };
        assert!(err.path().is_none());
        assert!(err.to_string().contains("schemas/bucket.yaml"));
        assert_eq!(err.kind(), "FileReadError");
    }
}
