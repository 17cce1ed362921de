//! # Node Paths
//!
//! A [`NodePath`] names a schema node by the property names leading to it
//! from the subtree root (`spec` or `status`). Array items and map values
//! do not add a segment: the path of a field inside `rules[]` is
//! `spec.rules.key`, matching how users refer to the field in manifests.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Sequence of property names from a subtree root to a node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodePath(Vec<String>);

impl NodePath {
    /// Path consisting only of the subtree root name.
    pub fn root(name: impl Into<String>) -> Self {
        Self(vec![name.into()])
    }

    /// Path extended by one property name.
    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(name.into());
        Self(segments)
    }

    /// Path segments, root first.
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the path has no segments.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("(root)");
        }
        f.write_str(&self.0.join("."))
    }
}
