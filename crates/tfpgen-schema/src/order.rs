//! # Canonical Ordering
//!
//! Schema maps carry no meaningful order, and generated code must not
//! change between runs. Siblings are therefore sorted by their original
//! schema key, byte-wise ascending, at every level of the tree.

use tfpgen_core::Property;

/// Sort one level of siblings by name. The sort is stable.
pub fn sort_siblings(mut properties: Vec<Property>) -> Vec<Property> {
    properties.sort_by(|a, b| a.name.cmp(&b.name));
    properties
}

/// Whether every level of the tree is in canonical order.
pub fn is_canonical(properties: &[Property]) -> bool {
    properties.windows(2).all(|pair| pair[0].name <= pair[1].name)
        && properties.iter().all(|p| is_canonical(&p.children))
}
