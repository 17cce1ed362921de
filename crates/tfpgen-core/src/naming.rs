//! # Name Normalization
//!
//! CRD property names are arbitrary JSON keys: `forProvider`,
//! `kubernetes.io/name`, `max-size`, `ipV4Address`. Generated code needs two
//! derived forms:
//!
//! - an **identifier** for struct fields: title-cased segments with the
//!   separators removed (`max-size` → `MaxSize`);
//! - an **attribute name** for the provider schema: lower snake_case
//!   (`ipV4Address` → `ip_v4_address`).
//!
//! Both conversions are idempotent.

use once_cell::sync::Lazy;
use regex::Regex;

static FIRST_CAP: Lazy<Regex> =
    Lazy::new(|| Regex::new("(.)([A-Z][a-z]+)").expect("FIRST_CAP is a valid regex literal"));

static ALL_CAP: Lazy<Regex> =
    Lazy::new(|| Regex::new("([a-z0-9])([A-Z])").expect("ALL_CAP is a valid regex literal"));

/// Characters replaced by `_` in attribute names.
const ATTRIBUTE_SEPARATORS: [char; 4] = ['-', '.', '/', ':'];

/// Convert a property name to snake_case.
///
/// Steps, in order: split before a capitalized word that follows any
/// character, split between a lowercase letter or digit and an uppercase
/// letter, replace `-` `.` `/` `:` with `_`, lowercase.
pub fn to_snake_case(name: &str) -> String {
    let snake = FIRST_CAP.replace_all(name, "${1}_${2}");
    let snake = ALL_CAP.replace_all(&snake, "${1}_${2}");
    let snake: String = snake
        .chars()
        .map(|c| if ATTRIBUTE_SEPARATORS.contains(&c) { '_' } else { c })
        .collect();
    snake.to_lowercase()
}

/// Convert a property name to a title-cased identifier.
///
/// The name is split on `-` `.` `/` `:` `_` and whitespace; each segment
/// keeps its own casing except for the first character, which is
/// upper-cased.
pub fn to_identifier(name: &str) -> String {
    name.split(|c: char| c == '_' || c.is_whitespace() || ATTRIBUTE_SEPARATORS.contains(&c))
        .filter(|segment| !segment.is_empty())
        .map(capitalize)
        .collect()
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
