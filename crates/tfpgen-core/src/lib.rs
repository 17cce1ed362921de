//! # tfpgen-core — Foundational Types for the CRD Schema Compiler
//!
//! This crate defines the intermediate representation (IR) produced by the
//! schema compiler and consumed by the code renderer, together with the
//! error hierarchy and the naming rules shared by every other crate in the
//! workspace. It depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Tagged type descriptors.** A property's shape is a
//!    [`TypeDescriptor`] enum (`Scalar`, `Map`, `Struct`, `Array`). There is
//!    no loosely-typed node with a dozen optional fields; renderers match
//!    exhaustively.
//!
//! 2. **Explicitly ordered siblings.** Property lists are `Vec<Property>`,
//!    sorted by name at construction. Nothing downstream relies on map
//!    iteration order.
//!
//! 3. **Errors carry node paths.** Every [`CompileError`] names the
//!    offending node as a [`NodePath`] from the subtree root, e.g.
//!    `spec.forProvider.region`.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `tfpgen-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests. The only `expect` calls
//!   compile constant regex literals.
//! - All IR types derive `Debug`, `Clone`, `Serialize` and `Deserialize`.

pub mod error;
pub mod ir;
pub mod naming;
pub mod path;

// Re-export primary types for ergonomic imports.
pub use error::{CompileError, CompileResult};
pub use ir::{
    AttributeKind, Constraint, Document, HelperSet, Literal, Property, ScalarKind, TypeDescriptor,
};
pub use naming::{to_identifier, to_snake_case};
pub use path::NodePath;
