//! Class diagram plugin
//!
//! Classes and interfaces, optionally grouped into packages, joined by
//! dependency, inheritance and association-family edges.

mod builder;

pub use builder::{class_family_constraints, ClassDiagramRules};
