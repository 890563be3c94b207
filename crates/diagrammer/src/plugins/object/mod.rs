//! Object diagram plugin
//!
//! Objects own fields; a field's reference edge points at another object and
//! replaces whatever literal value the field showed.

mod builder;

pub use builder::ObjectDiagramRules;
