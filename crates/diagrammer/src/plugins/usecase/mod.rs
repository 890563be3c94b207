//! Use case diagram plugin
//!
//! Actors and use cases joined by associations, generalizations and
//! include/extend dependencies.

mod builder;

pub use builder::UseCaseDiagramRules;
