//! Sequence diagram plugin
//!
//! Lifelines hold call nodes (method activations); call edges connect a
//! caller to its callee and return edges lead back. After every change the
//! layout stacks nested calls below their callers.

mod builder;
mod call_graph;
mod layout;

pub use builder::{SequenceDiagramRules, CREATE_LABEL};
pub use call_graph::CallGraph;
pub use layout::{SequenceLayout, GAP, HEADER_HEIGHT, MIN_CALL_HEIGHT, RETURN_LABEL_HEIGHT};
