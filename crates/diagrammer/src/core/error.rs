//! Core error types for diagram editing
//!
//! Only recoverable failures live here: bad names coming from outside the
//! engine, malformed editing scripts and I/O. Contract violations inside the
//! engine (unknown ids, double connects, cycles) panic instead, and rejected
//! placements or connections are plain `bool` answers.

use thiserror::Error;

/// Core error types for diagram editing
#[derive(Error, Debug)]
pub enum DiagramError {
    #[error("Unknown diagram type: {diagram_type}")]
    UnknownDiagramType { diagram_type: String },

    #[error("Unknown node kind: {kind}")]
    UnknownNodeKind { kind: String },

    #[error("Unknown edge kind: {kind}")]
    UnknownEdgeKind { kind: String },

    #[error("{kind} nodes are not part of {diagram_type} diagrams")]
    UnsupportedNodeKind { kind: String, diagram_type: String },

    #[error("{kind} edges are not part of {diagram_type} diagrams")]
    UnsupportedEdgeKind { kind: String, diagram_type: String },

    #[error("Unknown property: {name}")]
    UnknownProperty { name: String },

    #[error("Invalid value for property {name}: {value}")]
    InvalidPropertyValue { name: String, value: String },

    #[error("Script error at step {step}: {message}")]
    ScriptError { message: String, step: usize },

    #[error("IO error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

impl DiagramError {
    /// Create a new unknown node kind error
    pub fn unknown_node_kind(kind: impl Into<String>) -> Self {
        Self::UnknownNodeKind { kind: kind.into() }
    }

    /// Create a new unknown edge kind error
    pub fn unknown_edge_kind(kind: impl Into<String>) -> Self {
        Self::UnknownEdgeKind { kind: kind.into() }
    }

    /// Create a new unknown diagram type error
    pub fn unknown_diagram_type(diagram_type: impl Into<String>) -> Self {
        Self::UnknownDiagramType {
            diagram_type: diagram_type.into(),
        }
    }

    /// Create a new script error
    pub fn script_error(message: impl Into<String>, step: usize) -> Self {
        Self::ScriptError {
            message: message.into(),
            step,
        }
    }
}
