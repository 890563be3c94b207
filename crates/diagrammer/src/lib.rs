//! Diagrammer - editing and layout engine for UML-style diagram editors
//!
//! The engine holds the structural model of a diagram, turns user intents
//! into reversible operations under per-diagram-type rules, tracks selection
//! and undo history, and lays out sequence diagrams. Drawing and input
//! handling stay with the host application.
//!
//! # Quick Start
//!
//! ```rust
//! use diagrammer::prelude::*;
//!
//! let mut session = EditorSession::new(DiagramType::Class, EditorConfig::default());
//! let order = session.add_node(NodeKind::Class, Point::new(10, 10)).unwrap();
//! let item = session.add_node(NodeKind::Class, Point::new(300, 10)).unwrap();
//! session
//!     .add_edge(EdgeKind::Composition, Point::new(20, 20), Point::new(310, 20))
//!     .unwrap();
//!
//! assert_eq!(session.diagram().root_nodes(), &[order, item]);
//! session.undo();
//! assert_eq!(session.diagram().edge_count(), 0);
//! ```
//!
//! # Lower-level use
//!
//! The builder returns operations without executing them; callers execute
//! and record them themselves:
//!
//! ```rust
//! use diagrammer::prelude::*;
//!
//! let mut builder = create_builder(DiagramType::Class, EditorConfig::new().with_canvas(500, 500));
//! let mut undo = UndoManager::new();
//!
//! let node = builder.diagram_mut().create_node(NodeKind::Class);
//! let add = builder.create_add_node_operation(node, Point::new(990, 990));
//! let mut operation = Operation::from(add);
//! operation.execute(builder.diagram_mut());
//! undo.add(operation);
//!
//! assert_eq!(builder.diagram().node(node).position(), Point::new(400, 440));
//! undo.undo(builder.diagram_mut());
//! assert!(builder.diagram().root_nodes().is_empty());
//! ```

pub mod core;
pub mod plugins;

pub use crate::core::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        BuilderRules, CompoundOperation, Diagram, DiagramBuilder, DiagramElement, DiagramError,
        DiagramType, Dimension, EdgeId, EdgeKind, EditorConfig, Geometry, NodeId, NodeKind,
        Operation, Point, PropertyName, PropertyValue, Rectangle, SelectionModel, UndoManager,
    };
    pub use crate::plugins::{create_builder, rules_for, EditorSession};
}

/// Start an editing session on an empty diagram of the named type
///
/// # Example
/// ```rust
/// let session = diagrammer::new_session("sequence").unwrap();
/// assert_eq!(session.diagram().diagram_type(), diagrammer::DiagramType::Sequence);
/// assert!(diagrammer::new_session("flowchart").is_err());
/// ```
pub fn new_session(diagram_type: &str) -> anyhow::Result<plugins::EditorSession> {
    let diagram_type: DiagramType = diagram_type.parse()?;
    Ok(plugins::EditorSession::new(
        diagram_type,
        EditorConfig::default(),
    ))
}
