//! Reversible diagram operations
//!
//! Operations are plain command records. Each one carries the data its
//! inverse needs: the parent a child was detached from, the index an edge
//! occupied, the old value of a property. Removal records capture their
//! index when they execute so that undo reinserts the element exactly where
//! it was, whatever ran before them.

use tracing::trace;

use super::{set_property, Diagram, DiagramElement, EdgeId, NodeId, PropertyName, PropertyValue};

/// A single reversible change to a diagram
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Attach a detached node as the topmost root
    AddRootNode { node: NodeId },
    /// Detach a root node; `index` is filled in on execution
    RemoveRootNode { node: NodeId, index: Option<usize> },
    /// Link `child` under `parent`, at `index` or last
    AddChild {
        parent: NodeId,
        child: NodeId,
        index: Option<usize>,
    },
    /// Unlink `child` from `parent`; `index` is filled in on execution
    RemoveChild {
        parent: NodeId,
        child: NodeId,
        index: Option<usize>,
    },
    /// Attach a connected edge last
    AddEdge { edge: EdgeId },
    /// Detach an edge; `index` is filled in on execution
    RemoveEdge { edge: EdgeId, index: Option<usize> },
    /// Translate a node and its descendants
    MoveNode { node: NodeId, dx: i32, dy: i32 },
    /// Swap a property value
    ChangeProperty {
        element: DiagramElement,
        name: PropertyName,
        old: PropertyValue,
        new: PropertyValue,
    },
    /// Several operations forming one undo step
    Compound(CompoundOperation),
}

impl Operation {
    /// Apply the forward effect
    pub fn execute(&mut self, diagram: &mut Diagram) {
        trace!(operation = ?self, "execute");
        match self {
            Operation::AddRootNode { node } => diagram.add_root_node(*node),
            Operation::RemoveRootNode { node, index } => {
                *index = Some(diagram.remove_root_node(*node));
            }
            Operation::AddChild {
                parent,
                child,
                index,
            } => match index {
                Some(index) => diagram.insert_child(*parent, *index, *child),
                None => diagram.add_child(*parent, *child),
            },
            Operation::RemoveChild {
                parent,
                child,
                index,
            } => {
                *index = Some(diagram.remove_child(*parent, *child));
            }
            Operation::AddEdge { edge } => diagram.add_edge(*edge),
            Operation::RemoveEdge { edge, index } => {
                *index = Some(diagram.remove_edge(*edge));
            }
            Operation::MoveNode { node, dx, dy } => diagram.translate(*node, *dx, *dy),
            Operation::ChangeProperty {
                element,
                name,
                new,
                ..
            } => apply_property(diagram, *element, *name, new.clone()),
            Operation::Compound(compound) => compound.execute(diagram),
        }
    }

    /// Apply the inverse effect
    ///
    /// # Panics
    /// Panics if a removal is undone before it was ever executed.
    pub fn undo(&self, diagram: &mut Diagram) {
        trace!(operation = ?self, "undo");
        match self {
            Operation::AddRootNode { node } => {
                diagram.remove_root_node(*node);
            }
            Operation::RemoveRootNode { node, index } => {
                diagram.insert_root_node(executed_index(*index), *node)
            }
            Operation::AddChild { parent, child, .. } => {
                diagram.remove_child(*parent, *child);
            }
            Operation::RemoveChild {
                parent,
                child,
                index,
            } => diagram.insert_child(*parent, executed_index(*index), *child),
            Operation::AddEdge { edge } => {
                diagram.remove_edge(*edge);
            }
            Operation::RemoveEdge { edge, index } => {
                diagram.insert_edge(executed_index(*index), *edge)
            }
            Operation::MoveNode { node, dx, dy } => diagram.translate(*node, -dx, -dy),
            Operation::ChangeProperty {
                element,
                name,
                old,
                ..
            } => apply_property(diagram, *element, *name, old.clone()),
            Operation::Compound(compound) => compound.undo(diagram),
        }
    }

    /// Returns true for a compound with nothing in it
    pub fn is_empty(&self) -> bool {
        matches!(self, Operation::Compound(compound) if compound.is_empty())
    }
}

impl From<CompoundOperation> for Operation {
    fn from(compound: CompoundOperation) -> Self {
        Operation::Compound(compound)
    }
}

fn executed_index(index: Option<usize>) -> usize {
    index.unwrap_or_else(|| panic!("removal undone before it was executed"))
}

fn apply_property(
    diagram: &mut Diagram,
    element: DiagramElement,
    name: PropertyName,
    value: PropertyValue,
) {
    if let Err(error) = set_property(diagram, element, name, value) {
        panic!("recorded property change no longer applies: {}", error);
    }
}

/// An ordered list of operations treated as one undo step
///
/// Executes in construction order and undoes in reverse, so side effects
/// added later are always taken back first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompoundOperation {
    operations: Vec<Operation>,
}

impl CompoundOperation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an operation
    pub fn add(&mut self, operation: impl Into<Operation>) {
        self.operations.push(operation.into());
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn execute(&mut self, diagram: &mut Diagram) {
        for operation in &mut self.operations {
            operation.execute(diagram);
        }
    }

    pub fn undo(&self, diagram: &mut Diagram) {
        for operation in self.operations.iter().rev() {
            operation.undo(diagram);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DiagramType, EdgeKind, NodeKind, Point};

    #[test]
    fn test_add_root_round_trip() {
        let mut diagram = Diagram::new(DiagramType::Class);
        let node = diagram.create_node(NodeKind::Class);
        let mut operation = Operation::AddRootNode { node };
        operation.execute(&mut diagram);
        assert_eq!(diagram.root_nodes(), &[node]);
        operation.undo(&mut diagram);
        assert!(diagram.root_nodes().is_empty());
    }

    #[test]
    fn test_remove_child_restores_index() {
        let mut diagram = Diagram::new(DiagramType::Object);
        let object = diagram.create_node(NodeKind::Object);
        diagram.add_root_node(object);
        let fields: Vec<_> = (0..3)
            .map(|_| {
                let field = diagram.create_node(NodeKind::Field);
                diagram.add_child(object, field);
                field
            })
            .collect();

        let mut operation = Operation::RemoveChild {
            parent: object,
            child: fields[1],
            index: None,
        };
        operation.execute(&mut diagram);
        assert_eq!(diagram.children(object), &[fields[0], fields[2]]);
        operation.undo(&mut diagram);
        assert_eq!(diagram.children(object), fields.as_slice());
    }

    #[test]
    fn test_compound_undoes_in_reverse() {
        let mut diagram = Diagram::new(DiagramType::Class);
        let a = diagram.create_node(NodeKind::Class);
        let b = diagram.create_node(NodeKind::Class);
        let edge = diagram.create_edge(EdgeKind::Dependency);
        diagram.connect(edge, a, b);

        let mut compound = CompoundOperation::new();
        compound.add(Operation::AddRootNode { node: a });
        compound.add(Operation::AddRootNode { node: b });
        compound.add(Operation::AddEdge { edge });
        let mut operation = Operation::from(compound);

        operation.execute(&mut diagram);
        assert_eq!(diagram.edge_count(), 1);
        // The edge must go before its endpoints or the model would panic
        operation.undo(&mut diagram);
        assert_eq!(diagram.node_count(), 0);
        assert_eq!(diagram.edge_count(), 0);
    }

    #[test]
    fn test_remove_edges_restore_order() {
        let mut diagram = Diagram::new(DiagramType::Class);
        let a = diagram.create_node(NodeKind::Class);
        let b = diagram.create_node(NodeKind::Class);
        diagram.add_root_node(a);
        diagram.add_root_node(b);
        let edges: Vec<_> = (0..3)
            .map(|_| {
                let edge = diagram.create_edge(EdgeKind::Association);
                diagram.connect(edge, a, b);
                diagram.add_edge(edge);
                edge
            })
            .collect();

        let mut compound = CompoundOperation::new();
        compound.add(Operation::RemoveEdge {
            edge: edges[0],
            index: None,
        });
        compound.add(Operation::RemoveEdge {
            edge: edges[2],
            index: None,
        });
        compound.execute(&mut diagram);
        assert_eq!(diagram.edges(), &[edges[1]]);
        compound.undo(&mut diagram);
        assert_eq!(diagram.edges(), edges.as_slice());
    }

    #[test]
    fn test_move_node_inverse() {
        let mut diagram = Diagram::new(DiagramType::Class);
        let node = diagram.create_node_at(NodeKind::Class, Point::new(10, 10));
        diagram.add_root_node(node);
        let mut operation = Operation::MoveNode {
            node,
            dx: 5,
            dy: -3,
        };
        operation.execute(&mut diagram);
        assert_eq!(diagram.node(node).position(), Point::new(15, 7));
        operation.undo(&mut diagram);
        assert_eq!(diagram.node(node).position(), Point::new(10, 10));
    }

    #[test]
    #[should_panic(expected = "before it was executed")]
    fn test_undo_unexecuted_removal_panics() {
        let mut diagram = Diagram::new(DiagramType::Class);
        let node = diagram.create_node(NodeKind::Class);
        let operation = Operation::RemoveRootNode { node, index: None };
        operation.undo(&mut diagram);
    }
}
