//! Copy and paste of diagram fragments
//!
//! Copying snapshots the selected nodes with their whole subtrees and the
//! edges whose two endpoints were both copied. Pasting is a two-pass import:
//! nodes are cloned first into an old-to-new id table, then edges are cloned
//! and connected through that table. Only public model mutators are used, so
//! the pasted fragment is attached by an ordinary builder operation.

use std::collections::HashMap;

use tracing::debug;

use super::{
    Diagram, DiagramElement, DiagramType, Dimension, EdgeId, EdgeKind, NodeId, NodeKind, Point,
};

#[derive(Debug, Clone, PartialEq)]
struct NodeSnapshot {
    id: NodeId,
    kind: NodeKind,
    position: Point,
    size: Dimension,
    name: String,
    value: String,
    open_bottom: bool,
    children: Vec<NodeSnapshot>,
}

impl NodeSnapshot {
    fn capture(diagram: &Diagram, id: NodeId) -> Self {
        let node = diagram.node(id);
        Self {
            id,
            kind: node.kind(),
            position: node.position(),
            size: node.size(),
            name: node.name().to_string(),
            value: node.value().to_string(),
            open_bottom: node.is_open_bottom(),
            children: node
                .children()
                .iter()
                .map(|child| NodeSnapshot::capture(diagram, *child))
                .collect(),
        }
    }

    fn ids(&self, into: &mut Vec<NodeId>) {
        into.push(self.id);
        for child in &self.children {
            child.ids(into);
        }
    }

    fn restore(
        &self,
        diagram: &mut Diagram,
        offset: i32,
        table: &mut HashMap<NodeId, NodeId>,
    ) -> NodeId {
        let id = diagram.create_node_at(self.kind, self.position.translated(offset, offset));
        diagram.set_size(id, self.size);
        diagram.set_name(id, self.name.as_str());
        diagram.set_value(id, self.value.as_str());
        diagram.set_open_bottom(id, self.open_bottom);
        table.insert(self.id, id);
        for child in &self.children {
            let copy = child.restore(diagram, offset, table);
            diagram.add_child(id, copy);
        }
        id
    }
}

#[derive(Debug, Clone, PartialEq)]
struct EdgeSnapshot {
    kind: EdgeKind,
    start: NodeId,
    end: NodeId,
    middle_label: String,
    signal: bool,
}

/// Detached elements created by a paste, ready to be attached
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PastedElements {
    pub roots: Vec<NodeId>,
    pub edges: Vec<EdgeId>,
}

impl PastedElements {
    /// The pasted roots and edges, for selecting them
    pub fn elements(&self) -> Vec<DiagramElement> {
        self.roots
            .iter()
            .map(|node| DiagramElement::from(*node))
            .chain(self.edges.iter().map(|edge| DiagramElement::from(*edge)))
            .collect()
    }
}

/// Snapshot of copied elements
#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    diagram_type: Option<DiagramType>,
    nodes: Vec<NodeSnapshot>,
    edges: Vec<EdgeSnapshot>,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Replace the contents with a snapshot of `elements`
    ///
    /// Child nodes are only copied through their selected ancestor, since a
    /// pasted fragment is always attached as roots. Edges are kept only if
    /// both of their endpoints were copied.
    pub fn copy(&mut self, diagram: &Diagram, elements: &[DiagramElement]) {
        let selected: Vec<NodeId> = elements.iter().filter_map(|e| e.as_node()).collect();
        self.nodes = selected
            .iter()
            .copied()
            .filter(|node| {
                !diagram
                    .ancestors(*node)
                    .iter()
                    .any(|ancestor| selected.contains(ancestor))
            })
            .filter(|node| diagram.parent(*node).is_none())
            .map(|node| NodeSnapshot::capture(diagram, node))
            .collect();

        let mut copied = Vec::new();
        for snapshot in &self.nodes {
            snapshot.ids(&mut copied);
        }
        self.edges = diagram
            .edges()
            .iter()
            .map(|edge| diagram.edge(*edge))
            .filter_map(|edge| {
                let (start, end) = edge.endpoints();
                (copied.contains(&start) && copied.contains(&end)).then(|| EdgeSnapshot {
                    kind: edge.kind(),
                    start,
                    end,
                    middle_label: edge.middle_label().to_string(),
                    signal: edge.is_signal(),
                })
            })
            .collect();
        self.diagram_type = Some(diagram.diagram_type());
        debug!(nodes = self.nodes.len(), edges = self.edges.len(), "Copied to clipboard");
    }

    /// Returns true if the contents can go into `diagram`
    pub fn fits(&self, diagram: &Diagram) -> bool {
        self.diagram_type == Some(diagram.diagram_type())
    }

    /// Create detached copies of the contents in `diagram`, shifted by `offset`
    ///
    /// Returns nothing if the clipboard is empty or holds another diagram
    /// type's elements.
    pub fn paste(&self, diagram: &mut Diagram, offset: i32) -> Option<PastedElements> {
        if self.is_empty() || !self.fits(diagram) {
            return None;
        }
        let mut table = HashMap::new();
        let roots = self
            .nodes
            .iter()
            .map(|snapshot| snapshot.restore(diagram, offset, &mut table))
            .collect();
        let edges = self
            .edges
            .iter()
            .map(|snapshot| {
                let edge = diagram.create_edge(snapshot.kind);
                diagram.set_middle_label(edge, snapshot.middle_label.as_str());
                diagram.set_signal(edge, snapshot.signal);
                diagram.connect(edge, table[&snapshot.start], table[&snapshot.end]);
                edge
            })
            .collect();
        Some(PastedElements { roots, edges })
    }
}
