//! Structural diagram model
//!
//! Nodes and edges live in an id-keyed table owned by the [`Diagram`]. The
//! table keeps every element ever created, attached or not, so that removed
//! elements stay alive for undo. Parent/child links are stored as ids on both
//! sides. The model knows nothing about layout, constraints or undo; it only
//! guards its own structural invariants and panics when a caller breaks them.

use std::collections::HashMap;
use std::fmt;

use super::{DiagramType, Dimension, EdgeKind, NodeKind, Point, Rectangle};

/// Stable identifier of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    /// Get the raw value
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Stable identifier of an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(u64);

impl EdgeId {
    /// Get the raw value
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Either kind of diagram element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagramElement {
    Node(NodeId),
    Edge(EdgeId),
}

impl DiagramElement {
    pub fn as_node(&self) -> Option<NodeId> {
        match self {
            DiagramElement::Node(id) => Some(*id),
            DiagramElement::Edge(_) => None,
        }
    }

    pub fn as_edge(&self) -> Option<EdgeId> {
        match self {
            DiagramElement::Edge(id) => Some(*id),
            DiagramElement::Node(_) => None,
        }
    }
}

impl From<NodeId> for DiagramElement {
    fn from(id: NodeId) -> Self {
        DiagramElement::Node(id)
    }
}

impl From<EdgeId> for DiagramElement {
    fn from(id: EdgeId) -> Self {
        DiagramElement::Edge(id)
    }
}

impl fmt::Display for DiagramElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagramElement::Node(id) => write!(f, "{}", id),
            DiagramElement::Edge(id) => write!(f, "{}", id),
        }
    }
}

/// A positionable diagram node
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: NodeId,
    kind: NodeKind,
    position: Point,
    /// y the node settles at when layout does not displace it
    rest_y: i32,
    size: Dimension,
    name: String,
    value: String,
    open_bottom: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(id: NodeId, kind: NodeKind) -> Self {
        Self {
            id,
            kind,
            position: Point::default(),
            rest_y: 0,
            size: kind.default_size(),
            name: String::new(),
            value: String::new(),
            open_bottom: false,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Top-left corner in canvas coordinates
    pub fn position(&self) -> Point {
        self.position
    }

    /// Vertical position before any layout displacement
    pub fn rest_y(&self) -> i32 {
        self.rest_y
    }

    pub fn size(&self) -> Dimension {
        self.size
    }

    /// Position and size as a rectangle
    pub fn bounds(&self) -> Rectangle {
        Rectangle::from_origin(self.position, self.size)
    }

    /// Name text: class name, state name, object name, note text...
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value text, used by fields
    pub fn value(&self) -> &str {
        &self.value
    }

    /// True for a call node left permanently open (never returns)
    pub fn is_open_bottom(&self) -> bool {
        self.open_bottom
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// A directed edge between two nodes
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    id: EdgeId,
    kind: EdgeKind,
    start: Option<NodeId>,
    end: Option<NodeId>,
    middle_label: String,
    signal: bool,
}

impl Edge {
    fn new(id: EdgeId, kind: EdgeKind) -> Self {
        Self {
            id,
            kind,
            start: None,
            end: None,
            middle_label: String::new(),
            signal: false,
        }
    }

    pub fn id(&self) -> EdgeId {
        self.id
    }

    pub fn kind(&self) -> EdgeKind {
        self.kind
    }

    /// Start node, once connected
    pub fn start(&self) -> Option<NodeId> {
        self.start
    }

    /// End node, once connected
    pub fn end(&self) -> Option<NodeId> {
        self.end
    }

    pub fn is_connected(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }

    /// Both endpoints of a connected edge
    ///
    /// # Panics
    /// Panics if the edge was never connected.
    pub fn endpoints(&self) -> (NodeId, NodeId) {
        match (self.start, self.end) {
            (Some(start), Some(end)) => (start, end),
            _ => panic!("edge {} is not connected", self.id),
        }
    }

    /// Returns true if `node` is either endpoint
    pub fn touches(&self, node: NodeId) -> bool {
        self.start == Some(node) || self.end == Some(node)
    }

    pub fn middle_label(&self) -> &str {
        &self.middle_label
    }

    /// True for an asynchronous (signal) call
    pub fn is_signal(&self) -> bool {
        self.signal
    }
}

/// The node/edge graph and its parent/child tree
#[derive(Debug, Clone)]
pub struct Diagram {
    diagram_type: DiagramType,
    nodes: HashMap<NodeId, Node>,
    edges: HashMap<EdgeId, Edge>,
    roots: Vec<NodeId>,
    attached_edges: Vec<EdgeId>,
    next_id: u64,
}

impl Diagram {
    pub fn new(diagram_type: DiagramType) -> Self {
        Self {
            diagram_type,
            nodes: HashMap::new(),
            edges: HashMap::new(),
            roots: Vec::new(),
            attached_edges: Vec::new(),
            next_id: 1,
        }
    }

    pub fn diagram_type(&self) -> DiagramType {
        self.diagram_type
    }

    // ------------------------------------------------------------------
    // Creation of detached elements
    // ------------------------------------------------------------------

    /// Create a detached node of `kind` at the origin with its default size
    pub fn create_node(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, Node::new(id, kind));
        id
    }

    /// Create a detached node placed at `position`
    pub fn create_node_at(&mut self, kind: NodeKind, position: Point) -> NodeId {
        let id = self.create_node(kind);
        self.set_position(id, position);
        id
    }

    /// Create a detached, unconnected edge
    pub fn create_edge(&mut self, kind: EdgeKind) -> EdgeId {
        let id = EdgeId(self.next_id);
        self.next_id += 1;
        self.edges.insert(id, Edge::new(id, kind));
        id
    }

    // ------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------

    /// Get a node, attached or not
    ///
    /// # Panics
    /// Panics if no node with this id was ever created here.
    pub fn node(&self, id: NodeId) -> &Node {
        self.nodes
            .get(&id)
            .unwrap_or_else(|| panic!("unknown node {}", id))
    }

    /// Get an edge, attached or not
    ///
    /// # Panics
    /// Panics if no edge with this id was ever created here.
    pub fn edge(&self, id: EdgeId) -> &Edge {
        self.edges
            .get(&id)
            .unwrap_or_else(|| panic!("unknown edge {}", id))
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes
            .get_mut(&id)
            .unwrap_or_else(|| panic!("unknown node {}", id))
    }

    fn edge_mut(&mut self, id: EdgeId) -> &mut Edge {
        self.edges
            .get_mut(&id)
            .unwrap_or_else(|| panic!("unknown edge {}", id))
    }

    /// Root nodes in insertion order; later ones are drawn on top
    pub fn root_nodes(&self) -> &[NodeId] {
        &self.roots
    }

    /// Attached edges in insertion order
    pub fn edges(&self) -> &[EdgeId] {
        &self.attached_edges
    }

    pub fn is_root(&self, id: NodeId) -> bool {
        self.roots.contains(&id)
    }

    /// Every attached node, roots first, each followed by its descendants
    pub fn all_nodes(&self) -> Vec<NodeId> {
        let mut result = Vec::new();
        for root in &self.roots {
            result.push(*root);
            result.extend(self.descendants(*root));
        }
        result
    }

    /// Number of attached nodes, children included
    pub fn node_count(&self) -> usize {
        self.all_nodes().len()
    }

    pub fn edge_count(&self) -> usize {
        self.attached_edges.len()
    }

    /// Returns true if the node is a root or a descendant of a root
    pub fn contains_node(&self, id: NodeId) -> bool {
        if !self.nodes.contains_key(&id) {
            return false;
        }
        let top = self.ancestors(id).last().copied().unwrap_or(id);
        self.roots.contains(&top)
    }

    pub fn contains_edge(&self, id: EdgeId) -> bool {
        self.attached_edges.contains(&id)
    }

    pub fn contains(&self, element: DiagramElement) -> bool {
        match element {
            DiagramElement::Node(id) => self.contains_node(id),
            DiagramElement::Edge(id) => self.contains_edge(id),
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// Parent, grandparent... up to the top of the tree
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut current = self.node(id).parent;
        while let Some(parent) = current {
            result.push(parent);
            current = self.node(parent).parent;
        }
        result
    }

    /// All nodes below `id`, depth first, in child order
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        for child in &self.node(id).children {
            result.push(*child);
            result.extend(self.descendants(*child));
        }
        result
    }

    /// Returns true if `ancestor` sits strictly above `node` in the tree
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.ancestors(node).contains(&ancestor)
    }

    /// Attached edges with `node` as either endpoint, in insertion order
    pub fn edges_connected_to(&self, node: NodeId) -> Vec<EdgeId> {
        self.attached_edges
            .iter()
            .copied()
            .filter(|id| self.edge(*id).touches(node))
            .collect()
    }

    /// Attached edges of `kind` leaving `node`, in insertion order
    pub fn outgoing_edges(&self, node: NodeId, kind: EdgeKind) -> Vec<EdgeId> {
        self.attached_edges
            .iter()
            .copied()
            .filter(|id| {
                let edge = self.edge(*id);
                edge.kind == kind && edge.start == Some(node)
            })
            .collect()
    }

    /// Attached edges of `kind` arriving at `node`, in insertion order
    pub fn incoming_edges(&self, node: NodeId, kind: EdgeKind) -> Vec<EdgeId> {
        self.attached_edges
            .iter()
            .copied()
            .filter(|id| {
                let edge = self.edge(*id);
                edge.kind == kind && edge.end == Some(node)
            })
            .collect()
    }

    // ------------------------------------------------------------------
    // Structural mutators
    // ------------------------------------------------------------------

    /// Attach a detached, parentless node as the topmost root
    pub fn add_root_node(&mut self, id: NodeId) {
        let index = self.roots.len();
        self.insert_root_node(index, id);
    }

    /// Attach a detached, parentless node at `index` in the root order
    ///
    /// # Panics
    /// Panics if the node already is a root or has a parent.
    pub fn insert_root_node(&mut self, index: usize, id: NodeId) {
        assert!(!self.is_root(id), "node {} is already a root", id);
        assert!(
            self.node(id).parent.is_none(),
            "node {} has a parent and cannot become a root",
            id
        );
        let index = index.min(self.roots.len());
        self.roots.insert(index, id);
    }

    /// Detach a root node, returning the index it occupied
    ///
    /// # Panics
    /// Panics if the node is not a root.
    pub fn remove_root_node(&mut self, id: NodeId) -> usize {
        let index = self
            .roots
            .iter()
            .position(|root| *root == id)
            .unwrap_or_else(|| panic!("node {} is not a root of the diagram", id));
        self.roots.remove(index);
        index
    }

    /// Append `child` to the children of `parent`
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        let index = self.node(parent).children.len();
        self.insert_child(parent, index, child);
    }

    /// Insert `child` at `index` among the children of `parent`
    ///
    /// A child that already has a parent is detached from it first.
    ///
    /// # Panics
    /// Panics if the kinds cannot nest, if `child` is a root, or if the link
    /// would make a node its own ancestor.
    pub fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) {
        let parent_kind = self.node(parent).kind;
        let child_kind = self.node(child).kind;
        assert!(
            parent_kind.can_contain(child_kind),
            "{} nodes cannot contain {} nodes",
            parent_kind,
            child_kind
        );
        assert!(
            parent != child && !self.is_ancestor(child, parent),
            "linking {} under {} would create a cycle",
            child,
            parent
        );
        assert!(!self.is_root(child), "root node {} cannot become a child", child);

        if let Some(old_parent) = self.node(child).parent {
            self.remove_child(old_parent, child);
        }
        let children = &mut self.node_mut(parent).children;
        let index = index.min(children.len());
        children.insert(index, child);
        self.node_mut(child).parent = Some(parent);
    }

    /// Detach `child` from `parent`, returning its former index
    ///
    /// # Panics
    /// Panics if `child` is not a child of `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> usize {
        let children = &mut self.node_mut(parent).children;
        let index = children
            .iter()
            .position(|c| *c == child)
            .unwrap_or_else(|| panic!("node {} is not a child of {}", child, parent));
        children.remove(index);
        self.node_mut(child).parent = None;
        index
    }

    /// Set both endpoints of an edge, exactly once
    ///
    /// # Panics
    /// Panics if the edge is already connected.
    pub fn connect(&mut self, edge: EdgeId, start: NodeId, end: NodeId) {
        assert!(
            self.nodes.contains_key(&start) && self.nodes.contains_key(&end),
            "edge {} connects unknown nodes",
            edge
        );
        let edge = self.edge_mut(edge);
        assert!(
            edge.start.is_none() && edge.end.is_none(),
            "edge {} is already connected",
            edge.id
        );
        edge.start = Some(start);
        edge.end = Some(end);
    }

    /// Attach a connected edge after all others
    pub fn add_edge(&mut self, id: EdgeId) {
        let index = self.attached_edges.len();
        self.insert_edge(index, id);
    }

    /// Attach a connected edge at `index` in the edge order
    ///
    /// # Panics
    /// Panics if the edge is unconnected, already attached, or if an endpoint
    /// is not part of the diagram.
    pub fn insert_edge(&mut self, index: usize, id: EdgeId) {
        assert!(!self.contains_edge(id), "edge {} is already attached", id);
        let (start, end) = self.edge(id).endpoints();
        assert!(
            self.contains_node(start) && self.contains_node(end),
            "edge {} has an endpoint outside the diagram",
            id
        );
        let index = index.min(self.attached_edges.len());
        self.attached_edges.insert(index, id);
    }

    /// Detach an edge, returning the index it occupied
    ///
    /// # Panics
    /// Panics if the edge is not attached.
    pub fn remove_edge(&mut self, id: EdgeId) -> usize {
        let index = self
            .attached_edges
            .iter()
            .position(|e| *e == id)
            .unwrap_or_else(|| panic!("edge {} is not in the diagram", id));
        self.attached_edges.remove(index);
        index
    }

    /// Move a node and every descendant by (dx, dy)
    pub fn translate(&mut self, id: NodeId, dx: i32, dy: i32) {
        let mut moved = vec![id];
        moved.extend(self.descendants(id));
        for node in moved {
            let node = self.node_mut(node);
            node.position = node.position.translated(dx, dy);
            node.rest_y += dy;
        }
    }

    /// Place a single node, leaving its children where they are
    pub fn set_position(&mut self, id: NodeId, position: Point) {
        let node = self.node_mut(id);
        node.position = position;
        node.rest_y = position.y;
    }

    /// Shift a single node vertically without changing its rest position
    pub fn displace(&mut self, id: NodeId, dy: i32) {
        let node = self.node_mut(id);
        node.position = node.position.translated(0, dy);
    }

    pub fn set_size(&mut self, id: NodeId, size: Dimension) {
        self.node_mut(id).size = size;
    }

    pub fn set_name(&mut self, id: NodeId, name: impl Into<String>) {
        self.node_mut(id).name = name.into();
    }

    pub fn set_value(&mut self, id: NodeId, value: impl Into<String>) {
        self.node_mut(id).value = value.into();
    }

    pub fn set_open_bottom(&mut self, id: NodeId, open_bottom: bool) {
        self.node_mut(id).open_bottom = open_bottom;
    }

    pub fn set_middle_label(&mut self, id: EdgeId, label: impl Into<String>) {
        self.edge_mut(id).middle_label = label.into();
    }

    pub fn set_signal(&mut self, id: EdgeId, signal: bool) {
        self.edge_mut(id).signal = signal;
    }
}
