//! Diagram builder: user intents to reversible operations
//!
//! The builder owns the [`Diagram`] and turns requests like "add this node
//! here" or "connect these two points" into [`CompoundOperation`]s. It does
//! not execute them: the caller executes the returned operation and hands it
//! to the undo log. Everything that differs between diagram types goes
//! through the [`BuilderRules`] strategy chosen when the builder is created.

use std::collections::HashSet;
use std::fmt;

use tracing::{debug, span, trace, Level};

use super::{
    base_constraints, find_node, BoxGeometry, CompoundOperation, ConnectionRequest, ConstraintSet,
    Diagram, DiagramElement, DiagramType, EdgeId, EditorConfig, Geometry, NodeId, NodeKind,
    Operation, Point,
};

/// Where a newly added node goes in the containment tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub parent: NodeId,
    /// Position among the parent's children; `None` appends
    pub index: Option<usize>,
}

impl Placement {
    pub fn last(parent: NodeId) -> Self {
        Self {
            parent,
            index: None,
        }
    }
}

/// Per-diagram-type behavior plugged into the builder
///
/// Every hook has a neutral default, so a diagram type only overrides what
/// it actually changes.
pub trait BuilderRules: fmt::Debug {
    /// The diagram type these rules serve
    fn diagram_type(&self) -> DiagramType;

    /// Returns true if `node` may be dropped at `position`
    fn can_add_node(
        &self,
        _diagram: &Diagram,
        _geometry: &dyn Geometry,
        _node: NodeId,
        _position: Point,
    ) -> bool {
        true
    }

    /// Parent for a node dropped at `position`; `None` adds it as a root
    fn placement(
        &self,
        _diagram: &Diagram,
        _geometry: &dyn Geometry,
        _node: NodeId,
        _position: Point,
    ) -> Option<Placement> {
        None
    }

    /// Constraints specific to this diagram type
    fn edge_constraints(&self) -> ConstraintSet {
        ConstraintSet::new()
    }

    /// Complementary steps for a new edge, appended to `result` before the
    /// edge itself is added
    ///
    /// Returns the node the edge should actually end on.
    #[allow(clippy::too_many_arguments)]
    fn complete_edge_addition(
        &self,
        _diagram: &mut Diagram,
        _geometry: &dyn Geometry,
        _edge: EdgeId,
        _start: NodeId,
        end: NodeId,
        _end_point: Point,
        _result: &mut CompoundOperation,
    ) -> NodeId {
        end
    }

    /// Extra elements that must disappear together with `element`
    fn co_removals(&self, _diagram: &Diagram, _element: DiagramElement) -> Vec<DiagramElement> {
        Vec::new()
    }

    /// Recompute derived positions after a structural change
    fn layout(&self, _diagram: &mut Diagram, _geometry: &dyn Geometry) {}
}

/// Editing front end of a diagram
pub struct DiagramBuilder {
    diagram: Diagram,
    config: EditorConfig,
    rules: Box<dyn BuilderRules>,
    geometry: Box<dyn Geometry>,
}

impl fmt::Debug for DiagramBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagramBuilder")
            .field("diagram_type", &self.diagram.diagram_type())
            .field("config", &self.config)
            .field("rules", &self.rules)
            .finish()
    }
}

impl DiagramBuilder {
    /// Create a builder over an existing diagram
    ///
    /// # Panics
    /// Panics if the rules serve a different diagram type.
    pub fn new(diagram: Diagram, rules: Box<dyn BuilderRules>, config: EditorConfig) -> Self {
        assert_eq!(
            diagram.diagram_type(),
            rules.diagram_type(),
            "builder rules do not match the diagram type"
        );
        Self {
            diagram,
            config,
            rules,
            geometry: Box::new(BoxGeometry::new()),
        }
    }

    /// Replace the geometry used for hit testing
    pub fn with_geometry(mut self, geometry: Box<dyn Geometry>) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    /// Mutable access for executing operations and persistence-level edits
    pub fn diagram_mut(&mut self) -> &mut Diagram {
        &mut self.diagram
    }

    pub fn into_diagram(self) -> Diagram {
        self.diagram
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn geometry(&self) -> &dyn Geometry {
        self.geometry.as_ref()
    }

    pub fn diagram_type(&self) -> DiagramType {
        self.diagram.diagram_type()
    }

    /// Topmost node under `point`
    pub fn node_at(&self, point: Point) -> Option<NodeId> {
        find_node(&self.diagram, self.geometry(), point)
    }

    /// Returns true if `node` may be added at `position`
    pub fn can_add(&self, node: NodeId, position: Point) -> bool {
        let kind = self.diagram.node(node).kind();
        if !self.diagram_type().supports_node(kind) || kind.is_point() {
            return false;
        }
        self.rules
            .can_add_node(&self.diagram, self.geometry(), node, position)
    }

    /// Returns true if `edge` may connect the nodes under the two points
    pub fn can_connect(&self, edge: EdgeId, start_point: Point, end_point: Point) -> bool {
        let kind = self.diagram.edge(edge).kind();
        let start = self.node_at(start_point);
        if kind.is_note() && start.map_or(false, |start| self.diagram.node(start).kind().is_note())
        {
            return true;
        }
        let (Some(start), Some(end)) = (start, self.node_at(end_point)) else {
            debug!(edge = %edge, %start_point, %end_point, "No node under connection point");
            return false;
        };
        let request = ConnectionRequest {
            diagram: &self.diagram,
            edge,
            start,
            end,
            start_point,
            end_point,
        };
        let mut constraints = base_constraints();
        constraints.extend(self.rules.edge_constraints());
        match constraints.first_violation(&request) {
            Some(constraint) => {
                debug!(edge = %edge, kind = %kind, %start, %end, constraint, "Connection rejected");
                false
            }
            None => true,
        }
    }

    /// Operation adding a detached node at `requested_position`
    ///
    /// The position is clamped so the node stays inside the canvas. The node
    /// is placed before the operation is returned; the placement inside the
    /// containment tree is decided from the requested position.
    pub fn create_add_node_operation(
        &mut self,
        node: NodeId,
        requested_position: Point,
    ) -> CompoundOperation {
        let span = span!(Level::DEBUG, "create_add_node_operation", %node);
        let _enter = span.enter();

        let position = self.clamp_to_canvas(node, requested_position);
        self.diagram.set_position(node, position);

        let placement = self
            .rules
            .placement(&self.diagram, self.geometry.as_ref(), node, requested_position);
        let mut result = CompoundOperation::new();
        match placement {
            Some(Placement { parent, index }) => {
                debug!(%parent, ?index, %position, "Adding child node");
                result.add(Operation::AddChild {
                    parent,
                    child: node,
                    index,
                });
            }
            None => {
                debug!(%position, "Adding root node");
                result.add(Operation::AddRootNode { node });
            }
        }
        result
    }

    fn clamp_to_canvas(&self, node: NodeId, position: Point) -> Point {
        let size = self.diagram.node(node).size();
        let canvas = self.config.canvas;
        let max_x = (canvas.width - size.width).max(0);
        let max_y = (canvas.height - size.height).max(0);
        Point::new(position.x.clamp(0, max_x), position.y.clamp(0, max_y))
    }

    /// Operation adding a detached edge between the nodes under two points
    ///
    /// A note edge dropped on empty canvas ends on a new point node.
    ///
    /// # Panics
    /// Panics if no node lies under `start_point`, or if the end is empty and
    /// the start is not a note.
    pub fn create_add_edge_operation(
        &mut self,
        edge: EdgeId,
        start_point: Point,
        end_point: Point,
    ) -> CompoundOperation {
        let span = span!(Level::DEBUG, "create_add_edge_operation", %edge);
        let _enter = span.enter();

        let start = self
            .node_at(start_point)
            .unwrap_or_else(|| panic!("no node under the start point {}", start_point));
        let mut result = CompoundOperation::new();
        let end = match self.node_at(end_point) {
            Some(end) => end,
            None => {
                assert!(
                    self.diagram.node(start).kind().is_note(),
                    "no node under the end point {}",
                    end_point
                );
                let point = self.diagram.create_node_at(NodeKind::Point, end_point);
                trace!(%point, "Synthesized point node");
                result.add(Operation::AddRootNode { node: point });
                point
            }
        };
        let end = self.rules.complete_edge_addition(
            &mut self.diagram,
            self.geometry.as_ref(),
            edge,
            start,
            end,
            end_point,
            &mut result,
        );
        self.diagram.connect(edge, start, end);
        debug!(%start, %end, steps = result.len() + 1, "Adding edge");
        result.add(Operation::AddEdge { edge });
        result
    }

    /// Operation removing a node, its subtree and everything attached to it
    pub fn create_remove_node_operation(&self, node: NodeId) -> CompoundOperation {
        self.create_remove_elements_operation(&[node.into()])
    }

    /// Operation removing an edge and its co-removals
    pub fn create_remove_edge_operation(&self, edge: EdgeId) -> CompoundOperation {
        self.create_remove_elements_operation(&[edge.into()])
    }

    /// One operation removing every element and all of their co-removals
    ///
    /// Edges are removed before nodes. A node nested under another removed
    /// node goes away with its ancestor and gets no step of its own.
    ///
    /// # Panics
    /// Panics if a requested element is not part of the diagram.
    pub fn create_remove_elements_operation(
        &self,
        elements: &[DiagramElement],
    ) -> CompoundOperation {
        let span = span!(
            Level::DEBUG,
            "create_remove_elements_operation",
            requested = elements.len()
        );
        let _enter = span.enter();

        for element in elements {
            assert!(
                self.diagram.contains(*element),
                "cannot remove {}: it is not in the diagram",
                element
            );
        }
        let removed = self.removal_closure(elements);

        let mut result = CompoundOperation::new();
        let mut edges: Vec<(usize, EdgeId)> = self
            .diagram
            .edges()
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, edge)| removed.contains(&DiagramElement::Edge(*edge)))
            .collect();
        edges.sort_by(|a, b| b.0.cmp(&a.0));
        for (_, edge) in &edges {
            result.add(Operation::RemoveEdge {
                edge: *edge,
                index: None,
            });
        }

        let nodes: Vec<NodeId> = self
            .diagram
            .all_nodes()
            .into_iter()
            .filter(|node| removed.contains(&DiagramElement::Node(*node)))
            .filter(|node| {
                !self
                    .diagram
                    .ancestors(*node)
                    .into_iter()
                    .any(|ancestor| removed.contains(&DiagramElement::Node(ancestor)))
            })
            .collect();
        for node in nodes.iter().rev() {
            match self.diagram.parent(*node) {
                Some(parent) => result.add(Operation::RemoveChild {
                    parent,
                    child: *node,
                    index: None,
                }),
                None => result.add(Operation::RemoveRootNode {
                    node: *node,
                    index: None,
                }),
            }
        }
        debug!(edges = edges.len(), nodes = nodes.len(), "Removal prepared");
        result
    }

    /// Every element that disappears when `elements` are removed
    fn removal_closure(&self, elements: &[DiagramElement]) -> HashSet<DiagramElement> {
        let diagram = &self.diagram;
        let mut removed = HashSet::new();
        let mut pending: Vec<DiagramElement> = elements.to_vec();
        while let Some(element) = pending.pop() {
            if !diagram.contains(element) || !removed.insert(element) {
                continue;
            }
            match element {
                DiagramElement::Node(node) => {
                    let mut subtree = vec![node];
                    subtree.extend(diagram.descendants(node));
                    for member in subtree {
                        if member != node {
                            removed.insert(member.into());
                        }
                        pending.extend(
                            diagram
                                .edges_connected_to(member)
                                .into_iter()
                                .map(DiagramElement::from),
                        );
                        pending.extend(self.rules.co_removals(diagram, member.into()));
                    }
                }
                DiagramElement::Edge(edge) => {
                    let (start, end) = diagram.edge(edge).endpoints();
                    for endpoint in [start, end] {
                        if diagram.node(endpoint).kind().is_point() {
                            pending.push(endpoint.into());
                        }
                    }
                    pending.extend(self.rules.co_removals(diagram, element));
                }
            }
        }
        trace!(count = removed.len(), "Removal closure");
        removed
    }

    /// Operation translating a node and its descendants
    pub fn create_move_node_operation(&self, node: NodeId, dx: i32, dy: i32) -> CompoundOperation {
        let mut result = CompoundOperation::new();
        if dx != 0 || dy != 0 {
            result.add(Operation::MoveNode { node, dx, dy });
        }
        result
    }

    /// Operation attaching already-built detached elements
    ///
    /// Nodes in `roots` become root nodes (their children travel with them);
    /// edges must already be connected between nodes that are either in the
    /// diagram or added by the same operation.
    pub fn create_add_elements_operation(
        &self,
        roots: &[NodeId],
        edges: &[EdgeId],
    ) -> CompoundOperation {
        let mut result = CompoundOperation::new();
        for node in roots {
            result.add(Operation::AddRootNode { node: *node });
        }
        for edge in edges {
            result.add(Operation::AddEdge { edge: *edge });
        }
        debug!(nodes = roots.len(), edges = edges.len(), "Adding elements");
        result
    }

    /// Re-run the diagram type's layout
    pub fn layout(&mut self) {
        self.rules.layout(&mut self.diagram, self.geometry.as_ref());
    }
}
