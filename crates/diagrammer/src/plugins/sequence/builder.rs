//! Sequence diagram rules
//!
//! Calls live inside lifeline bodies. Drawing a call edge usually creates the
//! callee: a new call node is inserted on the target lifeline at the drop
//! point and the edge ends there. Only a call back into an outer activation,
//! or a call on a lifeline header (object creation), connects directly.

use tracing::debug;

use super::{CallGraph, SequenceLayout, HEADER_HEIGHT};
use crate::core::{
    find_container, BuilderRules, CompoundOperation, ConnectionRequest, ConstraintSet, Diagram,
    DiagramElement, DiagramType, EdgeId, EdgeKind, Geometry, NodeId, NodeKind, Operation,
    Placement, Point,
};

/// Label given to a call edge that creates a lifeline
pub const CREATE_LABEL: &str = "\u{ab}create\u{bb}";

#[derive(Debug, Clone, Default)]
pub struct SequenceDiagramRules {
    layout: SequenceLayout,
}

impl SequenceDiagramRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lifeline whose body lies under `position`
    fn lifeline_body_at(
        diagram: &Diagram,
        geometry: &dyn Geometry,
        position: Point,
    ) -> Option<NodeId> {
        let lifeline = find_container(diagram, geometry, position, NodeKind::Call, None)?;
        (!in_header(diagram, lifeline, position)).then_some(lifeline)
    }

    /// Detached call placed on `lifeline` at height `y`, attached by `result`
    fn new_call(
        diagram: &mut Diagram,
        lifeline: NodeId,
        y: i32,
        result: &mut CompoundOperation,
    ) -> NodeId {
        let center = diagram.node(lifeline).bounds().center().x;
        let width = NodeKind::Call.default_size().width;
        let call = diagram.create_node_at(NodeKind::Call, Point::new(center - width / 2, y));
        result.add(Operation::AddChild {
            parent: lifeline,
            child: call,
            index: Some(index_by_height(diagram, lifeline, y)),
        });
        call
    }
}

fn in_header(diagram: &Diagram, lifeline: NodeId, point: Point) -> bool {
    point.y < diagram.node(lifeline).position().y + HEADER_HEIGHT
}

/// Child index keeping a lifeline's calls ordered top to bottom
fn index_by_height(diagram: &Diagram, lifeline: NodeId, y: i32) -> usize {
    diagram
        .children(lifeline)
        .iter()
        .position(|call| diagram.node(*call).position().y > y)
        .unwrap_or_else(|| diagram.children(lifeline).len())
}

fn creates_lifeline(r: &ConnectionRequest<'_>) -> bool {
    r.edge_kind() == EdgeKind::Call
        && r.end_kind() == NodeKind::Lifeline
        && in_header(r.diagram, r.end, r.end_point)
}

impl BuilderRules for SequenceDiagramRules {
    fn diagram_type(&self) -> DiagramType {
        DiagramType::Sequence
    }

    fn can_add_node(
        &self,
        diagram: &Diagram,
        geometry: &dyn Geometry,
        node: NodeId,
        position: Point,
    ) -> bool {
        diagram.node(node).kind() != NodeKind::Call
            || Self::lifeline_body_at(diagram, geometry, position).is_some()
    }

    fn placement(
        &self,
        diagram: &Diagram,
        geometry: &dyn Geometry,
        node: NodeId,
        position: Point,
    ) -> Option<Placement> {
        if diagram.node(node).kind() != NodeKind::Call {
            return None;
        }
        let lifeline = Self::lifeline_body_at(diagram, geometry, position);
        assert!(lifeline.is_some(), "call {} dropped outside any lifeline body", node);
        lifeline.map(|parent| Placement {
            parent,
            index: Some(index_by_height(diagram, parent, position.y)),
        })
    }

    fn edge_constraints(&self) -> ConstraintSet {
        ConstraintSet::new()
            .with("call-starts-at-call", |r| {
                r.edge_kind() != EdgeKind::Call || r.start_kind() == NodeKind::Call
            })
            .with("call-ends-at-call-or-lifeline", |r| {
                r.edge_kind() != EdgeKind::Call
                    || matches!(r.end_kind(), NodeKind::Call | NodeKind::Lifeline)
            })
            .with("lifeline-created-once", |r| {
                !creates_lifeline(r)
                    || (r.diagram.parent(r.start) != Some(r.end)
                        && r.diagram.incoming_edges(r.end, EdgeKind::Call).is_empty())
            })
            .with("return-to-caller", |r| {
                if r.edge_kind() != EdgeKind::Return {
                    return true;
                }
                if r.start_kind() != NodeKind::Call || r.end_kind() != NodeKind::Call {
                    return false;
                }
                let graph = CallGraph::build(r.diagram);
                graph.caller(r.diagram, r.start) == Some(r.end)
                    && r.diagram.parent(r.start) != r.diagram.parent(r.end)
                    && r.diagram.outgoing_edges(r.start, EdgeKind::Return).is_empty()
            })
    }

    fn complete_edge_addition(
        &self,
        diagram: &mut Diagram,
        _geometry: &dyn Geometry,
        edge: EdgeId,
        start: NodeId,
        end: NodeId,
        end_point: Point,
        result: &mut CompoundOperation,
    ) -> NodeId {
        if diagram.edge(edge).kind() != EdgeKind::Call {
            return end;
        }
        match diagram.node(end).kind() {
            NodeKind::Lifeline if in_header(diagram, end, end_point) => {
                debug!(lifeline = %end, "Call creates lifeline");
                diagram.set_middle_label(edge, CREATE_LABEL);
                end
            }
            NodeKind::Lifeline => Self::new_call(diagram, end, end_point.y, result),
            NodeKind::Call => {
                let source_lifeline = diagram.parent(start);
                let target_lifeline = diagram.parent(end);
                let back_call = CallGraph::build(diagram).is_caller_of(diagram, end, start);
                match target_lifeline {
                    Some(lifeline) if source_lifeline == target_lifeline || !back_call => {
                        Self::new_call(diagram, lifeline, end_point.y, result)
                    }
                    _ => {
                        debug!(%start, caller = %end, "Call back into an outer activation");
                        end
                    }
                }
            }
            _ => end,
        }
    }

    fn co_removals(&self, diagram: &Diagram, element: DiagramElement) -> Vec<DiagramElement> {
        match element {
            DiagramElement::Edge(edge) => {
                let edge = diagram.edge(edge);
                if edge.kind() != EdgeKind::Call {
                    return Vec::new();
                }
                let (caller, callee) = edge.endpoints();
                if diagram.node(callee).kind() != NodeKind::Call
                    || !diagram.outgoing_edges(callee, EdgeKind::Call).is_empty()
                {
                    return Vec::new();
                }
                let mut result = vec![DiagramElement::Node(callee)];
                result.extend(
                    diagram
                        .outgoing_edges(callee, EdgeKind::Return)
                        .into_iter()
                        .filter(|ret| diagram.edge(*ret).end() == Some(caller))
                        .map(DiagramElement::Edge),
                );
                result
            }
            DiagramElement::Node(node) => {
                if diagram.node(node).kind() != NodeKind::Call {
                    return Vec::new();
                }
                let graph = CallGraph::build(diagram);
                graph
                    .callees(node)
                    .iter()
                    .map(|edge| diagram.edge(*edge).endpoints().1)
                    .filter(|callee| diagram.node(*callee).kind() == NodeKind::Call)
                    .map(DiagramElement::Node)
                    .collect()
            }
        }
    }

    fn layout(&self, diagram: &mut Diagram, _geometry: &dyn Geometry) {
        self.layout.layout(diagram);
    }
}
