//! Sequence diagram layout algorithm
//!
//! Call nodes are stacked below their callers: every call gets a y position
//! from the call that spawned it and a height covering all of its nested
//! calls. Lifelines grow to the lowest call, and calls nested on their own
//! lifeline shift right by half a call width per level.
//!
//! A created lifeline hangs below the call that creates it, carrying its
//! top-level calls along; every other lifeline sits at its rest position.
//! The layout is a pure function of the graph and the rest positions, so
//! running it twice yields the same positions.

use tracing::{span, trace, Level};

use super::CallGraph;
use crate::core::{Diagram, Dimension, EdgeKind, NodeId, NodeKind, Point};

/// Vertical space between consecutive calls
pub const GAP: i32 = 20;
/// Height of the band at the top of a lifeline holding its name
pub const HEADER_HEIGHT: i32 = 60;
/// Extra space left for the label of a return edge
pub const RETURN_LABEL_HEIGHT: i32 = 16;
/// Smallest height of a call node
pub const MIN_CALL_HEIGHT: i32 = 30;

/// Sequence diagram layout algorithm
#[derive(Debug, Clone)]
pub struct SequenceLayout {
    gap: i32,
    header_height: i32,
    return_label_height: i32,
    min_call_height: i32,
    min_lifeline_height: i32,
}

impl Default for SequenceLayout {
    fn default() -> Self {
        Self {
            gap: GAP,
            header_height: HEADER_HEIGHT,
            return_label_height: RETURN_LABEL_HEIGHT,
            min_call_height: MIN_CALL_HEIGHT,
            min_lifeline_height: NodeKind::Lifeline.default_size().height,
        }
    }
}

impl SequenceLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Position and size every call and lifeline
    pub fn layout(&self, diagram: &mut Diagram) {
        let layout_span = span!(Level::TRACE, "sequence_layout");
        let _enter = layout_span.enter();

        let graph = CallGraph::build(diagram);
        self.settle_lifelines(diagram, &graph);
        for call in self.creation_order(diagram, &graph) {
            let y = diagram.node(call).position().y;
            let bottom = self.layout_call(diagram, &graph, call, y);
            trace!(%call, y, bottom, "Laid out top-level call");
        }
        self.stretch_lifelines(diagram);
        self.align_calls(diagram, &graph);
    }

    /// Return every lifeline nobody creates to its rest position
    fn settle_lifelines(&self, diagram: &mut Diagram, graph: &CallGraph) {
        for lifeline in diagram.all_nodes() {
            let node = diagram.node(lifeline);
            if node.kind() != NodeKind::Lifeline || graph.creator(lifeline).is_some() {
                continue;
            }
            let dy = node.rest_y() - node.position().y;
            self.shift_lifeline(diagram, graph, lifeline, dy);
        }
    }

    /// Move a lifeline with its top-level calls; spawned calls take their y
    /// from their caller
    fn shift_lifeline(
        &self,
        diagram: &mut Diagram,
        graph: &CallGraph,
        lifeline: NodeId,
        dy: i32,
    ) {
        if dy == 0 {
            return;
        }
        diagram.displace(lifeline, dy);
        for call in diagram.children(lifeline).to_vec() {
            if !graph.is_spawned(call) {
                diagram.displace(call, dy);
            }
        }
    }

    /// Top-level calls, each after the call tree that creates its lifeline
    fn creation_order(&self, diagram: &Diagram, graph: &CallGraph) -> Vec<NodeId> {
        let mut pending = graph.top_level_calls(diagram);
        let mut ordered = Vec::with_capacity(pending.len());
        while !pending.is_empty() {
            let waiting = |call: NodeId| {
                diagram
                    .parent(call)
                    .and_then(|lifeline| graph.creator(lifeline))
                    .map(|creator| graph.root(diagram, creator))
                    .is_some_and(|root| root != call && pending.contains(&root))
            };
            // creation cycles fall back to diagram order
            let next = pending.iter().position(|call| !waiting(*call)).unwrap_or(0);
            ordered.push(pending.remove(next));
        }
        ordered
    }

    /// Place `call` at `y` and size it around its callees; returns its bottom
    fn layout_call(&self, diagram: &mut Diagram, graph: &CallGraph, call: NodeId, y: i32) -> i32 {
        let position = diagram.node(call).position();
        diagram.set_position(call, Point::new(position.x, y));

        let mut bottom = y + self.gap;
        for &edge in graph.callees(call) {
            let (_, callee) = diagram.edge(edge).endpoints();
            if diagram.node(callee).kind() == NodeKind::Lifeline {
                let target = bottom - self.header_height / 2;
                let dy = target - diagram.node(callee).position().y;
                self.shift_lifeline(diagram, graph, callee, dy);
                bottom += self.header_height / 2 + self.gap;
                continue;
            }
            if self.has_labelled_return(diagram, callee, call) {
                bottom += self.return_label_height;
            }
            let callee_bottom = self.layout_call(diagram, graph, callee, bottom);
            bottom = if diagram.edge(edge).is_signal() {
                bottom + self.gap
            } else {
                callee_bottom + self.gap
            };
        }
        if diagram.node(call).is_open_bottom() {
            bottom += 2 * self.gap;
        }

        let height = (bottom - y).max(self.min_call_height);
        let width = diagram.node(call).size().width;
        diagram.set_size(call, Dimension::new(width, height));
        y + height
    }

    fn has_labelled_return(&self, diagram: &Diagram, callee: NodeId, caller: NodeId) -> bool {
        diagram
            .outgoing_edges(callee, EdgeKind::Return)
            .into_iter()
            .map(|edge| diagram.edge(edge))
            .any(|edge| edge.end() == Some(caller) && !edge.middle_label().is_empty())
    }

    /// Extend every lifeline down to the lowest call
    fn stretch_lifelines(&self, diagram: &mut Diagram) {
        let nodes = diagram.all_nodes();
        let max_bottom = nodes
            .iter()
            .filter(|node| diagram.node(**node).kind() == NodeKind::Call)
            .map(|node| diagram.node(*node).bounds().max_y())
            .max();
        for node in nodes {
            let lifeline = diagram.node(node);
            if lifeline.kind() != NodeKind::Lifeline {
                continue;
            }
            let reach = max_bottom.map_or(0, |bottom| bottom - lifeline.position().y);
            let height = reach.max(self.min_lifeline_height);
            let width = lifeline.size().width;
            diagram.set_size(node, Dimension::new(width, height));
        }
    }

    /// Centre calls on their lifeline, shifted right per nesting level
    fn align_calls(&self, diagram: &mut Diagram, graph: &CallGraph) {
        for call in diagram.all_nodes() {
            if diagram.node(call).kind() != NodeKind::Call {
                continue;
            }
            let Some(lifeline) = diagram.parent(call) else {
                continue;
            };
            let nesting = graph
                .callers(diagram, call)
                .into_iter()
                .filter(|caller| diagram.parent(*caller) == Some(lifeline))
                .count() as i32;
            let center = diagram.node(lifeline).bounds().center().x;
            let half_width = diagram.node(call).size().width / 2;
            let y = diagram.node(call).position().y;
            diagram.set_position(call, Point::new(center - half_width + half_width * nesting, y));
        }
    }
}
