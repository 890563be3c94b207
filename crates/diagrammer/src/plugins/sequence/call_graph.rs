//! Caller/callee relationships between call nodes
//!
//! Call edges are scanned in insertion order. The first call edge reaching a
//! call node spawned it and makes its start the caller, unless the target is
//! already an ancestor caller of the start: such back-edges (a nested call
//! returning control to an outer activation) never define a caller, which
//! keeps the caller relation a forest.

use std::collections::HashMap;

use crate::core::{Diagram, EdgeId, EdgeKind, NodeId, NodeKind};

#[derive(Debug, Clone, Default)]
pub struct CallGraph {
    /// callee -> call edge that spawned it
    spawned_by: HashMap<NodeId, EdgeId>,
    /// caller -> call edges it lays out below itself, in insertion order
    outgoing: HashMap<NodeId, Vec<EdgeId>>,
    /// lifeline -> call that created it
    created_by: HashMap<NodeId, NodeId>,
}

impl CallGraph {
    pub fn build(diagram: &Diagram) -> Self {
        let mut graph = CallGraph::default();
        for edge in diagram.edges() {
            let edge_data = diagram.edge(*edge);
            if edge_data.kind() != EdgeKind::Call {
                continue;
            }
            let (start, end) = edge_data.endpoints();
            match diagram.node(end).kind() {
                NodeKind::Lifeline => {
                    graph.created_by.entry(end).or_insert(start);
                    graph.outgoing.entry(start).or_default().push(*edge);
                }
                NodeKind::Call => {
                    if start == end
                        || graph.spawned_by.contains_key(&end)
                        || graph.is_caller_of(diagram, end, start)
                    {
                        continue;
                    }
                    graph.spawned_by.insert(end, *edge);
                    graph.outgoing.entry(start).or_default().push(*edge);
                }
                _ => {}
            }
        }
        graph
    }

    /// The call that spawned `call`, if any
    pub fn caller(&self, diagram: &Diagram, call: NodeId) -> Option<NodeId> {
        self.spawned_by
            .get(&call)
            .and_then(|edge| diagram.edge(*edge).start())
    }

    /// Callers of `call` from the closest outwards
    pub fn callers(&self, diagram: &Diagram, call: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut current = self.caller(diagram, call);
        while let Some(caller) = current {
            result.push(caller);
            current = self.caller(diagram, caller);
        }
        result
    }

    /// Outermost caller of `call`, or `call` itself when nobody spawned it
    pub fn root(&self, diagram: &Diagram, call: NodeId) -> NodeId {
        self.callers(diagram, call).last().copied().unwrap_or(call)
    }

    pub fn is_spawned(&self, call: NodeId) -> bool {
        self.spawned_by.contains_key(&call)
    }

    /// The call whose «create» edge reaches `lifeline`
    pub fn creator(&self, lifeline: NodeId) -> Option<NodeId> {
        self.created_by.get(&lifeline).copied()
    }

    /// Returns true if `candidate` is `call` itself or one of its callers
    pub fn is_caller_of(&self, diagram: &Diagram, candidate: NodeId, call: NodeId) -> bool {
        candidate == call || self.callers(diagram, call).contains(&candidate)
    }

    /// Call edges laid out below `call`: lifeline creations and spawned calls
    pub fn callees(&self, call: NodeId) -> &[EdgeId] {
        self.outgoing.get(&call).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Calls nobody spawned, in diagram order
    pub fn top_level_calls(&self, diagram: &Diagram) -> Vec<NodeId> {
        diagram
            .all_nodes()
            .into_iter()
            .filter(|node| diagram.node(*node).kind() == NodeKind::Call)
            .filter(|node| !self.is_spawned(*node))
            .collect()
    }
}
