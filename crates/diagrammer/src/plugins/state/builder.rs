//! State diagram rules

use crate::core::{max_edges, BuilderRules, ConstraintSet, DiagramType, NodeKind};

/// Transitions allowed from one state to another
pub const MAX_TRANSITIONS_PER_PAIR: usize = 2;

#[derive(Debug, Clone, Copy, Default)]
pub struct StateDiagramRules;

impl StateDiagramRules {
    pub fn new() -> Self {
        Self
    }
}

impl BuilderRules for StateDiagramRules {
    fn diagram_type(&self) -> DiagramType {
        DiagramType::State
    }

    fn edge_constraints(&self) -> ConstraintSet {
        ConstraintSet::new()
            .with("nothing-leaves-final-state", |r| {
                r.edge_kind().is_note() || r.start_kind() != NodeKind::FinalState
            })
            .with("nothing-enters-initial-state", |r| {
                r.edge_kind().is_note() || r.end_kind() != NodeKind::InitialState
            })
            .with("transition-limit", max_edges(MAX_TRANSITIONS_PER_PAIR))
    }
}
