//! Class diagram rules
//!
//! Packages contain classes, interfaces and other packages; a node dropped
//! over several packages goes into the one inserted last.

use tracing::trace;

use crate::core::{
    find_container, max_edges, no_self_edge, BuilderRules, ConstraintSet, Diagram, DiagramType,
    EdgeKind, Geometry, NodeId, NodeKind, Placement, Point,
};

/// Constraints shared by class and use case diagrams
pub fn class_family_constraints() -> ConstraintSet {
    ConstraintSet::new()
        .with("no-self-generalization", no_self_edge(|kind| kind.is_generalization()))
        .with("one-edge-per-kind-and-pair", max_edges(1))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ClassDiagramRules;

impl ClassDiagramRules {
    pub fn new() -> Self {
        Self
    }
}

impl BuilderRules for ClassDiagramRules {
    fn diagram_type(&self) -> DiagramType {
        DiagramType::Class
    }

    fn placement(
        &self,
        diagram: &Diagram,
        geometry: &dyn Geometry,
        node: NodeId,
        position: Point,
    ) -> Option<Placement> {
        let kind = diagram.node(node).kind();
        let package = find_container(diagram, geometry, position, kind, Some(node))?;
        trace!(%node, %package, "Dropped into package");
        Some(Placement::last(package))
    }

    fn edge_constraints(&self) -> ConstraintSet {
        class_family_constraints().with("implementation-targets-interface", |r| {
            r.edge_kind() != EdgeKind::Implementation || r.end_kind() == NodeKind::Interface
        })
    }
}
