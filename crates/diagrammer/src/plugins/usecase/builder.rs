//! Use case diagram rules
//!
//! Shares the class family constraints and adds the pairings UML allows
//! between actors and use cases.

use crate::core::{BuilderRules, ConstraintSet, DiagramType, EdgeKind, NodeKind};
use crate::plugins::class::class_family_constraints;

#[derive(Debug, Clone, Copy, Default)]
pub struct UseCaseDiagramRules;

impl UseCaseDiagramRules {
    pub fn new() -> Self {
        Self
    }
}

impl BuilderRules for UseCaseDiagramRules {
    fn diagram_type(&self) -> DiagramType {
        DiagramType::UseCase
    }

    fn edge_constraints(&self) -> ConstraintSet {
        let mut constraints = class_family_constraints();
        constraints.add("generalization-within-kind", |r| {
            r.edge_kind() != EdgeKind::UseCaseGeneralization || r.start_kind() == r.end_kind()
        });
        constraints.add("dependency-between-use-cases", |r| {
            r.edge_kind() != EdgeKind::UseCaseDependency
                || (r.start_kind() == NodeKind::UseCase && r.end_kind() == NodeKind::UseCase)
        });
        constraints
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Diagram, DiagramBuilder, EditorConfig, Point};

    fn builder() -> DiagramBuilder {
        let mut builder = DiagramBuilder::new(
            Diagram::new(DiagramType::UseCase),
            Box::new(UseCaseDiagramRules::new()),
            EditorConfig::default(),
        );
        for (kind, at) in [
            (NodeKind::Actor, Point::new(0, 0)),
            (NodeKind::UseCase, Point::new(200, 0)),
            (NodeKind::UseCase, Point::new(400, 0)),
        ] {
            let node = builder.diagram_mut().create_node(kind);
            let mut operation = builder.create_add_node_operation(node, at);
            operation.execute(builder.diagram_mut());
        }
        builder
    }

    const ACTOR: Point = Point::new(10, 10);
    const LOGIN: Point = Point::new(210, 10);
    const AUDIT: Point = Point::new(410, 10);

    #[test]
    fn test_association_from_actor() {
        let mut builder = builder();
        let edge = builder.diagram_mut().create_edge(EdgeKind::UseCaseAssociation);
        assert!(builder.can_connect(edge, ACTOR, LOGIN));
    }

    #[test]
    fn test_dependency_only_between_use_cases() {
        let mut builder = builder();
        let edge = builder.diagram_mut().create_edge(EdgeKind::UseCaseDependency);
        assert!(builder.can_connect(edge, LOGIN, AUDIT));
        assert!(!builder.can_connect(edge, ACTOR, AUDIT));
    }

    #[test]
    fn test_generalization_rules() {
        let mut builder = builder();
        let edge = builder.diagram_mut().create_edge(EdgeKind::UseCaseGeneralization);
        assert!(builder.can_connect(edge, LOGIN, AUDIT));
        assert!(!builder.can_connect(edge, ACTOR, LOGIN));
        assert!(!builder.can_connect(edge, LOGIN, LOGIN));
    }

    #[test]
    fn test_class_edges_are_foreign() {
        let mut builder = builder();
        let edge = builder.diagram_mut().create_edge(EdgeKind::Dependency);
        assert!(!builder.can_connect(edge, LOGIN, AUDIT));
    }
}
