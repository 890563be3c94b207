//! Object diagram rules

use tracing::debug;

use crate::core::{
    find_container, max_edges, BuilderRules, CompoundOperation, ConstraintSet, Diagram,
    DiagramElement, DiagramType, EdgeId, EdgeKind, Geometry, NodeId, NodeKind, Operation,
    Placement, Point, PropertyName, PropertyValue,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectDiagramRules;

impl ObjectDiagramRules {
    pub fn new() -> Self {
        Self
    }

    /// Object that receives a field dropped at `position`
    ///
    /// The field's current parent wins when it still covers the point, so a
    /// field put back where it was keeps its owner. Otherwise the object
    /// inserted last among those under the point is used.
    fn owner(
        &self,
        diagram: &Diagram,
        geometry: &dyn Geometry,
        field: NodeId,
        position: Point,
    ) -> Option<NodeId> {
        if let Some(parent) = diagram.parent(field) {
            if geometry.node_bounds(diagram, parent).contains(position) {
                return Some(parent);
            }
        }
        find_container(diagram, geometry, position, NodeKind::Field, Some(field))
    }
}

impl BuilderRules for ObjectDiagramRules {
    fn diagram_type(&self) -> DiagramType {
        DiagramType::Object
    }

    fn can_add_node(
        &self,
        diagram: &Diagram,
        geometry: &dyn Geometry,
        node: NodeId,
        position: Point,
    ) -> bool {
        diagram.node(node).kind() != NodeKind::Field
            || self.owner(diagram, geometry, node, position).is_some()
    }

    fn placement(
        &self,
        diagram: &Diagram,
        geometry: &dyn Geometry,
        node: NodeId,
        position: Point,
    ) -> Option<Placement> {
        if diagram.node(node).kind() != NodeKind::Field {
            return None;
        }
        let owner = self.owner(diagram, geometry, node, position);
        assert!(owner.is_some(), "field {} dropped outside any object", node);
        owner.map(Placement::last)
    }

    fn edge_constraints(&self) -> ConstraintSet {
        ConstraintSet::new()
            .with("reference-from-field-to-object", |r| {
                r.edge_kind() != EdgeKind::ObjectReference
                    || (r.start_kind() == NodeKind::Field && r.end_kind() == NodeKind::Object)
            })
            .with("collaboration-between-objects", |r| {
                r.edge_kind() != EdgeKind::ObjectCollaboration
                    || (r.start_kind() == NodeKind::Object && r.end_kind() == NodeKind::Object)
            })
            .with("one-edge-per-kind-and-pair", max_edges(1))
    }

    fn complete_edge_addition(
        &self,
        diagram: &mut Diagram,
        _geometry: &dyn Geometry,
        edge: EdgeId,
        start: NodeId,
        end: NodeId,
        _end_point: Point,
        result: &mut CompoundOperation,
    ) -> NodeId {
        let field = diagram.node(start);
        if diagram.edge(edge).kind() == EdgeKind::ObjectReference
            && field.kind() == NodeKind::Field
            && !field.value().is_empty()
        {
            debug!(field = %start, "Clearing field value replaced by reference");
            result.add(Operation::ChangeProperty {
                element: DiagramElement::Node(start),
                name: PropertyName::Value,
                old: PropertyValue::from(field.value()),
                new: PropertyValue::from(""),
            });
        }
        end
    }
}
