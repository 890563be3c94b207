//! Connection constraints
//!
//! A constraint is a named predicate over a [`ConnectionRequest`]. The builder
//! evaluates the base note constraints together with the constraints of the
//! active diagram type; a connection is allowed only if every predicate holds.

use std::fmt;

use super::{Diagram, EdgeId, EdgeKind, NodeId, NodeKind, Point};

/// Everything a constraint may inspect about a proposed connection
#[derive(Debug, Clone, Copy)]
pub struct ConnectionRequest<'a> {
    pub diagram: &'a Diagram,
    /// The detached, unconnected edge being drawn
    pub edge: EdgeId,
    pub start: NodeId,
    pub end: NodeId,
    pub start_point: Point,
    pub end_point: Point,
}

impl<'a> ConnectionRequest<'a> {
    pub fn edge_kind(&self) -> EdgeKind {
        self.diagram.edge(self.edge).kind()
    }

    pub fn start_kind(&self) -> NodeKind {
        self.diagram.node(self.start).kind()
    }

    pub fn end_kind(&self) -> NodeKind {
        self.diagram.node(self.end).kind()
    }

    /// Attached edges of the requested kind already going from start to end
    pub fn existing_edges(&self) -> usize {
        let kind = self.edge_kind();
        self.diagram
            .outgoing_edges(self.start, kind)
            .into_iter()
            .filter(|edge| self.diagram.edge(*edge).end() == Some(self.end))
            .count()
    }
}

type Predicate = Box<dyn Fn(&ConnectionRequest<'_>) -> bool>;

struct Constraint {
    name: &'static str,
    check: Predicate,
}

/// Named predicates that must all hold for a connection
#[derive(Default)]
pub struct ConstraintSet {
    constraints: Vec<Constraint>,
}

impl fmt::Debug for ConstraintSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

impl ConstraintSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a constraint, builder style
    pub fn with<F>(mut self, name: &'static str, check: F) -> Self
    where
        F: Fn(&ConnectionRequest<'_>) -> bool + 'static,
    {
        self.add(name, check);
        self
    }

    pub fn add<F>(&mut self, name: &'static str, check: F)
    where
        F: Fn(&ConnectionRequest<'_>) -> bool + 'static,
    {
        self.constraints.push(Constraint {
            name,
            check: Box::new(check),
        });
    }

    /// Append every constraint of `other`
    pub fn extend(&mut self, other: ConstraintSet) {
        self.constraints.extend(other.constraints);
    }

    /// Name of the first constraint that does not hold
    pub fn first_violation(&self, request: &ConnectionRequest<'_>) -> Option<&'static str> {
        self.constraints
            .iter()
            .find(|constraint| !(constraint.check)(request))
            .map(|constraint| constraint.name)
    }

    pub fn satisfied(&self, request: &ConnectionRequest<'_>) -> bool {
        self.first_violation(request).is_none()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.constraints.iter().map(|c| c.name).collect()
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }
}

/// Constraints shared by every diagram type
pub fn base_constraints() -> ConstraintSet {
    ConstraintSet::new()
        .with("edge-kind-supported", |r| {
            r.diagram.diagram_type().supports_edge(r.edge_kind())
        })
        .with("note-node-needs-note-edge", |r| {
            r.edge_kind().is_note()
                || !(r.start_kind().is_note()
                    || r.end_kind().is_note()
                    || r.start_kind().is_point()
                    || r.end_kind().is_point())
        })
        .with("note-edge-needs-note-node", |r| {
            !r.edge_kind().is_note() || r.start_kind().is_note() || r.end_kind().is_note()
        })
}

/// At most `max` edges of the requested kind per ordered node pair
pub fn max_edges(max: usize) -> impl Fn(&ConnectionRequest<'_>) -> bool {
    move |r| r.existing_edges() < max
}

/// No edge matching `applies` may start and end on the same node
pub fn no_self_edge(applies: fn(EdgeKind) -> bool) -> impl Fn(&ConnectionRequest<'_>) -> bool {
    move |r| !(applies(r.edge_kind()) && r.start == r.end)
}
