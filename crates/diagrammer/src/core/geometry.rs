//! Geometry seam between the model and the rendering layer
//!
//! The engine never measures text or draws anything. Whatever renders the
//! diagram answers three questions through the [`Geometry`] trait: how big an
//! element is, whether it covers a point, and where an edge should meet a
//! node for a given direction. [`BoxGeometry`] answers them from the stored
//! node positions and sizes, which is all the engine itself needs.

use super::{Diagram, DiagramElement, Direction, EdgeId, NodeId, NodeKind, Point, Rectangle};

/// How far from an edge's segment a point may lie and still hit the edge
pub const EDGE_HIT_TOLERANCE: f64 = 3.0;

/// Size of the loop drawn for an edge whose endpoints are the same node
const SELF_LOOP_SIZE: i32 = 40;

/// Queries the engine consumes from the rendering layer
pub trait Geometry {
    /// Bounding box of a node
    fn node_bounds(&self, diagram: &Diagram, node: NodeId) -> Rectangle;

    /// Point on the border of `node` in `direction` from its centre
    fn connection_point(&self, diagram: &Diagram, node: NodeId, direction: Direction) -> Point;

    /// Bounding box of an edge
    fn edge_bounds(&self, diagram: &Diagram, edge: EdgeId) -> Rectangle;

    /// Returns true if the edge is hit at `point`
    fn edge_contains(&self, diagram: &Diagram, edge: EdgeId, point: Point) -> bool;

    /// Bounding box of any element
    fn bounds(&self, diagram: &Diagram, element: DiagramElement) -> Rectangle {
        match element {
            DiagramElement::Node(id) => self.node_bounds(diagram, id),
            DiagramElement::Edge(id) => self.edge_bounds(diagram, id),
        }
    }

    /// Returns true if the element is hit at `point`
    fn contains(&self, diagram: &Diagram, element: DiagramElement, point: Point) -> bool {
        match element {
            DiagramElement::Node(id) => self.node_bounds(diagram, id).contains(point),
            DiagramElement::Edge(id) => self.edge_contains(diagram, id, point),
        }
    }
}

/// Rectangle-based geometry built from stored positions and sizes
#[derive(Debug, Clone, Copy, Default)]
pub struct BoxGeometry;

impl BoxGeometry {
    pub fn new() -> Self {
        Self
    }

    /// The two points an edge is drawn between
    pub fn edge_segment(&self, diagram: &Diagram, edge: EdgeId) -> (Point, Point) {
        let (start, end) = diagram.edge(edge).endpoints();
        let start_center = self.node_bounds(diagram, start).center();
        let end_center = self.node_bounds(diagram, end).center();
        let direction = Direction::between(start_center, end_center);
        (
            self.connection_point(diagram, start, direction),
            self.connection_point(diagram, end, direction.reversed()),
        )
    }

    fn self_loop_bounds(&self, diagram: &Diagram, node: NodeId) -> Rectangle {
        let bounds = self.node_bounds(diagram, node);
        Rectangle::new(
            bounds.max_x() - SELF_LOOP_SIZE / 2,
            bounds.y - SELF_LOOP_SIZE / 2,
            SELF_LOOP_SIZE,
            SELF_LOOP_SIZE,
        )
    }
}

impl Geometry for BoxGeometry {
    fn node_bounds(&self, diagram: &Diagram, node: NodeId) -> Rectangle {
        diagram.node(node).bounds()
    }

    fn connection_point(&self, diagram: &Diagram, node: NodeId, direction: Direction) -> Point {
        let node = diagram.node(node);
        if node.kind() == NodeKind::Point {
            return node.position();
        }
        let bounds = node.bounds();
        let center = bounds.center();
        if direction.is_zero() {
            return center;
        }
        let half_width = f64::from(bounds.width) / 2.0;
        let half_height = f64::from(bounds.height) / 2.0;
        let scale_x = if direction.dx == 0.0 {
            f64::INFINITY
        } else {
            half_width / direction.dx.abs()
        };
        let scale_y = if direction.dy == 0.0 {
            f64::INFINITY
        } else {
            half_height / direction.dy.abs()
        };
        let scale = scale_x.min(scale_y);
        Point::new(
            center.x + (direction.dx * scale).round() as i32,
            center.y + (direction.dy * scale).round() as i32,
        )
    }

    fn edge_bounds(&self, diagram: &Diagram, edge: EdgeId) -> Rectangle {
        let (start, end) = diagram.edge(edge).endpoints();
        if start == end {
            return self.self_loop_bounds(diagram, start);
        }
        let (from, to) = self.edge_segment(diagram, edge);
        Rectangle::spanning(from, to)
    }

    fn edge_contains(&self, diagram: &Diagram, edge: EdgeId, point: Point) -> bool {
        let (start, end) = diagram.edge(edge).endpoints();
        if start == end {
            return self.self_loop_bounds(diagram, start).contains(point);
        }
        let (from, to) = self.edge_segment(diagram, edge);
        distance_to_segment(point, from, to) <= EDGE_HIT_TOLERANCE
    }
}

fn distance_to_segment(point: Point, from: Point, to: Point) -> f64 {
    let (px, py) = (f64::from(point.x), f64::from(point.y));
    let (ax, ay) = (f64::from(from.x), f64::from(from.y));
    let (bx, by) = (f64::from(to.x), f64::from(to.y));
    let length_squared = (bx - ax).powi(2) + (by - ay).powi(2);
    if length_squared == 0.0 {
        return point.distance(from);
    }
    let t = (((px - ax) * (bx - ax) + (py - ay) * (by - ay)) / length_squared).clamp(0.0, 1.0);
    let (cx, cy) = (ax + t * (bx - ax), ay + t * (by - ay));
    ((px - cx).powi(2) + (py - cy).powi(2)).sqrt()
}

/// Topmost node under `point`
///
/// Roots are searched last-inserted first and children win over their
/// parent, so the innermost visible node answers.
pub fn find_node(diagram: &Diagram, geometry: &dyn Geometry, point: Point) -> Option<NodeId> {
    diagram
        .root_nodes()
        .iter()
        .rev()
        .find_map(|root| deep_find_node(diagram, geometry, *root, point))
}

fn deep_find_node(
    diagram: &Diagram,
    geometry: &dyn Geometry,
    node: NodeId,
    point: Point,
) -> Option<NodeId> {
    diagram
        .children(node)
        .iter()
        .rev()
        .find_map(|child| deep_find_node(diagram, geometry, *child, point))
        .or_else(|| geometry.node_bounds(diagram, node).contains(point).then_some(node))
}

/// Topmost edge under `point`
pub fn find_edge(diagram: &Diagram, geometry: &dyn Geometry, point: Point) -> Option<EdgeId> {
    diagram
        .edges()
        .iter()
        .rev()
        .copied()
        .find(|edge| geometry.edge_contains(diagram, *edge, point))
}

/// Element under `point`; edges are checked before nodes
pub fn find_element(
    diagram: &Diagram,
    geometry: &dyn Geometry,
    point: Point,
) -> Option<DiagramElement> {
    find_edge(diagram, geometry, point)
        .map(DiagramElement::Edge)
        .or_else(|| find_node(diagram, geometry, point).map(DiagramElement::Node))
}

/// Node able to contain a `child_kind` node dropped at `point`
///
/// There is no z-axis, so when several containers overlap the one inserted
/// last (in root order, children after their parent) wins. `exclude` keeps a
/// node and its subtree out of the candidates.
pub fn find_container(
    diagram: &Diagram,
    geometry: &dyn Geometry,
    point: Point,
    child_kind: NodeKind,
    exclude: Option<NodeId>,
) -> Option<NodeId> {
    diagram
        .all_nodes()
        .into_iter()
        .filter(|candidate| {
            exclude.map_or(true, |excluded| {
                *candidate != excluded && !diagram.is_ancestor(excluded, *candidate)
            })
        })
        .filter(|candidate| diagram.node(*candidate).kind().can_contain(child_kind))
        .filter(|candidate| geometry.node_bounds(diagram, *candidate).contains(point))
        .last()
}
