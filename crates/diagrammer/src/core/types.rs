//! Core type definitions for diagram editing
//!
//! This module contains the fundamental value types used throughout the
//! engine: integer canvas geometry, the closed set of node and edge kinds,
//! and the diagram types that group them.

use std::fmt;
use std::str::FromStr;

use super::DiagramError;

/// A point on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns this point shifted by (dx, dy)
    pub fn translated(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Euclidean distance to another point
    pub fn distance(self, other: Point) -> f64 {
        let dx = f64::from(other.x - self.x);
        let dy = f64::from(other.y - self.y);
        (dx * dx + dy * dy).sqrt()
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Width and height of an element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Dimension {
    pub width: i32,
    pub height: i32,
}

impl Dimension {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Axis-aligned rectangle; both edges are inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rectangle {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rectangle {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build a rectangle from a top-left corner and a size
    pub fn from_origin(origin: Point, size: Dimension) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    /// Smallest rectangle holding both points
    pub fn spanning(a: Point, b: Point) -> Self {
        let x = a.x.min(b.x);
        let y = a.y.min(b.y);
        Self::new(x, y, (a.x - b.x).abs(), (a.y - b.y).abs())
    }

    pub fn max_x(&self) -> i32 {
        self.x + self.width
    }

    pub fn max_y(&self) -> i32 {
        self.y + self.height
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    /// Returns true if the point lies inside or on the border
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x <= self.max_x() && point.y >= self.y && point.y <= self.max_y()
    }

    /// Returns true if `other` lies entirely inside this rectangle
    pub fn contains_rectangle(&self, other: &Rectangle) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.max_x() <= self.max_x()
            && other.max_y() <= self.max_y()
    }

    /// Smallest rectangle covering both rectangles
    pub fn union(&self, other: &Rectangle) -> Rectangle {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let max_x = self.max_x().max(other.max_x());
        let max_y = self.max_y().max(other.max_y());
        Rectangle::new(x, y, max_x - x, max_y - y)
    }
}

impl fmt::Display for Rectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {} {}x{}]", self.x, self.y, self.width, self.height)
    }
}

/// Direction vector used to ask for a connection point on a node border
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Direction {
    pub dx: f64,
    pub dy: f64,
}

impl Direction {
    pub const NORTH: Direction = Direction { dx: 0.0, dy: -1.0 };
    pub const SOUTH: Direction = Direction { dx: 0.0, dy: 1.0 };
    pub const EAST: Direction = Direction { dx: 1.0, dy: 0.0 };
    pub const WEST: Direction = Direction { dx: -1.0, dy: 0.0 };

    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    /// Direction pointing from one point towards another
    pub fn between(from: Point, to: Point) -> Self {
        Self::new(f64::from(to.x - from.x), f64::from(to.y - from.y))
    }

    /// Returns true if the vector has no length
    pub fn is_zero(&self) -> bool {
        self.dx == 0.0 && self.dy == 0.0
    }

    /// The same direction pointing the other way
    pub fn reversed(self) -> Self {
        Self::new(-self.dx, -self.dy)
    }
}

/// The diagram types the editor supports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DiagramType {
    #[default]
    Class,
    Object,
    Sequence,
    State,
    UseCase,
}

impl DiagramType {
    /// All diagram types, in toolbar order
    pub fn all() -> &'static [DiagramType] {
        &[
            DiagramType::Class,
            DiagramType::Object,
            DiagramType::Sequence,
            DiagramType::State,
            DiagramType::UseCase,
        ]
    }

    /// Node kinds a user can place on this diagram type
    pub fn node_kinds(&self) -> &'static [NodeKind] {
        match self {
            DiagramType::Class => &[
                NodeKind::Class,
                NodeKind::Interface,
                NodeKind::Package,
                NodeKind::Note,
            ],
            DiagramType::Object => &[NodeKind::Object, NodeKind::Field, NodeKind::Note],
            DiagramType::Sequence => &[NodeKind::Lifeline, NodeKind::Call, NodeKind::Note],
            DiagramType::State => &[
                NodeKind::State,
                NodeKind::InitialState,
                NodeKind::FinalState,
                NodeKind::Note,
            ],
            DiagramType::UseCase => &[NodeKind::Actor, NodeKind::UseCase, NodeKind::Note],
        }
    }

    /// Edge kinds a user can draw on this diagram type
    pub fn edge_kinds(&self) -> &'static [EdgeKind] {
        match self {
            DiagramType::Class => &[
                EdgeKind::Dependency,
                EdgeKind::Generalization,
                EdgeKind::Implementation,
                EdgeKind::Association,
                EdgeKind::Aggregation,
                EdgeKind::Composition,
                EdgeKind::Note,
            ],
            DiagramType::Object => &[
                EdgeKind::ObjectReference,
                EdgeKind::ObjectCollaboration,
                EdgeKind::Note,
            ],
            DiagramType::Sequence => &[EdgeKind::Call, EdgeKind::Return, EdgeKind::Note],
            DiagramType::State => &[EdgeKind::Transition, EdgeKind::Note],
            DiagramType::UseCase => &[
                EdgeKind::UseCaseAssociation,
                EdgeKind::UseCaseGeneralization,
                EdgeKind::UseCaseDependency,
                EdgeKind::Note,
            ],
        }
    }

    /// Returns true if nodes of `kind` belong to this diagram type
    ///
    /// Point nodes are synthesized by the builder and accepted everywhere.
    pub fn supports_node(&self, kind: NodeKind) -> bool {
        kind == NodeKind::Point || self.node_kinds().contains(&kind)
    }

    pub fn supports_edge(&self, kind: EdgeKind) -> bool {
        self.edge_kinds().contains(&kind)
    }

    /// Short description for listings
    pub fn description(&self) -> &'static str {
        match self {
            DiagramType::Class => "Class diagrams with packages and relationships",
            DiagramType::Object => "Object diagrams with fields and references",
            DiagramType::Sequence => "Sequence diagrams with lifelines and calls",
            DiagramType::State => "State machines with transitions",
            DiagramType::UseCase => "Use case diagrams with actors",
        }
    }
}

impl fmt::Display for DiagramType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagramType::Class => write!(f, "class"),
            DiagramType::Object => write!(f, "object"),
            DiagramType::Sequence => write!(f, "sequence"),
            DiagramType::State => write!(f, "state"),
            DiagramType::UseCase => write!(f, "usecase"),
        }
    }
}

impl FromStr for DiagramType {
    type Err = DiagramError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "class" => Ok(DiagramType::Class),
            "object" => Ok(DiagramType::Object),
            "sequence" => Ok(DiagramType::Sequence),
            "state" => Ok(DiagramType::State),
            "usecase" => Ok(DiagramType::UseCase),
            _ => Err(DiagramError::unknown_diagram_type(s)),
        }
    }
}

/// Node kinds, one closed set across all diagram types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Class,
    Interface,
    Package,
    Note,
    /// Synthetic zero-size endpoint of a note edge
    Point,
    Object,
    Field,
    /// Sequence diagram object timeline, container for calls
    Lifeline,
    /// One method activation on a lifeline
    Call,
    State,
    InitialState,
    FinalState,
    Actor,
    UseCase,
}

impl NodeKind {
    /// Size a freshly created node of this kind gets
    pub fn default_size(&self) -> Dimension {
        match self {
            NodeKind::Class | NodeKind::Interface => Dimension::new(100, 60),
            NodeKind::Package => Dimension::new(100, 80),
            NodeKind::Note => Dimension::new(60, 40),
            NodeKind::Point => Dimension::new(0, 0),
            NodeKind::Object => Dimension::new(80, 60),
            NodeKind::Field => Dimension::new(60, 20),
            NodeKind::Lifeline => Dimension::new(80, 120),
            NodeKind::Call => Dimension::new(16, 30),
            NodeKind::State => Dimension::new(80, 60),
            NodeKind::InitialState | NodeKind::FinalState => Dimension::new(20, 20),
            NodeKind::Actor => Dimension::new(48, 64),
            NodeKind::UseCase => Dimension::new(110, 40),
        }
    }

    pub fn is_note(&self) -> bool {
        matches!(self, NodeKind::Note)
    }

    pub fn is_point(&self) -> bool {
        matches!(self, NodeKind::Point)
    }

    /// Returns true if a node of this kind may own a child of `child` kind
    pub fn can_contain(&self, child: NodeKind) -> bool {
        matches!(
            (self, child),
            (
                NodeKind::Package,
                NodeKind::Class | NodeKind::Interface | NodeKind::Package
            ) | (NodeKind::Object, NodeKind::Field)
                | (NodeKind::Lifeline, NodeKind::Call)
        )
    }

    /// Returns true if this kind can own children at all
    pub fn is_parent_capable(&self) -> bool {
        matches!(
            self,
            NodeKind::Package | NodeKind::Object | NodeKind::Lifeline
        )
    }

    /// Returns true if nodes of this kind only exist inside a parent
    pub fn requires_parent(&self) -> bool {
        matches!(self, NodeKind::Field | NodeKind::Call)
    }

    /// All node kinds
    pub fn all() -> &'static [NodeKind] {
        &[
            NodeKind::Class,
            NodeKind::Interface,
            NodeKind::Package,
            NodeKind::Note,
            NodeKind::Point,
            NodeKind::Object,
            NodeKind::Field,
            NodeKind::Lifeline,
            NodeKind::Call,
            NodeKind::State,
            NodeKind::InitialState,
            NodeKind::FinalState,
            NodeKind::Actor,
            NodeKind::UseCase,
        ]
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Class => "class",
            NodeKind::Interface => "interface",
            NodeKind::Package => "package",
            NodeKind::Note => "note",
            NodeKind::Point => "point",
            NodeKind::Object => "object",
            NodeKind::Field => "field",
            NodeKind::Lifeline => "lifeline",
            NodeKind::Call => "call",
            NodeKind::State => "state",
            NodeKind::InitialState => "initial-state",
            NodeKind::FinalState => "final-state",
            NodeKind::Actor => "actor",
            NodeKind::UseCase => "use-case",
        };
        f.write_str(name)
    }
}

impl FromStr for NodeKind {
    type Err = DiagramError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        NodeKind::all()
            .iter()
            .copied()
            .find(|kind| normalize(&kind.to_string()) == wanted)
            .ok_or_else(|| DiagramError::unknown_node_kind(s))
    }
}

/// Edge kinds, one closed set across all diagram types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    /// Connector from a note; exempt from type pairing rules
    Note,
    Dependency,
    Generalization,
    Implementation,
    Association,
    Aggregation,
    Composition,
    ObjectReference,
    ObjectCollaboration,
    Call,
    Return,
    Transition,
    UseCaseAssociation,
    UseCaseGeneralization,
    UseCaseDependency,
}

impl EdgeKind {
    pub fn is_note(&self) -> bool {
        matches!(self, EdgeKind::Note)
    }

    /// Returns true for the inheritance-like kinds that may never loop
    pub fn is_generalization(&self) -> bool {
        matches!(
            self,
            EdgeKind::Generalization | EdgeKind::Implementation | EdgeKind::UseCaseGeneralization
        )
    }

    /// All edge kinds
    pub fn all() -> &'static [EdgeKind] {
        &[
            EdgeKind::Note,
            EdgeKind::Dependency,
            EdgeKind::Generalization,
            EdgeKind::Implementation,
            EdgeKind::Association,
            EdgeKind::Aggregation,
            EdgeKind::Composition,
            EdgeKind::ObjectReference,
            EdgeKind::ObjectCollaboration,
            EdgeKind::Call,
            EdgeKind::Return,
            EdgeKind::Transition,
            EdgeKind::UseCaseAssociation,
            EdgeKind::UseCaseGeneralization,
            EdgeKind::UseCaseDependency,
        ]
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EdgeKind::Note => "note",
            EdgeKind::Dependency => "dependency",
            EdgeKind::Generalization => "generalization",
            EdgeKind::Implementation => "implementation",
            EdgeKind::Association => "association",
            EdgeKind::Aggregation => "aggregation",
            EdgeKind::Composition => "composition",
            EdgeKind::ObjectReference => "reference",
            EdgeKind::ObjectCollaboration => "collaboration",
            EdgeKind::Call => "call",
            EdgeKind::Return => "return",
            EdgeKind::Transition => "transition",
            EdgeKind::UseCaseAssociation => "use-case-association",
            EdgeKind::UseCaseGeneralization => "use-case-generalization",
            EdgeKind::UseCaseDependency => "use-case-dependency",
        };
        f.write_str(name)
    }
}

impl FromStr for EdgeKind {
    type Err = DiagramError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        EdgeKind::all()
            .iter()
            .copied()
            .find(|kind| normalize(&kind.to_string()) == wanted)
            .ok_or_else(|| DiagramError::unknown_edge_kind(s))
    }
}

/// Lowercase and drop separators so "use-case", "use_case" and "UseCase" agree
fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}
