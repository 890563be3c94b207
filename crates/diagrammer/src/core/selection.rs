//! Selection model with parent/child absorption
//!
//! The selection is an ordered list whose last element is the primary one.
//! Selecting a node whose ancestor is already selected does nothing, and
//! selecting a parent drops any of its selected descendants, so an operation
//! over the selection never touches the same node twice.

use super::{Diagram, DiagramElement, Geometry, NodeId, Rectangle};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionModel {
    elements: Vec<DiagramElement>,
}

impl SelectionModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select an element, making it the primary selection
    pub fn add(&mut self, diagram: &Diagram, element: DiagramElement) {
        if let DiagramElement::Node(node) = element {
            let covered = diagram
                .ancestors(node)
                .into_iter()
                .any(|ancestor| self.elements.contains(&DiagramElement::Node(ancestor)));
            if covered {
                return;
            }
            self.elements.retain(|selected| match selected {
                DiagramElement::Node(other) => !diagram.is_ancestor(node, *other),
                DiagramElement::Edge(_) => true,
            });
        }
        self.elements.retain(|selected| *selected != element);
        self.elements.push(element);
    }

    pub fn remove(&mut self, element: DiagramElement) {
        self.elements.retain(|selected| *selected != element);
    }

    pub fn clear(&mut self) {
        self.elements.clear();
    }

    pub fn contains(&self, element: DiagramElement) -> bool {
        self.elements.contains(&element)
    }

    /// The most recently selected element
    pub fn primary(&self) -> Option<DiagramElement> {
        self.elements.last().copied()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = DiagramElement> + '_ {
        self.elements.iter().copied()
    }

    /// Snapshot of the selected elements in selection order
    pub fn elements(&self) -> Vec<DiagramElement> {
        self.elements.clone()
    }

    /// Lasso selection: every node lying entirely inside `rectangle`, then
    /// every edge whose endpoints are both covered by the selection
    ///
    /// Without `add_mode` the previous selection is replaced.
    pub fn select_in_rectangle(
        &mut self,
        diagram: &Diagram,
        geometry: &dyn Geometry,
        rectangle: Rectangle,
        add_mode: bool,
    ) {
        if !add_mode {
            self.clear();
        }
        for node in diagram.all_nodes() {
            if rectangle.contains_rectangle(&geometry.node_bounds(diagram, node)) {
                self.add(diagram, node.into());
            }
        }
        for edge in diagram.edges() {
            let (start, end) = diagram.edge(*edge).endpoints();
            if self.covers(diagram, start) && self.covers(diagram, end) {
                self.add(diagram, (*edge).into());
            }
        }
    }

    /// Returns true if `node` or one of its ancestors is selected
    fn covers(&self, diagram: &Diagram, node: NodeId) -> bool {
        self.contains(node.into())
            || diagram
                .ancestors(node)
                .into_iter()
                .any(|ancestor| self.contains(ancestor.into()))
    }

    /// Select every root node and every edge
    pub fn select_all(&mut self, diagram: &Diagram) {
        self.clear();
        for root in diagram.root_nodes() {
            self.add(diagram, (*root).into());
        }
        for edge in diagram.edges() {
            self.add(diagram, (*edge).into());
        }
    }

    /// Forget elements that are no longer part of the diagram
    pub fn retain_attached(&mut self, diagram: &Diagram) {
        self.elements.retain(|element| diagram.contains(*element));
    }

    /// Smallest rectangle covering every selected element
    pub fn selection_bounds(
        &self,
        diagram: &Diagram,
        geometry: &dyn Geometry,
    ) -> Option<Rectangle> {
        self.elements
            .iter()
            .map(|element| geometry.bounds(diagram, *element))
            .reduce(|acc, bounds| acc.union(&bounds))
    }
}
