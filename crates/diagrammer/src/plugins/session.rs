//! Editing session coordinating builder, undo log, selection and clipboard
//!
//! The session is what a canvas controller talks to: intent-level calls such
//! as "add a class here" or "drag the selection" go in, and each completed
//! edit lands in the undo log as exactly one step. Sequence layout re-runs
//! after every change.

use anyhow::{bail, Result};
use tracing::{debug, info, span, Level};

use crate::core::{
    find_element, properties, set_property, Clipboard, CompoundOperation, Diagram, DiagramBuilder,
    DiagramElement, DiagramType, EdgeId, EdgeKind, EditorConfig, NodeId, NodeKind, Operation,
    Point, Properties, PropertyChangeTracker, PropertyName, PropertyValue, Rectangle,
    SelectionModel, UndoManager,
};
use crate::plugins::create_builder;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DragState {
    origin: Point,
    last: Point,
}

/// One open document and its editing state
#[derive(Debug)]
pub struct EditorSession {
    builder: DiagramBuilder,
    undo: UndoManager,
    selection: SelectionModel,
    clipboard: Clipboard,
    drag: Option<DragState>,
}

impl EditorSession {
    /// Start editing a new, empty diagram
    pub fn new(diagram_type: DiagramType, config: EditorConfig) -> Self {
        Self::with_builder(create_builder(diagram_type, config))
    }

    /// Start editing through an existing builder
    pub fn with_builder(builder: DiagramBuilder) -> Self {
        Self {
            builder,
            undo: UndoManager::new(),
            selection: SelectionModel::new(),
            clipboard: Clipboard::new(),
            drag: None,
        }
    }

    pub fn builder(&self) -> &DiagramBuilder {
        &self.builder
    }

    pub fn diagram(&self) -> &Diagram {
        self.builder.diagram()
    }

    pub fn selection(&self) -> &SelectionModel {
        &self.selection
    }

    pub fn undo_manager(&self) -> &UndoManager {
        &self.undo
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    pub fn can_undo(&self) -> bool {
        self.undo.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.undo.can_redo()
    }

    /// Execute, record and lay out
    fn apply(&mut self, operation: CompoundOperation) {
        if operation.is_empty() {
            return;
        }
        let mut operation = Operation::from(operation);
        operation.execute(self.builder.diagram_mut());
        self.undo.add(operation);
        self.builder.layout();
    }

    /// Place a new node; `None` if the diagram type forbids it there
    pub fn add_node(&mut self, kind: NodeKind, position: Point) -> Option<NodeId> {
        let node = self.builder.diagram_mut().create_node(kind);
        if !self.builder.can_add(node, position) {
            debug!(%kind, %position, "Node rejected");
            return None;
        }
        let operation = self.builder.create_add_node_operation(node, position);
        self.apply(operation);
        self.selection.clear();
        self.selection.add(self.builder.diagram(), node.into());
        info!(%node, %kind, "Node added");
        Some(node)
    }

    /// Draw a new edge; `None` if the connection is not allowed
    pub fn add_edge(&mut self, kind: EdgeKind, start: Point, end: Point) -> Option<EdgeId> {
        let edge = self.builder.diagram_mut().create_edge(kind);
        if !self.builder.can_connect(edge, start, end) {
            return None;
        }
        let operation = self.builder.create_add_edge_operation(edge, start, end);
        self.apply(operation);
        info!(%edge, %kind, "Edge added");
        Some(edge)
    }

    /// Element under `point`; edges win over nodes
    pub fn element_at(&self, point: Point) -> Option<DiagramElement> {
        find_element(self.diagram(), self.builder.geometry(), point)
    }

    /// Click selection; without `add_mode` the selection is replaced
    pub fn select_at(&mut self, point: Point, add_mode: bool) -> Option<DiagramElement> {
        let element = self.element_at(point);
        if !add_mode {
            self.selection.clear();
        }
        if let Some(element) = element {
            self.selection.add(self.builder.diagram(), element);
        }
        element
    }

    pub fn select(&mut self, element: DiagramElement) {
        self.selection.add(self.builder.diagram(), element);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn select_all(&mut self) {
        self.selection.select_all(self.builder.diagram());
    }

    /// Lasso selection over `rectangle`
    pub fn lasso(&mut self, rectangle: Rectangle, add_mode: bool) {
        self.selection.select_in_rectangle(
            self.builder.diagram(),
            self.builder.geometry(),
            rectangle,
            add_mode,
        );
    }

    /// Remove the selection and everything that goes with it
    pub fn remove_selected(&mut self) -> usize {
        let elements = self.selection.elements();
        if elements.is_empty() {
            return 0;
        }
        let operation = self.builder.create_remove_elements_operation(&elements);
        let steps = operation.len();
        self.apply(operation);
        self.selection.clear();
        info!(requested = elements.len(), steps, "Selection removed");
        steps
    }

    /// Translate every selected node as one undo step
    pub fn move_selected(&mut self, dx: i32, dy: i32) {
        if dx == 0 && dy == 0 {
            return;
        }
        let mut operation = CompoundOperation::new();
        for node in self.selected_nodes() {
            operation.add(self.builder.create_move_node_operation(node, dx, dy));
        }
        self.apply(operation);
    }

    fn selected_nodes(&self) -> Vec<NodeId> {
        self.selection.iter().filter_map(|e| e.as_node()).collect()
    }

    /// Start dragging at `point`
    ///
    /// Grabbing an unselected node selects it alone. Returns false, and
    /// starts nothing, if there is no node under the point.
    pub fn begin_drag(&mut self, point: Point) -> bool {
        assert!(self.drag.is_none(), "a drag gesture is already in progress");
        let Some(node) = self.builder.node_at(point) else {
            return false;
        };
        if !self.selection.contains(node.into()) {
            self.selection.clear();
            self.selection.add(self.builder.diagram(), node.into());
        }
        self.undo.start_tracking();
        self.drag = Some(DragState {
            origin: point,
            last: point,
        });
        debug!(%node, %point, "Drag started");
        true
    }

    /// Follow the pointer during a drag
    pub fn drag_to(&mut self, point: Point) {
        let Some(drag) = self.drag.as_mut() else {
            return;
        };
        let (dx, dy) = (point.x - drag.last.x, point.y - drag.last.y);
        drag.last = point;
        for node in self.selected_nodes() {
            let mut operation =
                Operation::from(self.builder.create_move_node_operation(node, dx, dy));
            operation.execute(self.builder.diagram_mut());
            self.undo.add(operation);
        }
    }

    /// Finish a drag at `point`
    ///
    /// Moves shorter than the drag threshold are taken back and leave no
    /// trace in the undo log. Returns true if the move was committed.
    pub fn end_drag(&mut self, point: Point) -> bool {
        let Some(origin) = self.drag.map(|drag| drag.origin) else {
            return false;
        };
        self.drag_to(point);
        self.drag = None;
        let distance = origin.distance(point);
        if distance < f64::from(self.builder.config().drag_threshold) {
            self.revert_tracking();
            debug!(distance, "Drag below threshold discarded");
            return false;
        }
        self.undo.end_tracking();
        self.builder.layout();
        info!(dx = point.x - origin.x, dy = point.y - origin.y, "Selection dragged");
        true
    }

    /// Abandon a drag, restoring every moved node
    pub fn cancel_drag(&mut self) {
        if self.drag.take().is_some() {
            self.revert_tracking();
        }
    }

    fn revert_tracking(&mut self) {
        if let Some(group) = self.undo.discard_tracking() {
            group.undo(self.builder.diagram_mut());
        }
        self.builder.layout();
    }

    /// Snapshot of an element's properties
    pub fn properties(&self, element: DiagramElement) -> Properties {
        properties(self.diagram(), element)
    }

    /// Apply several property changes as one undo step
    ///
    /// Nothing changes if any of them is rejected.
    pub fn edit_properties(
        &mut self,
        element: DiagramElement,
        changes: &[(PropertyName, PropertyValue)],
    ) -> Result<()> {
        if !self.diagram().contains(element) {
            bail!("{} is not part of the diagram", element);
        }
        let tracker = PropertyChangeTracker::start(self.diagram(), element);
        for (name, value) in changes {
            let applied = set_property(self.builder.diagram_mut(), element, *name, value.clone());
            if let Err(error) = applied {
                let partial = tracker.stop(self.diagram());
                partial.undo(self.builder.diagram_mut());
                return Err(error.into());
            }
        }
        let operation = tracker.stop(self.diagram());
        if !operation.is_empty() {
            self.undo.add(operation);
            self.builder.layout();
            info!(%element, "Properties edited");
        }
        Ok(())
    }

    /// Copy the selection to the clipboard
    pub fn copy(&mut self) {
        let elements = self.selection.elements();
        self.clipboard.copy(self.builder.diagram(), &elements);
    }

    /// Copy the selection, then remove it
    pub fn cut(&mut self) -> usize {
        self.copy();
        self.remove_selected()
    }

    /// Paste the clipboard as one undo step and select the pasted elements
    ///
    /// Returns false if there was nothing suitable to paste.
    pub fn paste(&mut self) -> bool {
        let paste_span = span!(Level::DEBUG, "paste");
        let _enter = paste_span.enter();

        let offset = self.builder.config().paste_offset;
        let Some(pasted) = self.clipboard.paste(self.builder.diagram_mut(), offset) else {
            return false;
        };
        let operation = self
            .builder
            .create_add_elements_operation(&pasted.roots, &pasted.edges);
        self.apply(operation);
        self.selection.clear();
        for element in pasted.elements() {
            self.selection.add(self.builder.diagram(), element);
        }
        info!(nodes = pasted.roots.len(), edges = pasted.edges.len(), "Pasted");
        true
    }

    /// Run several edits as one undo step
    pub fn grouped<T>(&mut self, edits: impl FnOnce(&mut Self) -> T) -> T {
        self.undo.start_tracking();
        let result = edits(self);
        self.undo.end_tracking();
        result
    }

    pub fn undo(&mut self) {
        self.undo.undo(self.builder.diagram_mut());
        self.after_history_change();
    }

    pub fn redo(&mut self) {
        self.undo.redo(self.builder.diagram_mut());
        self.after_history_change();
    }

    fn after_history_change(&mut self) {
        self.selection.retain_attached(self.builder.diagram());
        self.builder.layout();
    }
}
