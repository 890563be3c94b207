//! Operation log with undo/redo and nested transaction grouping
//!
//! Callers execute an operation first and then hand it to the log. While a
//! tracking group is open, added operations are folded into that group; the
//! outermost [`UndoManager::end_tracking`] commits the whole group as a single
//! undo step.

use tracing::{debug, info};

use super::{CompoundOperation, Diagram, Operation};

/// Records executed operations and replays their inverses
#[derive(Debug, Default)]
pub struct UndoManager {
    past: Vec<Operation>,
    future: Vec<Operation>,
    tracking: Vec<CompoundOperation>,
}

impl UndoManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an operation that has already been executed
    ///
    /// Empty compounds are dropped. Outside a tracking group the redo history
    /// is cleared.
    pub fn add(&mut self, operation: impl Into<Operation>) {
        let operation = operation.into();
        if operation.is_empty() {
            return;
        }
        match self.tracking.last_mut() {
            Some(group) => group.add(operation),
            None => self.commit(operation),
        }
    }

    fn commit(&mut self, operation: Operation) {
        debug!(history = self.past.len() + 1, "Committing operation");
        self.past.push(operation);
        self.future.clear();
    }

    /// Open a (possibly nested) tracking group
    pub fn start_tracking(&mut self) {
        self.tracking.push(CompoundOperation::new());
        debug!(depth = self.tracking.len(), "Started tracking");
    }

    /// Close the innermost tracking group
    ///
    /// An inner group folds into its enclosing group; only the outermost one
    /// reaches the history. A group that recorded nothing commits nothing.
    ///
    /// # Panics
    /// Panics if no group is open.
    pub fn end_tracking(&mut self) {
        let group = self
            .tracking
            .pop()
            .unwrap_or_else(|| panic!("end_tracking called without start_tracking"));
        debug!(depth = self.tracking.len(), recorded = group.len(), "Ended tracking");
        self.add(group);
    }

    /// Drop the innermost tracking group without recording it
    ///
    /// The caller is responsible for having reverted whatever the group held.
    pub fn discard_tracking(&mut self) -> Option<CompoundOperation> {
        self.tracking.pop()
    }

    pub fn is_tracking(&self) -> bool {
        !self.tracking.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Undo the most recent step; no-op on an empty history
    ///
    /// # Panics
    /// Panics if a tracking group is open.
    pub fn undo(&mut self, diagram: &mut Diagram) {
        assert!(!self.is_tracking(), "cannot undo while tracking operations");
        if let Some(operation) = self.past.pop() {
            operation.undo(diagram);
            self.future.push(operation);
            info!(undo = self.past.len(), redo = self.future.len(), "Undo");
        }
    }

    /// Redo the most recently undone step; no-op if there is none
    ///
    /// # Panics
    /// Panics if a tracking group is open.
    pub fn redo(&mut self, diagram: &mut Diagram) {
        assert!(!self.is_tracking(), "cannot redo while tracking operations");
        if let Some(mut operation) = self.future.pop() {
            operation.execute(diagram);
            self.past.push(operation);
            info!(undo = self.past.len(), redo = self.future.len(), "Redo");
        }
    }

    /// Number of undoable steps
    pub fn history_len(&self) -> usize {
        self.past.len()
    }

    /// Forget all history
    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
        self.tracking.clear();
    }
}
