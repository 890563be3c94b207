//! Editor configuration

use super::Dimension;

/// Settings shared by the builder and the editing session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorConfig {
    /// Size of the drawing area; added nodes are kept inside it
    pub canvas: Dimension,
    /// Minimum pointer travel before a drag counts as a move
    pub drag_threshold: i32,
    /// Shift applied to pasted elements
    pub paste_offset: i32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas: Dimension::new(2000, 1500),
            drag_threshold: 3,
            paste_offset: 10,
        }
    }
}

impl EditorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_canvas(mut self, width: i32, height: i32) -> Self {
        self.canvas = Dimension::new(width, height);
        self
    }

    pub fn with_drag_threshold(mut self, threshold: i32) -> Self {
        self.drag_threshold = threshold;
        self
    }

    pub fn with_paste_offset(mut self, offset: i32) -> Self {
        self.paste_offset = offset;
        self
    }
}
