//! Core abstractions for diagram editing
//!
//! Everything here is independent of any particular diagram type: the
//! structural model, reversible operations, the builder and its rules seam,
//! constraints, selection, undo and the clipboard.

mod builder;
mod clipboard;
mod config;
mod constraints;
mod diagram;
mod error;
mod geometry;
pub mod logging;
mod operation;
mod properties;
mod selection;
mod types;
mod undo;

pub use builder::*;
pub use clipboard::*;
pub use config::*;
pub use constraints::*;
pub use diagram::*;
pub use error::*;
pub use geometry::*;
pub use logging::*;
pub use operation::*;
pub use properties::*;
pub use selection::*;
pub use types::*;
pub use undo::*;
