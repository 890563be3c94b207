//! State diagram plugin
//!
//! States joined by transitions, with initial and final pseudo-states.

mod builder;

pub use builder::{StateDiagramRules, MAX_TRANSITIONS_PER_PAIR};
