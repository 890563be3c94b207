//! Diagram type plugins
//!
//! One module per diagram type, each providing the [`BuilderRules`] that
//! specialize the generic builder, plus the editing session that ties a
//! builder to its undo log, selection and clipboard.

pub mod class;
pub mod object;
pub mod sequence;
pub mod session;
pub mod state;
pub mod usecase;

pub use class::*;
pub use object::*;
pub use sequence::*;
pub use session::*;
pub use state::*;
pub use usecase::*;

use crate::core::{BuilderRules, Diagram, DiagramBuilder, DiagramType, EditorConfig};

/// The rules serving a diagram type
pub fn rules_for(diagram_type: DiagramType) -> Box<dyn BuilderRules> {
    match diagram_type {
        DiagramType::Class => Box::new(ClassDiagramRules::new()),
        DiagramType::Object => Box::new(ObjectDiagramRules::new()),
        DiagramType::Sequence => Box::new(SequenceDiagramRules::new()),
        DiagramType::State => Box::new(StateDiagramRules::new()),
        DiagramType::UseCase => Box::new(UseCaseDiagramRules::new()),
    }
}

/// A builder over a new, empty diagram of the given type
pub fn create_builder(diagram_type: DiagramType, config: EditorConfig) -> DiagramBuilder {
    DiagramBuilder::new(Diagram::new(diagram_type), rules_for(diagram_type), config)
}
