//! Editable element properties
//!
//! Each element exposes an ordered list of named values. Property dialogs
//! read a snapshot with [`properties`] and write back through
//! [`set_property`]; [`PropertyChangeTracker`] diffs a snapshot against the
//! current state so that one dialog session becomes one undoable operation.

use std::fmt;
use std::str::FromStr;

use super::{
    CompoundOperation, Diagram, DiagramElement, DiagramError, EdgeKind, NodeKind, Operation,
};

/// Names of editable properties
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyName {
    Name,
    Value,
    OpenBottom,
    MiddleLabel,
    Signal,
}

impl fmt::Display for PropertyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyName::Name => write!(f, "name"),
            PropertyName::Value => write!(f, "value"),
            PropertyName::OpenBottom => write!(f, "open-bottom"),
            PropertyName::MiddleLabel => write!(f, "label"),
            PropertyName::Signal => write!(f, "signal"),
        }
    }
}

impl FromStr for PropertyName {
    type Err = DiagramError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "name" => Ok(PropertyName::Name),
            "value" => Ok(PropertyName::Value),
            "open-bottom" | "open_bottom" | "openbottom" => Ok(PropertyName::OpenBottom),
            "label" | "middle-label" | "middle_label" => Ok(PropertyName::MiddleLabel),
            "signal" => Ok(PropertyName::Signal),
            _ => Err(DiagramError::UnknownProperty {
                name: s.to_string(),
            }),
        }
    }
}

/// A property value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    Text(String),
    Bool(bool),
}

impl PropertyValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(text) => Some(text),
            PropertyValue::Bool(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(flag) => Some(*flag),
            PropertyValue::Text(_) => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Text(text) => write!(f, "{}", text),
            PropertyValue::Bool(flag) => write!(f, "{}", flag),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(text: &str) -> Self {
        PropertyValue::Text(text.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(text: String) -> Self {
        PropertyValue::Text(text)
    }
}

impl From<bool> for PropertyValue {
    fn from(flag: bool) -> Self {
        PropertyValue::Bool(flag)
    }
}

/// One named value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub name: PropertyName,
    pub value: PropertyValue,
}

/// Ordered snapshot of an element's properties
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    entries: Vec<Property>,
}

impl Properties {
    fn push(&mut self, name: PropertyName, value: impl Into<PropertyValue>) {
        self.entries.push(Property {
            name,
            value: value.into(),
        });
    }

    pub fn get(&self, name: PropertyName) -> Option<&PropertyValue> {
        self.entries
            .iter()
            .find(|property| property.name == name)
            .map(|property| &property.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Property> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Snapshot the editable properties of an element
pub fn properties(diagram: &Diagram, element: DiagramElement) -> Properties {
    let mut result = Properties::default();
    match element {
        DiagramElement::Node(id) => {
            let node = diagram.node(id);
            match node.kind() {
                NodeKind::Point | NodeKind::InitialState | NodeKind::FinalState => {}
                NodeKind::Call => result.push(PropertyName::OpenBottom, node.is_open_bottom()),
                NodeKind::Field => {
                    result.push(PropertyName::Name, node.name());
                    result.push(PropertyName::Value, node.value());
                }
                _ => result.push(PropertyName::Name, node.name()),
            }
        }
        DiagramElement::Edge(id) => {
            let edge = diagram.edge(id);
            match edge.kind() {
                EdgeKind::Note => {}
                EdgeKind::Call => {
                    result.push(PropertyName::MiddleLabel, edge.middle_label());
                    result.push(PropertyName::Signal, edge.is_signal());
                }
                _ => result.push(PropertyName::MiddleLabel, edge.middle_label()),
            }
        }
    }
    result
}

/// Write one property of an element
///
/// Fails if the element has no such property or the value has the wrong type.
pub fn set_property(
    diagram: &mut Diagram,
    element: DiagramElement,
    name: PropertyName,
    value: PropertyValue,
) -> Result<(), DiagramError> {
    if properties(diagram, element).get(name).is_none() {
        return Err(DiagramError::UnknownProperty {
            name: name.to_string(),
        });
    }
    let invalid = || DiagramError::InvalidPropertyValue {
        name: name.to_string(),
        value: value.to_string(),
    };
    match (element, name) {
        (DiagramElement::Node(id), PropertyName::Name) => {
            diagram.set_name(id, value.as_text().ok_or_else(invalid)?)
        }
        (DiagramElement::Node(id), PropertyName::Value) => {
            diagram.set_value(id, value.as_text().ok_or_else(invalid)?)
        }
        (DiagramElement::Node(id), PropertyName::OpenBottom) => {
            diagram.set_open_bottom(id, value.as_bool().ok_or_else(invalid)?)
        }
        (DiagramElement::Edge(id), PropertyName::MiddleLabel) => {
            diagram.set_middle_label(id, value.as_text().ok_or_else(invalid)?)
        }
        (DiagramElement::Edge(id), PropertyName::Signal) => {
            diagram.set_signal(id, value.as_bool().ok_or_else(invalid)?)
        }
        _ => return Err(invalid()),
    }
    Ok(())
}

/// Records property values before an edit and reports what changed
#[derive(Debug, Clone)]
pub struct PropertyChangeTracker {
    element: DiagramElement,
    before: Properties,
}

impl PropertyChangeTracker {
    /// Snapshot the element's current values
    pub fn start(diagram: &Diagram, element: DiagramElement) -> Self {
        Self {
            element,
            before: properties(diagram, element),
        }
    }

    /// One already-applied change operation per modified property
    pub fn stop(self, diagram: &Diagram) -> CompoundOperation {
        let after = properties(diagram, self.element);
        let mut result = CompoundOperation::new();
        for (old, new) in self.before.iter().zip(after.iter()) {
            if old.value != new.value {
                result.add(Operation::ChangeProperty {
                    element: self.element,
                    name: old.name,
                    old: old.value.clone(),
                    new: new.value.clone(),
                });
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DiagramType, Point};

    #[test]
    fn test_field_properties_in_order() {
        let mut diagram = Diagram::new(DiagramType::Object);
        let field = diagram.create_node_at(NodeKind::Field, Point::new(0, 0));
        diagram.set_name(field, "count");
        diagram.set_value(field, "3");
        let props = properties(&diagram, field.into());
        let names: Vec<_> = props.iter().map(|p| p.name).collect();
        assert_eq!(names, vec![PropertyName::Name, PropertyName::Value]);
        assert_eq!(props.get(PropertyName::Value), Some(&PropertyValue::from("3")));
    }

    #[test]
    fn test_set_property_rejects_missing_and_mistyped() {
        let mut diagram = Diagram::new(DiagramType::Sequence);
        let call = diagram.create_node(NodeKind::Call);
        assert!(set_property(&mut diagram, call.into(), PropertyName::Name, "x".into()).is_err());
        assert!(
            set_property(&mut diagram, call.into(), PropertyName::OpenBottom, "yes".into())
                .is_err()
        );
        set_property(&mut diagram, call.into(), PropertyName::OpenBottom, true.into()).unwrap();
        assert!(diagram.node(call).is_open_bottom());
    }

    #[test]
    fn test_tracker_reports_only_changes() {
        let mut diagram = Diagram::new(DiagramType::Sequence);
        let edge = diagram.create_edge(EdgeKind::Call);
        let tracker = PropertyChangeTracker::start(&diagram, edge.into());
        diagram.set_signal(edge, true);
        let operation = tracker.stop(&diagram);
        assert_eq!(operation.len(), 1);

        let mut operation = Operation::Compound(operation);
        operation.undo(&mut diagram);
        assert!(!diagram.edge(edge).is_signal());
        operation.execute(&mut diagram);
        assert!(diagram.edge(edge).is_signal());
    }

    #[test]
    fn test_property_name_parsing() {
        assert_eq!("open-bottom".parse::<PropertyName>().unwrap(), PropertyName::OpenBottom);
        assert_eq!("label".parse::<PropertyName>().unwrap(), PropertyName::MiddleLabel);
        assert!("colour".parse::<PropertyName>().is_err());
    }
}
