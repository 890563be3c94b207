//! Integration tests for the editing session: gestures, clipboard and
//! property dialogs each land in the undo log as one step

use diagrammer::prelude::*;

fn class_session() -> EditorSession {
    EditorSession::new(DiagramType::Class, EditorConfig::default())
}

fn position(session: &EditorSession, node: NodeId) -> Point {
    session.diagram().node(node).position()
}

#[test]
fn test_short_drag_is_discarded() {
    let mut session = class_session();
    let node = session.add_node(NodeKind::Class, Point::new(10, 10)).unwrap();

    assert!(session.begin_drag(Point::new(20, 20)));
    session.drag_to(Point::new(21, 21));
    assert_eq!(position(&session, node), Point::new(11, 11));
    assert!(!session.end_drag(Point::new(21, 22)));

    assert_eq!(position(&session, node), Point::new(10, 10));
    assert_eq!(session.undo_manager().history_len(), 1);
    assert!(!session.undo_manager().is_tracking());
}

#[test]
fn test_drag_is_one_undo_step() {
    let mut session = class_session();
    let node = session.add_node(NodeKind::Class, Point::new(10, 10)).unwrap();

    assert!(session.begin_drag(Point::new(20, 20)));
    for x in [30, 40, 50, 70] {
        session.drag_to(Point::new(x, 20));
    }
    assert!(session.end_drag(Point::new(70, 30)));
    assert_eq!(position(&session, node), Point::new(60, 20));
    assert_eq!(session.undo_manager().history_len(), 2);

    session.undo();
    assert_eq!(position(&session, node), Point::new(10, 10));
    session.redo();
    assert_eq!(position(&session, node), Point::new(60, 20));
}

#[test]
fn test_cancelled_drag_restores_positions() {
    let mut session = class_session();
    let node = session.add_node(NodeKind::Class, Point::new(10, 10)).unwrap();
    assert!(session.begin_drag(Point::new(20, 20)));
    session.drag_to(Point::new(200, 200));
    session.cancel_drag();
    assert_eq!(position(&session, node), Point::new(10, 10));
    assert_eq!(session.undo_manager().history_len(), 1);
}

#[test]
fn test_drag_on_empty_canvas_starts_nothing() {
    let mut session = class_session();
    assert!(!session.begin_drag(Point::new(500, 500)));
    assert!(!session.undo_manager().is_tracking());
    assert!(!session.end_drag(Point::new(600, 600)));
}

#[test]
fn test_drag_moves_whole_selection() {
    let mut session = class_session();
    let first = session.add_node(NodeKind::Class, Point::new(10, 10)).unwrap();
    let second = session.add_node(NodeKind::Class, Point::new(300, 10)).unwrap();
    session.select(first.into());
    assert_eq!(session.selection().len(), 2);

    assert!(session.begin_drag(Point::new(20, 20)));
    assert!(session.end_drag(Point::new(20, 120)));
    assert_eq!(position(&session, first), Point::new(10, 110));
    assert_eq!(position(&session, second), Point::new(300, 110));
}

#[test]
fn test_lasso_selects_contained_elements() {
    let mut session = class_session();
    let first = session.add_node(NodeKind::Class, Point::new(10, 10)).unwrap();
    let second = session.add_node(NodeKind::Class, Point::new(300, 10)).unwrap();
    session.add_node(NodeKind::Class, Point::new(600, 10)).unwrap();
    let edge = session
        .add_edge(EdgeKind::Association, Point::new(20, 20), Point::new(310, 20))
        .unwrap();

    session.lasso(Rectangle::new(0, 0, 450, 100), false);
    let selected = session.selection().elements();
    assert_eq!(
        selected,
        vec![
            DiagramElement::Node(first),
            DiagramElement::Node(second),
            DiagramElement::Edge(edge),
        ]
    );
}

#[test]
fn test_select_at_prefers_edges() {
    let mut session = class_session();
    let first = session.add_node(NodeKind::Class, Point::new(10, 10)).unwrap();
    session.add_node(NodeKind::Class, Point::new(300, 10)).unwrap();
    let edge = session
        .add_edge(EdgeKind::Association, Point::new(20, 20), Point::new(310, 20))
        .unwrap();

    assert_eq!(session.select_at(Point::new(200, 40), false), Some(edge.into()));
    assert_eq!(session.select_at(Point::new(50, 40), true), Some(first.into()));
    assert_eq!(session.selection().len(), 2);

    assert_eq!(session.select_at(Point::new(500, 500), false), None);
    assert!(session.selection().is_empty());
}

#[test]
fn test_copy_paste_is_one_step() {
    let mut session = class_session();
    let first = session.add_node(NodeKind::Class, Point::new(10, 10)).unwrap();
    let second = session.add_node(NodeKind::Class, Point::new(300, 10)).unwrap();
    session
        .add_edge(EdgeKind::Dependency, Point::new(20, 20), Point::new(310, 20))
        .unwrap();
    session.select_all();
    session.copy();

    let history = session.undo_manager().history_len();
    assert!(session.paste());
    assert_eq!(session.undo_manager().history_len(), history + 1);
    assert_eq!(session.diagram().node_count(), 4);
    assert_eq!(session.diagram().edge_count(), 2);
    assert_eq!(session.selection().len(), 3);

    let roots = session.diagram().root_nodes().to_vec();
    assert_eq!(position(&session, roots[2]), Point::new(20, 20));
    assert_eq!(position(&session, roots[3]), Point::new(310, 20));
    assert_eq!(&roots[..2], &[first, second]);

    session.undo();
    assert_eq!(session.diagram().node_count(), 2);
    assert!(session.selection().is_empty());
}

#[test]
fn test_paste_into_other_diagram_type_is_refused() {
    let mut session = class_session();
    assert!(!session.paste());

    session.add_node(NodeKind::Class, Point::new(10, 10)).unwrap();
    session.copy();
    assert!(session.clipboard().fits(session.diagram()));
    assert!(!session.clipboard().fits(&Diagram::new(DiagramType::State)));
}

#[test]
fn test_cut_then_undo() {
    let mut session = class_session();
    let node = session.add_node(NodeKind::Class, Point::new(10, 10)).unwrap();
    assert_eq!(session.cut(), 1);
    assert_eq!(session.diagram().node_count(), 0);
    assert!(session.paste());
    assert_eq!(session.diagram().node_count(), 1);
    assert_ne!(session.diagram().root_nodes()[0], node);

    session.undo();
    session.undo();
    assert_eq!(session.diagram().root_nodes(), &[node]);
}

#[test]
fn test_property_dialog_is_atomic() {
    let mut session = class_session();
    let node = session.add_node(NodeKind::Class, Point::new(10, 10)).unwrap();
    let history = session.undo_manager().history_len();

    let result = session.edit_properties(
        node.into(),
        &[
            (PropertyName::Name, "Order".into()),
            (PropertyName::Signal, true.into()),
        ],
    );
    assert!(result.is_err());
    assert_eq!(session.diagram().node(node).name(), "");
    assert_eq!(session.undo_manager().history_len(), history);

    session
        .edit_properties(node.into(), &[(PropertyName::Name, "Order".into())])
        .unwrap();
    assert_eq!(session.diagram().node(node).name(), "Order");
    session.undo();
    assert_eq!(session.diagram().node(node).name(), "");
}

#[test]
fn test_object_reference_clears_field_value() {
    let mut session = EditorSession::new(DiagramType::Object, EditorConfig::default());
    session.add_node(NodeKind::Object, Point::new(0, 0)).unwrap();
    let field = session.add_node(NodeKind::Field, Point::new(10, 20)).unwrap();
    session.add_node(NodeKind::Object, Point::new(300, 0)).unwrap();
    session
        .edit_properties(field.into(), &[(PropertyName::Value, "42".into())])
        .unwrap();

    session
        .add_edge(EdgeKind::ObjectReference, Point::new(15, 25), Point::new(310, 10))
        .unwrap();
    assert_eq!(session.diagram().node(field).value(), "");

    session.undo();
    assert_eq!(session.diagram().node(field).value(), "42");
    assert_eq!(session.diagram().edge_count(), 0);
}

#[test]
fn test_state_transition_limit() {
    let mut session = EditorSession::new(DiagramType::State, EditorConfig::default());
    session.add_node(NodeKind::State, Point::new(0, 0)).unwrap();
    session.add_node(NodeKind::State, Point::new(300, 0)).unwrap();
    let (from, to) = (Point::new(10, 10), Point::new(310, 10));

    assert!(session.add_edge(EdgeKind::Transition, from, to).is_some());
    assert!(session.add_edge(EdgeKind::Transition, from, to).is_some());
    assert!(session.add_edge(EdgeKind::Transition, from, to).is_none());
    assert!(session.add_edge(EdgeKind::Transition, to, from).is_some());
}

#[test]
fn test_grouped_edits_undo_together() {
    let mut session = class_session();
    let node = session.grouped(|session| {
        let node = session.add_node(NodeKind::Class, Point::new(10, 10)).unwrap();
        session
            .edit_properties(node.into(), &[(PropertyName::Name, "Order".into())])
            .unwrap();
        node
    });
    assert_eq!(session.undo_manager().history_len(), 1);
    assert!(!session.undo_manager().is_tracking());

    session.undo();
    assert!(!session.diagram().contains(node.into()));
    session.redo();
    assert_eq!(session.diagram().node(node).name(), "Order");
}
