//! Property tests for the editing invariants
//!
//! Every executed operation must be exactly reversible, nodes never leave the
//! canvas, and the selection never holds a node together with one of its
//! ancestors.

use diagrammer::prelude::*;
use proptest::prelude::*;

const CANVAS: i32 = 1000;

// ===================
// Strategies
// ===================

fn point_strategy() -> impl Strategy<Value = Point> {
    (-500i32..2000, -500i32..2000).prop_map(|(x, y)| Point::new(x, y))
}

fn class_kind_strategy() -> impl Strategy<Value = NodeKind> {
    prop_oneof![
        Just(NodeKind::Class),
        Just(NodeKind::Interface),
        Just(NodeKind::Package),
        Just(NodeKind::Note),
    ]
}

fn builder() -> DiagramBuilder {
    create_builder(
        DiagramType::Class,
        EditorConfig::new().with_canvas(CANVAS, CANVAS),
    )
}

/// Snapshot of the containment tree and edge list
fn structure(diagram: &Diagram) -> (Vec<NodeId>, Vec<(NodeId, Vec<NodeId>)>, Vec<EdgeId>) {
    let children = diagram
        .all_nodes()
        .into_iter()
        .map(|node| (node, diagram.children(node).to_vec()))
        .collect();
    (diagram.root_nodes().to_vec(), children, diagram.edges().to_vec())
}

/// Build a class diagram from a sequence of drops, executing each add
fn populate(drops: &[(NodeKind, Point)]) -> DiagramBuilder {
    let mut builder = builder();
    for (kind, at) in drops {
        let node = builder.diagram_mut().create_node(*kind);
        if builder.can_add(node, *at) {
            let operation = builder.create_add_node_operation(node, *at);
            Operation::from(operation).execute(builder.diagram_mut());
        }
    }
    builder
}

// ===================
// Checks
// ===================

fn check_add_then_undo_restores(
    drops: Vec<(NodeKind, Point)>,
    kind: NodeKind,
    at: Point,
) -> Result<(), TestCaseError> {
    let mut builder = populate(&drops);
    let before = structure(builder.diagram());

    let node = builder.diagram_mut().create_node(kind);
    let mut operation = Operation::from(builder.create_add_node_operation(node, at));
    operation.execute(builder.diagram_mut());
    prop_assert!(builder.diagram().contains_node(node));
    operation.undo(builder.diagram_mut());

    prop_assert_eq!(structure(builder.diagram()), before);
    prop_assert!(!builder.diagram().contains_node(node));
    Ok(())
}

fn check_node_stays_on_canvas(kind: NodeKind, at: Point) -> Result<(), TestCaseError> {
    let mut builder = builder();
    let node = builder.diagram_mut().create_node(kind);
    let _ = builder.create_add_node_operation(node, at);
    let bounds = builder.diagram().node(node).bounds();
    prop_assert!(bounds.x >= 0 && bounds.y >= 0);
    prop_assert!(bounds.max_x() <= CANVAS && bounds.max_y() <= CANVAS);
    Ok(())
}

fn check_remove_then_undo_restores(
    drops: Vec<(NodeKind, Point)>,
    picks: Vec<prop::sample::Index>,
) -> Result<(), TestCaseError> {
    let mut builder = populate(&drops);
    let nodes = builder.diagram().all_nodes();
    if nodes.is_empty() {
        return Ok(());
    }
    let before = structure(builder.diagram());

    let elements: Vec<DiagramElement> = picks
        .iter()
        .map(|pick| DiagramElement::Node(*pick.get(&nodes)))
        .collect();
    let mut operation = Operation::from(builder.create_remove_elements_operation(&elements));
    operation.execute(builder.diagram_mut());
    for element in &elements {
        prop_assert!(!builder.diagram().contains(*element));
    }
    operation.undo(builder.diagram_mut());

    prop_assert_eq!(structure(builder.diagram()), before);
    Ok(())
}

fn check_selection_never_nests(
    drops: Vec<(NodeKind, Point)>,
    picks: Vec<prop::sample::Index>,
) -> Result<(), TestCaseError> {
    let builder = populate(&drops);
    let diagram = builder.diagram();
    let nodes = diagram.all_nodes();
    if nodes.is_empty() {
        return Ok(());
    }
    let mut selection = SelectionModel::new();
    for pick in &picks {
        let node = *pick.get(&nodes);
        selection.add(diagram, node.into());
        let once = selection.clone();
        selection.add(diagram, node.into());
        prop_assert_eq!(&selection, &once);
    }

    let selected: Vec<NodeId> = selection.iter().filter_map(|e| e.as_node()).collect();
    for node in &selected {
        prop_assert_eq!(selected.iter().filter(|other| *other == node).count(), 1);
        for other in &selected {
            prop_assert!(!diagram.is_ancestor(*other, *node));
        }
    }
    Ok(())
}

fn check_move_round_trip(
    drops: Vec<(NodeKind, Point)>,
    dx: i32,
    dy: i32,
) -> Result<(), TestCaseError> {
    let mut builder = populate(&drops);
    let Some(&root) = builder.diagram().root_nodes().first() else {
        return Ok(());
    };
    let subtree: Vec<NodeId> = std::iter::once(root)
        .chain(builder.diagram().descendants(root))
        .collect();
    let before: Vec<Point> = subtree
        .iter()
        .map(|node| builder.diagram().node(*node).position())
        .collect();

    let mut operation = Operation::from(builder.create_move_node_operation(root, dx, dy));
    operation.execute(builder.diagram_mut());
    for (node, origin) in subtree.iter().zip(&before) {
        let moved = builder.diagram().node(*node).position();
        prop_assert_eq!(moved, Point::new(origin.x + dx, origin.y + dy));
    }
    operation.undo(builder.diagram_mut());
    for (node, origin) in subtree.iter().zip(&before) {
        prop_assert_eq!(builder.diagram().node(*node).position(), *origin);
    }
    Ok(())
}

// ===================
// Properties
// ===================

proptest! {
    #[test]
    fn add_then_undo_restores_structure(
        drops in prop::collection::vec((class_kind_strategy(), point_strategy()), 0..8),
        kind in class_kind_strategy(),
        at in point_strategy(),
    ) {
        check_add_then_undo_restores(drops, kind, at)?;
    }

    #[test]
    fn added_node_stays_on_canvas(kind in class_kind_strategy(), at in point_strategy()) {
        check_node_stays_on_canvas(kind, at)?;
    }

    #[test]
    fn remove_then_undo_restores_structure(
        drops in prop::collection::vec((class_kind_strategy(), point_strategy()), 1..8),
        picks in prop::collection::vec(any::<prop::sample::Index>(), 1..4),
    ) {
        check_remove_then_undo_restores(drops, picks)?;
    }

    #[test]
    fn selection_never_holds_nested_nodes(
        drops in prop::collection::vec((class_kind_strategy(), point_strategy()), 1..10),
        picks in prop::collection::vec(any::<prop::sample::Index>(), 1..10),
    ) {
        check_selection_never_nests(drops, picks)?;
    }

    #[test]
    fn move_then_undo_round_trips(
        drops in prop::collection::vec((class_kind_strategy(), point_strategy()), 1..6),
        dx in -200i32..200,
        dy in -200i32..200,
    ) {
        check_move_round_trip(drops, dx, dy)?;
    }
}
