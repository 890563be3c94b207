//! Integration tests for the builder and the undo log working together

use diagrammer::prelude::*;

fn class_builder(width: i32, height: i32) -> DiagramBuilder {
    create_builder(
        DiagramType::Class,
        EditorConfig::new().with_canvas(width, height),
    )
}

/// Execute an operation and record it in the undo log
fn run(builder: &mut DiagramBuilder, undo: &mut UndoManager, operation: CompoundOperation) {
    let mut operation = Operation::from(operation);
    operation.execute(builder.diagram_mut());
    undo.add(operation);
}

#[test]
fn test_add_class_then_undo() {
    let mut builder = class_builder(1000, 1000);
    let mut undo = UndoManager::new();
    let node = builder.diagram_mut().create_node(NodeKind::Class);
    assert!(builder.can_add(node, Point::new(10, 10)));

    let operation = builder.create_add_node_operation(node, Point::new(10, 10));
    run(&mut builder, &mut undo, operation);
    assert_eq!(builder.diagram().root_nodes(), &[node]);
    assert_eq!(builder.diagram().node(node).position(), Point::new(10, 10));

    undo.undo(builder.diagram_mut());
    assert!(builder.diagram().root_nodes().is_empty());
}

#[test]
fn test_clamped_add_is_stable_across_undo_redo() {
    let mut builder = class_builder(500, 500);
    let mut undo = UndoManager::new();
    let node = builder.diagram_mut().create_node(NodeKind::Class);
    let operation = builder.create_add_node_operation(node, Point::new(990, 990));
    run(&mut builder, &mut undo, operation);
    assert_eq!(builder.diagram().node(node).position(), Point::new(400, 440));

    undo.undo(builder.diagram_mut());
    assert!(builder.diagram().root_nodes().is_empty());
    undo.redo(builder.diagram_mut());
    assert_eq!(builder.diagram().root_nodes(), &[node]);
    assert_eq!(builder.diagram().node(node).position(), Point::new(400, 440));
}

#[test]
fn test_remove_package_restores_subtree_and_edges() {
    let mut builder = class_builder(2000, 2000);
    let mut undo = UndoManager::new();

    let package = builder.diagram_mut().create_node(NodeKind::Package);
    let operation = builder.create_add_node_operation(package, Point::new(0, 0));
    run(&mut builder, &mut undo, operation);
    builder.diagram_mut().set_size(package, Dimension::new(400, 300));

    let mut classes = Vec::new();
    for x in [20, 150] {
        let class = builder.diagram_mut().create_node(NodeKind::Class);
        let operation = builder.create_add_node_operation(class, Point::new(x, 100));
        run(&mut builder, &mut undo, operation);
        classes.push(class);
    }
    let outside = builder.diagram_mut().create_node(NodeKind::Class);
    let operation = builder.create_add_node_operation(outside, Point::new(800, 100));
    run(&mut builder, &mut undo, operation);
    assert_eq!(builder.diagram().children(package), classes.as_slice());

    let edge = builder.diagram_mut().create_edge(EdgeKind::Dependency);
    let (from, to) = (Point::new(160, 110), Point::new(810, 110));
    assert!(builder.can_connect(edge, from, to));
    let operation = builder.create_add_edge_operation(edge, from, to);
    run(&mut builder, &mut undo, operation);

    let operation = builder.create_remove_node_operation(package);
    run(&mut builder, &mut undo, operation);
    assert_eq!(builder.diagram().root_nodes(), &[outside]);
    assert_eq!(builder.diagram().edge_count(), 0);

    undo.undo(builder.diagram_mut());
    assert_eq!(builder.diagram().root_nodes(), &[package, outside]);
    assert_eq!(builder.diagram().children(package), classes.as_slice());
    assert_eq!(builder.diagram().edges(), &[edge]);
}

#[test]
fn test_remove_child_restores_exact_index() {
    let mut builder = class_builder(2000, 2000);
    let mut undo = UndoManager::new();
    let package = builder.diagram_mut().create_node(NodeKind::Package);
    let operation = builder.create_add_node_operation(package, Point::new(0, 0));
    run(&mut builder, &mut undo, operation);
    builder.diagram_mut().set_size(package, Dimension::new(600, 200));

    let classes: Vec<NodeId> = [10, 160, 310]
        .into_iter()
        .map(|x| {
            let class = builder.diagram_mut().create_node(NodeKind::Class);
            let operation = builder.create_add_node_operation(class, Point::new(x, 50));
            run(&mut builder, &mut undo, operation);
            class
        })
        .collect();

    let operation = builder.create_remove_node_operation(classes[1]);
    run(&mut builder, &mut undo, operation);
    assert_eq!(builder.diagram().children(package), &[classes[0], classes[2]]);

    undo.undo(builder.diagram_mut());
    assert_eq!(builder.diagram().children(package), classes.as_slice());
    assert_eq!(builder.diagram().parent(classes[1]), Some(package));
}

#[test]
fn test_remove_elements_deduplicates_nested() {
    let mut builder = class_builder(2000, 2000);
    let mut undo = UndoManager::new();
    let package = builder.diagram_mut().create_node(NodeKind::Package);
    let operation = builder.create_add_node_operation(package, Point::new(0, 0));
    run(&mut builder, &mut undo, operation);
    let class = builder.diagram_mut().create_node(NodeKind::Class);
    let operation = builder.create_add_node_operation(class, Point::new(10, 10));
    run(&mut builder, &mut undo, operation);

    let operation =
        builder.create_remove_elements_operation(&[class.into(), package.into(), class.into()]);
    assert_eq!(operation.len(), 1);
    run(&mut builder, &mut undo, operation);
    assert_eq!(builder.diagram().node_count(), 0);

    undo.undo(builder.diagram_mut());
    assert_eq!(builder.diagram().node_count(), 2);
    assert_eq!(builder.diagram().parent(class), Some(package));
}

#[test]
fn test_note_point_removed_with_note() {
    let mut builder = class_builder(2000, 2000);
    let mut undo = UndoManager::new();
    let note = builder.diagram_mut().create_node(NodeKind::Note);
    let operation = builder.create_add_node_operation(note, Point::new(0, 0));
    run(&mut builder, &mut undo, operation);

    let edge = builder.diagram_mut().create_edge(EdgeKind::Note);
    let operation = builder.create_add_edge_operation(edge, Point::new(5, 5), Point::new(500, 500));
    run(&mut builder, &mut undo, operation);
    assert_eq!(builder.diagram().node_count(), 2);

    let operation = builder.create_remove_node_operation(note);
    run(&mut builder, &mut undo, operation);
    assert_eq!(builder.diagram().node_count(), 0);
    assert_eq!(builder.diagram().edge_count(), 0);

    undo.undo(builder.diagram_mut());
    assert_eq!(builder.diagram().node_count(), 2);
    assert_eq!(builder.diagram().edges(), &[edge]);
}

#[test]
fn test_note_edge_from_note_to_class_is_always_allowed() {
    let mut builder = class_builder(2000, 2000);
    let mut undo = UndoManager::new();
    for (kind, at) in [(NodeKind::Note, Point::new(0, 0)), (NodeKind::Class, Point::new(300, 0))] {
        let node = builder.diagram_mut().create_node(kind);
        let operation = builder.create_add_node_operation(node, at);
        run(&mut builder, &mut undo, operation);
    }
    let note_edge = builder.diagram_mut().create_edge(EdgeKind::Note);
    assert!(builder.can_connect(note_edge, Point::new(5, 5), Point::new(310, 10)));
    assert!(builder.can_connect(note_edge, Point::new(310, 10), Point::new(5, 5)));
    assert!(!builder.can_connect(note_edge, Point::new(310, 10), Point::new(1500, 1500)));

    let dependency = builder.diagram_mut().create_edge(EdgeKind::Dependency);
    assert!(!builder.can_connect(dependency, Point::new(310, 10), Point::new(5, 5)));
}

#[test]
#[should_panic(expected = "no node under the start point")]
fn test_add_edge_requires_start_node() {
    let mut builder = class_builder(1000, 1000);
    let edge = builder.diagram_mut().create_edge(EdgeKind::Dependency);
    builder.create_add_edge_operation(edge, Point::new(5, 5), Point::new(50, 50));
}

#[test]
#[should_panic(expected = "not in the diagram")]
fn test_remove_detached_node_panics() {
    let mut builder = class_builder(1000, 1000);
    let node = builder.diagram_mut().create_node(NodeKind::Class);
    builder.create_remove_node_operation(node);
}
