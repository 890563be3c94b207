//! Editing scripts: JSON lists of user gestures replayed against a session
//!
//! A script names a diagram type and a list of steps. Steps address elements
//! by canvas position, the way pointer events would:
//!
//! ```json
//! {
//!   "diagram_type": "class",
//!   "steps": [
//!     { "op": "add_node", "kind": "class", "at": [10, 10], "name": "Order" },
//!     { "op": "add_node", "kind": "class", "at": [300, 10] },
//!     { "op": "add_edge", "kind": "dependency", "from": [20, 20], "to": [310, 20] },
//!     { "op": "undo" }
//!   ]
//! }
//! ```
//!
//! Requests the diagram rules refuse are recorded as rejected steps, not
//! errors; malformed steps abort the replay.

use serde::Deserialize;
use tracing::{debug, info, warn};

use diagrammer::prelude::*;

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Script {
    pub diagram_type: String,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Script {
    pub fn from_json(content: &str) -> Result<Self, DiagramError> {
        serde_json::from_str(content)
            .map_err(|e| DiagramError::script_error(format!("invalid script: {}", e), 0))
    }
}

/// One user gesture
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    AddNode {
        kind: String,
        at: [i32; 2],
        #[serde(default)]
        name: Option<String>,
    },
    AddEdge {
        kind: String,
        from: [i32; 2],
        to: [i32; 2],
        #[serde(default)]
        label: Option<String>,
    },
    SelectAt {
        at: [i32; 2],
        #[serde(default)]
        add: bool,
    },
    Lasso {
        from: [i32; 2],
        to: [i32; 2],
        #[serde(default)]
        add: bool,
    },
    SelectAll,
    ClearSelection,
    Remove,
    Move {
        dx: i32,
        dy: i32,
    },
    /// Press at `from`, pass through `path`, release at its last point
    Drag {
        from: [i32; 2],
        #[serde(default)]
        path: Vec<[i32; 2]>,
    },
    SetProperty {
        at: [i32; 2],
        name: String,
        value: serde_json::Value,
    },
    Copy,
    Cut,
    Paste,
    Undo,
    Redo,
    /// Abort the replay unless the diagram has the given shape
    Expect {
        #[serde(default)]
        nodes: Option<usize>,
        #[serde(default)]
        edges: Option<usize>,
        #[serde(default)]
        selected: Option<usize>,
    },
}

fn point([x, y]: [i32; 2]) -> Point {
    Point::new(x, y)
}

/// What a replay did, step by step
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplayReport {
    pub steps: usize,
    /// 1-based numbers of the steps the diagram rules refused
    pub rejected: Vec<usize>,
}

/// Run a script on a fresh session
pub fn replay(
    script: &Script,
    config: EditorConfig,
) -> Result<(EditorSession, ReplayReport), DiagramError> {
    let diagram_type: DiagramType = script
        .diagram_type
        .parse()
        .map_err(|e: DiagramError| DiagramError::script_error(e.to_string(), 0))?;
    let mut session = EditorSession::new(diagram_type, config);
    let mut report = ReplayReport::default();

    for (index, step) in script.steps.iter().enumerate() {
        let number = index + 1;
        let applied = run_step(&mut session, step, number)?;
        if !applied {
            debug!(step = number, ?step, "Step rejected");
            report.rejected.push(number);
        }
        report.steps += 1;
    }
    info!(
        steps = report.steps,
        rejected = report.rejected.len(),
        nodes = session.diagram().node_count(),
        edges = session.diagram().edge_count(),
        "Replay finished"
    );
    Ok((session, report))
}

/// Returns false if the step was refused by the diagram rules
fn run_step(session: &mut EditorSession, step: &Step, number: usize) -> Result<bool, DiagramError> {
    let fail = |message: String| DiagramError::script_error(message, number);
    let diagram_type = session.diagram().diagram_type();

    match step {
        Step::AddNode { kind, at, name } => {
            let kind: NodeKind = kind.parse().map_err(|e: DiagramError| fail(e.to_string()))?;
            if !diagram_type.supports_node(kind) || kind == NodeKind::Point {
                return Err(fail(
                    DiagramError::UnsupportedNodeKind {
                        kind: kind.to_string(),
                        diagram_type: diagram_type.to_string(),
                    }
                    .to_string(),
                ));
            }
            session.grouped(|session| -> Result<bool, DiagramError> {
                let Some(node) = session.add_node(kind, point(*at)) else {
                    return Ok(false);
                };
                if let Some(name) = name {
                    let change = (PropertyName::Name, name.as_str().into());
                    session
                        .edit_properties(node.into(), &[change])
                        .map_err(|e| fail(e.to_string()))?;
                }
                Ok(true)
            })
        }
        Step::AddEdge {
            kind,
            from,
            to,
            label,
        } => {
            let kind: EdgeKind = kind.parse().map_err(|e: DiagramError| fail(e.to_string()))?;
            if !diagram_type.supports_edge(kind) {
                return Err(fail(
                    DiagramError::UnsupportedEdgeKind {
                        kind: kind.to_string(),
                        diagram_type: diagram_type.to_string(),
                    }
                    .to_string(),
                ));
            }
            session.grouped(|session| -> Result<bool, DiagramError> {
                let Some(edge) = session.add_edge(kind, point(*from), point(*to)) else {
                    return Ok(false);
                };
                if let Some(label) = label {
                    let change = (PropertyName::MiddleLabel, label.as_str().into());
                    session
                        .edit_properties(edge.into(), &[change])
                        .map_err(|e| fail(e.to_string()))?;
                }
                Ok(true)
            })
        }
        Step::SelectAt { at, add } => Ok(session.select_at(point(*at), *add).is_some()),
        Step::Lasso { from, to, add } => {
            let rectangle = Rectangle::spanning(point(*from), point(*to));
            session.lasso(rectangle, *add);
            Ok(true)
        }
        Step::SelectAll => {
            session.select_all();
            Ok(true)
        }
        Step::ClearSelection => {
            session.clear_selection();
            Ok(true)
        }
        Step::Remove => Ok(session.remove_selected() > 0),
        Step::Move { dx, dy } => {
            session.move_selected(*dx, *dy);
            Ok(!session.selection().is_empty())
        }
        Step::Drag { from, path } => {
            if !session.begin_drag(point(*from)) {
                return Ok(false);
            }
            for waypoint in path {
                session.drag_to(point(*waypoint));
            }
            let release = path.last().copied().unwrap_or(*from);
            Ok(session.end_drag(point(release)))
        }
        Step::SetProperty { at, name, value } => {
            let Some(element) = session.element_at(point(*at)) else {
                return Err(fail(format!("no element at ({}, {})", at[0], at[1])));
            };
            let name: PropertyName = name.parse().map_err(|e: DiagramError| fail(e.to_string()))?;
            let value = match value {
                serde_json::Value::String(text) => PropertyValue::Text(text.clone()),
                serde_json::Value::Bool(flag) => PropertyValue::Bool(*flag),
                other => return Err(fail(format!("unsupported property value {}", other))),
            };
            session
                .edit_properties(element, &[(name, value)])
                .map_err(|e| fail(e.to_string()))?;
            Ok(true)
        }
        Step::Copy => {
            session.copy();
            Ok(!session.clipboard().is_empty())
        }
        Step::Cut => Ok(session.cut() > 0),
        Step::Paste => Ok(session.paste()),
        Step::Undo => {
            let possible = session.can_undo();
            session.undo();
            Ok(possible)
        }
        Step::Redo => {
            let possible = session.can_redo();
            session.redo();
            Ok(possible)
        }
        Step::Expect {
            nodes,
            edges,
            selected,
        } => {
            let actual = [
                ("nodes", *nodes, session.diagram().node_count()),
                ("edges", *edges, session.diagram().edge_count()),
                ("selected", *selected, session.selection().len()),
            ];
            for (what, expected, found) in actual {
                if let Some(expected) = expected {
                    if expected != found {
                        warn!(step = number, what, expected, found, "Expectation failed");
                        let message = format!("expected {} {}, found {}", expected, what, found);
                        return Err(fail(message));
                    }
                }
            }
            Ok(true)
        }
    }
}
