//! Text and JSON views of a diagram after a replay

use serde::Serialize;
use unicode_width::UnicodeWidthStr;

use diagrammer::prelude::*;

use crate::script::ReplayReport;

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub id: String,
    pub kind: String,
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub value: String,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub open_bottom: bool,
}

#[derive(Debug, Serialize)]
pub struct EdgeDump {
    pub id: String,
    pub kind: String,
    pub start: String,
    pub end: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub label: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub signal: bool,
}

/// Everything a replay leaves behind
#[derive(Debug, Serialize)]
pub struct SessionDump {
    pub diagram_type: String,
    pub nodes: Vec<NodeDump>,
    pub edges: Vec<EdgeDump>,
    pub selection: Vec<String>,
    pub can_undo: bool,
    pub can_redo: bool,
    pub steps: usize,
    pub rejected_steps: Vec<usize>,
}

impl SessionDump {
    pub fn capture(session: &EditorSession, report: &ReplayReport) -> Self {
        let diagram = session.diagram();
        let nodes = diagram
            .all_nodes()
            .into_iter()
            .map(|id| {
                let node = diagram.node(id);
                let bounds = node.bounds();
                NodeDump {
                    id: id.to_string(),
                    kind: node.kind().to_string(),
                    name: node.name().to_string(),
                    value: node.value().to_string(),
                    x: bounds.x,
                    y: bounds.y,
                    width: bounds.width,
                    height: bounds.height,
                    parent: diagram.parent(id).map(|parent| parent.to_string()),
                    children: diagram.children(id).iter().map(ToString::to_string).collect(),
                    open_bottom: node.is_open_bottom(),
                }
            })
            .collect();
        let edges = diagram
            .edges()
            .iter()
            .map(|id| {
                let edge = diagram.edge(*id);
                let (start, end) = edge.endpoints();
                EdgeDump {
                    id: id.to_string(),
                    kind: edge.kind().to_string(),
                    start: start.to_string(),
                    end: end.to_string(),
                    label: edge.middle_label().to_string(),
                    signal: edge.is_signal(),
                }
            })
            .collect();
        Self {
            diagram_type: diagram.diagram_type().to_string(),
            nodes,
            edges,
            selection: session.selection().iter().map(|e| e.to_string()).collect(),
            can_undo: session.can_undo(),
            can_redo: session.can_redo(),
            steps: report.steps,
            rejected_steps: report.rejected.clone(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// One line per element, children indented under their parent
    pub fn to_text(&self) -> String {
        let mut lines = vec![format!(
            "{} diagram: {} nodes, {} edges",
            self.diagram_type,
            self.nodes.len(),
            self.edges.len()
        )];

        let label_width = self
            .nodes
            .iter()
            .map(|node| self.depth(node) * 2 + node_label(node).width())
            .max()
            .unwrap_or(0);
        for node in &self.nodes {
            let indent = self.depth(node) * 2;
            let label = node_label(node);
            let padding = label_width - indent - label.width();
            let mut line = format!(
                "{}{}{}  ({}, {}) {}x{}",
                " ".repeat(indent),
                label,
                " ".repeat(padding),
                node.x,
                node.y,
                node.width,
                node.height
            );
            if !node.value.is_empty() {
                line.push_str(&format!(" = \"{}\"", node.value));
            }
            if node.open_bottom {
                line.push_str(" open");
            }
            lines.push(line);
        }

        for edge in &self.edges {
            let mut line = format!("{} {} {} -> {}", edge.id, edge.kind, edge.start, edge.end);
            if !edge.label.is_empty() {
                line.push_str(&format!(" \"{}\"", edge.label));
            }
            if edge.signal {
                line.push_str(" signal");
            }
            lines.push(line);
        }

        if !self.selection.is_empty() {
            lines.push(format!("selected: {}", self.selection.join(", ")));
        }
        if !self.rejected_steps.is_empty() {
            let rejected: Vec<String> =
                self.rejected_steps.iter().map(ToString::to_string).collect();
            lines.push(format!("rejected steps: {}", rejected.join(", ")));
        }
        lines.join("\n")
    }

    fn depth(&self, node: &NodeDump) -> usize {
        let mut depth = 0;
        let mut parent = node.parent.as_deref();
        while let Some(id) = parent {
            depth += 1;
            parent = self
                .nodes
                .iter()
                .find(|candidate| candidate.id == id)
                .and_then(|candidate| candidate.parent.as_deref());
        }
        depth
    }
}

fn node_label(node: &NodeDump) -> String {
    if node.name.is_empty() {
        format!("{} {}", node.id, node.kind)
    } else {
        format!("{} {} \"{}\"", node.id, node.kind, node.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn package_session() -> EditorSession {
        let mut session = EditorSession::new(DiagramType::Class, EditorConfig::default());
        let package = session.add_node(NodeKind::Package, Point::new(0, 0)).unwrap();
        session
            .edit_properties(package.into(), &[(PropertyName::Name, "shop".into())])
            .unwrap();
        let class = session.add_node(NodeKind::Class, Point::new(10, 10)).unwrap();
        session
            .edit_properties(
                class.into(),
                &[(PropertyName::Name, "Bestellung\u{8a02}\u{55ae}".into())],
            )
            .unwrap();
        session
    }

    #[test]
    fn test_text_dump_indents_children() {
        let session = package_session();
        let dump = SessionDump::capture(&session, &ReplayReport::default());
        let text = dump.to_text();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "class diagram: 2 nodes, 0 edges");
        assert!(lines[1].starts_with("n1 package \"shop\""));
        assert!(lines[2].starts_with("  n2 class \"Bestellung"));
        // wide characters still line up the coordinate column
        let column = |line: &str| line[..line.find("  (").unwrap()].width();
        assert_eq!(column(lines[1]), column(lines[2]));
        assert_eq!(lines[3], "selected: n2");
    }

    #[test]
    fn test_json_dump_shape() {
        let session = package_session();
        let report = ReplayReport {
            steps: 4,
            rejected: vec![3],
        };
        let dump = SessionDump::capture(&session, &report);
        let value: serde_json::Value = serde_json::from_str(&dump.to_json().unwrap()).unwrap();

        assert_eq!(value["diagram_type"], "class");
        assert_eq!(value["nodes"][0]["children"][0], "n2");
        assert_eq!(value["nodes"][1]["parent"], "n1");
        assert!(value["nodes"][0].get("parent").is_none());
        assert_eq!(value["rejected_steps"][0], 3);
        assert_eq!(value["can_undo"], true);
    }
}
