//! End-to-end tests running the diagrammer binary on script files

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::tempdir;

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_diagrammer"))
        .args(args)
        .env("DIAGRAMMER_LOG_LEVEL", "off")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run diagrammer")
}

fn write_script(dir: &Path, content: &str) -> String {
    let path = dir.join("session.json");
    fs::write(&path, content).unwrap();
    path.to_string_lossy().into_owned()
}

const SEQUENCE_SCRIPT: &str = r#"{
    "diagram_type": "sequence",
    "steps": [
        { "op": "add_node", "kind": "lifeline", "at": [0, 0], "name": "client" },
        { "op": "add_node", "kind": "lifeline", "at": [200, 0], "name": "server" },
        { "op": "add_node", "kind": "call", "at": [30, 80] },
        { "op": "add_edge", "kind": "call", "from": [40, 90], "to": [240, 90], "label": "fetch" },
        { "op": "add_edge", "kind": "return", "from": [240, 115], "to": [40, 115] },
        { "op": "expect", "nodes": 4, "edges": 2 }
    ]
}"#;

#[test]
fn test_replay_prints_text_dump() {
    let dir = tempdir().unwrap();
    let script = write_script(dir.path(), SEQUENCE_SCRIPT);

    let output = run(&["replay", "--input", &script, "--color", "never"]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();

    assert_eq!(lines[0], "sequence diagram: 4 nodes, 2 edges");
    assert!(lines[1].starts_with("n1 lifeline \"client\""));
    assert!(lines[2].starts_with("  n3 call"));
    assert!(stdout.contains("\"fetch\""));
    assert!(!stdout.contains("\x1b["));
}

#[test]
fn test_replay_json_output() {
    let dir = tempdir().unwrap();
    let script = write_script(dir.path(), SEQUENCE_SCRIPT);

    let output = run(&["replay", "--input", &script, "--json"]);
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();

    assert_eq!(value["diagram_type"], "sequence");
    assert_eq!(value["nodes"].as_array().unwrap().len(), 4);
    let caller = &value["nodes"][1];
    assert_eq!(caller["kind"], "call");
    assert_eq!(caller["y"], 80);
    assert_eq!(caller["height"], 70);
    assert_eq!(value["edges"][0]["label"], "fetch");
    assert_eq!(value["can_undo"], true);
}

#[test]
fn test_replay_writes_output_file() {
    let dir = tempdir().unwrap();
    let script = write_script(
        dir.path(),
        r#"{ "diagram_type": "use-case", "steps": [
            { "op": "add_node", "kind": "actor", "at": [10, 10] },
            { "op": "add_node", "kind": "use-case", "at": [200, 10] },
            { "op": "add_edge", "kind": "use-case-association", "from": [20, 20], "to": [210, 20] },
            { "op": "undo" },
            { "op": "redo" },
            { "op": "redo" }
        ] }"#,
    );
    let out = dir.path().join("dump.txt");
    let out_arg = out.to_string_lossy().into_owned();

    let output = run(&["replay", "-i", &script, "-o", &out_arg]);
    assert!(output.status.success());
    let written = fs::read_to_string(&out).unwrap();
    assert!(written.starts_with("usecase diagram: 2 nodes, 1 edges"));
    assert!(written.contains("rejected steps: 6"));
}

#[test]
fn test_replay_fails_on_bad_step() {
    let dir = tempdir().unwrap();
    let script = write_script(
        dir.path(),
        r#"{ "diagram_type": "class", "steps": [
            { "op": "add_node", "kind": "class", "at": [10, 10] },
            { "op": "add_node", "kind": "blob", "at": [10, 10] }
        ] }"#,
    );

    let output = run(&["replay", "--input", &script]);
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Script error at step 2"));
    assert!(stderr.contains("Unknown node kind: blob"));
}

#[test]
fn test_types_lists_every_diagram_type() {
    let output = run(&["types", "--json"]);
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["total"], 5);
    let names: Vec<&str> = value["supported_types"]
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["name"].as_str().unwrap())
        .collect();
    assert!(names.contains(&"sequence"));
    assert!(names.contains(&"usecase"));
}
