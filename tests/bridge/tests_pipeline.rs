//! Parse pipeline driven by the outline engine.

use std::io::Write;

use ned::{
    BridgeError, DiagnosticCollector, ParseOptions, Severity, Tag, parse_msg_text, parse_ned_file,
    parse_ned_text,
};

use crate::helpers::outline_engine::OutlineEngine;
use crate::helpers::outlines::{NODES, parse};

#[test]
fn test_outline_parses_into_elements() {
    let (root, sink) = parse(NODES, "lib/nodes.ned");

    assert!(sink.diagnostics().is_empty(), "{:?}", sink.messages());
    assert_eq!(root.tag(), Tag::NedFile);
    assert_eq!(root.attribute("filename"), "lib/nodes.ned");
    assert_eq!(root.package_name(), "lib");

    let node = root.children_with_tag(Tag::SimpleModule).next().unwrap();
    assert_eq!(node.name(), "Node");
    assert_eq!(node.source_location(), Some("lib/nodes.ned:7"));
    assert_eq!(node.line(), 7);
    let gates: Vec<&str> = node
        .first_child(Tag::Gates)
        .unwrap()
        .children()
        .iter()
        .map(|gate| gate.name())
        .collect();
    assert_eq!(gates, vec!["in", "out", "port"]);
}

#[test]
fn test_tree_is_released_once() {
    let mut engine = OutlineEngine::new();
    let mut sink = DiagnosticCollector::new();
    parse_ned_text(&mut engine, NODES, "lib/nodes.ned", &ParseOptions::default(), &mut sink).unwrap();
    assert_eq!(engine.released, 1);
}

#[test]
fn test_parse_failure_yields_empty_file() {
    let mut engine = OutlineEngine::new();
    let mut sink = DiagnosticCollector::new();
    let text = "ned-file filename=x.ned\n  simple-module name=A\n   gates\n";

    let root = parse_ned_text(&mut engine, text, "x.ned", &ParseOptions::default(), &mut sink).unwrap();

    assert_eq!(root.tag(), Tag::NedFile);
    assert!(root.children().is_empty());
    assert_eq!(root.attribute("filename"), "x.ned");
    assert_eq!(sink.messages(), vec!["syntax error: bad indentation"]);
    assert_eq!(sink.diagnostics()[0].line, 3);
    assert_eq!(sink.diagnostics()[0].element, Some(root.id()));
    assert_eq!(engine.released, 0);
}

#[test]
fn test_unknown_attribute_is_reported_on_its_element() {
    let text = "ned-file filename=x.ned\n  simple-module name=A colour=red\n";
    let (root, sink) = parse(text, "x.ned");

    let module = root.first_child(Tag::SimpleModule).unwrap();
    assert_eq!(sink.messages(), vec!["unknown attribute 'colour' ignored"]);
    assert_eq!(sink.diagnostics()[0].severity, Severity::Warning);
    assert_eq!(sink.diagnostics()[0].element, Some(module.id()));
}

#[test]
fn test_repair_drops_invalid_subtree() {
    // the warning triggers repair; the connection lacks its destination gate
    let text = "\
ned-file filename=x.ned
  compound-module name=Net colour=red
    connections
      connection src-gate=in arrow-direction=l2r
";
    let (root, sink) = parse(text, "x.ned");

    let connections = root
        .first_child(Tag::CompoundModule)
        .unwrap()
        .first_child(Tag::Connections)
        .unwrap();
    assert!(connections.children().is_empty());
    assert_eq!(sink.messages(), vec!["unknown attribute 'colour' ignored"]);
}

#[test]
fn test_invalid_tree_without_parse_errors_is_rejected() {
    let text = "\
ned-file filename=x.ned
  compound-module name=Net
    connections
      connection src-gate=in arrow-direction=l2r
";
    let mut engine = OutlineEngine::new();
    let mut sink = DiagnosticCollector::new();

    let err = parse_ned_text(&mut engine, text, "x.ned", &ParseOptions::default(), &mut sink)
        .unwrap_err();

    assert_eq!(
        err,
        BridgeError::DtdViolation {
            count: 1,
            first: "required attribute 'dest-gate' missing from <connection>".to_string(),
        }
    );
    assert_eq!(engine.released, 1);
}

#[test]
fn test_syntax_check_messages_are_delivered() {
    let mut engine = OutlineEngine {
        syntax_warning: Some("file has no package"),
        ..OutlineEngine::default()
    };
    let mut sink = DiagnosticCollector::new();

    let root = parse_ned_text(
        &mut engine,
        "ned-file filename=x.ned\n",
        "x.ned",
        &ParseOptions::default(),
        &mut sink,
    )
    .unwrap();

    assert_eq!(sink.messages(), vec!["file has no package"]);
    assert_eq!(sink.diagnostics()[0].element, Some(root.id()));
}

#[test]
fn test_msg_file_gets_filename() {
    let mut engine = OutlineEngine::new();
    let mut sink = DiagnosticCollector::new();
    let text = "msg-file\n  message name=Ping\n";

    let root = parse_msg_text(&mut engine, text, "ping.msg", &ParseOptions::default(), &mut sink)
        .unwrap();

    assert_eq!(root.tag(), Tag::MsgFile);
    assert_eq!(root.attribute("filename"), "ping.msg");
    assert_eq!(root.first_child(Tag::Message).unwrap().name(), "Ping");
}

#[test]
fn test_parse_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(NODES.as_bytes()).unwrap();
    let mut engine = OutlineEngine::new();
    let mut sink = DiagnosticCollector::new();

    let root = parse_ned_file(
        &mut engine,
        file.path(),
        "lib/nodes.ned",
        &ParseOptions::default(),
        &mut sink,
    )
    .unwrap();

    assert_eq!(root.package_name(), "lib");
    assert!(sink.diagnostics().is_empty());
}

#[test]
fn test_unreadable_file_yields_empty_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = OutlineEngine::new();
    let mut sink = DiagnosticCollector::new();

    let root = parse_ned_file(
        &mut engine,
        &dir.path().join("missing.ned"),
        "missing.ned",
        &ParseOptions::default(),
        &mut sink,
    )
    .unwrap();

    assert!(root.children().is_empty());
    assert_eq!(sink.error_count(), 1);
    assert!(sink.messages()[0].starts_with("cannot read file: "));
}
