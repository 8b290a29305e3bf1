//! Outline text through the pipeline and the validator.

use std::sync::Arc;

use ned::semantic::{TypeIndex, check_file};
use ned::{DiagnosticCollector, Element, NedValidator, Severity, validate_tree};

use crate::helpers::outlines::{CHANNELS, NETWORK, NODES, parse};

const PROJECT: &str = "app";

fn load(sources: &[(&str, &str)]) -> (TypeIndex, Vec<Arc<Element>>) {
    let mut index = TypeIndex::new();
    let mut roots = Vec::new();
    for (text, name) in sources {
        let (root, sink) = parse(text, name);
        assert!(sink.diagnostics().is_empty(), "{name}: {:?}", sink.messages());
        index.add_file(PROJECT, &root);
        roots.push(root);
    }
    (index, roots)
}

#[test]
fn test_project_validates_cleanly() {
    let (index, roots) = load(&[
        (CHANNELS, "ned/channels.ned"),
        (NODES, "lib/nodes.ned"),
        (NETWORK, "app/net.ned"),
    ]);

    for root in &roots {
        let diagnostics = check_file(root, &index, PROJECT).unwrap();
        assert!(
            diagnostics.is_empty(),
            "{}: {:?}",
            root.attribute("filename"),
            diagnostics
        );
    }
}

#[test]
fn test_problems_point_at_source_lines() {
    let broken = NETWORK
        .replace("dest-module=c dest-gate=in", "dest-module=c dest-gate=port")
        .replace("param name=delay value=1s", "param name=speed value=1");
    let (index, roots) = load(&[
        (CHANNELS, "ned/channels.ned"),
        (NODES, "lib/nodes.ned"),
        (broken.as_str(), "app/net.ned"),
    ]);

    let mut sink = DiagnosticCollector::new();
    validate_tree(&roots[2], &index, PROJECT, &mut sink).unwrap();

    let found: Vec<(u32, &str)> = sink
        .diagnostics()
        .iter()
        .map(|d| (d.line, d.message.as_ref()))
        .collect();
    assert_eq!(
        found,
        vec![
            (10, "'speed': type 'Node' has no such parameter"),
            (
                19,
                "wrong destination gate: submodule 'c' has no gate named 'port'"
            ),
        ]
    );
    assert!(sink.diagnostics().iter().all(|d| d.severity == Severity::Error));
}

#[test]
fn test_missing_library_is_reported_through_imports() {
    let (index, roots) = load(&[(CHANNELS, "ned/channels.ned"), (NETWORK, "app/net.ned")]);

    let mut sink = DiagnosticCollector::new();
    NedValidator::new(&index, PROJECT, &mut sink)
        .validate(&roots[1])
        .unwrap();

    assert_eq!(
        sink.messages(),
        vec![
            "import does not match any NED type: 'lib.*'",
            "'Node': no such module type",
            "cannot assign parameters of a submodule of unknown type",
            "'Node': no such module type",
            "'INode': no such module interface type",
            "wrong destination gate: submodule 'a' has no gate named 'in'",
            "wrong source gate: submodule 'a' has no gate named 'out'",
            "wrong destination gate: submodule 'b' has no gate named 'in'",
            "wrong source gate: submodule 'b' has no gate named 'out'",
            "wrong destination gate: submodule 'c' has no gate named 'in'",
        ]
    );
    assert_eq!(sink.warning_count(), 1);
}
