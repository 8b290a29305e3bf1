#![allow(clippy::unwrap_used)]

use super::*;
use crate::syntax::Tag;

fn module_tree() -> (RawTree, RawNodeId, RawNodeId) {
    let mut tree = RawTree::new(Tag::NedFile.code());
    let root = tree.root();
    tree.set_attribute_by_name(root, "filename", "net.ned");
    let module = tree.append_child(root, Tag::SimpleModule.code());
    tree.set_attribute_by_name(module, "name", "Node");
    tree.set_source_location(module, "net.ned:2");
    let gates = tree.append_child(module, Tag::Gates.code());
    let gate = tree.append_child(gates, Tag::Gate.code());
    tree.set_attribute_by_name(gate, "name", "out");
    tree.set_attribute_by_name(gate, "type", "output");
    (tree, module, gate)
}

#[test]
fn test_new_nodes_carry_schema_defaults() {
    let (tree, _, gate) = module_tree();
    assert_eq!(tree.num_attributes(gate), Tag::Gate.attributes().len());
    assert_eq!(tree.attribute(gate, 2), "false");
    assert_eq!(tree.attribute_name(gate, 2), Some("is-vector"));
    assert_eq!(tree.attribute(gate, 99), "");
}

#[test]
fn test_set_attribute_out_of_range() {
    let (mut tree, module, _) = module_tree();
    assert!(!tree.set_attribute(module, 5, "x"));
    assert!(!tree.set_attribute_by_name(module, "no-such", "x"));
}

#[test]
fn test_walk_is_pre_order() {
    let (tree, module, gate) = module_tree();
    let order = tree.walk(tree.root());
    assert_eq!(order.len(), 4);
    assert_eq!(order[0], tree.root());
    assert_eq!(order[1], module);
    assert_eq!(order[3], gate);
}

#[test]
fn test_detach() {
    let (mut tree, module, _) = module_tree();
    let root = tree.root();
    assert!(!tree.detach(root));
    assert!(tree.detach(module));
    assert!(tree.children(root).is_empty());
    assert_eq!(tree.parent(module), None);
    assert!(!tree.detach(module));
}

#[test]
fn test_raw_xml_dump() {
    let mut tree = RawTree::new(Tag::Gates.code());
    let gate = tree.append_child(tree.root(), Tag::Gate.code());
    tree.set_attribute_by_name(gate, "name", "in");
    assert_eq!(
        tree.to_xml_string(tree.root()),
        "<gates>\n  <gate name=\"in\" type=\"\" is-vector=\"false\" vector-size=\"\"/>\n</gates>\n"
    );
}

#[test]
fn test_error_store_queries() {
    let (tree, module, _) = module_tree();
    let mut errors = RawErrorStore::new();
    assert!(errors.is_empty());
    errors.add(Some(module), "net.ned:2", RawSeverity::Warning, "w");
    errors.add(None, "net.ned", RawSeverity::Info, "i");
    assert!(!errors.contains_error());
    errors.add_with_code(Some(tree.root()), "", 1, "e");
    assert!(errors.contains_error());
    assert_eq!(errors.len(), 3);
    assert_eq!(errors.messages_for(None).count(), 1);
    assert_eq!(errors.messages_for(Some(module)).next().unwrap().text, "w");
    assert_eq!(RawSeverity::from_code(7), None);
}

#[test]
fn test_dtd_accepts_valid_tree() {
    let (tree, _, _) = module_tree();
    let mut errors = RawErrorStore::new();
    assert_eq!(DtdValidator::new().validate(&tree, &mut errors), 0);
}

#[test]
fn test_dtd_reports_missing_required_attribute() {
    let mut tree = RawTree::new(Tag::NedFile.code());
    let module = tree.append_child(tree.root(), Tag::SimpleModule.code());
    tree.set_source_location(module, "x.ned:4");
    let mut errors = RawErrorStore::new();

    assert_eq!(DtdValidator::new().validate(&tree, &mut errors), 1);
    let message = &errors.messages()[0];
    assert_eq!(message.context, Some(module));
    assert_eq!(message.location, "x.ned:4");
    assert_eq!(
        message.text,
        "required attribute 'name' missing from <simple-module>"
    );
}

#[test]
fn test_dtd_reports_bad_enum_value() {
    let (mut tree, _, gate) = module_tree();
    tree.set_attribute_by_name(gate, "type", "sideways");
    let mut errors = RawErrorStore::new();

    assert_eq!(DtdValidator::new().validate(&tree, &mut errors), 1);
    assert_eq!(
        errors.messages()[0].text,
        "invalid value 'sideways' for attribute 'type' of <gate>"
    );
}

#[test]
fn test_dtd_reports_misplaced_and_duplicate_children() {
    let (mut tree, module, _) = module_tree();
    let submodules = tree.append_child(module, Tag::Submodules.code());
    let second_gates = tree.append_child(module, Tag::Gates.code());
    let mut errors = RawErrorStore::new();

    assert_eq!(DtdValidator::new().validate(&tree, &mut errors), 2);
    assert_eq!(errors.messages()[0].context, Some(submodules));
    assert_eq!(
        errors.messages()[0].text,
        "element <submodules> not allowed under <simple-module>"
    );
    assert_eq!(errors.messages()[1].context, Some(second_gates));
}

#[test]
fn test_dtd_reports_unknown_code() {
    let mut tree = RawTree::new(Tag::NedFile.code());
    let bogus = tree.append_child(tree.root(), 999);
    let mut errors = RawErrorStore::new();

    assert_eq!(DtdValidator::new().validate(&tree, &mut errors), 1);
    assert_eq!(errors.messages()[0].context, Some(bogus));
    assert_eq!(errors.messages()[0].text, "unknown element code 999");
}

#[test]
fn test_repair_detaches_failing_subtrees() {
    let (mut tree, module, gate) = module_tree();
    tree.set_attribute_by_name(gate, "name", "");
    let stray = tree.append_child(module, Tag::Connections.code());

    assert_eq!(repair_tree(&mut tree), 2);
    let mut errors = RawErrorStore::new();
    assert_eq!(DtdValidator::new().validate(&tree, &mut errors), 0);
    assert!(!tree.walk(tree.root()).contains(&stray));
    assert!(!tree.walk(tree.root()).contains(&gate));
}

#[test]
fn test_repair_leaves_failing_root() {
    let mut tree = RawTree::new(Tag::Package.code());
    assert_eq!(repair_tree(&mut tree), 0);
}

#[test]
fn test_parse_options_default() {
    let options = ParseOptions::default();
    assert!(!options.parse_expressions);
    assert!(options.repair);
}
