//! Structural (DTD-level) checks on a [`RawTree`], plus tree repair.
//!
//! Problems are attached to the offending node: attribute problems to the
//! node itself, placement problems to the misplaced child. Repair relies on
//! that: it detaches every node that carries a problem until the tree passes.

use super::errors::{RawErrorStore, RawSeverity};
use super::raw_tree::{RawNodeId, RawTree};
use crate::syntax::{ArrowDirection, GateType, ParamType, Subgate, Tag, parse_bool};

/// Checks a tree against the element/attribute schema of [`Tag`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DtdValidator;

impl DtdValidator {
    pub fn new() -> Self {
        Self
    }

    /// Check the subtree under the root; returns the number of problems added.
    pub fn validate(&self, tree: &RawTree, errors: &mut RawErrorStore) -> usize {
        let before = errors.len();
        for id in tree.walk(tree.root()) {
            self.check_node(tree, id, errors);
        }
        errors.len() - before
    }

    fn check_node(&self, tree: &RawTree, id: RawNodeId, errors: &mut RawErrorStore) {
        let Some(tag) = tree.tag(id) else {
            report(
                tree,
                id,
                errors,
                format!("unknown element code {}", tree.tag_code(id)),
            );
            return;
        };

        let expected = tag.attributes().len();
        if tree.num_attributes(id) != expected {
            report(
                tree,
                id,
                errors,
                format!(
                    "element <{}> has {} attributes, expected {}",
                    tag,
                    tree.num_attributes(id),
                    expected
                ),
            );
            return;
        }

        for (index, spec) in tag.attributes().iter().enumerate() {
            let value = tree.attribute(id, index);
            if spec.default.is_none() && value.is_empty() {
                report(
                    tree,
                    id,
                    errors,
                    format!("required attribute '{}' missing from <{}>", spec.name, tag),
                );
            } else if !is_valid_value(tag, spec.name, value) {
                report(
                    tree,
                    id,
                    errors,
                    format!(
                        "invalid value '{}' for attribute '{}' of <{}>",
                        value, spec.name, tag
                    ),
                );
            }
        }

        let mut seen_singletons: Vec<Tag> = Vec::new();
        for &child in tree.children(id) {
            let Some(child_tag) = tree.tag(child) else {
                continue;
            };
            if !tag.allows_child(child_tag) {
                report(
                    tree,
                    child,
                    errors,
                    format!("element <{}> not allowed under <{}>", child_tag, tag),
                );
            } else if child_tag.is_singleton_child() {
                if seen_singletons.contains(&child_tag) {
                    report(
                        tree,
                        child,
                        errors,
                        format!("<{}> may occur only once under <{}>", child_tag, tag),
                    );
                } else {
                    seen_singletons.push(child_tag);
                }
            }
        }
    }
}

fn report(tree: &RawTree, id: RawNodeId, errors: &mut RawErrorStore, text: String) {
    errors.add(
        Some(id),
        tree.source_location(id),
        RawSeverity::Error,
        text,
    );
}

fn is_valid_value(tag: Tag, name: &str, value: &str) -> bool {
    if name.starts_with("is-") || name.ends_with("-plusplus") || name == "allow-unconnected" {
        return parse_bool(value).is_some();
    }
    if name.ends_with("-subg") {
        return Subgate::parse(value).is_some();
    }
    match (tag, name) {
        (Tag::Gate, "type") => GateType::parse(value).is_some(),
        (Tag::Param, "type") => ParamType::parse(value).is_some(),
        (Tag::Connection, "arrow-direction") => ArrowDirection::parse(value).is_some(),
        _ => true,
    }
}

/// Detach every node that fails the structural check, repeating until the
/// tree passes or only the root is left failing.
///
/// Returns the number of subtrees removed.
pub fn repair_tree(tree: &mut RawTree) -> usize {
    let validator = DtdValidator::new();
    let root = tree.root();
    let mut removed = 0;
    loop {
        let mut scratch = RawErrorStore::new();
        validator.validate(tree, &mut scratch);
        let mut culprits: Vec<RawNodeId> = scratch
            .messages()
            .iter()
            .filter_map(|message| message.context)
            .filter(|&id| id != root)
            .collect();
        culprits.sort();
        culprits.dedup();
        if culprits.is_empty() {
            break;
        }
        for id in culprits {
            if tree.detach(id) {
                tracing::debug!(node = id.index(), "detached invalid <{}>", tree.tag_name(id));
                removed += 1;
            }
        }
    }
    removed
}
