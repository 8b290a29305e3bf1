//! Structural copies between [`RawTree`] and [`Element`].

use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::error::BridgeError;
use crate::base::line_from_location;
use crate::engine::{RawErrorStore, RawMessage, RawNodeId, RawTree};
use crate::semantic::{DiagnosticSink, Severity};
use crate::syntax::{Element, ElementBuilder, Tag};

/// Convert a native tree into an element tree, moving the native messages
/// onto the converted nodes.
///
/// Messages are delivered in pre-order of their context node. Messages
/// without a context node, or whose context is no longer part of the tree,
/// are attached to the root afterwards.
pub fn to_element<S>(
    tree: &RawTree,
    errors: &RawErrorStore,
    sink: &mut S,
) -> Result<Arc<Element>, BridgeError>
where
    S: DiagnosticSink + ?Sized,
{
    let mut converted = FxHashMap::default();
    let root = convert_node(tree, tree.root(), &mut converted)?;

    for id in tree.walk(tree.root()) {
        let Some(element) = converted.get(&id) else {
            continue;
        };
        for message in errors.messages_for(Some(id)) {
            deliver(sink, element, message)?;
        }
    }

    for message in errors.messages() {
        let attached = message
            .context
            .is_some_and(|id| converted.contains_key(&id));
        if !attached {
            deliver(sink, &root, message)?;
        }
    }

    Ok(root)
}

fn convert_node(
    tree: &RawTree,
    id: RawNodeId,
    converted: &mut FxHashMap<RawNodeId, Arc<Element>>,
) -> Result<Arc<Element>, BridgeError> {
    let code = tree.tag_code(id);
    let tag = Tag::from_code(code).ok_or(BridgeError::UnknownTag { code })?;

    let mut builder = ElementBuilder::new(tag);
    for index in 0..tree.num_attributes(id) {
        builder.set_attribute_at(index, tree.attribute(id, index));
    }
    let location = tree.source_location(id);
    if !location.is_empty() {
        builder.set_location(Some(Arc::from(location)));
    }
    builder.set_region(tree.source_region(id));

    for &child in tree.children(id) {
        builder.push_child(convert_node(tree, child, converted)?);
    }

    let element = builder.finish();
    converted.insert(id, Arc::clone(&element));
    Ok(element)
}

pub(super) fn deliver<S>(
    sink: &mut S,
    element: &Element,
    message: &RawMessage,
) -> Result<(), BridgeError>
where
    S: DiagnosticSink + ?Sized,
{
    let severity = Severity::from_raw_code(message.severity_code)
        .ok_or_else(|| BridgeError::unknown_severity(message.severity_code, &message.text))?;
    sink.add(
        severity,
        Some(element),
        line_from_location(&message.location),
        message.text.clone(),
    );
    Ok(())
}

/// Convert an element tree back into a native tree.
///
/// Every attribute slot is written, so an empty value stays an empty
/// string rather than becoming a missing attribute.
pub fn from_element(element: &Element) -> RawTree {
    let mut tree = RawTree::new(element.tag().code());
    let root = tree.root();
    copy_into(element, &mut tree, root);
    tree
}

fn copy_into(element: &Element, tree: &mut RawTree, id: RawNodeId) {
    for (index, (_, value)) in element.attributes().enumerate() {
        tree.set_attribute(id, index, value);
    }
    tree.set_source_location(id, element.source_location().unwrap_or(""));
    tree.set_source_region(id, element.source_region());
    for child in element.children() {
        let child_id = tree.append_child(id, child.tag().code());
        copy_into(child, tree, child_id);
    }
}
