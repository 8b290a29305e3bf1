//! Native-side parse tree.
//!
//! Nodes live in a single arena and are addressed by [`RawNodeId`], which is
//! also the identity the native error store keys its messages by. Detached
//! nodes stay in the arena but are no longer reachable from the root.

use crate::base::SourceRegion;
use crate::syntax::Tag;

/// Index of a node inside its [`RawTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RawNodeId(u32);

impl RawNodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
struct RawNode {
    tag_code: u16,
    attributes: Vec<String>,
    source_location: String,
    source_region: SourceRegion,
    parent: Option<RawNodeId>,
    children: Vec<RawNodeId>,
}

impl RawNode {
    fn new(tag_code: u16, parent: Option<RawNodeId>) -> Self {
        let attributes = Tag::from_code(tag_code)
            .map(|tag| {
                tag.attributes()
                    .iter()
                    .map(|spec| spec.default.unwrap_or("").to_string())
                    .collect()
            })
            .unwrap_or_default();
        Self {
            tag_code,
            attributes,
            source_location: String::new(),
            source_region: SourceRegion::default(),
            parent,
            children: Vec::new(),
        }
    }
}

/// Arena-backed tree as produced by the native parser.
#[derive(Debug, Clone)]
pub struct RawTree {
    nodes: Vec<RawNode>,
}

impl RawTree {
    /// Create a tree consisting of a single root node.
    pub fn new(root_tag_code: u16) -> Self {
        Self {
            nodes: vec![RawNode::new(root_tag_code, None)],
        }
    }

    pub fn root(&self) -> RawNodeId {
        RawNodeId(0)
    }

    /// Number of nodes ever allocated, detached ones included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn append_child(&mut self, parent: RawNodeId, tag_code: u16) -> RawNodeId {
        let id = RawNodeId(self.nodes.len() as u32);
        self.nodes.push(RawNode::new(tag_code, Some(parent)));
        self.nodes[parent.index()].children.push(id);
        id
    }

    /// Remove a node (and its subtree) from its parent. The root cannot be detached.
    pub fn detach(&mut self, id: RawNodeId) -> bool {
        let Some(parent) = self.nodes[id.index()].parent.take() else {
            return false;
        };
        self.nodes[parent.index()]
            .children
            .retain(|&child| child != id);
        true
    }

    pub fn tag_code(&self, id: RawNodeId) -> u16 {
        self.nodes[id.index()].tag_code
    }

    pub fn tag(&self, id: RawNodeId) -> Option<Tag> {
        Tag::from_code(self.tag_code(id))
    }

    pub fn tag_name(&self, id: RawNodeId) -> String {
        match self.tag(id) {
            Some(tag) => tag.name().to_string(),
            None => format!("element-{}", self.tag_code(id)),
        }
    }

    pub fn num_attributes(&self, id: RawNodeId) -> usize {
        self.nodes[id.index()].attributes.len()
    }

    pub fn attribute(&self, id: RawNodeId, index: usize) -> &str {
        self.nodes[id.index()]
            .attributes
            .get(index)
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn attribute_name(&self, id: RawNodeId, index: usize) -> Option<&'static str> {
        self.tag(id)
            .and_then(|tag| tag.attributes().get(index))
            .map(|spec| spec.name)
    }

    /// Set a positional attribute; fails when `index` lies outside the node's slots.
    pub fn set_attribute(&mut self, id: RawNodeId, index: usize, value: impl Into<String>) -> bool {
        match self.nodes[id.index()].attributes.get_mut(index) {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    pub fn set_attribute_by_name(
        &mut self,
        id: RawNodeId,
        name: &str,
        value: impl Into<String>,
    ) -> bool {
        match self.tag(id).and_then(|tag| tag.attribute_index(name)) {
            Some(index) => self.set_attribute(id, index, value),
            None => false,
        }
    }

    pub fn source_location(&self, id: RawNodeId) -> &str {
        &self.nodes[id.index()].source_location
    }

    pub fn set_source_location(&mut self, id: RawNodeId, location: impl Into<String>) {
        self.nodes[id.index()].source_location = location.into();
    }

    pub fn source_region(&self, id: RawNodeId) -> SourceRegion {
        self.nodes[id.index()].source_region
    }

    pub fn set_source_region(&mut self, id: RawNodeId, region: SourceRegion) {
        self.nodes[id.index()].source_region = region;
    }

    pub fn parent(&self, id: RawNodeId) -> Option<RawNodeId> {
        self.nodes[id.index()].parent
    }

    pub fn children(&self, id: RawNodeId) -> &[RawNodeId] {
        &self.nodes[id.index()].children
    }

    /// Pre-order list of the nodes reachable from `id`.
    pub fn walk(&self, id: RawNodeId) -> Vec<RawNodeId> {
        let mut order = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            order.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        order
    }

    /// XML-like dump of the subtree under `id`. Debugging aid.
    pub fn to_xml_string(&self, id: RawNodeId) -> String {
        let mut out = String::new();
        self.write_xml(id, &mut out, "");
        out
    }

    fn write_xml(&self, id: RawNodeId, out: &mut String, indent: &str) {
        let tag_name = self.tag_name(id);
        out.push_str(indent);
        out.push('<');
        out.push_str(&tag_name);
        for index in 0..self.num_attributes(id) {
            let name = self.attribute_name(id, index).unwrap_or("?");
            out.push_str(&format!(" {}=\"{}\"", name, self.attribute(id, index)));
        }
        let children = self.children(id);
        if children.is_empty() {
            out.push_str("/>\n");
            return;
        }
        out.push_str(">\n");
        let child_indent = format!("{indent}  ");
        for &child in children {
            self.write_xml(child, out, &child_indent);
        }
        out.push_str(&format!("{indent}</{tag_name}>\n"));
    }
}
