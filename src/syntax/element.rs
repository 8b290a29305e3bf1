//! The in-process element tree.
//!
//! Elements are immutable once built and shared through `Arc`, so type
//! metadata and diagnostics can point into trees of other files without
//! copying. Identity is carried by [`ElementId`], which is unique for the
//! lifetime of the process.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use smol_str::SmolStr;

use super::tag::Tag;
use super::values::{GateType, ParamType};
use crate::base::{SourceRegion, line_from_location};

/// Process-unique identity of an [`Element`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElementId(u64);

impl ElementId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One node of the NED/MSG tree.
#[derive(Debug)]
pub struct Element {
    id: ElementId,
    tag: Tag,
    /// Positional values, always exactly `tag.attributes().len()` long.
    attributes: Box<[SmolStr]>,
    children: Vec<Arc<Element>>,
    source_location: Option<Arc<str>>,
    source_region: SourceRegion,
}

impl Element {
    /// Start building an element with all attributes at their defaults.
    pub fn build(tag: Tag) -> ElementBuilder {
        ElementBuilder::new(tag)
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn num_attributes(&self) -> usize {
        self.attributes.len()
    }

    pub fn attribute_at(&self, index: usize) -> Option<&str> {
        self.attributes.get(index).map(SmolStr::as_str)
    }

    /// Value of the named attribute; empty when the tag has no such attribute.
    pub fn attribute(&self, name: &str) -> &str {
        self.tag
            .attribute_index(name)
            .and_then(|index| self.attribute_at(index))
            .unwrap_or("")
    }

    /// `(name, value)` pairs in schema order.
    pub fn attributes(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.tag
            .attributes()
            .iter()
            .zip(self.attributes.iter())
            .map(|(spec, value)| (spec.name, value.as_str()))
    }

    pub fn children(&self) -> &[Arc<Element>] {
        &self.children
    }

    pub fn first_child(&self, tag: Tag) -> Option<&Arc<Element>> {
        self.children.iter().find(|child| child.tag == tag)
    }

    pub fn children_with_tag(&self, tag: Tag) -> impl Iterator<Item = &Arc<Element>> + '_ {
        self.children.iter().filter(move |child| child.tag == tag)
    }

    /// Pre-order traversal of this element and all of its descendants.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    pub fn source_location(&self) -> Option<&str> {
        self.source_location.as_deref()
    }

    pub fn source_region(&self) -> SourceRegion {
        self.source_region
    }

    /// 1-based line used when attaching diagnostics to this element.
    pub fn line(&self) -> u32 {
        if !self.source_region.is_empty() {
            self.source_region.start_line
        } else {
            self.source_location
                .as_deref()
                .map(line_from_location)
                .unwrap_or(1)
        }
    }

    /// Location text for messages that point at this element.
    pub fn describe_location(&self) -> &str {
        self.source_location.as_deref().unwrap_or("<unknown location>")
    }

    /// XML-like dump of the subtree, one element per line. Debugging aid.
    pub fn to_xml_string(&self) -> String {
        let mut out = String::new();
        self.write_xml(&mut out, "");
        out
    }

    fn write_xml(&self, out: &mut String, indent: &str) {
        out.push_str(indent);
        out.push('<');
        out.push_str(self.tag.name());
        for (name, value) in self.attributes() {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            push_escaped(out, value);
            out.push('"');
        }
        if self.children.is_empty() {
            out.push_str("/>\n");
            return;
        }
        out.push_str(">\n");
        let child_indent = format!("{indent}  ");
        for child in &self.children {
            child.write_xml(out, &child_indent);
        }
        out.push_str(indent);
        out.push_str("</");
        out.push_str(self.tag.name());
        out.push_str(">\n");
    }

    // ------------------------------------------------------------------
    // NED accessors
    // ------------------------------------------------------------------

    pub fn name(&self) -> &str {
        self.attribute("name")
    }

    /// Declared gate direction; values outside the enumeration read as `None`.
    pub fn gate_type(&self) -> GateType {
        GateType::parse(self.attribute("type")).unwrap_or_default()
    }

    /// Declared parameter type; values outside the enumeration read as `None`.
    pub fn param_type(&self) -> ParamType {
        ParamType::parse(self.attribute("type")).unwrap_or_default()
    }

    pub fn is_vector(&self) -> bool {
        self.attribute("is-vector") == "true"
    }

    /// Package declared by a file element (empty when there is none).
    pub fn package_name(&self) -> &str {
        self.first_child(Tag::Package)
            .map(|package| package.name())
            .unwrap_or("")
    }
}

fn push_escaped(out: &mut String, value: &str) {
    for c in value.chars() {
        match c {
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '&' => out.push_str("&amp;"),
            _ => out.push(c),
        }
    }
}

/// Pre-order iterator returned by [`Element::descendants`].
pub struct Descendants<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let element = self.stack.pop()?;
        self.stack
            .extend(element.children.iter().rev().map(|child| child.as_ref()));
        Some(element)
    }
}

/// Builder for [`Element`]; the element id is allocated up front.
#[derive(Debug)]
pub struct ElementBuilder {
    id: ElementId,
    tag: Tag,
    attributes: Vec<SmolStr>,
    children: Vec<Arc<Element>>,
    source_location: Option<Arc<str>>,
    source_region: SourceRegion,
}

impl ElementBuilder {
    pub fn new(tag: Tag) -> Self {
        let attributes = tag
            .attributes()
            .iter()
            .map(|spec| SmolStr::new_static(spec.default.unwrap_or("")))
            .collect();
        Self {
            id: ElementId::next(),
            tag,
            attributes,
            children: Vec::new(),
            source_location: None,
            source_region: SourceRegion::default(),
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Set an attribute by name. Names outside the tag's schema are ignored.
    pub fn attr(mut self, name: &str, value: impl Into<SmolStr>) -> Self {
        if !self.set_attribute(name, value) {
            tracing::warn!("<{}> has no attribute '{}', ignored", self.tag, name);
        }
        self
    }

    pub fn set_attribute(&mut self, name: &str, value: impl Into<SmolStr>) -> bool {
        match self.tag.attribute_index(name) {
            Some(index) => self.set_attribute_at(index, value),
            None => false,
        }
    }

    pub fn set_attribute_at(&mut self, index: usize, value: impl Into<SmolStr>) -> bool {
        match self.attributes.get_mut(index) {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    pub fn child(mut self, child: Arc<Element>) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Arc<Element>>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn push_child(&mut self, child: Arc<Element>) {
        self.children.push(child);
    }

    pub fn location(mut self, location: impl Into<Arc<str>>) -> Self {
        self.source_location = Some(location.into());
        self
    }

    pub fn set_location(&mut self, location: Option<Arc<str>>) {
        self.source_location = location;
    }

    pub fn region(mut self, region: SourceRegion) -> Self {
        self.source_region = region;
        self
    }

    pub fn set_region(&mut self, region: SourceRegion) {
        self.source_region = region;
    }

    pub fn finish(self) -> Arc<Element> {
        Arc::new(Element {
            id: self.id,
            tag: self.tag,
            attributes: self.attributes.into_boxed_slice(),
            children: self.children,
            source_location: self.source_location,
            source_region: self.source_region,
        })
    }
}
