//! A stand-in native engine that reads an indented outline of elements.
//!
//! ```text
//! ned-file filename=demo/net.ned
//!   package name=demo
//!   simple-module name=Node
//!     gates
//!       gate name=in type=input
//! ```
//!
//! Each line is a tag name followed by `attribute=value` pairs (values
//! without spaces), indented two spaces per level. A line that cannot be
//! read is a parse error: the engine reports it and produces no tree. An
//! attribute outside the tag's schema is reported on its node and the node
//! is kept.

use std::path::Path;

use ned::Tag;
use ned::engine::{NedEngine, NedSource, ParseOptions, RawErrorStore, RawNodeId, RawSeverity, RawTree};

#[derive(Debug, Default)]
pub struct OutlineEngine {
    /// Trees handed back through `release`.
    pub released: usize,
    /// Extra warning reported by `validate_syntax` on the root, if set.
    pub syntax_warning: Option<&'static str>,
}

impl OutlineEngine {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self, source: NedSource<'_>, display_name: &str, errors: &mut RawErrorStore) -> Option<String> {
        match source {
            NedSource::Text(text) => Some(text.to_string()),
            NedSource::File(path) => read_file(path, display_name, errors),
        }
    }
}

fn read_file(path: &Path, display_name: &str, errors: &mut RawErrorStore) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(text) => Some(text),
        Err(err) => {
            errors.add(None, display_name, RawSeverity::Error, format!("cannot read file: {err}"));
            None
        }
    }
}

fn parse_outline(
    text: &str,
    display_name: &str,
    root_tag: Tag,
    errors: &mut RawErrorStore,
) -> Option<RawTree> {
    let mut tree: Option<RawTree> = None;
    let mut open: Vec<RawNodeId> = Vec::new();

    for (index, line) in text.lines().enumerate() {
        let content = line.trim_start();
        if content.is_empty() || content.starts_with("//") {
            continue;
        }
        let location = format!("{}:{}", display_name, index + 1);
        let indent = line.len() - content.len();
        let mut tokens = content.split_whitespace();
        let name = tokens.next()?;

        let Some(tag) = Tag::from_name(name) else {
            errors.add(None, location, RawSeverity::Error, format!("syntax error: unknown element '{name}'"));
            return None;
        };
        if indent % 2 != 0 {
            errors.add(None, location, RawSeverity::Error, "syntax error: bad indentation");
            return None;
        }
        let depth = indent / 2;

        let node = match tree.as_mut() {
            None if depth == 0 && tag == root_tag => {
                let created = RawTree::new(tag.code());
                let root = created.root();
                tree = Some(created);
                root
            }
            None => {
                errors.add(
                    None,
                    location,
                    RawSeverity::Error,
                    format!("syntax error: expected <{root_tag}> first"),
                );
                return None;
            }
            Some(tree) => {
                if depth == 0 || depth > open.len() {
                    errors.add(None, location, RawSeverity::Error, "syntax error: bad indentation");
                    return None;
                }
                open.truncate(depth);
                let parent = *open.last()?;
                tree.append_child(parent, tag.code())
            }
        };
        open.push(node);

        let tree = tree.as_mut()?;
        tree.set_source_location(node, location.clone());
        for token in tokens {
            let (attribute, value) = token.split_once('=').unwrap_or((token, ""));
            if !tree.set_attribute_by_name(node, attribute, value) {
                errors.add(
                    Some(node),
                    location.clone(),
                    RawSeverity::Warning,
                    format!("unknown attribute '{attribute}' ignored"),
                );
            }
        }
    }

    if tree.is_none() {
        errors.add(None, display_name, RawSeverity::Error, "syntax error: empty input");
    }
    tree
}

impl NedEngine for OutlineEngine {
    fn parse_ned(
        &mut self,
        source: NedSource<'_>,
        display_name: &str,
        _options: &ParseOptions,
        errors: &mut RawErrorStore,
    ) -> Option<RawTree> {
        let text = self.read(source, display_name, errors)?;
        parse_outline(&text, display_name, Tag::NedFile, errors)
    }

    fn parse_msg(
        &mut self,
        source: NedSource<'_>,
        display_name: &str,
        _options: &ParseOptions,
        errors: &mut RawErrorStore,
    ) -> Option<RawTree> {
        let text = self.read(source, display_name, errors)?;
        parse_outline(&text, display_name, Tag::MsgFile, errors)
    }

    fn validate_syntax(&mut self, tree: &RawTree, errors: &mut RawErrorStore) {
        if let Some(text) = self.syntax_warning {
            errors.add(
                Some(tree.root()),
                tree.source_location(tree.root()),
                RawSeverity::Warning,
                text,
            );
        }
    }

    fn release(&mut self, tree: RawTree) {
        self.released += 1;
        drop(tree);
    }
}
