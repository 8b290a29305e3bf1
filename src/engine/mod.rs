//! Boundary to the native NED/MSG parser.
//!
//! The native engine produces a [`RawTree`] and reports problems into a
//! [`RawErrorStore`] keyed by node identity. This module owns those native
//! data structures, the [`NedEngine`] trait a parser implements, and the
//! structural [`DtdValidator`] that every tree passes before conversion.

mod dtd;
mod errors;
mod raw_tree;

use std::path::Path;

pub use dtd::{DtdValidator, repair_tree};
pub use errors::{RawErrorStore, RawMessage, RawSeverity};
pub use raw_tree::{RawNodeId, RawTree};

/// Input handed to the native parser.
#[derive(Debug, Clone, Copy)]
pub enum NedSource<'a> {
    Text(&'a str),
    File(&'a Path),
}

/// Parser settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Build expression subtrees instead of keeping expressions as text.
    pub parse_expressions: bool,
    /// Drop invalid subtrees from a tree that came with parse errors.
    pub repair: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            parse_expressions: false,
            repair: true,
        }
    }
}

/// A native parser.
///
/// Implementations are not required to be reentrant; callers go through the
/// pipeline in [`crate::bridge`], which serializes access.
pub trait NedEngine {
    /// Parse NED source. `None` means the parser produced no tree at all.
    fn parse_ned(
        &mut self,
        source: NedSource<'_>,
        display_name: &str,
        options: &ParseOptions,
        errors: &mut RawErrorStore,
    ) -> Option<RawTree>;

    /// Parse MSG source.
    fn parse_msg(
        &mut self,
        source: NedSource<'_>,
        display_name: &str,
        options: &ParseOptions,
        errors: &mut RawErrorStore,
    ) -> Option<RawTree>;

    /// Grammar-level checks beyond the DTD.
    fn validate_syntax(&mut self, _tree: &RawTree, _errors: &mut RawErrorStore) {}

    /// Take back a tree handed out by `parse_ned`/`parse_msg`.
    fn release(&mut self, tree: RawTree) {
        drop(tree);
    }
}

#[cfg(test)]
mod tests;
