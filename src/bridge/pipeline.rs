//! Parse pipeline: native parse, repair, DTD check, syntax check, conversion.
//!
//! The native engine is not reentrant, so every run holds a process-wide
//! lock from parse to conversion. The native tree is handed back to the
//! engine exactly once, whichever way the run ends.

use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;

use super::convert::{deliver, to_element};
use super::error::BridgeError;
use crate::engine::{
    DtdValidator, NedEngine, NedSource, ParseOptions, RawErrorStore, RawTree, repair_tree,
};
use crate::semantic::DiagnosticSink;
use crate::syntax::{Element, Tag};

static PARSE_LOCK: Mutex<()> = parking_lot::const_mutex(());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileKind {
    Ned,
    Msg,
}

impl FileKind {
    fn root_tag(self) -> Tag {
        match self {
            FileKind::Ned => Tag::NedFile,
            FileKind::Msg => Tag::MsgFile,
        }
    }
}

/// Gives the native tree back to the engine when dropped.
struct TreeGuard<'e, E: NedEngine + ?Sized> {
    engine: &'e mut E,
    tree: Option<RawTree>,
}

impl<E: NedEngine + ?Sized> Drop for TreeGuard<'_, E> {
    fn drop(&mut self) {
        if let Some(tree) = self.tree.take() {
            self.engine.release(tree);
        }
    }
}

/// Parse NED source text into an element tree.
///
/// Always yields a tree for well-behaved engines: when nothing could be
/// parsed, the result is an empty `ned-file` element named `display_name`.
pub fn parse_ned_text<E, S>(
    engine: &mut E,
    text: &str,
    display_name: &str,
    options: &ParseOptions,
    sink: &mut S,
) -> Result<Arc<Element>, BridgeError>
where
    E: NedEngine + ?Sized,
    S: DiagnosticSink + ?Sized,
{
    run(
        engine,
        NedSource::Text(text),
        display_name,
        FileKind::Ned,
        options,
        sink,
    )
}

/// Parse a NED file into an element tree; see [`parse_ned_text`].
pub fn parse_ned_file<E, S>(
    engine: &mut E,
    path: &Path,
    display_name: &str,
    options: &ParseOptions,
    sink: &mut S,
) -> Result<Arc<Element>, BridgeError>
where
    E: NedEngine + ?Sized,
    S: DiagnosticSink + ?Sized,
{
    run(
        engine,
        NedSource::File(path),
        display_name,
        FileKind::Ned,
        options,
        sink,
    )
}

/// Parse MSG source text. The root's `filename` attribute is set to `filename`.
pub fn parse_msg_text<E, S>(
    engine: &mut E,
    text: &str,
    filename: &str,
    options: &ParseOptions,
    sink: &mut S,
) -> Result<Arc<Element>, BridgeError>
where
    E: NedEngine + ?Sized,
    S: DiagnosticSink + ?Sized,
{
    run(
        engine,
        NedSource::Text(text),
        filename,
        FileKind::Msg,
        options,
        sink,
    )
}

fn run<E, S>(
    engine: &mut E,
    source: NedSource<'_>,
    display_name: &str,
    kind: FileKind,
    options: &ParseOptions,
    sink: &mut S,
) -> Result<Arc<Element>, BridgeError>
where
    E: NedEngine + ?Sized,
    S: DiagnosticSink + ?Sized,
{
    let _lock = PARSE_LOCK.lock();
    tracing::debug!(file = display_name, ?kind, "parsing started");

    let mut errors = RawErrorStore::new();
    let parsed = match kind {
        FileKind::Ned => engine.parse_ned(source, display_name, options, &mut errors),
        FileKind::Msg => engine.parse_msg(source, display_name, options, &mut errors),
    };

    let Some(parsed) = parsed else {
        tracing::debug!(file = display_name, "no tree produced, using empty file element");
        let root = Element::build(kind.root_tag())
            .attr("filename", display_name)
            .finish();
        let before = sink.problem_count();
        for message in errors.messages() {
            deliver(sink, &root, message)?;
        }
        check_delivered(&errors, sink.problem_count() - before)?;
        return Ok(root);
    };

    let mut guard = TreeGuard { engine, tree: None };
    let tree = guard.tree.insert(parsed);
    let root = tree.root();

    if kind == FileKind::Msg && tree.tag(root) == Some(Tag::MsgFile) {
        tree.set_attribute_by_name(root, "filename", display_name);
    }

    if !errors.is_empty() && options.repair {
        let removed = repair_tree(tree);
        tracing::debug!(file = display_name, removed, "repaired tree after parse errors");
    }

    let before = errors.len();
    DtdValidator::new().validate(tree, &mut errors);
    dump_messages(&errors);
    if errors.len() != before {
        let first = errors
            .messages()
            .get(before)
            .map(|message| message.text.clone())
            .unwrap_or_default();
        return Err(BridgeError::DtdViolation {
            count: errors.len() - before,
            first,
        });
    }

    guard.engine.validate_syntax(tree, &mut errors);

    let delivered_before = sink.problem_count();
    let element = to_element(tree, &errors, sink)?;
    check_delivered(&errors, sink.problem_count() - delivered_before)?;

    tracing::debug!(
        file = display_name,
        problems = errors.len(),
        "parsing finished"
    );
    Ok(element)
}

fn check_delivered(errors: &RawErrorStore, delivered: usize) -> Result<(), BridgeError> {
    if delivered != errors.len() {
        return Err(BridgeError::LostDiagnostics {
            native: errors.len(),
            delivered,
        });
    }
    Ok(())
}

fn dump_messages(errors: &RawErrorStore) {
    for message in errors.messages() {
        tracing::trace!(
            location = %message.location,
            severity = message.severity_code,
            "{}",
            message.text
        );
    }
}
