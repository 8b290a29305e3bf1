//! Problem reporting for parsing and validation.
//!
//! Every user-facing problem ends up in a [`DiagnosticSink`]. The sink is the
//! only channel through which the bridge and the validator report; neither
//! ever fails because of a problem in the input.

use std::fmt;
use std::sync::Arc;

use crate::syntax::{Element, ElementId, Tag};

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    /// Map a native engine severity code (1 = error, 2 = warning, 3 = info).
    pub fn from_raw_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Severity::Error),
            2 => Some(Severity::Warning),
            3 => Some(Severity::Info),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A problem attached to an element (or to nothing in particular).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Diagnostic {
    pub severity: Severity,
    /// Element the problem is attached to.
    pub element: Option<ElementId>,
    /// Tag of that element, kept for reporting without the tree at hand.
    pub tag: Option<Tag>,
    /// Source location of that element, if it had one.
    pub location: Option<Arc<str>>,
    /// 1-based line.
    pub line: u32,
    pub message: Arc<str>,
}

impl Diagnostic {
    pub fn new(
        severity: Severity,
        element: Option<&Element>,
        line: u32,
        message: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            severity,
            element: element.map(Element::id),
            tag: element.map(Element::tag),
            location: element.and_then(Element::source_location).map(Arc::from),
            line,
            message: message.into(),
        }
    }

    /// Create an error diagnostic on an element, at the element's line.
    pub fn error(element: &Element, message: impl Into<Arc<str>>) -> Self {
        Self::new(Severity::Error, Some(element), element.line(), message)
    }

    /// Create a warning diagnostic on an element, at the element's line.
    pub fn warning(element: &Element, message: impl Into<Arc<str>>) -> Self {
        Self::new(Severity::Warning, Some(element), element.line(), message)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(location) => write!(f, "{}: {}: {}", location, self.severity, self.message),
            None => write!(f, "line {}: {}: {}", self.line, self.severity, self.message),
        }
    }
}

// ============================================================================
// DIAGNOSTIC SINK
// ============================================================================

/// Receiver of diagnostics.
pub trait DiagnosticSink {
    /// Record a problem. `element == None` means the problem has no specific
    /// element; callers that own a tree attach such problems to its root.
    fn add(&mut self, severity: Severity, element: Option<&Element>, line: u32, message: String);

    /// Number of problems recorded so far.
    fn problem_count(&self) -> usize;

    fn add_error(&mut self, element: &Element, message: String) {
        self.add(Severity::Error, Some(element), element.line(), message);
    }

    fn add_warning(&mut self, element: &Element, message: String) {
        self.add(Severity::Warning, Some(element), element.line(), message);
    }
}

// ============================================================================
// DIAGNOSTIC COLLECTOR
// ============================================================================

/// Collects diagnostics in the order they are reported.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a prepared diagnostic.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Get all diagnostics.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Diagnostics attached to one element.
    pub fn diagnostics_for(&self, element: ElementId) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.element == Some(element))
            .collect()
    }

    /// Get the number of errors.
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }

    /// Get the number of warnings.
    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    /// Check if there are any errors.
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Messages only, in report order. Handy for assertions and logs.
    pub fn messages(&self) -> Vec<&str> {
        self.diagnostics.iter().map(|d| d.message.as_ref()).collect()
    }

    /// Take all diagnostics, leaving the collector empty.
    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Clear all diagnostics.
    pub fn clear(&mut self) {
        self.diagnostics.clear();
    }
}

impl DiagnosticSink for DiagnosticCollector {
    fn add(&mut self, severity: Severity, element: Option<&Element>, line: u32, message: String) {
        self.push(Diagnostic::new(severity, element, line, message));
    }

    fn problem_count(&self) -> usize {
        self.diagnostics.len()
    }
}
