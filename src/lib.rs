//! # ned-base
//!
//! Core library for NED semantic validation and native parse-tree conversion.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! semantic  → Validator, type resolution, diagnostics
//!   ↓
//! bridge    → Native tree ⇄ element tree, parse pipeline
//!   ↓
//! engine    → Native parser seam, raw trees, DTD check and repair
//!   ↓
//! syntax    → Tags, attribute schemas, Element trees
//!   ↓
//! base      → Primitives (SourceRegion, location parsing)
//! ```

// ============================================================================
// MODULES (dependency order: base → syntax → engine → bridge → semantic)
// ============================================================================

/// Foundation types: source regions, location strings
pub mod base;

/// Syntax: element tags, attribute schemas, immutable element trees
pub mod syntax;

/// Native engine seam: raw trees, native error store, DTD validation
pub mod engine;

/// Conversion between native and element trees, parse pipeline
pub mod bridge;

/// Semantic validation of element trees
pub mod semantic;

// Re-export foundation types
pub use base::{SourceRegion, line_from_location};

// Re-export the element model
pub use syntax::{Element, ElementBuilder, ElementId, Tag};

// Re-export the parse pipeline
pub use bridge::{BridgeError, ParseOptions, parse_msg_text, parse_ned_file, parse_ned_text};
pub use engine::{NedEngine, NedSource};

// Re-export validation
pub use semantic::{
    Diagnostic, DiagnosticCollector, DiagnosticSink, InternalFault, NedValidator, Severity,
    TypeIndex, TypeResolver, check_file, validate_tree,
};
