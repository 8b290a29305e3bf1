//! # Semantic Validation
//!
//! Checks a structurally valid NED tree for problems the grammar cannot see:
//! unresolved or mistyped type references, undefined or redeclared
//! parameters and gates, and connections whose endpoints do not match the
//! declared gates.
//!
//! Type lookups go through the [`TypeResolver`] trait; [`TypeIndex`] is the
//! in-memory implementation used for single projects and tests. Problems are
//! reported to a [`DiagnosticSink`].

pub mod diagnostics;
pub mod error;
pub mod hooks;
pub mod imports;
pub mod options;
pub mod resolver;
pub mod scope;
pub mod type_index;
pub mod type_info;
pub mod validator;

pub use diagnostics::{Diagnostic, DiagnosticCollector, DiagnosticSink, Severity};
pub use error::InternalFault;
pub use hooks::{NoHooks, SemanticHooks};
pub use imports::{import_to_regex, imports_name, is_wildcard_import};
pub use options::ValidatorConfig;
pub use resolver::{LookupContext, TypeResolver};
pub use scope::{Frame, ScopeState};
pub use type_index::TypeIndex;
pub use type_info::{Member, TypeInfo};
pub use validator::{Endpoint, NedValidator, check_file, validate_tree};

#[cfg(test)]
mod tests;
