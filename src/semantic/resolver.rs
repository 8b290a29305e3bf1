//! The type resolver seam.
//!
//! The validator never resolves names itself; everything goes through a
//! [`TypeResolver`]. [`TypeIndex`](super::TypeIndex) is the in-memory
//! implementation.

use std::fmt;
use std::sync::Arc;

use smol_str::SmolStr;

use super::type_info::TypeInfo;

/// Where a type name is being looked up from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LookupContext {
    /// Top level of a NED file, identified by its file name.
    File(SmolStr),
    /// Inside the body of a type, identified by the type's qualified name.
    Type(SmolStr),
}

impl fmt::Display for LookupContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupContext::File(name) => write!(f, "file {name}"),
            LookupContext::Type(name) => write!(f, "type {name}"),
        }
    }
}

pub trait TypeResolver {
    /// Resolve a (possibly simple) type name as seen from `context`.
    fn lookup_type(&self, name: &str, context: &LookupContext) -> Option<Arc<TypeInfo>>;

    /// Resolve a fully qualified top-level type name within a project.
    fn lookup_toplevel_type(&self, qualified_name: &str, project: &str) -> Option<Arc<TypeInfo>>;

    /// Package a file is expected to declare, if the file's location implies one.
    fn expected_package_for(&self, file: &str) -> Option<String>;

    /// Qualified names of every type visible in a project.
    fn type_qualified_names(&self, project: &str) -> Vec<SmolStr>;
}
