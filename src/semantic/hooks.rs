//! Extension points for checks the validator does not perform itself.
//!
//! Each hook returns `Some(message)` to report an error on the element it was
//! given. [`NoHooks`] reports nothing.

use super::type_info::TypeInfo;
use crate::syntax::Element;

pub trait SemanticHooks {
    /// Called for each `interface-name` of a type once the interface resolved.
    fn check_interface_compliance(
        &self,
        _implementor: &Element,
        _interface: &TypeInfo,
    ) -> Option<String> {
        None
    }

    /// Called for each `extends` once the base resolved to the same kind.
    fn check_inheritance_chain(&self, _derived: &Element, _base: &TypeInfo) -> Option<String> {
        None
    }

    /// Called for each `import`, with all import specs of the file.
    fn check_import_clash(&self, _import: &Element, _all_imports: &[&str]) -> Option<String> {
        None
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl SemanticHooks for NoHooks {}
