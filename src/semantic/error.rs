//! Internal consistency faults of the validator.
//!
//! A fault means the tree broke an invariant that structural validation is
//! supposed to guarantee. It halts validation; user-level problems never
//! end up here.

use thiserror::Error;

use crate::syntax::Tag;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InternalFault {
    #[error("<{tag}> found outside of a type declaration")]
    OutsideType { tag: Tag },

    #[error("type declaration '{name}' entered while another type is being validated")]
    NestedTypeScope { name: String },

    #[error("submodule '{name}' has neither a type nor a like-type")]
    SubmoduleWithoutType { name: String },

    #[error("connection found outside of a compound module")]
    ConnectionOutsideCompound,

    #[error("default channel type '{name}' cannot be resolved")]
    MissingDefaultChannel { name: String },
}

impl InternalFault {
    pub fn outside_type(tag: Tag) -> Self {
        Self::OutsideType { tag }
    }

    pub fn submodule_without_type(name: impl Into<String>) -> Self {
        Self::SubmoduleWithoutType { name: name.into() }
    }

    pub fn missing_default_channel(name: impl Into<String>) -> Self {
        Self::MissingDefaultChannel { name: name.into() }
    }
}
