//! The semantic tree: element tags, attribute schema and the immutable
//! [`Element`] tree handed to the validator.

mod element;
mod tag;
mod values;

pub use element::{Descendants, Element, ElementBuilder, ElementId};
pub use tag::{AttrSpec, Tag};
pub use values::{ArrowDirection, GateType, ParamType, Subgate, parse_bool};
