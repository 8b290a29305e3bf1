//! Foundation types for the NED toolchain.
//!
//! - [`SourceRegion`] - Line/column range of a tree element
//! - [`line_from_location`] - Line extraction from `file:line` location strings
//!
//! This module has NO dependencies on other crate modules.

mod position;

pub use position::{SourceRegion, line_from_location};
