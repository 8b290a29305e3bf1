//! Tree bridge between the native engine and the element model.
//!
//! [`to_element`] and [`from_element`] are plain structural copies (tag,
//! positional attributes, source location, children in order). The parse
//! functions wrap a native parse into a complete run that always produces a
//! tree and carries every native message over to the diagnostic sink.

mod convert;
mod error;
mod pipeline;

pub use convert::{from_element, to_element};
pub use error::BridgeError;
pub use pipeline::{parse_msg_text, parse_ned_file, parse_ned_text};

pub use crate::engine::ParseOptions;
