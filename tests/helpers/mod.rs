//! Shared helpers for the integration suite.

pub mod outline_engine;
pub mod outlines;
