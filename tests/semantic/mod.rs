//! Validation of parsed projects.

pub mod tests_end_to_end;
