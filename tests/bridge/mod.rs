//! Native tree conversion and parse pipeline tests.

pub mod tests_pipeline;
