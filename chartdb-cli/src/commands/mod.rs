//! CLI command implementations.

pub mod charts;
