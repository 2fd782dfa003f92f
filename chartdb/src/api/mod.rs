//! Wire schema for the chart database REST API.
//!
//! Each API version gets its own submodule; the JSON contract of a
//! published version never changes, so a schema change means a new
//! version module alongside the old one.

pub mod v1;

pub use v1::{ChartHeader, ChartRecord, WireError};
