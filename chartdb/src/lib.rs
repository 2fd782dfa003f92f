//! ChartDB - client for the chart database cloud service.
//!
//! This library publishes, retrieves, updates, deletes, and curates
//! user-created chart definitions (metadata plus an XML payload and an
//! optional preview image) against a versioned REST API. A local disk
//! cache keeps the full chart-header listing cheap to re-read.
//!
//! The main entry point is [`client::ChartClient`]; configuration comes
//! from [`config::ClientConfig`] (or the INI-backed
//! [`config::ConfigFile`]).

pub mod api;
pub mod cache;
pub mod client;
pub mod config;

/// Crate version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
