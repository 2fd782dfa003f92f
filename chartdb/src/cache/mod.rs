//! Local disk caching for chart metadata.

mod header_cache;

pub use header_cache::{HeaderCache, HEADER_CACHE_MAGIC, HEADER_CACHE_VERSION};
