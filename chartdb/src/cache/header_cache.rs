//! Persisted chart-header listing cache.
//!
//! This module caches the last successful full header listing so that
//! repeated listing requests avoid a network round trip. The file is
//! guarded by a magic marker and a format-version constant; anything
//! that does not carry exactly that prefix is treated as a cache miss,
//! never as a fatal error.
//!
//! # File format
//!
//! ```text
//! magic   u32 LE    HEADER_CACHE_MAGIC
//! version u32 LE    HEADER_CACHE_VERSION
//! payload           bincode Vec<ChartHeader>
//! ```
//!
//! The file is always replaced wholesale via a temp file and an atomic
//! rename, so a concurrent reader never observes a torn write. Bumping
//! `HEADER_CACHE_VERSION` invalidates every existing cache without a
//! migration step.

use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::api::ChartHeader;

/// Magic marker at the start of every header cache file.
pub const HEADER_CACHE_MAGIC: u32 = 987_654_321;

/// Cache format version; bump on any schema change.
pub const HEADER_CACHE_VERSION: u32 = 1;

/// File name of the header cache inside the configured cache directory.
const HEADER_CACHE_FILE: &str = "chart_headers.cache";

/// Disk cache of the last-known-good chart-header listing.
pub struct HeaderCache {
    path: PathBuf,
}

impl HeaderCache {
    /// Create a cache rooted in the given cache directory.
    ///
    /// The directory itself is created lazily on the first write.
    pub fn new(cache_dir: &Path) -> Self {
        Self {
            path: cache_dir.join(HEADER_CACHE_FILE),
        }
    }

    /// Path of the cache file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the cached header listing.
    ///
    /// Returns `None` when the file is absent, unreadable, truncated,
    /// or does not start with the expected magic and version. A read
    /// fault is a cache miss, not an error.
    pub fn read(&self) -> Option<Vec<ChartHeader>> {
        let data = std::fs::read(&self.path).ok()?;
        if data.len() < 8 {
            debug!(path = %self.path.display(), "Header cache too short, treating as miss");
            return None;
        }

        let magic = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
        let version = u32::from_le_bytes([data[4], data[5], data[6], data[7]]);
        if magic != HEADER_CACHE_MAGIC || version != HEADER_CACHE_VERSION {
            debug!(
                magic,
                version,
                path = %self.path.display(),
                "Header cache magic/version mismatch, treating as miss"
            );
            return None;
        }

        match bincode::deserialize(&data[8..]) {
            Ok(headers) => Some(headers),
            Err(e) => {
                debug!(error = %e, "Header cache payload corrupt, treating as miss");
                None
            }
        }
    }

    /// Persist a header listing, replacing any previous cache.
    ///
    /// Writes to a temp file first, then renames for atomicity. A
    /// failure here is a local filesystem fault; callers log it and
    /// carry on with the listing they already hold.
    pub fn write(&self, headers: &[ChartHeader]) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let temp_path = self.path.with_extension("tmp");
        let file = std::fs::File::create(&temp_path)?;
        let mut writer = BufWriter::new(file);

        writer.write_all(&HEADER_CACHE_MAGIC.to_le_bytes())?;
        writer.write_all(&HEADER_CACHE_VERSION.to_le_bytes())?;
        bincode::serialize_into(&mut writer, headers)
            .map_err(|e| io::Error::other(format!("Failed to serialize header cache: {}", e)))?;
        writer
            .into_inner()
            .map_err(|e| io::Error::other(format!("Failed to flush header cache: {}", e)))?;

        std::fs::rename(&temp_path, &self.path)?;

        debug!(count = headers.len(), path = %self.path.display(), "Wrote header cache");
        Ok(())
    }

    /// Drop the cached listing entirely.
    ///
    /// Called after every successful mutating operation; the next
    /// listing request falls through to the network. An absent file is
    /// already the desired state.
    pub fn invalidate(&self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "Invalidated header cache"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(error = %e, path = %self.path.display(), "Failed to remove header cache"),
        }
    }

    /// Replace the single cached entry matching `header.id`.
    ///
    /// Returns `false` without touching the file when there is no valid
    /// cache or no entry with that id. The listing is still rewritten
    /// wholesale; only the in-memory sequence is patched.
    pub fn patch(&self, header: &ChartHeader) -> bool {
        let Some(mut headers) = self.read() else {
            return false;
        };
        let Some(entry) = headers.iter_mut().find(|h| h.id == header.id) else {
            return false;
        };
        *entry = header.clone();

        match self.write(&headers) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, id = header.id, "Failed to patch header cache");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn header(id: i64, name: &str) -> ChartHeader {
        ChartHeader {
            id,
            name: name.to_string(),
            ..ChartHeader::default()
        }
    }

    #[test]
    fn test_read_absent_file_is_miss() {
        let temp = TempDir::new().unwrap();
        let cache = HeaderCache::new(temp.path());
        assert!(cache.read().is_none());
    }

    #[test]
    fn test_read_empty_file_is_miss() {
        let temp = TempDir::new().unwrap();
        let cache = HeaderCache::new(temp.path());
        std::fs::write(cache.path(), b"").unwrap();
        assert!(cache.read().is_none());
    }

    #[test]
    fn test_read_wrong_magic_is_miss() {
        let temp = TempDir::new().unwrap();
        let cache = HeaderCache::new(temp.path());
        cache.write(&[header(1, "one")]).unwrap();

        let mut data = std::fs::read(cache.path()).unwrap();
        data[0] ^= 0xff;
        std::fs::write(cache.path(), &data).unwrap();

        assert!(cache.read().is_none());
    }

    #[test]
    fn test_read_wrong_version_is_miss() {
        let temp = TempDir::new().unwrap();
        let cache = HeaderCache::new(temp.path());
        cache.write(&[header(1, "one")]).unwrap();

        let mut data = std::fs::read(cache.path()).unwrap();
        data[4..8].copy_from_slice(&(HEADER_CACHE_VERSION + 1).to_le_bytes());
        std::fs::write(cache.path(), &data).unwrap();

        assert!(cache.read().is_none());
    }

    #[test]
    fn test_read_corrupt_payload_is_miss() {
        let temp = TempDir::new().unwrap();
        let cache = HeaderCache::new(temp.path());

        let mut data = Vec::new();
        data.extend_from_slice(&HEADER_CACHE_MAGIC.to_le_bytes());
        data.extend_from_slice(&HEADER_CACHE_VERSION.to_le_bytes());
        data.extend_from_slice(b"\x01garbage");
        std::fs::write(cache.path(), &data).unwrap();

        assert!(cache.read().is_none());
    }

    #[test]
    fn test_round_trip_empty_listing() {
        let temp = TempDir::new().unwrap();
        let cache = HeaderCache::new(temp.path());

        cache.write(&[]).unwrap();

        let headers = cache.read().unwrap();
        assert!(headers.is_empty());
    }

    #[test]
    fn test_round_trip_preserves_order_and_fields() {
        let temp = TempDir::new().unwrap();
        let cache = HeaderCache::new(temp.path());
        let listing = vec![header(3, "three"), header(1, "one"), header(2, "two")];

        cache.write(&listing).unwrap();

        assert_eq!(cache.read().unwrap(), listing);
    }

    #[test]
    fn test_file_starts_with_magic_and_version() {
        let temp = TempDir::new().unwrap();
        let cache = HeaderCache::new(temp.path());
        cache.write(&[]).unwrap();

        let data = std::fs::read(cache.path()).unwrap();
        assert_eq!(&data[0..4], HEADER_CACHE_MAGIC.to_le_bytes());
        assert_eq!(&data[4..8], HEADER_CACHE_VERSION.to_le_bytes());
    }

    #[test]
    fn test_write_creates_cache_directory() {
        let temp = TempDir::new().unwrap();
        let cache = HeaderCache::new(&temp.path().join("nested").join("cache"));
        cache.write(&[header(1, "one")]).unwrap();
        assert!(cache.read().is_some());
    }

    #[test]
    fn test_write_leaves_no_temp_file() {
        let temp = TempDir::new().unwrap();
        let cache = HeaderCache::new(temp.path());
        cache.write(&[header(1, "one")]).unwrap();
        assert!(!cache.path().with_extension("tmp").exists());
    }

    #[test]
    fn test_invalidate_removes_file() {
        let temp = TempDir::new().unwrap();
        let cache = HeaderCache::new(temp.path());
        cache.write(&[header(1, "one")]).unwrap();

        cache.invalidate();

        assert!(!cache.path().exists());
        assert!(cache.read().is_none());
    }

    #[test]
    fn test_invalidate_absent_file_is_noop() {
        let temp = TempDir::new().unwrap();
        let cache = HeaderCache::new(temp.path());
        cache.invalidate();
        assert!(cache.read().is_none());
    }

    #[test]
    fn test_patch_replaces_matching_entry() {
        let temp = TempDir::new().unwrap();
        let cache = HeaderCache::new(temp.path());
        cache
            .write(&[header(1, "one"), header(2, "two")])
            .unwrap();

        let mut updated = header(2, "two, curated");
        updated.curated = true;
        assert!(cache.patch(&updated));

        let headers = cache.read().unwrap();
        assert_eq!(headers[0], header(1, "one"));
        assert_eq!(headers[1], updated);
    }

    #[test]
    fn test_patch_unknown_id_is_noop() {
        let temp = TempDir::new().unwrap();
        let cache = HeaderCache::new(temp.path());
        let listing = vec![header(1, "one")];
        cache.write(&listing).unwrap();

        assert!(!cache.patch(&header(99, "missing")));
        assert_eq!(cache.read().unwrap(), listing);
    }

    #[test]
    fn test_patch_without_cache_is_noop() {
        let temp = TempDir::new().unwrap();
        let cache = HeaderCache::new(temp.path());
        assert!(!cache.patch(&header(1, "one")));
        assert!(cache.read().is_none());
    }
}
