//! Persistent BV -> mid cache with lazy eviction and throttled snapshots.

use crate::domain::resolution::CacheEntry;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Errors from snapshot persistence.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// In-memory map of resolved BVs with a dirty flag for persistence throttling.
///
/// The store itself is not synchronized; the resolver service wraps it in a
/// mutex and funnels every access through its own accessors. All time-based
/// operations take `now` explicitly so they stay deterministic under test.
#[derive(Debug, Default)]
pub struct MidCache {
    entries: HashMap<String, CacheEntry>,
    dirty: bool,
    last_write: Option<DateTime<Utc>>,
}

impl MidCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a snapshot from `path`, then immediately sweeps entries that
    /// expired while the service was down so they are not resurrected.
    ///
    /// A missing file is an empty cache, not an error. `last_write` is set to
    /// `now` so a freshly loaded store does not rewrite itself right away.
    pub fn load(path: &Path, ttl: Duration, now: DateTime<Utc>) -> Result<Self, SnapshotError> {
        if !path.exists() {
            debug!("No cache snapshot at {}, starting empty", path.display());
            return Ok(Self::new());
        }

        let bytes = fs::read(path)?;
        let entries: HashMap<String, CacheEntry> = serde_json::from_slice(&bytes)?;

        let mut cache = Self {
            entries,
            dirty: false,
            last_write: Some(now),
        };
        let swept = cache.sweep_expired(ttl, now);
        info!(
            "Loaded {} cached resolutions from {} ({} expired)",
            cache.len(),
            path.display(),
            swept
        );
        Ok(cache)
    }

    /// O(1) lookup. Pure read; expiry is handled by sweeps, not per-get.
    pub fn get(&self, bv: &str) -> Option<i64> {
        self.entries.get(bv).map(|e| e.mid)
    }

    pub fn contains(&self, bv: &str) -> bool {
        self.entries.contains_key(bv)
    }

    /// Inserts or overwrites a resolution and marks the store dirty.
    pub fn put(&mut self, bv: String, mid: i64, now: DateTime<Utc>) {
        self.entries.insert(bv, CacheEntry::new(mid, now));
        self.dirty = true;
    }

    /// Removes every entry strictly older than `ttl`. Returns how many were
    /// dropped. Removal counts as a mutation worth persisting.
    pub fn sweep_expired(&mut self, ttl: Duration, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(ttl, now));
        let swept = before - self.entries.len();
        if swept > 0 {
            self.dirty = true;
        }
        swept
    }

    /// Sweeps only when the store has grown past `clear_size`, amortizing the
    /// full-map scan across many inserts.
    pub fn sweep_if_over(&mut self, clear_size: usize, ttl: Duration, now: DateTime<Utc>) -> usize {
        if self.entries.len() < clear_size {
            return 0;
        }
        self.sweep_expired(ttl, now)
    }

    /// Writes a full snapshot if the store is dirty and at least
    /// `min_interval` has passed since the last write. Returns whether a
    /// write happened. Keeps bursty resolution traffic from rewriting the
    /// snapshot on every batch.
    pub fn persist_if_due(
        &mut self,
        path: &Path,
        min_interval: Duration,
        now: DateTime<Utc>,
    ) -> Result<bool, SnapshotError> {
        if !self.dirty {
            return Ok(false);
        }
        if let Some(last) = self.last_write
            && now - last < min_interval
        {
            return Ok(false);
        }
        self.persist(path, now)?;
        Ok(true)
    }

    /// Unconditionally writes a snapshot (used at shutdown). The file is
    /// replaced via a temp file + rename so a crash mid-write cannot leave a
    /// truncated snapshot behind.
    pub fn persist(&mut self, path: &Path, now: DateTime<Utc>) -> Result<(), SnapshotError> {
        let bytes = serde_json::to_vec(&self.entries)?;

        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = std::path::PathBuf::from(tmp);

        fs::write(&tmp, &bytes)?;
        fs::rename(&tmp, path)?;

        self.dirty = false;
        self.last_write = Some(now);
        debug!(
            "Persisted {} cached resolutions to {}",
            self.entries.len(),
            path.display()
        );
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}
