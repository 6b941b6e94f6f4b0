//! Value types shared by the resolution cache and the batch fetcher.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A successfully resolved BV -> mid mapping.
///
/// Entries are only ever created for successful lookups; a failed fetch never
/// produces a cache entry. `resolved_at` drives time-based eviction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub mid: i64,
    pub resolved_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(mid: i64, resolved_at: DateTime<Utc>) -> Self {
        Self { mid, resolved_at }
    }

    /// Whether this entry is strictly older than `ttl` at instant `now`.
    pub fn is_expired(&self, ttl: chrono::Duration, now: DateTime<Utc>) -> bool {
        now - self.resolved_at > ttl
    }
}

/// Per-item failure reasons from the upstream lookup API.
///
/// Every variant is transient from the resolver's point of view: the item is
/// re-queued and retried after the cooldown, without limit.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out")]
    Timeout,
    #[error("unexpected HTTP status {0}")]
    Status(u16),
    #[error("upstream api error code {0}")]
    Api(i32),
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Outcome of one lookup attempt for one BV.
///
/// The fetcher returns exactly one of these per input key (a key duplicated
/// in a batch yields duplicated results). Failures are values, never raised,
/// so one bad item can never lose the rest of its batch.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub bv: String,
    pub outcome: Result<i64, FetchError>,
}

impl FetchResult {
    pub fn resolved(bv: impl Into<String>, mid: i64) -> Self {
        Self {
            bv: bv.into(),
            outcome: Ok(mid),
        }
    }

    pub fn failed(bv: impl Into<String>, error: FetchError) -> Self {
        Self {
            bv: bv.into(),
            outcome: Err(error),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.outcome.is_err()
    }
}
