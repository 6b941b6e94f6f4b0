//! BV -> mid resolution service: cache, dedup barrier, and task queue.
//!
//! One instance owns all resolution state. HTTP handlers call [`ResolverService::resolve`]
//! (never blocking on network I/O); the background worker in
//! [`crate::domain::resolve_worker`] drives the queue through the fetcher and
//! applies results back here. Every shared structure sits behind its own lock
//! with short critical sections that are never held across an `.await`.

use crate::domain::resolution::FetchResult;
use crate::infrastructure::cache::MidCache;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::{HashSet, VecDeque};
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use tokio::sync::Notify;
use tracing::{debug, error, warn};

/// Tuning knobs for the resolution cache, derived from [`crate::config::Config`].
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Age after which a cached resolution is eligible for eviction.
    pub ttl: Duration,
    /// Cache size above which a sweep runs (sweeps are lazy, not per-insert).
    pub clear_size: usize,
    /// Minimum time between two snapshot writes.
    pub min_write_interval: Duration,
    /// Snapshot file location.
    pub snapshot_path: PathBuf,
}

/// Read-only counters for the metrics endpoint.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ResolverMetrics {
    pub queue_depth: usize,
    pub cache_size: usize,
    pub pending: usize,
    pub attempt_count: u64,
    pub failure_count: u64,
}

/// Owns the resolution cache, the pending set (dedup barrier) and the FIFO
/// task queue, plus the worker wake-up signal.
///
/// Consistency contract: a BV is a member of the pending set from the moment
/// it is first enqueued until a fetch attempt for it *succeeds*. A failed
/// attempt leaves membership intact and re-queues the BV, so at any time a
/// not-yet-resolved BV is either in the queue or in an in-flight batch, never
/// lost and never duplicated in flight.
pub struct ResolverService {
    cache: Mutex<MidCache>,
    pending: Mutex<HashSet<String>>,
    queue: Mutex<VecDeque<String>>,
    wakeup: Notify,
    /// Display value for monitors; refreshed at enqueue, after drain and
    /// after results are applied, so it always approximates the backlog.
    queue_depth: AtomicUsize,
    attempt_count: AtomicU64,
    failure_count: AtomicU64,
    config: ResolverConfig,
}

impl ResolverService {
    pub fn new(config: ResolverConfig) -> Self {
        Self::with_cache(MidCache::new(), config)
    }

    /// Builds the service around a pre-loaded cache (normally the snapshot
    /// read at startup).
    pub fn with_cache(cache: MidCache, config: ResolverConfig) -> Self {
        Self {
            cache: Mutex::new(cache),
            pending: Mutex::new(HashSet::new()),
            queue: Mutex::new(VecDeque::new()),
            wakeup: Notify::new(),
            queue_depth: AtomicUsize::new(0),
            attempt_count: AtomicU64::new(0),
            failure_count: AtomicU64::new(0),
            config,
        }
    }

    /// Resolves a BV to its owner mid, or schedules it for resolution.
    ///
    /// - Cache hit: returns the mid immediately. No mutation, no I/O.
    /// - Miss, already pending: returns `None` without enqueuing again.
    /// - Fresh miss: marks pending, enqueues, wakes the worker, returns `None`.
    ///
    /// Callers poll; there is no synchronous path to a fresh resolution and
    /// no terminal-failure signal for a BV that will never resolve.
    pub fn resolve(&self, bv: &str) -> Option<i64> {
        if let Some(mid) = self.cache.lock().unwrap().get(bv) {
            return Some(mid);
        }

        {
            let mut pending = self.pending.lock().unwrap();
            if !pending.insert(bv.to_string()) {
                // Already queued or in flight; the worker will get to it.
                return None;
            }
        }

        self.queue.lock().unwrap().push_back(bv.to_string());
        self.queue_depth.fetch_add(1, Ordering::Relaxed);
        self.wakeup.notify_one();
        debug!("Queued {bv} for resolution");
        None
    }

    /// Suspends until new work is signalled. A signal sent while the worker
    /// is busy is stored and wakes the next wait immediately.
    pub async fn idle(&self) {
        self.wakeup.notified().await;
    }

    /// Wakes the worker. Also used by the worker itself after a failing
    /// batch so the re-queued items get retried.
    pub fn signal(&self) {
        self.wakeup.notify_one();
    }

    /// Consumes the entire current queue into one batch, dropping entries
    /// that are already cached (requeued duplicates that since succeeded)
    /// and empty tokens (a known contamination defect upstream of us).
    pub fn drain(&self) -> Vec<String> {
        let drained: Vec<String> = self.queue.lock().unwrap().drain(..).collect();

        let (batch, dropped): (Vec<String>, Vec<String>) = {
            let cache = self.cache.lock().unwrap();
            drained
                .into_iter()
                .partition(|bv| !bv.is_empty() && !cache.contains(bv))
        };

        // A dropped entry can carry a stale pending membership: a caller
        // that raced the worker's success (cache miss seen before the put,
        // pending re-inserted after the remove) leaves the key pending with
        // nothing in flight. Clear it here, or once the entry expires every
        // later resolve for the key would dedup against the ghost and the
        // key could never be enqueued again.
        if !dropped.is_empty() {
            let mut pending = self.pending.lock().unwrap();
            for bv in &dropped {
                pending.remove(bv);
            }
        }

        // The queue was emptied above; anything enqueued since still counts.
        let depth = batch.len() + self.queue.lock().unwrap().len();
        self.queue_depth.store(depth, Ordering::Relaxed);
        batch
    }

    /// Housekeeping between fetching and applying: lazy eviction sweep and a
    /// throttled snapshot attempt. Persistence failures are logged only; the
    /// in-memory state stays authoritative and the next due attempt retries.
    pub fn maintain(&self, now: DateTime<Utc>) {
        let mut cache = self.cache.lock().unwrap();
        let swept = cache.sweep_if_over(self.config.clear_size, self.config.ttl, now);
        if swept > 0 {
            debug!("Evicted {swept} expired resolutions");
        }
        if let Err(e) =
            cache.persist_if_due(&self.config.snapshot_path, self.config.min_write_interval, now)
        {
            error!("Failed to persist resolution cache: {e}");
        }
    }

    /// Applies one batch of fetch results: successes enter the cache and
    /// leave the pending set; failures go back on the queue with their
    /// pending membership untouched. Returns whether any item failed.
    pub fn apply_results(&self, results: Vec<FetchResult>, now: DateTime<Utc>) -> bool {
        let mut any_failed = false;
        for result in results {
            self.attempt_count.fetch_add(1, Ordering::Relaxed);
            match result.outcome {
                Ok(mid) => {
                    self.cache.lock().unwrap().put(result.bv.clone(), mid, now);
                    self.pending.lock().unwrap().remove(&result.bv);
                }
                Err(e) => {
                    warn!("Lookup failed for {}: {e}", result.bv);
                    self.queue.lock().unwrap().push_back(result.bv);
                    self.failure_count.fetch_add(1, Ordering::Relaxed);
                    any_failed = true;
                }
            }
        }
        self.queue_depth
            .store(self.queue.lock().unwrap().len(), Ordering::Relaxed);
        any_failed
    }

    /// Writes a final snapshot regardless of the throttle window. Called on
    /// graceful shutdown.
    pub fn persist_now(&self, now: DateTime<Utc>) {
        let mut cache = self.cache.lock().unwrap();
        if !cache.is_dirty() {
            return;
        }
        if let Err(e) = cache.persist(&self.config.snapshot_path, now) {
            error!("Failed to write final cache snapshot: {e}");
        }
    }

    pub fn metrics(&self) -> ResolverMetrics {
        ResolverMetrics {
            queue_depth: self.queue_depth.load(Ordering::Relaxed),
            cache_size: self.cache.lock().unwrap().len(),
            pending: self.pending.lock().unwrap().len(),
            attempt_count: self.attempt_count.load(Ordering::Relaxed),
            failure_count: self.failure_count.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::resolution::FetchError;

    fn test_config(dir: &tempfile::TempDir) -> ResolverConfig {
        ResolverConfig {
            ttl: Duration::days(7),
            clear_size: 10_000,
            min_write_interval: Duration::seconds(60),
            snapshot_path: dir.path().join("bvcache.json"),
        }
    }

    #[test]
    fn test_resolve_miss_enqueues_once() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = ResolverService::new(test_config(&dir));

        assert_eq!(resolver.resolve("BV1xx"), None);
        // Second call before any fetch completes must not enqueue again.
        assert_eq!(resolver.resolve("BV1xx"), None);

        let m = resolver.metrics();
        assert_eq!(m.queue_depth, 1);
        assert_eq!(m.pending, 1);
        assert_eq!(resolver.drain(), vec!["BV1xx".to_string()]);
    }

    #[test]
    fn test_resolve_hit_touches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = MidCache::new();
        cache.put("BV1xx".to_string(), 12345, Utc::now());
        let resolver = ResolverService::with_cache(cache, test_config(&dir));

        assert_eq!(resolver.resolve("BV1xx"), Some(12345));

        let m = resolver.metrics();
        assert_eq!(m.queue_depth, 0);
        assert_eq!(m.pending, 0);
        assert!(resolver.drain().is_empty());
    }

    #[test]
    fn test_drain_filters_empty_and_cached() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = ResolverService::new(test_config(&dir));

        resolver.resolve("");
        resolver.resolve("BV1xx");
        resolver.resolve("BV1yy");
        // BV1yy resolves out of band before the drain.
        resolver.apply_results(vec![FetchResult::resolved("BV1yy", 7)], Utc::now());

        assert_eq!(resolver.drain(), vec!["BV1xx".to_string()]);
        assert_eq!(resolver.metrics().queue_depth, 1);
        // Dropped entries take their pending membership with them; only the
        // batched key stays pending.
        assert_eq!(resolver.metrics().pending, 1);
    }

    #[test]
    fn test_racing_resolve_never_strands_pending() {
        // A resolve can see a cache miss, lose the CPU while the worker
        // applies a success for the same key, then insert into pending and
        // enqueue. Whatever the interleaving, after the next drain nothing
        // may be left pending for a cached key, otherwise the key becomes
        // unresolvable once the TTL sweep evicts it.
        let dir = tempfile::tempdir().unwrap();
        let resolver = std::sync::Arc::new(ResolverService::new(test_config(&dir)));

        for i in 0..2_000i64 {
            let bv = format!("BV1r{i}");
            assert_eq!(resolver.resolve(&bv), None);
            assert_eq!(resolver.drain(), vec![bv.clone()]);

            let racer = {
                let resolver = resolver.clone();
                let bv = bv.clone();
                std::thread::spawn(move || {
                    resolver.resolve(&bv);
                })
            };
            resolver.apply_results(vec![FetchResult::resolved(bv.clone(), i)], Utc::now());
            racer.join().unwrap();

            resolver.drain();
            assert_eq!(resolver.metrics().pending, 0, "stranded pending for {bv}");
            assert_eq!(resolver.resolve(&bv), Some(i));
        }
    }

    #[test]
    fn test_apply_results_batch_accounting() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = ResolverService::new(test_config(&dir));
        resolver.resolve("BV1a");
        resolver.resolve("BV1b");
        resolver.resolve("BV1c");
        let batch = resolver.drain();
        assert_eq!(batch.len(), 3);

        // N = 3 items, K = 1 failure.
        let any_failed = resolver.apply_results(
            vec![
                FetchResult::resolved("BV1a", 1),
                FetchResult::resolved("BV1b", 2),
                FetchResult::failed("BV1c", FetchError::Timeout),
            ],
            Utc::now(),
        );

        assert!(any_failed);
        let m = resolver.metrics();
        assert_eq!(m.cache_size, 2);
        assert_eq!(m.queue_depth, 1);
        assert_eq!(m.attempt_count, 3);
        assert_eq!(m.failure_count, 1);
        // Failed item stays pending; successes do not.
        assert_eq!(m.pending, 1);
        assert_eq!(resolver.resolve("BV1a"), Some(1));
        // Still pending, so the failed item is not enqueued a second time.
        assert_eq!(resolver.resolve("BV1c"), None);
        assert_eq!(resolver.metrics().queue_depth, 1);
    }

    #[test]
    fn test_apply_results_all_success_reports_no_failure() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = ResolverService::new(test_config(&dir));
        resolver.resolve("BV1a");
        resolver.drain();

        let any_failed =
            resolver.apply_results(vec![FetchResult::resolved("BV1a", 1)], Utc::now());
        assert!(!any_failed);
        assert_eq!(resolver.metrics().failure_count, 0);
    }

    #[test]
    fn test_persist_now_writes_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(&dir);
        let resolver = ResolverService::new(config.clone());
        resolver.apply_results(vec![FetchResult::resolved("BV1a", 1)], Utc::now());

        resolver.persist_now(Utc::now());

        let loaded =
            MidCache::load(&config.snapshot_path, Duration::days(7), Utc::now()).unwrap();
        assert_eq!(loaded.get("BV1a"), Some(1));
    }
}
