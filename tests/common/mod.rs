#![allow(dead_code)]

use async_trait::async_trait;
use bv_guard::application::services::{BlocklistService, ResolverConfig, ResolverService};
use bv_guard::domain::repositories::MidFetcher;
use bv_guard::domain::resolution::{FetchError, FetchResult};
use bv_guard::infrastructure::persistence::{SqliteBlocklistRepository, init_schema};
use bv_guard::state::AppState;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

/// Deterministic [`MidFetcher`] programmed with per-BV outcome sequences.
///
/// Each call for a BV pops the next programmed outcome; an unprogrammed BV
/// fails with a network error so tests notice unexpected lookups.
pub struct ScriptedFetcher {
    outcomes: Mutex<HashMap<String, VecDeque<Result<i64, FetchError>>>>,
    pub batches: AtomicUsize,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self {
            outcomes: Mutex::new(HashMap::new()),
            batches: AtomicUsize::new(0),
        }
    }

    pub fn program(&self, bv: &str, outcome: Result<i64, FetchError>) {
        self.outcomes
            .lock()
            .unwrap()
            .entry(bv.to_string())
            .or_default()
            .push_back(outcome);
    }

    pub fn batch_count(&self) -> usize {
        self.batches.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl MidFetcher for ScriptedFetcher {
    async fn fetch_batch(&self, bvs: Vec<String>) -> Vec<FetchResult> {
        self.batches.fetch_add(1, Ordering::Relaxed);
        let mut outcomes = self.outcomes.lock().unwrap();
        bvs.into_iter()
            .map(|bv| {
                let outcome = outcomes
                    .get_mut(&bv)
                    .and_then(|queue| queue.pop_front())
                    .unwrap_or_else(|| {
                        Err(FetchError::Network(format!("no scripted outcome for {bv}")))
                    });
                FetchResult { bv, outcome }
            })
            .collect()
    }
}

pub fn resolver_config(dir: &TempDir) -> ResolverConfig {
    ResolverConfig {
        ttl: chrono::Duration::days(7),
        clear_size: 10_000,
        min_write_interval: chrono::Duration::seconds(60),
        snapshot_path: dir.path().join("bvcache.json"),
    }
}

/// In-memory SQLite with the blocklist schema applied, single connection so
/// store operations serialize exactly like production.
pub async fn memory_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    init_schema(&pool).await.unwrap();
    pool
}

pub async fn create_test_state(dir: &TempDir) -> (AppState, Arc<ResolverService>) {
    let pool = memory_pool().await;
    let repository = Arc::new(SqliteBlocklistRepository::new(Arc::new(pool)));
    let blocklist = Arc::new(BlocklistService::new(repository));
    let resolver = Arc::new(ResolverService::new(resolver_config(dir)));

    let state = AppState {
        resolver: resolver.clone(),
        blocklist,
    };
    (state, resolver)
}

/// Polls `cond` while letting the background worker make progress. Under a
/// paused-clock runtime the sleeps auto-advance, so this is instant in
/// wall-clock terms.
pub async fn wait_until(mut cond: impl FnMut() -> bool) {
    for _ in 0..1_000 {
        if cond() {
            return;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    panic!("condition not reached in time");
}
