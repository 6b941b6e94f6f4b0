//! Background worker that turns queued BVs into cached resolutions.

use crate::application::services::ResolverService;
use crate::domain::repositories::MidFetcher;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Single consumer loop over the resolver's task queue.
///
/// Each wake-up drains the whole queue into one batch, fetches the batch
/// concurrently (waiting for the slowest member), runs cache housekeeping,
/// and applies the results. When any item in the batch failed the worker
/// sleeps a fixed cooldown and re-signals itself, so continuous upstream
/// failure settles into one attempt per cooldown instead of a tight loop.
///
/// There is no retry ceiling: a BV the upstream can never resolve (region
/// restricted items are a known case) retries forever at the cooldown
/// cadence. The loop must survive that indefinitely.
pub async fn run_resolve_worker(
    resolver: Arc<ResolverService>,
    fetcher: Arc<dyn MidFetcher>,
    cooldown: Duration,
) {
    loop {
        resolver.idle().await;

        let batch = resolver.drain();
        if batch.is_empty() {
            // The signal only consumed already-handled work.
            continue;
        }
        debug!("Fetching a batch of {} BVs", batch.len());

        let results = fetcher.fetch_batch(batch).await;

        let now = Utc::now();
        resolver.maintain(now);
        let any_failed = resolver.apply_results(results, now);

        if any_failed {
            warn!(
                "Batch had failures, retrying after {}ms cooldown",
                cooldown.as_millis()
            );
            resolver.signal();
            tokio::time::sleep(cooldown).await;
        }
    }
}
