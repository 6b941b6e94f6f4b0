//! Handler for the read-only metrics endpoint.

use axum::{Json, extract::State};

use crate::api::dto::metrics::MetricsResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns resolver and blocklist counters for dashboards.
///
/// # Endpoint
///
/// `GET /metrics`
///
/// Strictly read-only: the handler snapshots counters and never mutates core
/// state.
pub async fn metrics_handler(
    State(state): State<AppState>,
) -> Result<Json<MetricsResponse>, AppError> {
    let resolver = state.resolver.metrics();
    let blocked_users = state.blocklist.count().await?;

    Ok(Json(MetricsResponse {
        queue_depth: resolver.queue_depth,
        cache_size: resolver.cache_size,
        pending: resolver.pending,
        attempt_count: resolver.attempt_count,
        failure_count: resolver.failure_count,
        blocked_users,
    }))
}
