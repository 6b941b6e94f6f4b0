//! Metrics response DTO.

use serde::Serialize;

/// Read-only observability counters for `GET /metrics`.
///
/// `queue_depth` is the worker's display value: an approximation of the
/// backlog refreshed at enqueue, after each drain, and after each batch is
/// applied.
#[derive(Debug, Serialize)]
pub struct MetricsResponse {
    pub queue_depth: usize,
    pub cache_size: usize,
    pub pending: usize,
    pub attempt_count: u64,
    pub failure_count: u64,
    pub blocked_users: i64,
}
