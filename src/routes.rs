//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `POST /block`     - block an account by mid
//! - `POST /remove`    - unblock an account
//! - `GET  /isExist`   - whether a mid is blocked
//! - `GET  /blockBV`   - resolve a BV and report its owner's blocklist status
//! - `GET  /ok`        - liveness probe
//! - `GET  /health`    - component health checks
//! - `GET  /metrics`   - read-only resolver/blocklist counters
//!
//! # Middleware
//!
//! - **Tracing** - structured request/response logging
//! - **Path normalization** - trailing slash handling

use crate::api::handlers::{
    alive_handler, block_bv_handler, block_handler, health_handler, is_exist_handler,
    metrics_handler, remove_handler,
};
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::{get, post};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let router = Router::new()
        .route("/block", post(block_handler))
        .route("/remove", post(remove_handler))
        .route("/isExist", get(is_exist_handler))
        .route("/blockBV", get(block_bv_handler))
        .route("/ok", get(alive_handler))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
