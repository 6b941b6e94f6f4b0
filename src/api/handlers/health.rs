//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: all components healthy
/// - **503 Service Unavailable**: one or more components degraded
///
/// # Components Checked
///
/// 1. **Database**: counts blocklist rows through the single-connection pool
/// 2. **Resolver**: informational only; reports the backlog in the message
///    but never flips the status, since a deep queue still drains one batch
///    per cooldown
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let db_check = check_database(&state).await;
    let resolver_check = check_resolver(&state);

    let all_healthy = db_check.status == "ok" && resolver_check.status == "ok";

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            database: db_check,
            resolver: resolver_check,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

/// Checks database connectivity by counting blocked accounts.
async fn check_database(state: &AppState) -> CheckStatus {
    match state.blocklist.count().await {
        Ok(count) => CheckStatus {
            status: "ok".to_string(),
            message: Some(format!("Connected, {count} blocked accounts")),
        },
        Err(e) => CheckStatus {
            status: "error".to_string(),
            message: Some(format!("Database error: {e}")),
        },
    }
}

/// Reports the resolution pipeline's backlog.
fn check_resolver(state: &AppState) -> CheckStatus {
    let metrics = state.resolver.metrics();
    CheckStatus {
        status: "ok".to_string(),
        message: Some(format!(
            "Queue depth: {}, cache size: {}",
            metrics.queue_depth, metrics.cache_size
        )),
    }
}
