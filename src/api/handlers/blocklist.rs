//! Handlers for the block/unblock/query endpoints.
//!
//! The wire contract is the service's legacy one: plain-text `OK`, `True`,
//! `False`, `ERR1` (bad input) and `ERR2` (store refused) bodies, always with
//! status 200. Clients embedded in browser scripts parse these strings.

use axum::extract::{Form, Query, State};
use tracing::info;

use crate::api::dto::blocklist::{BlockForm, MidQuery, RemoveForm};
use crate::state::AppState;

/// Blocks an account.
///
/// # Endpoint
///
/// `POST /block` (form: `mid`, optional `username`)
pub async fn block_handler(State(state): State<AppState>, Form(form): Form<BlockForm>) -> String {
    let Some(mid) = form.mid.as_deref().and_then(parse_mid) else {
        return "ERR1".to_string();
    };

    match state.blocklist.block(mid, form.username.as_deref()).await {
        Ok(true) => {
            info!("Blocked mid {mid}");
            "OK".to_string()
        }
        Ok(false) | Err(_) => "ERR2".to_string(),
    }
}

/// Unblocks an account.
///
/// # Endpoint
///
/// `POST /remove` (form: `mid`)
pub async fn remove_handler(State(state): State<AppState>, Form(form): Form<RemoveForm>) -> String {
    let Some(mid) = form.mid.as_deref().and_then(parse_mid) else {
        return "ERR1".to_string();
    };

    match state.blocklist.unblock(mid).await {
        Ok(true) => {
            info!("Unblocked mid {mid}");
            "OK".to_string()
        }
        Ok(false) | Err(_) => "ERR2".to_string(),
    }
}

/// Whether an account is blocked.
///
/// # Endpoint
///
/// `GET /isExist?mid={mid}`
pub async fn is_exist_handler(
    State(state): State<AppState>,
    Query(query): Query<MidQuery>,
) -> String {
    let Some(mid) = query.mid.as_deref().and_then(parse_mid) else {
        return "ERR1".to_string();
    };

    match state.blocklist.is_blocked(mid).await {
        Ok(true) => "True".to_string(),
        Ok(false) => "False".to_string(),
        Err(_) => "ERR2".to_string(),
    }
}

/// Liveness probe.
///
/// # Endpoint
///
/// `GET /ok`
pub async fn alive_handler() -> &'static str {
    "OK"
}

/// Parses a decimal mid. Rejects empty strings, signs, and any non-digit
/// character, matching the service's historic `isdigit` check.
fn parse_mid(s: &str) -> Option<i64> {
    if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
