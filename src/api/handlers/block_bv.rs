//! Handler for BV-based blocklist queries.

use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::api::dto::block_bv::{BlockBvResponse, BvQuery};
use crate::state::AppState;

/// Resolves a BV to its owner and reports whether that owner is blocked.
///
/// # Endpoint
///
/// `GET /blockBV?bv={bv}`
///
/// # Request Flow
///
/// 1. Ask the resolver for the BV's owner mid (cache lookup only; a miss
///    schedules a background fetch and returns immediately)
/// 2. Unresolved: answer `{"msg":"just wait..."}` so the client polls again
/// 3. Resolved: look the mid up in the blocklist and answer
///    `{"msg":"OK","mid":...,"result":"True"|"False"|"ERR2"}`
///
/// A BV that the upstream can never resolve keeps answering "just wait...";
/// there is deliberately no terminal-failure signal.
pub async fn block_bv_handler(
    State(state): State<AppState>,
    Query(query): Query<BvQuery>,
) -> Response {
    let Some(bv) = query.bv else {
        return "ERR bv".into_response();
    };

    let Some(mid) = state.resolver.resolve(&bv) else {
        debug!("Resolution pending for {bv}");
        return Json(BlockBvResponse::waiting()).into_response();
    };

    let result = match state.blocklist.is_blocked(mid).await {
        Ok(true) => "True",
        Ok(false) => "False",
        Err(_) => "ERR2",
    };

    Json(BlockBvResponse::resolved(mid, result)).into_response()
}
