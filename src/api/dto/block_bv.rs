//! DTOs for the BV resolution endpoint.

use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct BvQuery {
    pub bv: Option<String>,
}

/// Response for `GET /blockBV`.
///
/// While the BV is unresolved only `msg` is present ("just wait..."); once
/// resolved the owner mid and its blocklist verdict are included.
#[derive(Debug, Serialize)]
pub struct BlockBvResponse {
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mid: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
}

impl BlockBvResponse {
    /// Resolution is still in flight; the caller should poll again.
    pub fn waiting() -> Self {
        Self {
            msg: "just wait...".to_string(),
            mid: None,
            result: None,
        }
    }

    pub fn resolved(mid: i64, result: impl Into<String>) -> Self {
        Self {
            msg: "OK".to_string(),
            mid: Some(mid),
            result: Some(result.into()),
        }
    }
}
