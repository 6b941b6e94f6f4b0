//! Request DTOs for the blocklist endpoints.
//!
//! All fields are optional at the extractor level so a missing or malformed
//! parameter surfaces as the legacy `ERR1` body instead of an Axum
//! rejection; existing clients only understand the legacy strings.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct BlockForm {
    pub mid: Option<String>,
    pub username: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RemoveForm {
    pub mid: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MidQuery {
    pub mid: Option<String>,
}
