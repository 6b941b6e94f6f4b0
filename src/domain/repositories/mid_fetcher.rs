//! Trait for the upstream BV -> mid lookup.

use crate::domain::resolution::FetchResult;
use async_trait::async_trait;

/// Batch lookup of video owner ids from the upstream API.
///
/// Implementations fan out one request per key concurrently and must isolate
/// per-item failures: the returned vector always contains exactly one
/// [`FetchResult`] per input key, success or failure, in no particular order.
///
/// # Implementations
///
/// - [`crate::infrastructure::fetch::BilibiliFetcher`] - production HTTP client
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MidFetcher: Send + Sync {
    /// Looks up the owner mid for every BV in `bvs`.
    ///
    /// Never fails as a whole; individual errors are carried inside the
    /// results. An empty input yields an empty output without any I/O.
    async fn fetch_batch(&self, bvs: Vec<String>) -> Vec<FetchResult>;
}
