//! Bilibili view-API client with concurrent per-key lookups.

use crate::domain::repositories::MidFetcher;
use crate::domain::resolution::{FetchError, FetchResult};
use async_trait::async_trait;
use reqwest::{Client, Proxy};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Browser-like UA; the upstream rejects obviously scripted clients.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36 Edg/120.0.0.0";

#[derive(Debug, Deserialize)]
struct ViewResponse {
    code: i32,
    data: Option<ViewData>,
}

#[derive(Debug, Deserialize)]
struct ViewData {
    owner: Option<ViewOwner>,
}

#[derive(Debug, Deserialize)]
struct ViewOwner {
    mid: i64,
}

/// HTTP implementation of [`MidFetcher`] against
/// `GET {base_url}/x/web-interface/view?bvid={bv}`.
///
/// Each key in a batch gets its own request task with an independent timeout;
/// the batch as a whole never fails. The base URL is injectable so tests can
/// point the fetcher at a local stub server.
#[derive(Clone)]
pub struct BilibiliFetcher {
    client: Client,
    base_url: String,
}

impl BilibiliFetcher {
    /// Builds the client with the shared request headers, the per-request
    /// timeout, and an optional outbound proxy.
    ///
    /// # Errors
    ///
    /// Returns a `reqwest` error if the proxy URL is invalid or the TLS
    /// backend fails to initialize.
    pub fn new(
        base_url: &str,
        timeout: Duration,
        proxy_url: Option<&str>,
    ) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder().user_agent(USER_AGENT).timeout(timeout);

        if let Some(url) = proxy_url
            && !url.is_empty()
        {
            builder = builder.proxy(Proxy::all(url)?);
            debug!("Upstream requests will use proxy {url}");
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn fetch_one(client: Client, url: String, bv: String) -> FetchResult {
        let response = match client.get(&url).send().await {
            Ok(r) => r,
            Err(e) if e.is_timeout() => return FetchResult::failed(bv, FetchError::Timeout),
            Err(e) => return FetchResult::failed(bv, FetchError::Network(e.to_string())),
        };

        let status = response.status();
        if !status.is_success() {
            return FetchResult::failed(bv, FetchError::Status(status.as_u16()));
        }

        let body = match response.json::<ViewResponse>().await {
            Ok(b) => b,
            Err(e) if e.is_timeout() => return FetchResult::failed(bv, FetchError::Timeout),
            Err(e) => return FetchResult::failed(bv, FetchError::Malformed(e.to_string())),
        };

        if body.code != 0 {
            // Known cases include -404 for deleted or region-locked videos.
            return FetchResult::failed(bv, FetchError::Api(body.code));
        }

        match body.data.and_then(|d| d.owner) {
            Some(owner) => FetchResult::resolved(bv, owner.mid),
            None => FetchResult::failed(
                bv,
                FetchError::Malformed("missing data.owner.mid".to_string()),
            ),
        }
    }
}

#[async_trait]
impl MidFetcher for BilibiliFetcher {
    async fn fetch_batch(&self, bvs: Vec<String>) -> Vec<FetchResult> {
        // One task per key so a slow or hung request only delays the batch,
        // never another key's outcome.
        let handles: Vec<_> = bvs
            .into_iter()
            .map(|bv| {
                let url = format!("{}/x/web-interface/view?bvid={}", self.base_url, bv);
                (bv.clone(), tokio::spawn(Self::fetch_one(self.client.clone(), url, bv)))
            })
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for (bv, handle) in handles {
            results.push(match handle.await {
                Ok(result) => result,
                Err(e) => FetchResult::failed(bv, FetchError::Network(format!("task failed: {e}"))),
            });
        }
        results
    }
}
