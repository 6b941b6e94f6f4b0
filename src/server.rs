//! HTTP server initialization and runtime setup.
//!
//! Handles the blocklist database, cache snapshot loading, worker spawning,
//! and the Axum server lifecycle.

use crate::application::services::{BlocklistService, ResolverConfig, ResolverService};
use crate::config::Config;
use crate::domain::resolve_worker::run_resolve_worker;
use crate::infrastructure::cache::MidCache;
use crate::infrastructure::fetch::BilibiliFetcher;
use crate::infrastructure::persistence::{SqliteBlocklistRepository, init_schema};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use chrono::Utc;
use sqlx::sqlite::SqlitePoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - SQLite blocklist (single connection, so store operations serialize)
/// - Resolution cache loaded from the snapshot file, stale entries swept
/// - Background resolution worker
/// - Axum HTTP server with graceful shutdown; a final cache snapshot is
///   written when the server stops
///
/// # Errors
///
/// Returns an error if the database, snapshot file, upstream client, or
/// listener cannot be initialized, or on a server runtime error.
pub async fn run(config: Config) -> Result<()> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(&config.database_url)
        .await
        .context("Failed to open blocklist database")?;
    init_schema(&pool).await?;
    tracing::info!("Blocklist database ready");

    let repository = Arc::new(SqliteBlocklistRepository::new(Arc::new(pool)));
    let blocklist = Arc::new(BlocklistService::new(repository));

    let resolver_config = ResolverConfig {
        ttl: chrono::Duration::seconds(config.cache_ttl_seconds as i64),
        clear_size: config.cache_clear_size,
        min_write_interval: chrono::Duration::seconds(config.cache_write_interval as i64),
        snapshot_path: config.cache_file.clone(),
    };
    let cache = MidCache::load(&config.cache_file, resolver_config.ttl, Utc::now())
        .context("Failed to load cache snapshot")?;
    let resolver = Arc::new(ResolverService::with_cache(cache, resolver_config));

    let fetcher = Arc::new(
        BilibiliFetcher::new(
            &config.api_base_url,
            Duration::from_secs(config.fetch_timeout_seconds),
            config.proxy_url.as_deref(),
        )
        .context("Failed to build upstream client")?,
    );

    tokio::spawn(run_resolve_worker(
        resolver.clone(),
        fetcher,
        Duration::from_millis(config.retry_cooldown_ms),
    ));
    tracing::info!("Resolution worker started");

    let state = AppState {
        resolver: resolver.clone(),
        blocklist,
    };
    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The periodic persistence is throttled; flush whatever is dirty before
    // the process exits.
    resolver.persist_now(Utc::now());
    tracing::info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        return;
    }
    tracing::info!("Shutdown signal received");
}
