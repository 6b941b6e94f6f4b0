//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before the server
//! starts.
//!
//! ```bash
//! export DATABASE_URL="sqlite://blocked_users.db?mode=rwc"
//! export LISTEN="127.0.0.1:22332"
//! ```
//!
//! ## Variables
//!
//! All are optional; the defaults reproduce the service's stock behavior.
//!
//! - `LISTEN` - bind address (default: `127.0.0.1:22332`)
//! - `DATABASE_URL` - SQLite blocklist location
//!   (default: `sqlite://blocked_users.db?mode=rwc`)
//! - `CACHE_FILE` - resolution cache snapshot path (default: `bvcache.json`)
//! - `CACHE_TTL_SECONDS` - resolution expiry (default: 604800 = 7 days)
//! - `CACHE_CLEAR_SIZE` - cache size that triggers an eviction sweep
//!   (default: 10000)
//! - `CACHE_WRITE_INTERVAL` - minimum seconds between snapshot writes
//!   (default: 60)
//! - `FETCH_TIMEOUT_SECONDS` - per-request upstream timeout (default: 5)
//! - `RETRY_COOLDOWN_MS` - worker sleep after a failing batch (default: 1000)
//! - `API_BASE_URL` - upstream API root (default: `https://api.bilibili.com`)
//! - `PROXY_URL` - optional outbound proxy for upstream requests
//! - `RUST_LOG` - log level (default: `info`)
//! - `LOG_FORMAT` - log format: `text` or `json` (default: `text`)

use anyhow::Result;
use std::env;
use std::path::PathBuf;

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    pub database_url: String,
    /// Resolution cache snapshot file.
    pub cache_file: PathBuf,
    /// Seconds after which a cached resolution is considered stale.
    pub cache_ttl_seconds: u64,
    /// Cache size above which an eviction sweep runs (sweeps are lazy).
    pub cache_clear_size: usize,
    /// Minimum seconds between two snapshot writes.
    pub cache_write_interval: u64,
    /// Independent timeout for each upstream lookup request, in seconds.
    pub fetch_timeout_seconds: u64,
    /// Fixed cooldown after any failing batch, in milliseconds.
    pub retry_cooldown_ms: u64,
    /// Upstream API root; overridable so tests can target a stub server.
    pub api_base_url: String,
    /// Optional outbound proxy for upstream requests.
    pub proxy_url: Option<String>,
    pub log_level: String,
    pub log_format: String,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Self {
        let listen_addr = env::var("LISTEN").unwrap_or_else(|_| "127.0.0.1:22332".to_string());
        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://blocked_users.db?mode=rwc".to_string());
        let cache_file = env::var("CACHE_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("bvcache.json"));

        let cache_ttl_seconds = env::var("CACHE_TTL_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(604_800);

        let cache_clear_size = env::var("CACHE_CLEAR_SIZE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10_000);

        let cache_write_interval = env::var("CACHE_WRITE_INTERVAL")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(60);

        let fetch_timeout_seconds = env::var("FETCH_TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5);

        let retry_cooldown_ms = env::var("RETRY_COOLDOWN_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(1_000);

        let api_base_url =
            env::var("API_BASE_URL").unwrap_or_else(|_| "https://api.bilibili.com".to_string());

        let proxy_url = env::var("PROXY_URL").ok().filter(|v| !v.is_empty());

        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

        Self {
            listen_addr,
            database_url,
            cache_file,
            cache_ttl_seconds,
            cache_clear_size,
            cache_write_interval,
            fetch_timeout_seconds,
            retry_cooldown_ms,
            api_base_url,
            proxy_url,
            log_level,
            log_format,
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any value is structurally invalid (zero TTL,
    /// malformed listen address, unsupported log format, and so on).
    pub fn validate(&self) -> Result<()> {
        if !self.listen_addr.contains(':') {
            anyhow::bail!(
                "LISTEN must be in format 'host:port', got '{}'",
                self.listen_addr
            );
        }

        if !self.database_url.starts_with("sqlite:") {
            anyhow::bail!(
                "DATABASE_URL must start with 'sqlite:', got '{}'",
                self.database_url
            );
        }

        if self.cache_ttl_seconds == 0 {
            anyhow::bail!("CACHE_TTL_SECONDS must be greater than 0");
        }

        if self.cache_clear_size == 0 {
            anyhow::bail!("CACHE_CLEAR_SIZE must be at least 1");
        }

        if self.fetch_timeout_seconds == 0 || self.fetch_timeout_seconds > 120 {
            anyhow::bail!(
                "FETCH_TIMEOUT_SECONDS must be between 1 and 120, got {}",
                self.fetch_timeout_seconds
            );
        }

        if self.retry_cooldown_ms == 0 {
            anyhow::bail!("RETRY_COOLDOWN_MS must be greater than 0");
        }

        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://") {
            anyhow::bail!(
                "API_BASE_URL must start with 'http://' or 'https://', got '{}'",
                self.api_base_url
            );
        }

        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        Ok(())
    }

    /// Prints configuration summary.
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);
        tracing::info!("  Blocklist database: {}", self.database_url);
        tracing::info!("  Cache snapshot: {}", self.cache_file.display());
        tracing::info!(
            "  Cache TTL: {}s, clear size: {}, write interval: {}s",
            self.cache_ttl_seconds,
            self.cache_clear_size,
            self.cache_write_interval
        );
        tracing::info!(
            "  Upstream: {} (timeout {}s, cooldown {}ms)",
            self.api_base_url,
            self.fetch_timeout_seconds,
            self.retry_cooldown_ms
        );
        if let Some(proxy) = &self.proxy_url {
            tracing::info!("  Proxy: {}", proxy);
        }
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
    }
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env();
    config.validate()?;
    Ok(config)
}
