//! # bv-guard
//!
//! A Bilibili blocklist service with a persistent BV -> mid resolution cache,
//! built with Axum and SQLite.
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - resolution value types, collaborator
//!   traits, and the background resolution worker
//! - **Application Layer** ([`application`]) - the resolution façade and
//!   blocklist orchestration
//! - **Infrastructure Layer** ([`infrastructure`]) - cache snapshots, SQLite
//!   blocklist, Bilibili HTTP client
//! - **API Layer** ([`api`]) - HTTP handlers, DTOs, and middleware
//!
//! ## Features
//!
//! - Non-blocking BV -> mid resolution: cache hits answer immediately,
//!   misses are queued for a single background worker that batches
//!   concurrent upstream lookups
//! - Request deduplication: at most one queued/in-flight lookup per BV
//! - Retry with a fixed cooldown after failing batches, without a retry
//!   ceiling
//! - Time-based cache eviction and throttled snapshot persistence
//!
//! ## Quick Start
//!
//! ```bash
//! # All configuration is optional; defaults match the stock deployment.
//! export LISTEN="127.0.0.1:22332"
//! export DATABASE_URL="sqlite://blocked_users.db?mode=rwc"
//!
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via
//! [`config::Config`]. See the [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{
        BlocklistService, ResolverConfig, ResolverMetrics, ResolverService,
    };
    pub use crate::domain::repositories::{BlocklistRepository, MidFetcher};
    pub use crate::domain::resolution::{CacheEntry, FetchError, FetchResult};
    pub use crate::error::AppError;
    pub use crate::state::AppState;
}
