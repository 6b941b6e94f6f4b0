//! Repository trait for the durable blocklist store.

use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for blocked accounts, keyed by mid.
///
/// The store is a thin key-value collaborator: operations are processed one
/// at a time (the SQLite implementation serializes access through a
/// single-connection pool, so there is at most one in-flight operation).
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::SqliteBlocklistRepository`] - SQLite implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlocklistRepository: Send + Sync {
    /// Inserts a blocked account.
    ///
    /// Returns `Ok(false)` if the mid is already blocked (unique violation).
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn insert<'a>(&self, mid: i64, username: Option<&'a str>) -> Result<bool, AppError>;

    /// Whether the given mid is blocked.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn exists(&self, mid: i64) -> Result<bool, AppError>;

    /// Removes a blocked account.
    ///
    /// Returns `Ok(false)` if no row matched the mid.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn delete(&self, mid: i64) -> Result<bool, AppError>;

    /// Number of blocked accounts, for the metrics endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn count(&self) -> Result<i64, AppError>;
}
