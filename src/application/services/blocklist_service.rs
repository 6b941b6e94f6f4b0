//! Blocklist management service.

use crate::domain::repositories::BlocklistRepository;
use crate::error::AppError;
use serde_json::json;
use std::sync::Arc;

/// Service for the blocked-accounts store.
///
/// A thin orchestration layer over [`BlocklistRepository`]: it validates the
/// mid, normalizes the optional username, and passes through the store's
/// one-at-a-time request/response semantics unchanged.
pub struct BlocklistService<R: BlocklistRepository> {
    repository: Arc<R>,
}

impl<R: BlocklistRepository> BlocklistService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Blocks an account. Returns `Ok(false)` if it was already blocked.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for a non-positive mid and
    /// [`AppError::Internal`] on database errors.
    pub async fn block(&self, mid: i64, username: Option<&str>) -> Result<bool, AppError> {
        Self::validate_mid(mid)?;
        let username = username.map(str::trim).filter(|u| !u.is_empty());
        self.repository.insert(mid, username).await
    }

    /// Unblocks an account. Returns `Ok(false)` if it was not blocked.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for a non-positive mid and
    /// [`AppError::Internal`] on database errors.
    pub async fn unblock(&self, mid: i64) -> Result<bool, AppError> {
        Self::validate_mid(mid)?;
        self.repository.delete(mid).await
    }

    /// Whether the account is currently blocked.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn is_blocked(&self, mid: i64) -> Result<bool, AppError> {
        self.repository.exists(mid).await
    }

    /// Total number of blocked accounts.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn count(&self) -> Result<i64, AppError> {
        self.repository.count().await
    }

    fn validate_mid(mid: i64) -> Result<(), AppError> {
        if mid <= 0 {
            return Err(AppError::bad_request(
                "mid must be positive",
                json!({ "mid": mid }),
            ));
        }
        Ok(())
    }
}
