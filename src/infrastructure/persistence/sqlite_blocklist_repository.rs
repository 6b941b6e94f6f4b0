//! SQLite implementation of the blocklist repository.

use crate::domain::repositories::BlocklistRepository;
use crate::error::{AppError, map_sqlx_error};
use async_trait::async_trait;
use sqlx::SqlitePool;
use std::sync::Arc;

/// Blocked-accounts store backed by a local SQLite file.
///
/// The pool is configured with a single connection (see
/// [`crate::server::run`]), so every operation is serialized: at most one
/// statement is in flight at a time, matching the store's request/response
/// handoff contract.
pub struct SqliteBlocklistRepository {
    pool: Arc<SqlitePool>,
}

impl SqliteBlocklistRepository {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}

/// Creates the schema if it does not exist. Called once at startup.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            mid      INTEGER PRIMARY KEY
                             UNIQUE
                             NOT NULL,
            username TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

#[async_trait]
impl BlocklistRepository for SqliteBlocklistRepository {
    async fn insert<'a>(&self, mid: i64, username: Option<&'a str>) -> Result<bool, AppError> {
        let result = sqlx::query("INSERT INTO users (mid, username) VALUES (?1, ?2)")
            .bind(mid)
            .bind(username)
            .execute(self.pool.as_ref())
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(e) => {
                if let Some(db) = e.as_database_error()
                    && db.is_unique_violation()
                {
                    return Ok(false);
                }
                Err(map_sqlx_error(e))
            }
        }
    }

    async fn exists(&self, mid: i64) -> Result<bool, AppError> {
        let row: Option<i64> = sqlx::query_scalar("SELECT 1 FROM users WHERE mid = ?1")
            .bind(mid)
            .fetch_optional(self.pool.as_ref())
            .await
            .map_err(map_sqlx_error)?;
        Ok(row.is_some())
    }

    async fn delete(&self, mid: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE mid = ?1")
            .bind(mid)
            .execute(self.pool.as_ref())
            .await
            .map_err(map_sqlx_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<i64, AppError> {
        sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool.as_ref())
            .await
            .map_err(map_sqlx_error)
    }
}
