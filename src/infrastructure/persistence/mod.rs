//! SQLite repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx with
//! runtime-bound queries against a local SQLite database.

pub mod sqlite_blocklist_repository;

pub use sqlite_blocklist_repository::{SqliteBlocklistRepository, init_schema};
