//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! concrete implementations for persistence and the upstream lookup client.
//!
//! # Modules
//!
//! - [`cache`] - persistent BV -> mid resolution cache
//! - [`fetch`] - Bilibili HTTP lookup client
//! - [`persistence`] - SQLite blocklist repository

pub mod cache;
pub mod fetch;
pub mod persistence;
