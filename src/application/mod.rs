//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating the resolution
//! cache, the background worker's applied results, and the blocklist
//! repository. Services consume repository traits and provide a clean API
//! for HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::resolver_service::ResolverService`] - BV -> mid resolution façade
//! - [`services::blocklist_service::BlocklistService`] - blocked-accounts store

pub mod services;
