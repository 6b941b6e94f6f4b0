//! Domain layer: resolution value types, collaborator traits, and the
//! background resolution worker.
//!
//! # Resolution Flow
//!
//! 1. An HTTP handler asks [`crate::application::services::ResolverService`]
//!    for a BV's owner mid
//! 2. On a miss the BV enters the pending set and the task queue
//! 3. [`resolve_worker::run_resolve_worker`] drains the queue and fans the
//!    batch out through [`repositories::MidFetcher`]
//! 4. Successful lookups become [`resolution::CacheEntry`] values; failures
//!    are re-queued and retried after a cooldown

pub mod repositories;
pub mod resolution;
pub mod resolve_worker;
