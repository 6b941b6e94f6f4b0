//! Business logic services for the application layer.

pub mod blocklist_service;
pub mod resolver_service;

pub use blocklist_service::BlocklistService;
pub use resolver_service::{ResolverConfig, ResolverMetrics, ResolverService};
