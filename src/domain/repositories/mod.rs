//! Repository trait definitions for the domain layer.
//!
//! These traits abstract the two external collaborators the resolver core
//! depends on: the unreliable upstream lookup API and the durable blocklist
//! store. Concrete implementations live in `crate::infrastructure`; mocks are
//! auto-generated via `mockall` for testing.

pub mod blocklist_repository;
pub mod mid_fetcher;

pub use blocklist_repository::BlocklistRepository;
pub use mid_fetcher::MidFetcher;

#[cfg(test)]
pub use blocklist_repository::MockBlocklistRepository;
#[cfg(test)]
pub use mid_fetcher::MockMidFetcher;
