//! Upstream lookup client.

mod bilibili;

pub use bilibili::BilibiliFetcher;
