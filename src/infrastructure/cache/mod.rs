//! Resolution cache storage.
//!
//! [`MidCache`] holds resolved BV -> mid mappings in memory and snapshots
//! them to a JSON file with write throttling and atomic replace.

mod store;

pub use store::{MidCache, SnapshotError};
