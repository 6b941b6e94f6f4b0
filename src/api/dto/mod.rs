//! Data Transfer Objects for API requests and responses.

pub mod block_bv;
pub mod blocklist;
pub mod health;
pub mod metrics;
