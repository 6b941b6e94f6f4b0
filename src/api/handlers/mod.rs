//! HTTP request handlers for API endpoints.

pub mod block_bv;
pub mod blocklist;
pub mod health;
pub mod metrics;

pub use block_bv::block_bv_handler;
pub use blocklist::{alive_handler, block_handler, is_exist_handler, remove_handler};
pub use health::health_handler;
pub use metrics::metrics_handler;
