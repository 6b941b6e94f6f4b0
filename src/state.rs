use crate::application::services::{BlocklistService, ResolverService};
use crate::infrastructure::persistence::SqliteBlocklistRepository;
use std::sync::Arc;

/// Shared application state injected into all handlers.
///
/// Handlers hold only references; all resolution state lives inside the one
/// [`ResolverService`] instance shared with the background worker.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<ResolverService>,
    pub blocklist: Arc<BlocklistService<SqliteBlocklistRepository>>,
}
