use std::sync::Arc;

use crate::config::Config;
use crate::match_client::MatchService;
use crate::sessions::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Upstream matching service. `MatchClient` in production.
    pub matcher: Arc<dyn MatchService>,
    pub sessions: Arc<SessionStore>,
}
