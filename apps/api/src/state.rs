use std::sync::Arc;

use crate::config::Config;
use crate::parsing::sessions::UploadSessions;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Per-page upload controllers, all backed by the same parsing client.
    pub sessions: Arc<UploadSessions>,
}
