use std::sync::Arc;

use crate::config::Config;
use crate::site::generator::SiteModel;

/// Shared application state injected into all route handlers via Axum extractors.
/// Immutable; requests never share anything mutable through it.
#[derive(Clone)]
pub struct AppState {
    /// Site generation backend. Production: `LlmClient`.
    pub model: Arc<dyn SiteModel>,
    pub config: Config,
}
