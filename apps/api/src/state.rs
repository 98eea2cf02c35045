use std::sync::Arc;

use crate::config::Config;
use crate::providers::ProviderRegistry;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Read-only after startup; shared without locking.
    pub registry: Arc<ProviderRegistry>,
    pub config: Config,
}
