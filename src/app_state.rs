//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::config::RelayConfig;
use crate::domain::ConnectionRegistry;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Registry of live chat connections.
    pub registry: Arc<ConnectionRegistry>,
    /// Relay configuration loaded at startup.
    pub config: Arc<RelayConfig>,
}
