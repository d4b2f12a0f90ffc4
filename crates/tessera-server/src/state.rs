//! Application state shared across handlers.

use std::sync::Arc;

use tessera_session::Manager;

use crate::config::ServerConfig;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Session manager.
    pub manager: Arc<Manager>,

    /// Server configuration.
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Create a new application state.
    pub fn new(manager: Manager, config: ServerConfig) -> Self {
        Self {
            manager: Arc::new(manager),
            config: Arc::new(config),
        }
    }

    /// Create application state around an already shared manager.
    pub fn with_shared_manager(manager: Arc<Manager>, config: ServerConfig) -> Self {
        Self {
            manager,
            config: Arc::new(config),
        }
    }
}
