//! Application state for the HTTP server.

use std::sync::Arc;

use crate::config::PlannerConfig;
use crate::db::repository::FullRepository;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for storage operations
    pub repository: Arc<dyn FullRepository>,
    /// Planner configuration shared by fill and audit
    pub config: Arc<PlannerConfig>,
}

impl AppState {
    /// Create a new application state with the given repository and config.
    pub fn new(repository: Arc<dyn FullRepository>, config: PlannerConfig) -> Self {
        Self {
            repository,
            config: Arc::new(config),
        }
    }
}
