//! Application state for the HTTP server.

use std::sync::Arc;

use crate::page::PageShell;
use crate::services::areas::AreaService;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Static area layer
    pub areas: Arc<AreaService>,
    /// Page data built at startup
    pub page: Arc<PageShell>,
}

impl AppState {
    /// Create a new application state.
    pub fn new(areas: AreaService, page: PageShell) -> Self {
        Self {
            areas: Arc::new(areas),
            page: Arc::new(page),
        }
    }
}
