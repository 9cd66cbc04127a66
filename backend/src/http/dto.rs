//! Data Transfer Objects for the HTTP API.
//!
//! The wave overview and the map scene are served as their model types and
//! the area layer as the file's own JSON; only request parameters and the
//! health response live here.

use serde::{Deserialize, Serialize};

pub use crate::models::WaveOverview;
pub use crate::widget::MapScene;

/// Query parameters for the map-scene endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SceneQuery {
    /// Restrict the scene to one region code (optional)
    #[serde(default)]
    pub code: Option<String>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Area data status
    pub areas: String,
}
