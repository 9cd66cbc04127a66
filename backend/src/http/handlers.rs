//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the area
//! service, the page shell or a server-side map widget.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::Value;
use tracing::{debug, warn};

use super::dto::{HealthResponse, MapScene, SceneQuery, WaveOverview};
use super::error::AppError;
use super::state::AppState;
use crate::services::areas::{feature_count, AreaService, AreaSource};
use crate::services::error::{ServiceError, ServiceResult};
use crate::widget::{AreaScope, MapProps, MapWidget, WidgetStatus};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

async fn read_areas<F>(areas: Arc<AreaService>, read: F) -> ServiceResult<Value>
where
    F: FnOnce(&AreaService) -> ServiceResult<Value> + Send + 'static,
{
    let path = areas.path().display().to_string();
    tokio::task::spawn_blocking(move || read(&areas))
        .await
        .map_err(|e| ServiceError::unavailable(path, format!("Task join error: {}", e)))?
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and the area file is readable.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let areas = match read_areas(state.areas.clone(), AreaService::get_all_areas).await {
        Ok(document) => format!("available ({} areas)", feature_count(&document)),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        areas,
    }))
}

// =============================================================================
// Area Data
// =============================================================================

/// GET /api/geojson-area
///
/// The static area file, unchanged.
pub async fn get_all_areas(State(state): State<AppState>) -> HandlerResult<Value> {
    let document = read_areas(state.areas.clone(), AreaService::get_all_areas).await?;
    Ok(Json(document))
}

/// GET /api/geojson-area/{code}
///
/// The area file narrowed to one region code. Always 200, possibly with no features.
pub async fn get_areas_by_code(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> HandlerResult<Value> {
    let lookup = code.clone();
    let document = read_areas(state.areas.clone(), move |areas| {
        areas.get_areas_by_code(&lookup)
    })
    .await?;
    debug!("{} areas match region code {}", feature_count(&document), code);
    Ok(Json(document))
}

// =============================================================================
// Page Data
// =============================================================================

/// GET /api/wave-overview
///
/// The wave overview built at startup.
pub async fn get_wave_overview(State(state): State<AppState>) -> HandlerResult<WaveOverview> {
    Ok(Json(state.page.wave_overview().as_ref().clone()))
}

/// GET /api/map-scene
///
/// Render model of a freshly mounted map widget, optionally scoped with `?code=`.
pub async fn get_map_scene(
    State(state): State<AppState>,
    Query(query): Query<SceneQuery>,
) -> HandlerResult<MapScene> {
    let scope = match query.code {
        Some(code) if code.trim().is_empty() => {
            return Err(AppError::BadRequest("code must not be empty".to_string()))
        }
        Some(code) => AreaScope::Region(code),
        None => AreaScope::All,
    };

    let props = MapProps {
        scope,
        ..state.page.map_props()
    };
    let source: Arc<dyn AreaSource> = state.areas.clone();
    let widget = MapWidget::mount(props, source);

    match widget.loaded().await {
        WidgetStatus::Failed { message } => {
            warn!("Map scene unavailable: {}", message);
            Err(ServiceError::unavailable(
                state.areas.path().display().to_string(),
                message,
            )
            .into())
        }
        _ => Ok(Json(widget.scene())),
    }
}
