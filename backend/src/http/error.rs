//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::services::error::ServiceError;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Invalid request (validation error)
    BadRequest(String),
    /// Area or overview service error
    Service(ServiceError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg)),
            AppError::Service(e) => {
                let status = match &e {
                    ServiceError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
                    ServiceError::Fetch { .. } => StatusCode::BAD_GATEWAY,
                    ServiceError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                let body = match &e {
                    ServiceError::ServiceUnavailable { source_path, .. } => {
                        ApiError::new(e.kind(), "Area data is unavailable").with_details(source_path.clone())
                    }
                    _ => ApiError::new(e.kind(), e.to_string()),
                };
                (status, body)
            }
        };

        (status, Json(error)).into_response()
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        AppError::Service(err)
    }
}
