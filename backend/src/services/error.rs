//! Error types for the area and overview services.

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Error type for service operations
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Network failure, timeout, bad status or undecodable body from a remote endpoint.
    #[error("Fetch error: {message} [url={url}]")]
    Fetch { url: String, message: String },

    /// The static area source could not be read or decoded.
    #[error("Service unavailable: {message} [source={source_path}]")]
    ServiceUnavailable {
        source_path: String,
        message: String,
    },

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ServiceError {
    pub fn fetch(url: impl Into<String>, message: impl ToString) -> Self {
        Self::Fetch {
            url: url.into(),
            message: message.to_string(),
        }
    }

    pub fn unavailable(source_path: impl Into<String>, message: impl ToString) -> Self {
        Self::ServiceUnavailable {
            source_path: source_path.into(),
            message: message.to_string(),
        }
    }

    /// Short machine-readable kind, used in HTTP error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::Fetch { .. } => "FETCH_ERROR",
            ServiceError::ServiceUnavailable { .. } => "SERVICE_UNAVAILABLE",
            ServiceError::Configuration(_) => "CONFIGURATION_ERROR",
        }
    }
}
