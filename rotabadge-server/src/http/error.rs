//! API error types with IntoResponse
//!
//! Badge URLs are usually embedded as `<img>` sources, so errors are plain
//! text rather than JSON.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use rotabadge_core::SelectError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Catalog is empty (404)
    NoBadges,

    /// Catalog lists a file that is gone from disk (404)
    FileMissing { name: String },

    /// Selection hit an internal inconsistency (500, logged)
    Selection(SelectError),

    /// I/O failure while serving a file (500, logged)
    Io(std::io::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::NoBadges => (StatusCode::NOT_FOUND, "No badges available".to_string()),
            Self::FileMissing { name } => (
                StatusCode::NOT_FOUND,
                format!("Badge file '{}' not found", name),
            ),
            Self::Selection(e) => {
                tracing::error!("Badge selection error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error selecting badge".to_string(),
                )
            }
            Self::Io(e) => {
                // Log the actual error, return generic message
                tracing::error!("IO error serving badge: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error reading badge".to_string(),
                )
            }
        };

        (status, message).into_response()
    }
}

impl From<SelectError> for ApiError {
    fn from(e: SelectError) -> Self {
        match e {
            SelectError::Empty => Self::NoBadges,
            _ => Self::Selection(e),
        }
    }
}

impl From<std::io::Error> for ApiError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
