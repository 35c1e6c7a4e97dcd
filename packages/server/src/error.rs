//! Route-level error handling.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Errors a handler can return.
#[derive(Debug)]
pub enum AppError {
    /// No valid session cookie.
    Unauthorized,

    /// The request body or parameters were unusable.
    BadRequest(String),

    /// An upstream collaborator (search engine) failed.
    Upstream(String),

    /// Anything unexpected (database, rendering).
    Internal(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Wymagane logowanie" })),
            )
                .into_response(),
            AppError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            AppError::Upstream(message) => {
                (StatusCode::BAD_GATEWAY, Json(json!({ "error": message }))).into_response()
            }
            AppError::Internal(error) => {
                tracing::error!(error = %error, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Błąd serwera" })),
                )
                    .into_response()
            }
        }
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(error: E) -> Self {
        AppError::Internal(error.into())
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
