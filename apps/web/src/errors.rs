use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub const TRANSPORT_FALLBACK_MESSAGE: &str = "An error occurred";

/// Terminal outcomes of a form submission. `Display` is the exact text shown
/// inline to the user.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatchError {
    /// Either field empty after trimming. Raised before any network call.
    #[error("Please fill in both resume and job description fields")]
    Validation,

    /// Upstream answered with a non-2xx status. Only the status is kept, for logs.
    #[error("Failed to get match results")]
    Request { status: u16 },

    /// Network failure or a body that does not parse as a match result.
    #[error("{0}")]
    Transport(String),
}

impl MatchError {
    /// Falls back to a generic message when the underlying failure has none.
    pub fn transport(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            MatchError::Transport(TRANSPORT_FALLBACK_MESSAGE.to_string())
        } else {
            MatchError::Transport(message)
        }
    }
}

impl From<reqwest::Error> for MatchError {
    fn from(e: reqwest::Error) -> Self {
        MatchError::transport(e.to_string())
    }
}

/// Application-level error type for the JSON surface.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<MatchError> for AppError {
    fn from(e: MatchError) -> Self {
        match e {
            MatchError::Validation => AppError::Validation(e.to_string()),
            MatchError::Request { .. } | MatchError::Transport(_) => {
                AppError::Upstream(e.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Upstream(msg) => {
                tracing::warn!("Upstream error: {msg}");
                (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", msg.clone())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
