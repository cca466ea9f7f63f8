//! Error types for align-synth HTTP handlers

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::synthesis::{SynthesisError, GENERIC_FAILURE_MESSAGE};

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Caller identity missing or malformed (401)
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    /// Conflict (409) - synthesis already running for the group
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Synthesis pipeline failure
    #[error(transparent)]
    Synthesis(#[from] SynthesisError),

    /// align-common error
    #[error("Common error: {0}")]
    Common(#[from] align_common::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::Unauthenticated(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHENTICATED", msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg),
            ApiError::Synthesis(err) => {
                let (status, code) = match err {
                    SynthesisError::Unauthorized => (StatusCode::FORBIDDEN, "FORBIDDEN"),
                    SynthesisError::EmptyInput => (StatusCode::UNPROCESSABLE_ENTITY, "NO_INTERVIEWS"),
                    SynthesisError::Configuration(_) => {
                        (StatusCode::SERVICE_UNAVAILABLE, "NOT_CONFIGURED")
                    }
                    SynthesisError::Upstream(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
                };
                (status, code, GENERIC_FAILURE_MESSAGE.to_string())
            }
            ApiError::Common(err) => match err {
                align_common::Error::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
                align_common::Error::InvalidInput(msg) => {
                    (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg)
                }
                other => {
                    error!("Request failed: {}", other);
                    (StatusCode::INTERNAL_SERVER_ERROR, "COMMON_ERROR", other.to_string())
                }
            },
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
