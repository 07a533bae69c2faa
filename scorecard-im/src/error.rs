//! Error types for the import module API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::services::column_resolver::MappingProposal;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Conflict (409) - e.g., duplicate record for the same period
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A required canonical field has no header (400); carries the
    /// proposal so the caller can route to manual mapping
    #[error("Column mapping incomplete")]
    MappingIncomplete(MappingProposal),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// Generic error
    #[error(transparent)]
    Other(#[from] anyhow::Error),

    /// scorecard-common error
    #[error("Common error: {0}")]
    Common(#[from] scorecard_common::Error),
}

fn error_body(code: &str, message: String) -> Value {
    json!({
        "error": {
            "code": code,
            "message": message,
        }
    })
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::MappingIncomplete(proposal) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": {
                        "code": "MAPPING_INCOMPLETE",
                        "message": format!(
                            "Required fields have no mapped header: {}",
                            proposal.unmapped_required.join(", ")
                        ),
                        "proposal": proposal,
                    }
                }),
            ),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, error_body("NOT_FOUND", msg)),
            ApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, error_body("BAD_REQUEST", msg))
            }
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, error_body("CONFLICT", msg)),
            ApiError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_body("INTERNAL_ERROR", msg),
            ),
            ApiError::Other(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_body("INTERNAL_ERROR", err.to_string()),
            ),
            ApiError::Common(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_body("COMMON_ERROR", err.to_string()),
            ),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
