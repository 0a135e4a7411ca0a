//! Custom error types for the sessions service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::{repositories::StoreError, validation::ValidationErrors};

/// Custom error type for the sessions service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Bad request with message
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Candidate record failed validation
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// Record not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Origin rejected by the CORS policy
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Internal server error with the message shown to the client
    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => ApiError::NotFound("Session not found".to_string()),
            StoreError::MalformedId(_) => ApiError::BadRequest("Invalid session id".to_string()),
            StoreError::Validation(errors) => ApiError::Validation(errors),
            StoreError::Storage(e) => {
                error!("Storage failure: {}", e);
                ApiError::InternalServerError("Internal server error".to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            ApiError::Validation(errors) => {
                let details: Vec<_> = errors
                    .errors
                    .iter()
                    .map(|e| json!({ "field": e.field, "message": e.to_string() }))
                    .collect();
                (
                    StatusCode::BAD_REQUEST,
                    json!({ "error": errors.to_string(), "details": details }),
                )
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, json!({ "error": msg })),
            ApiError::InternalServerError(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": msg }))
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
