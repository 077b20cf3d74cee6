//! Custom error types for the API service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::{error::DatabaseError, validation::ValidationError};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Custom error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    /// A form field was missing or malformed
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// The session's seller does not own the product, or it does not exist
    #[error("You do not have permission to modify this product")]
    NotAuthorized,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::Validation(e) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": e.message, "field": e.field }),
            ),
            ApiError::NotAuthorized => (StatusCode::FORBIDDEN, json!({ "error": self.to_string() })),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, json!({ "error": self.to_string() })),
            ApiError::Database(_) => {
                error!("Request failed: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal server error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
