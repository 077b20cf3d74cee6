//! Error type for the authentication service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::{error::DatabaseError, session::SessionError, validation::ValidationError};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::password::PasswordError;

/// Errors surfaced by the auth handlers
///
/// Every failed login is `InvalidCredentials`, whatever the cause, so callers
/// cannot tell which emails are registered.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Too many login attempts. Try again later.")]
    TooManyAttempts,

    #[error("Seller not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<PasswordError> for AuthError {
    fn from(err: PasswordError) -> Self {
        match err {
            PasswordError::Empty => {
                AuthError::Validation(ValidationError::new("password", "Password is required"))
            }
            other => AuthError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AuthError::Validation(e) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": e.message, "field": e.field }),
            ),
            AuthError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, json!({ "error": self.to_string() }))
            }
            AuthError::TooManyAttempts => (
                StatusCode::TOO_MANY_REQUESTS,
                json!({ "error": self.to_string() }),
            ),
            AuthError::NotFound => (StatusCode::NOT_FOUND, json!({ "error": self.to_string() })),
            AuthError::Database(_) | AuthError::Session(_) | AuthError::Internal(_) => {
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
