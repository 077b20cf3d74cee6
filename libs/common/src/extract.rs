//! Request extractors for seller-protected routes

use axum::{
    Json, async_trait,
    extract::{FromRef, FromRequestParts},
    http::{StatusCode, header, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use serde_json::json;
use tracing::error;

use crate::session::SessionManager;

/// Login entry point for page requests without a session
pub const LOGIN_PATH: &str = "/login";

/// The authenticated seller behind a request
///
/// Handlers that take this extractor only run with a valid, unrevoked
/// session. Page requests (`Accept: text/html`) without one are redirected
/// to the login page, everything else gets 401.
#[derive(Debug, Clone, Copy)]
pub struct CurrentSeller {
    pub seller_id: i64,
}

/// Rejection for requests without a usable session
#[derive(Debug)]
pub enum SessionRejection {
    RedirectToLogin,
    Unauthorized,
    Unavailable,
}

impl IntoResponse for SessionRejection {
    fn into_response(self) -> Response {
        match self {
            SessionRejection::RedirectToLogin => Redirect::to(LOGIN_PATH).into_response(),
            SessionRejection::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Not authenticated" })),
            )
                .into_response(),
            SessionRejection::Unavailable => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal server error" })),
            )
                .into_response(),
        }
    }
}

fn wants_html(parts: &Parts) -> bool {
    parts
        .headers
        .get(header::ACCEPT)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentSeller
where
    SessionManager: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = SessionRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let sessions = SessionManager::from_ref(state);
        let jar = CookieJar::from_headers(&parts.headers);

        let claims = sessions.read(&jar).await.map_err(|e| {
            error!("Failed to read session: {}", e);
            SessionRejection::Unavailable
        })?;

        match claims.and_then(|c| c.seller_id()) {
            Some(seller_id) => Ok(CurrentSeller { seller_id }),
            None if wants_html(parts) => Err(SessionRejection::RedirectToLogin),
            None => Err(SessionRejection::Unauthorized),
        }
    }
}
