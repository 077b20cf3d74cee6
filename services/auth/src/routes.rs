//! Authentication service routes

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use axum_extra::extract::cookie::CookieJar;
use common::extract::CurrentSeller;
use tracing::info;

use crate::{
    AppState,
    error::AuthError,
    models::{LoginRequest, SellerProfile, SignupRequest, UpdateProfileRequest},
};

/// Create the router for the authentication service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me))
        .route("/auth/profile", put(update_profile))
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "auth-service"
    }))
}

/// Seller signup endpoint; logs the new seller in
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(form): Json<SignupRequest>,
) -> Result<impl IntoResponse, AuthError> {
    info!("Signup request");

    let seller = state.accounts.signup(form).await?;
    let issued = state.sessions.issue(seller.seller_id)?;
    let jar = jar.add(state.sessions.cookie(issued.token));

    Ok((StatusCode::CREATED, jar, Json(SellerProfile::from(seller))))
}

/// Seller login endpoint
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(form): Json<LoginRequest>,
) -> Result<impl IntoResponse, AuthError> {
    info!("Login request");

    let seller = state.accounts.login(form).await?;
    let issued = state.sessions.issue(seller.seller_id)?;
    let jar = jar.add(state.sessions.cookie(issued.token));

    Ok((StatusCode::OK, jar, Json(SellerProfile::from(seller))))
}

/// Logout endpoint; succeeds with or without a live session
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    info!("Logout request");

    let jar = state.sessions.revoke(jar).await;

    (
        StatusCode::OK,
        jar,
        Json(serde_json::json!({"message": "Logged out successfully"})),
    )
}

/// Current seller's own profile
pub async fn me(
    State(state): State<AppState>,
    seller: CurrentSeller,
) -> Result<Json<SellerProfile>, AuthError> {
    let seller = state.accounts.profile(seller.seller_id).await?;
    Ok(Json(SellerProfile::from(seller)))
}

/// Partial edit of the current seller's profile
pub async fn update_profile(
    State(state): State<AppState>,
    seller: CurrentSeller,
    Json(form): Json<UpdateProfileRequest>,
) -> Result<Json<SellerProfile>, AuthError> {
    let seller = state.accounts.update_profile(seller.seller_id, form).await?;
    Ok(Json(SellerProfile::from(seller)))
}
