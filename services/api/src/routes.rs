//! API service routes

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use common::{extract::CurrentSeller, validation::ValidationError};
use serde_json::json;
use tracing::info;

use crate::{
    AppState,
    error::ApiError,
    models::{ContactForm, ProductForm, ProductQuery, ReviewForm, ReviewQuery},
};

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/categories", get(list_categories))
        .route("/products", get(list_products).post(create_product))
        .route("/products/mine", get(my_products))
        .route(
            "/products/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/products/:id/rating", get(product_rating))
        .route("/reviews", get(list_reviews).post(submit_review))
        .route("/dashboard/stats", get(dashboard_stats))
        .route("/dashboard/reviews", get(dashboard_reviews))
        .route("/sellers/:id", get(storefront))
        .route("/contact", post(submit_contact))
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "api-service"
    }))
}

pub async fn list_categories(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.catalog.categories().await?))
}

/// Public product listing
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.catalog.list(&query).await?))
}

/// Create a product for the session's seller
pub async fn create_product(
    State(state): State<AppState>,
    seller: CurrentSeller,
    Json(form): Json<ProductForm>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Create product request from seller {}", seller.seller_id);

    let product = state.catalog.create(seller.seller_id, form).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// The session seller's inventory
pub async fn my_products(
    State(state): State<AppState>,
    seller: CurrentSeller,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.catalog.for_seller(seller.seller_id).await?))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.catalog.get(id).await?))
}

pub async fn update_product(
    State(state): State<AppState>,
    seller: CurrentSeller,
    Path(id): Path<i64>,
    Json(form): Json<ProductForm>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Update product {} request from seller {}", id, seller.seller_id);

    Ok(Json(state.catalog.update(id, seller.seller_id, form).await?))
}

pub async fn delete_product(
    State(state): State<AppState>,
    seller: CurrentSeller,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Delete product {} request from seller {}", id, seller.seller_id);

    state.catalog.delete(id, seller.seller_id).await?;
    Ok(Json(json!({"message": "Product deleted successfully"})))
}

pub async fn product_rating(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.reviews.stats_for_product(id).await?))
}

pub async fn list_reviews(
    State(state): State<AppState>,
    Query(query): Query<ReviewQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let product_id = query
        .product_id
        .ok_or_else(|| ValidationError::new("product_id", "Product is required"))?;

    Ok(Json(state.reviews.list_for_product(product_id).await?))
}

/// Anonymous review submission
pub async fn submit_review(
    State(state): State<AppState>,
    Json(form): Json<ReviewForm>,
) -> Result<impl IntoResponse, ApiError> {
    let review = state.reviews.submit(form).await?;
    Ok((StatusCode::CREATED, Json(review)))
}

pub async fn dashboard_stats(
    State(state): State<AppState>,
    seller: CurrentSeller,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.dashboard.stats(seller.seller_id).await?))
}

pub async fn dashboard_reviews(
    State(state): State<AppState>,
    seller: CurrentSeller,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.dashboard.reviews(seller.seller_id).await?))
}

/// Public seller storefront
pub async fn storefront(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.dashboard.storefront(id).await?))
}

pub async fn submit_contact(
    State(state): State<AppState>,
    Json(form): Json<ContactForm>,
) -> Result<impl IntoResponse, ApiError> {
    let saved = state.contact.submit(form).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({"id": saved.id, "message": "Thank you for your message!"})),
    ))
}
