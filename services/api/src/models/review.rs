//! Review models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

/// Review row; the reviewer's email is kept for follow-up but never echoed back
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Review {
    pub review_id: i64,
    pub product_id: i64,
    pub reviewer_name: String,
    #[serde(skip_serializing)]
    pub reviewer_email: String,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Review on one of a seller's products, as listed on the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct SellerReview {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub review: Review,
    pub product_name: String,
}

#[derive(Debug, Clone)]
pub struct NewReview {
    pub product_id: i64,
    pub reviewer_name: String,
    pub reviewer_email: String,
    pub rating: i32,
    pub comment: Option<String>,
}

/// Review form as submitted by a visitor
///
/// Numeric fields arrive as JSON numbers or numeric strings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewForm {
    pub product_id: Option<Value>,
    pub reviewer_name: Option<String>,
    pub reviewer_email: Option<String>,
    pub rating: Option<Value>,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewQuery {
    pub product_id: Option<i64>,
}

/// Average rating (one decimal) and review count
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RatingStats {
    pub average_rating: f64,
    pub total_reviews: usize,
}
