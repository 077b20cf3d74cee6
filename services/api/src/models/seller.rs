//! Seller-facing views: dashboard figures and the public storefront

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use super::{Product, SellerReview};

/// Publicly visible seller fields; contact details stay private
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct PublicSeller {
    pub seller_id: i64,
    pub store_name: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
}

/// Figures shown on a seller's dashboard
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub total_products: usize,
    pub total_reviews: usize,
    pub average_rating: f64,
    pub recent_products: Vec<Product>,
    pub recent_reviews: Vec<SellerReview>,
}

/// Public storefront page data
#[derive(Debug, Clone, Serialize)]
pub struct Storefront {
    pub seller: PublicSeller,
    pub total_products: usize,
    pub total_reviews: usize,
    pub average_rating: f64,
    pub products: Vec<Product>,
}
