//! Seller model and related payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Seller entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Seller {
    pub seller_id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub store_name: String,
    pub phone_number: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// New seller creation payload (password already hashed)
#[derive(Debug, Clone)]
pub struct NewSeller {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub store_name: String,
    pub phone_number: Option<String>,
}

/// Seller profile update; `None` leaves a column untouched
#[derive(Debug, Clone, Default)]
pub struct UpdateSeller {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub store_name: Option<String>,
    /// `Some(None)` clears the phone number
    pub phone_number: Option<Option<String>>,
}

/// Signup form
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignupRequest {
    #[serde(alias = "firstName")]
    pub first_name: Option<String>,
    #[serde(alias = "lastName")]
    pub last_name: Option<String>,
    #[serde(alias = "storeName")]
    pub store_name: Option<String>,
    pub email: Option<String>,
    #[serde(alias = "phone")]
    pub phone_number: Option<String>,
    pub password: Option<String>,
}

/// Login form
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Profile edit form; absent fields are left unchanged, a blank phone clears it
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub store_name: Option<String>,
    pub phone_number: Option<String>,
}

/// Seller profile as returned to its owner
#[derive(Debug, Clone, Serialize)]
pub struct SellerProfile {
    pub seller_id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub store_name: String,
    pub phone_number: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Seller> for SellerProfile {
    fn from(seller: Seller) -> Self {
        Self {
            seller_id: seller.seller_id,
            email: seller.email,
            first_name: seller.first_name,
            last_name: seller.last_name,
            store_name: seller.store_name,
            phone_number: seller.phone_number,
            created_at: seller.created_at,
        }
    }
}
