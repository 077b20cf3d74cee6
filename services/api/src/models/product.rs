//! Product and category models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

/// Product row joined with its category and seller names
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Product {
    pub product_id: i64,
    pub seller_id: i64,
    pub category_id: i64,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock_quantity: i32,
    pub image_url: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub category_name: String,
    pub store_name: String,
}

/// Validated product fields for an insert
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub category_id: i64,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock_quantity: i32,
    pub image_url: String,
}

/// Validated partial update; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct ProductChanges {
    pub category_id: Option<i64>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub stock_quantity: Option<i32>,
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
}

/// Product form as submitted
///
/// Numeric fields accept JSON numbers or numeric strings, since HTML forms
/// post everything as text.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductForm {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Value>,
    pub stock_quantity: Option<Value>,
    pub category_id: Option<Value>,
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
}

/// Filters for the public product listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductQuery {
    pub seller_id: Option<i64>,
    pub category_id: Option<i64>,
}

/// Category lookup row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Category {
    pub category_id: i64,
    pub name: String,
}
