//! Seller repository for database operations

use async_trait::async_trait;
use common::error::DatabaseResult;
use sqlx::PgPool;
use tracing::info;

use crate::models::{NewSeller, Seller, UpdateSeller};

const SELLER_COLUMNS: &str = "seller_id, email, password_hash, first_name, last_name, store_name, phone_number, created_at";

/// Persistence for seller accounts
#[async_trait]
pub trait SellerStore: Send + Sync {
    /// Insert a seller; a taken email yields `DatabaseError::Conflict`
    async fn create(&self, new_seller: &NewSeller) -> DatabaseResult<Seller>;

    /// Case-insensitive lookup by login email
    async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<Seller>>;

    async fn find_by_id(&self, seller_id: i64) -> DatabaseResult<Option<Seller>>;

    /// Apply a profile update; `None` when the seller does not exist
    async fn update_profile(
        &self,
        seller_id: i64,
        changes: &UpdateSeller,
    ) -> DatabaseResult<Option<Seller>>;
}

/// Seller repository
#[derive(Clone)]
pub struct PgSellerStore {
    pool: PgPool,
}

impl PgSellerStore {
    /// Create a new seller repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SellerStore for PgSellerStore {
    async fn create(&self, new_seller: &NewSeller) -> DatabaseResult<Seller> {
        info!("Creating new seller: {}", new_seller.store_name);

        let seller = sqlx::query_as::<_, Seller>(&format!(
            r#"
            INSERT INTO sellers (email, password_hash, first_name, last_name, store_name, phone_number)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {SELLER_COLUMNS}
            "#
        ))
        .bind(&new_seller.email)
        .bind(&new_seller.password_hash)
        .bind(&new_seller.first_name)
        .bind(&new_seller.last_name)
        .bind(&new_seller.store_name)
        .bind(&new_seller.phone_number)
        .fetch_one(&self.pool)
        .await?;

        Ok(seller)
    }

    async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<Seller>> {
        let seller = sqlx::query_as::<_, Seller>(&format!(
            r#"
            SELECT {SELLER_COLUMNS}
            FROM sellers
            WHERE LOWER(email) = LOWER($1)
            "#
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(seller)
    }

    async fn find_by_id(&self, seller_id: i64) -> DatabaseResult<Option<Seller>> {
        info!("Finding seller by ID: {}", seller_id);

        let seller = sqlx::query_as::<_, Seller>(&format!(
            r#"
            SELECT {SELLER_COLUMNS}
            FROM sellers
            WHERE seller_id = $1
            "#
        ))
        .bind(seller_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(seller)
    }

    async fn update_profile(
        &self,
        seller_id: i64,
        changes: &UpdateSeller,
    ) -> DatabaseResult<Option<Seller>> {
        info!("Updating profile for seller: {}", seller_id);

        let seller = sqlx::query_as::<_, Seller>(&format!(
            r#"
            UPDATE sellers
            SET first_name   = COALESCE($2, first_name),
                last_name    = COALESCE($3, last_name),
                store_name   = COALESCE($4, store_name),
                phone_number = CASE WHEN $5 THEN $6 ELSE phone_number END
            WHERE seller_id = $1
            RETURNING {SELLER_COLUMNS}
            "#
        ))
        .bind(seller_id)
        .bind(&changes.first_name)
        .bind(&changes.last_name)
        .bind(&changes.store_name)
        .bind(changes.phone_number.is_some())
        .bind(changes.phone_number.clone().flatten())
        .fetch_optional(&self.pool)
        .await?;

        Ok(seller)
    }
}
