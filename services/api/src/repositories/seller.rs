//! Read-only seller lookups for public pages

use async_trait::async_trait;
use common::error::DatabaseResult;
use sqlx::PgPool;

use crate::models::PublicSeller;

#[async_trait]
pub trait SellerDirectory: Send + Sync {
    async fn find_public(&self, seller_id: i64) -> DatabaseResult<Option<PublicSeller>>;
}

#[derive(Clone)]
pub struct PgSellerDirectory {
    pool: PgPool,
}

impl PgSellerDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SellerDirectory for PgSellerDirectory {
    async fn find_public(&self, seller_id: i64) -> DatabaseResult<Option<PublicSeller>> {
        let seller = sqlx::query_as::<_, PublicSeller>(
            r#"
            SELECT seller_id, store_name, first_name, last_name, created_at
            FROM sellers
            WHERE seller_id = $1
            "#,
        )
        .bind(seller_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(seller)
    }
}
