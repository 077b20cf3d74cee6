//! Category repository

use async_trait::async_trait;
use common::error::DatabaseResult;
use sqlx::PgPool;

use crate::models::Category;

#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// All categories, alphabetically
    async fn find_all(&self) -> DatabaseResult<Vec<Category>>;

    async fn exists(&self, category_id: i64) -> DatabaseResult<bool>;
}

#[derive(Clone)]
pub struct PgCategoryStore {
    pool: PgPool,
}

impl PgCategoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryStore for PgCategoryStore {
    async fn find_all(&self) -> DatabaseResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT category_id, name FROM categories ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    async fn exists(&self, category_id: i64) -> DatabaseResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM categories WHERE category_id = $1)")
                .bind(category_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }
}
