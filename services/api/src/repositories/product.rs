//! Product repository for database operations
//!
//! Every mutation carries the caller's seller id in its `WHERE` clause, so
//! a foreign or missing product simply matches no row.

use async_trait::async_trait;
use common::error::DatabaseResult;
use sqlx::PgPool;
use tracing::info;

use crate::models::{NewProduct, Product, ProductChanges};

/// Persistence for products
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn create(&self, seller_id: i64, product: &NewProduct) -> DatabaseResult<Product>;

    async fn find_by_id(&self, product_id: i64) -> DatabaseResult<Option<Product>>;

    /// All of a seller's products, inactive included, newest first
    async fn find_by_seller(&self, seller_id: i64) -> DatabaseResult<Vec<Product>>;

    /// Active products of one seller, newest first
    async fn find_active_by_seller(&self, seller_id: i64) -> DatabaseResult<Vec<Product>>;

    /// Active products across all sellers, newest first
    async fn find_all_active(&self) -> DatabaseResult<Vec<Product>>;

    /// Active products in one category, newest first
    async fn find_active_by_category(&self, category_id: i64) -> DatabaseResult<Vec<Product>>;

    /// Update a product owned by `seller_id`; `None` when no such product
    async fn update(
        &self,
        product_id: i64,
        seller_id: i64,
        changes: &ProductChanges,
    ) -> DatabaseResult<Option<Product>>;

    /// Delete a product owned by `seller_id`; `false` when no such product
    async fn delete(&self, product_id: i64, seller_id: i64) -> DatabaseResult<bool>;
}

/// Build a product query over `source` (a table or CTE aliased as `p`)
fn product_query(source: &str, filter: &str) -> String {
    format!(
        r#"
        SELECT p.product_id, p.seller_id, p.category_id, p.name, p.description, p.price,
               p.stock_quantity, p.image_url, p.is_active, p.created_at,
               c.name AS category_name, s.store_name
        FROM {source} p
        JOIN categories c ON c.category_id = p.category_id
        JOIN sellers s ON s.seller_id = p.seller_id
        {filter}
        "#
    )
}

const NEWEST_FIRST: &str = "ORDER BY p.created_at DESC, p.product_id DESC";

/// Product repository
#[derive(Clone)]
pub struct PgProductStore {
    pool: PgPool,
}

impl PgProductStore {
    /// Create a new product repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn list(&self, filter: &str, bind: Option<i64>) -> DatabaseResult<Vec<Product>> {
        let sql = product_query("products", filter);
        let mut query = sqlx::query_as::<_, Product>(&sql);
        if let Some(value) = bind {
            query = query.bind(value);
        }
        Ok(query.fetch_all(&self.pool).await?)
    }
}

#[async_trait]
impl ProductStore for PgProductStore {
    async fn create(&self, seller_id: i64, product: &NewProduct) -> DatabaseResult<Product> {
        info!("Creating product '{}' for seller {}", product.name, seller_id);

        let sql = format!(
            r#"
            WITH inserted AS (
                INSERT INTO products
                    (seller_id, category_id, name, description, price, stock_quantity, image_url)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING *
            )
            {}
            "#,
            product_query("inserted", "")
        );

        let created = sqlx::query_as::<_, Product>(&sql)
            .bind(seller_id)
            .bind(product.category_id)
            .bind(&product.name)
            .bind(&product.description)
            .bind(product.price)
            .bind(product.stock_quantity)
            .bind(&product.image_url)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    async fn find_by_id(&self, product_id: i64) -> DatabaseResult<Option<Product>> {
        let sql = product_query("products", "WHERE p.product_id = $1");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(product_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    async fn find_by_seller(&self, seller_id: i64) -> DatabaseResult<Vec<Product>> {
        info!("Listing products for seller {}", seller_id);
        self.list(&format!("WHERE p.seller_id = $1 {NEWEST_FIRST}"), Some(seller_id))
            .await
    }

    async fn find_active_by_seller(&self, seller_id: i64) -> DatabaseResult<Vec<Product>> {
        self.list(
            &format!("WHERE p.seller_id = $1 AND p.is_active {NEWEST_FIRST}"),
            Some(seller_id),
        )
        .await
    }

    async fn find_all_active(&self) -> DatabaseResult<Vec<Product>> {
        self.list(&format!("WHERE p.is_active {NEWEST_FIRST}"), None)
            .await
    }

    async fn find_active_by_category(&self, category_id: i64) -> DatabaseResult<Vec<Product>> {
        self.list(
            &format!("WHERE p.category_id = $1 AND p.is_active {NEWEST_FIRST}"),
            Some(category_id),
        )
        .await
    }

    async fn update(
        &self,
        product_id: i64,
        seller_id: i64,
        changes: &ProductChanges,
    ) -> DatabaseResult<Option<Product>> {
        info!("Updating product {} for seller {}", product_id, seller_id);

        let sql = format!(
            r#"
            WITH updated AS (
                UPDATE products
                SET category_id    = COALESCE($3, category_id),
                    name           = COALESCE($4, name),
                    description    = COALESCE($5, description),
                    price          = COALESCE($6, price),
                    stock_quantity = COALESCE($7, stock_quantity),
                    image_url      = COALESCE($8, image_url),
                    is_active      = COALESCE($9, is_active)
                WHERE product_id = $1 AND seller_id = $2
                RETURNING *
            )
            {}
            "#,
            product_query("updated", "")
        );

        let updated = sqlx::query_as::<_, Product>(&sql)
            .bind(product_id)
            .bind(seller_id)
            .bind(changes.category_id)
            .bind(&changes.name)
            .bind(&changes.description)
            .bind(changes.price)
            .bind(changes.stock_quantity)
            .bind(&changes.image_url)
            .bind(changes.is_active)
            .fetch_optional(&self.pool)
            .await?;

        Ok(updated)
    }

    async fn delete(&self, product_id: i64, seller_id: i64) -> DatabaseResult<bool> {
        info!("Deleting product {} for seller {}", product_id, seller_id);

        let result = sqlx::query(
            r#"
            DELETE FROM products
            WHERE product_id = $1 AND seller_id = $2
            "#,
        )
        .bind(product_id)
        .bind(seller_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
