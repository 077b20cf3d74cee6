//! Review repository for database operations

use async_trait::async_trait;
use common::error::DatabaseResult;
use sqlx::PgPool;
use tracing::info;

use crate::models::{NewReview, Review, SellerReview};

#[async_trait]
pub trait ReviewStore: Send + Sync {
    async fn create(&self, review: &NewReview) -> DatabaseResult<Review>;

    /// Reviews of one product, newest first
    async fn find_by_product(&self, product_id: i64) -> DatabaseResult<Vec<Review>>;

    /// Reviews across all of a seller's products, newest first
    async fn find_by_seller(&self, seller_id: i64) -> DatabaseResult<Vec<SellerReview>>;
}

/// Review repository
#[derive(Clone)]
pub struct PgReviewStore {
    pool: PgPool,
}

impl PgReviewStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReviewStore for PgReviewStore {
    async fn create(&self, review: &NewReview) -> DatabaseResult<Review> {
        info!("Creating review for product {}", review.product_id);

        let created = sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO reviews (product_id, reviewer_name, reviewer_email, rating, comment)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING review_id, product_id, reviewer_name, reviewer_email, rating, comment, created_at
            "#,
        )
        .bind(review.product_id)
        .bind(&review.reviewer_name)
        .bind(&review.reviewer_email)
        .bind(review.rating)
        .bind(&review.comment)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn find_by_product(&self, product_id: i64) -> DatabaseResult<Vec<Review>> {
        let reviews = sqlx::query_as::<_, Review>(
            r#"
            SELECT review_id, product_id, reviewer_name, reviewer_email, rating, comment, created_at
            FROM reviews
            WHERE product_id = $1
            ORDER BY created_at DESC, review_id DESC
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }

    async fn find_by_seller(&self, seller_id: i64) -> DatabaseResult<Vec<SellerReview>> {
        let reviews = sqlx::query_as::<_, SellerReview>(
            r#"
            SELECT r.review_id, r.product_id, r.reviewer_name, r.reviewer_email, r.rating,
                   r.comment, r.created_at, p.name AS product_name
            FROM reviews r
            JOIN products p ON p.product_id = r.product_id
            WHERE p.seller_id = $1
            ORDER BY r.created_at DESC, r.review_id DESC
            "#,
        )
        .bind(seller_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }
}
