//! Product reviews and rating aggregation

use common::validation::{ValidationError, optional_text, required_text, validate_email};
use std::sync::Arc;
use tracing::info;

use crate::{
    error::{ApiError, ApiResult},
    catalog::parse_integer,
    models::{NewReview, RatingStats, Review, ReviewForm},
    repositories::{ProductStore, ReviewStore},
    revalidation::RevalidationBus,
};

const REVIEWER_NAME_MAX_LEN: usize = 100;
const COMMENT_MAX_LEN: usize = 2000;

/// Mean rating rounded to one decimal; no ratings means an average of 0
pub fn rating_stats(ratings: &[i32]) -> RatingStats {
    if ratings.is_empty() {
        return RatingStats {
            average_rating: 0.0,
            total_reviews: 0,
        };
    }

    let sum: i64 = ratings.iter().map(|&r| i64::from(r)).sum();
    let mean = sum as f64 / ratings.len() as f64;

    RatingStats {
        average_rating: (mean * 10.0).round() / 10.0,
        total_reviews: ratings.len(),
    }
}

#[derive(Clone)]
pub struct ReviewService {
    reviews: Arc<dyn ReviewStore>,
    products: Arc<dyn ProductStore>,
    revalidation: RevalidationBus,
}

impl ReviewService {
    pub fn new(
        reviews: Arc<dyn ReviewStore>,
        products: Arc<dyn ProductStore>,
        revalidation: RevalidationBus,
    ) -> Self {
        Self {
            reviews,
            products,
            revalidation,
        }
    }

    async fn ensure_product(&self, product_id: i64) -> ApiResult<()> {
        match self.products.find_by_id(product_id).await? {
            Some(_) => Ok(()),
            None => Err(ApiError::NotFound("Product")),
        }
    }

    /// Record a visitor's review
    pub async fn submit(&self, form: ReviewForm) -> ApiResult<Review> {
        let product_id = parse_integer("product_id", "Product", form.product_id.as_ref())?;
        let reviewer_name = required_text(
            "reviewer_name",
            "Name",
            form.reviewer_name.as_deref(),
            REVIEWER_NAME_MAX_LEN,
        )?;
        let reviewer_email = validate_email("reviewer_email", form.reviewer_email.as_deref())?;
        let rating = parse_integer("rating", "Rating", form.rating.as_ref())?;
        if !(1..=5).contains(&rating) {
            return Err(ValidationError::new("rating", "Rating must be between 1 and 5").into());
        }
        let comment = optional_text("comment", "Comment", form.comment.as_deref(), COMMENT_MAX_LEN)?;

        self.ensure_product(product_id).await?;

        let review = self
            .reviews
            .create(&NewReview {
                product_id,
                reviewer_name,
                reviewer_email,
                rating: rating as i32,
                comment,
            })
            .await?;

        info!(
            "Review {} submitted for product {}",
            review.review_id, product_id
        );
        self.revalidation.publish(format!("/products/{}", product_id));

        Ok(review)
    }

    /// Reviews of a product, newest first
    pub async fn list_for_product(&self, product_id: i64) -> ApiResult<Vec<Review>> {
        Ok(self.reviews.find_by_product(product_id).await?)
    }

    pub async fn stats_for_product(&self, product_id: i64) -> ApiResult<RatingStats> {
        self.ensure_product(product_id).await?;

        let ratings: Vec<i32> = self
            .reviews
            .find_by_product(product_id)
            .await?
            .iter()
            .map(|r| r.rating)
            .collect();

        Ok(rating_stats(&ratings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        catalog::ProductCatalog, models::ProductForm, repositories::memory::MemoryMarketplace,
    };
    use serde_json::json;

    #[test]
    fn test_rating_stats_rounds_to_one_decimal() {
        assert_eq!(
            rating_stats(&[5, 4, 5]),
            RatingStats {
                average_rating: 4.7,
                total_reviews: 3
            }
        );
        assert_eq!(rating_stats(&[4, 5]).average_rating, 4.5);
        assert_eq!(rating_stats(&[1, 2, 2]).average_rating, 1.7);
        assert_eq!(rating_stats(&[3]).average_rating, 3.0);
    }

    #[test]
    fn test_rating_stats_empty_is_zero() {
        let stats = rating_stats(&[]);
        assert_eq!(stats.average_rating, 0.0);
        assert_eq!(stats.total_reviews, 0);
        assert!(!stats.average_rating.is_nan());
    }

    async fn setup() -> (ReviewService, RevalidationBus, i64) {
        let market = MemoryMarketplace::seeded();
        market.add_seller(1, "Clay Corner").await;
        let stores = market.stores();
        let bus = RevalidationBus::new();

        let catalog = ProductCatalog::new(stores.products.clone(), stores.categories, bus.clone());
        let product = catalog
            .create(
                1,
                ProductForm {
                    name: Some("Mug".to_string()),
                    description: Some("Stoneware".to_string()),
                    price: Some(json!(12.5)),
                    stock_quantity: Some(json!(3)),
                    category_id: Some(json!(1)),
                    image_url: Some("https://img.example/mug.jpg".to_string()),
                    is_active: None,
                },
            )
            .await
            .unwrap();

        (
            ReviewService::new(stores.reviews, stores.products, bus.clone()),
            bus,
            product.product_id,
        )
    }

    fn review(product_id: i64, rating: i64) -> ReviewForm {
        ReviewForm {
            product_id: Some(json!(product_id)),
            reviewer_name: Some("Sam".to_string()),
            reviewer_email: Some("sam@example.com".to_string()),
            rating: Some(json!(rating)),
            comment: Some("Lovely glaze".to_string()),
        }
    }

    #[tokio::test]
    async fn test_submit_and_aggregate() {
        let (reviews, _, product_id) = setup().await;

        for rating in [5, 4, 5] {
            reviews.submit(review(product_id, rating)).await.unwrap();
        }

        let stats = reviews.stats_for_product(product_id).await.unwrap();
        assert_eq!(stats.average_rating, 4.7);
        assert_eq!(stats.total_reviews, 3);

        let listed = reviews.list_for_product(product_id).await.unwrap();
        assert_eq!(listed.len(), 3);
        assert!(listed[0].created_at >= listed[2].created_at);
    }

    #[tokio::test]
    async fn test_submit_revalidates_product_page() {
        let (reviews, bus, product_id) = setup().await;
        let mut rx = bus.subscribe();

        reviews.submit(review(product_id, 4)).await.unwrap();

        assert_eq!(rx.recv().await.unwrap(), format!("/products/{}", product_id));
    }

    #[tokio::test]
    async fn test_rating_out_of_range_is_rejected() {
        let (reviews, _, product_id) = setup().await;

        for rating in [0, 6] {
            let err = reviews.submit(review(product_id, rating)).await.unwrap_err();
            assert!(matches!(err, ApiError::Validation(ref v) if v.field == "rating"));
        }
        assert!(reviews.list_for_product(product_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_numeric_strings_are_accepted() {
        let (reviews, _, product_id) = setup().await;
        let mut form = review(product_id, 5);
        form.product_id = Some(json!(product_id.to_string()));
        form.rating = Some(json!(" 4 "));

        let saved = reviews.submit(form).await.unwrap();
        assert_eq!(saved.product_id, product_id);
        assert_eq!(saved.rating, 4);
    }

    #[tokio::test]
    async fn test_malformed_numbers_name_their_field() {
        let (reviews, _, product_id) = setup().await;

        for (field, value) in [
            ("rating", json!("five")),
            ("rating", json!(4.5)),
            ("rating", json!("")),
            ("product_id", json!("mug")),
            ("product_id", json!(true)),
        ] {
            let mut form = review(product_id, 5);
            match field {
                "rating" => form.rating = Some(value.clone()),
                _ => form.product_id = Some(value.clone()),
            }

            let err = reviews.submit(form).await.unwrap_err();
            assert!(
                matches!(err, ApiError::Validation(ref v) if v.field == field),
                "{} = {}",
                field,
                value
            );
        }
    }

    #[tokio::test]
    async fn test_review_for_missing_product_is_not_found() {
        let (reviews, _, _) = setup().await;

        assert!(matches!(
            reviews.submit(review(999, 5)).await,
            Err(ApiError::NotFound("Product"))
        ));
        assert!(matches!(
            reviews.stats_for_product(999).await,
            Err(ApiError::NotFound("Product"))
        ));
    }

    #[tokio::test]
    async fn test_blank_comment_is_stored_as_none() {
        let (reviews, _, product_id) = setup().await;
        let mut form = review(product_id, 5);
        form.comment = Some("   ".to_string());

        let saved = reviews.submit(form).await.unwrap();
        assert_eq!(saved.comment, None);
    }

    #[tokio::test]
    async fn test_no_reviews_means_zero_average() {
        let (reviews, _, product_id) = setup().await;
        let stats = reviews.stats_for_product(product_id).await.unwrap();
        assert_eq!(stats.average_rating, 0.0);
        assert_eq!(stats.total_reviews, 0);
    }
}
