//! Seller dashboard figures and public storefronts

use std::sync::Arc;
use tracing::info;

use crate::{
    error::{ApiError, ApiResult},
    models::{DashboardStats, SellerReview, Storefront},
    repositories::{ProductStore, ReviewStore, SellerDirectory},
    reviews::rating_stats,
};

const RECENT_LIMIT: usize = 5;

#[derive(Clone)]
pub struct DashboardService {
    products: Arc<dyn ProductStore>,
    reviews: Arc<dyn ReviewStore>,
    sellers: Arc<dyn SellerDirectory>,
}

impl DashboardService {
    pub fn new(
        products: Arc<dyn ProductStore>,
        reviews: Arc<dyn ReviewStore>,
        sellers: Arc<dyn SellerDirectory>,
    ) -> Self {
        Self {
            products,
            reviews,
            sellers,
        }
    }

    /// Totals, average rating and latest activity for a seller's own dashboard
    pub async fn stats(&self, seller_id: i64) -> ApiResult<DashboardStats> {
        info!("Loading dashboard for seller {}", seller_id);

        let products = self.products.find_by_seller(seller_id).await?;
        let reviews = self.reviews.find_by_seller(seller_id).await?;
        let ratings: Vec<i32> = reviews.iter().map(|r| r.review.rating).collect();
        let stats = rating_stats(&ratings);

        Ok(DashboardStats {
            total_products: products.len(),
            total_reviews: stats.total_reviews,
            average_rating: stats.average_rating,
            recent_products: products.into_iter().take(RECENT_LIMIT).collect(),
            recent_reviews: reviews.into_iter().take(RECENT_LIMIT).collect(),
        })
    }

    /// Every review on the seller's products, newest first
    pub async fn reviews(&self, seller_id: i64) -> ApiResult<Vec<SellerReview>> {
        Ok(self.reviews.find_by_seller(seller_id).await?)
    }

    /// Public storefront: profile, active products and rating summary
    pub async fn storefront(&self, seller_id: i64) -> ApiResult<Storefront> {
        let seller = self
            .sellers
            .find_public(seller_id)
            .await?
            .ok_or(ApiError::NotFound("Seller"))?;

        let products = self.products.find_active_by_seller(seller_id).await?;
        let ratings: Vec<i32> = self
            .reviews
            .find_by_seller(seller_id)
            .await?
            .iter()
            .filter(|r| products.iter().any(|p| p.product_id == r.review.product_id))
            .map(|r| r.review.rating)
            .collect();
        let stats = rating_stats(&ratings);

        Ok(Storefront {
            seller,
            total_products: products.len(),
            total_reviews: stats.total_reviews,
            average_rating: stats.average_rating,
            products,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        catalog::ProductCatalog,
        models::{ProductForm, ReviewForm},
        repositories::memory::MemoryMarketplace,
        revalidation::RevalidationBus,
        reviews::ReviewService,
    };
    use serde_json::json;

    struct Fixture {
        catalog: ProductCatalog,
        reviews: ReviewService,
        dashboard: DashboardService,
    }

    async fn fixture() -> Fixture {
        let market = MemoryMarketplace::seeded();
        market.add_seller(1, "Clay Corner").await;
        market.add_seller(2, "Loom Room").await;
        let stores = market.stores();
        let bus = RevalidationBus::new();

        Fixture {
            catalog: ProductCatalog::new(stores.products.clone(), stores.categories.clone(), bus.clone()),
            reviews: ReviewService::new(stores.reviews.clone(), stores.products.clone(), bus),
            dashboard: DashboardService::new(stores.products, stores.reviews, stores.sellers),
        }
    }

    fn product(name: &str) -> ProductForm {
        ProductForm {
            name: Some(name.to_string()),
            description: Some("Handmade".to_string()),
            price: Some(json!("20")),
            stock_quantity: Some(json!(1)),
            category_id: Some(json!(2)),
            image_url: Some("https://img.example/item.jpg".to_string()),
            is_active: None,
        }
    }

    fn review(product_id: i64, rating: i64) -> ReviewForm {
        ReviewForm {
            product_id: Some(json!(product_id)),
            reviewer_name: Some("Sam".to_string()),
            reviewer_email: Some("sam@example.com".to_string()),
            rating: Some(json!(rating)),
            comment: None,
        }
    }

    #[tokio::test]
    async fn test_dashboard_stats() {
        let f = fixture().await;

        let mut ids = Vec::new();
        for i in 0..6 {
            ids.push(f.catalog.create(1, product(&format!("Ring {}", i))).await.unwrap().product_id);
        }
        let foreign = f.catalog.create(2, product("Scarf")).await.unwrap();

        f.reviews.submit(review(ids[0], 5)).await.unwrap();
        f.reviews.submit(review(ids[1], 4)).await.unwrap();
        f.reviews.submit(review(ids[1], 5)).await.unwrap();
        f.reviews.submit(review(foreign.product_id, 1)).await.unwrap();

        let stats = f.dashboard.stats(1).await.unwrap();
        assert_eq!(stats.total_products, 6);
        assert_eq!(stats.total_reviews, 3);
        assert_eq!(stats.average_rating, 4.7);
        assert_eq!(stats.recent_products.len(), 5);
        assert_eq!(stats.recent_products[0].product_id, ids[5]);
        assert_eq!(stats.recent_reviews.len(), 3);
        assert_eq!(stats.recent_reviews[0].product_name, "Ring 1");
    }

    #[tokio::test]
    async fn test_empty_dashboard() {
        let f = fixture().await;
        let stats = f.dashboard.stats(1).await.unwrap();
        assert_eq!(stats.total_products, 0);
        assert_eq!(stats.total_reviews, 0);
        assert_eq!(stats.average_rating, 0.0);
    }

    #[tokio::test]
    async fn test_seller_reviews_are_scoped() {
        let f = fixture().await;
        let mine = f.catalog.create(1, product("Bowl")).await.unwrap();
        let theirs = f.catalog.create(2, product("Scarf")).await.unwrap();
        f.reviews.submit(review(mine.product_id, 3)).await.unwrap();
        f.reviews.submit(review(theirs.product_id, 5)).await.unwrap();

        let reviews = f.dashboard.reviews(1).await.unwrap();
        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].product_name, "Bowl");
    }

    #[tokio::test]
    async fn test_storefront_shows_active_products_only() {
        let f = fixture().await;
        let shown = f.catalog.create(1, product("Vase")).await.unwrap();
        let hidden = f.catalog.create(1, product("Prototype")).await.unwrap();
        f.catalog
            .update(
                hidden.product_id,
                1,
                ProductForm {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        f.reviews.submit(review(shown.product_id, 4)).await.unwrap();

        let storefront = f.dashboard.storefront(1).await.unwrap();
        assert_eq!(storefront.seller.store_name, "Clay Corner");
        assert_eq!(storefront.total_products, 1);
        assert_eq!(storefront.products[0].product_id, shown.product_id);
        assert_eq!(storefront.average_rating, 4.0);

        let body = serde_json::to_value(&storefront).unwrap();
        assert!(body["seller"].get("email").is_none());
        assert!(body["seller"].get("phone_number").is_none());
    }

    #[tokio::test]
    async fn test_unknown_storefront_is_not_found() {
        let f = fixture().await;
        assert!(matches!(
            f.dashboard.storefront(77).await,
            Err(ApiError::NotFound("Seller"))
        ));
    }
}
