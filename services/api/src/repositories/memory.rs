//! In-memory marketplace backing the service and router tests

use async_trait::async_trait;
use chrono::{Duration, Utc};
use common::error::DatabaseResult;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::{CategoryStore, ContactStore, ProductStore, ReviewStore, SellerDirectory, Stores};
use crate::models::{
    Category, ContactMessage, NewContactMessage, NewProduct, NewReview, Product, ProductChanges,
    PublicSeller, Review, SellerReview,
};

#[derive(Default)]
struct Tables {
    sellers: Vec<PublicSeller>,
    categories: Vec<Category>,
    products: Vec<Product>,
    reviews: Vec<Review>,
    contacts: Vec<ContactMessage>,
    ticks: i64,
}

impl Tables {
    /// Strictly increasing timestamps so newest-first order is deterministic
    fn now(&mut self) -> chrono::DateTime<Utc> {
        self.ticks += 1;
        Utc::now() + Duration::milliseconds(self.ticks)
    }

    fn store_name(&self, seller_id: i64) -> String {
        self.sellers
            .iter()
            .find(|s| s.seller_id == seller_id)
            .map(|s| s.store_name.clone())
            .unwrap_or_default()
    }

    fn category_name(&self, category_id: i64) -> String {
        self.categories
            .iter()
            .find(|c| c.category_id == category_id)
            .map(|c| c.name.clone())
            .unwrap_or_default()
    }

    fn newest_first(&self, keep: impl Fn(&Product) -> bool) -> Vec<Product> {
        let mut products: Vec<Product> = self.products.iter().filter(|p| keep(p)).cloned().collect();
        products.sort_by(|a, b| {
            (b.created_at, b.product_id).cmp(&(a.created_at, a.product_id))
        });
        products
    }
}

/// Every store trait over one shared set of tables
#[derive(Default)]
pub struct MemoryMarketplace {
    tables: Mutex<Tables>,
}

impl MemoryMarketplace {
    /// Categories 1..=6 and no sellers
    pub fn seeded() -> Arc<Self> {
        let names = ["Ceramics", "Jewelry", "Textiles", "Woodwork", "Home Decor", "Art"];
        let tables = Tables {
            categories: names
                .iter()
                .enumerate()
                .map(|(i, name)| Category {
                    category_id: i as i64 + 1,
                    name: name.to_string(),
                })
                .collect(),
            ..Default::default()
        };
        Arc::new(Self {
            tables: Mutex::new(tables),
        })
    }

    pub async fn add_seller(&self, seller_id: i64, store_name: &str) {
        let mut tables = self.tables.lock().await;
        let created_at = tables.now();
        tables.sellers.push(PublicSeller {
            seller_id,
            store_name: store_name.to_string(),
            first_name: "Test".to_string(),
            last_name: "Seller".to_string(),
            created_at,
        });
    }

    pub async fn contact_count(&self) -> usize {
        self.tables.lock().await.contacts.len()
    }

    pub fn stores(self: &Arc<Self>) -> Stores {
        Stores {
            products: self.clone(),
            categories: self.clone(),
            reviews: self.clone(),
            contacts: self.clone(),
            sellers: self.clone(),
        }
    }
}

#[async_trait]
impl ProductStore for MemoryMarketplace {
    async fn create(&self, seller_id: i64, product: &NewProduct) -> DatabaseResult<Product> {
        let mut tables = self.tables.lock().await;
        let created = Product {
            product_id: tables.products.iter().map(|p| p.product_id).max().unwrap_or(0) + 1,
            seller_id,
            category_id: product.category_id,
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            stock_quantity: product.stock_quantity,
            image_url: product.image_url.clone(),
            is_active: true,
            created_at: tables.now(),
            category_name: tables.category_name(product.category_id),
            store_name: tables.store_name(seller_id),
        };
        tables.products.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, product_id: i64) -> DatabaseResult<Option<Product>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .products
            .iter()
            .find(|p| p.product_id == product_id)
            .cloned())
    }

    async fn find_by_seller(&self, seller_id: i64) -> DatabaseResult<Vec<Product>> {
        let tables = self.tables.lock().await;
        Ok(tables.newest_first(|p| p.seller_id == seller_id))
    }

    async fn find_active_by_seller(&self, seller_id: i64) -> DatabaseResult<Vec<Product>> {
        let tables = self.tables.lock().await;
        Ok(tables.newest_first(|p| p.seller_id == seller_id && p.is_active))
    }

    async fn find_all_active(&self) -> DatabaseResult<Vec<Product>> {
        let tables = self.tables.lock().await;
        Ok(tables.newest_first(|p| p.is_active))
    }

    async fn find_active_by_category(&self, category_id: i64) -> DatabaseResult<Vec<Product>> {
        let tables = self.tables.lock().await;
        Ok(tables.newest_first(|p| p.category_id == category_id && p.is_active))
    }

    async fn update(
        &self,
        product_id: i64,
        seller_id: i64,
        changes: &ProductChanges,
    ) -> DatabaseResult<Option<Product>> {
        let mut tables = self.tables.lock().await;
        let category_name = changes
            .category_id
            .map(|id| tables.category_name(id));

        let Some(product) = tables
            .products
            .iter_mut()
            .find(|p| p.product_id == product_id && p.seller_id == seller_id)
        else {
            return Ok(None);
        };

        if let Some(category_id) = changes.category_id {
            product.category_id = category_id;
        }
        if let Some(category_name) = category_name {
            product.category_name = category_name;
        }
        if let Some(name) = &changes.name {
            product.name = name.clone();
        }
        if let Some(description) = &changes.description {
            product.description = description.clone();
        }
        if let Some(price) = changes.price {
            product.price = price;
        }
        if let Some(stock_quantity) = changes.stock_quantity {
            product.stock_quantity = stock_quantity;
        }
        if let Some(image_url) = &changes.image_url {
            product.image_url = image_url.clone();
        }
        if let Some(is_active) = changes.is_active {
            product.is_active = is_active;
        }

        Ok(Some(product.clone()))
    }

    async fn delete(&self, product_id: i64, seller_id: i64) -> DatabaseResult<bool> {
        let mut tables = self.tables.lock().await;
        let before = tables.products.len();
        tables
            .products
            .retain(|p| !(p.product_id == product_id && p.seller_id == seller_id));
        let deleted = tables.products.len() < before;
        if deleted {
            tables.reviews.retain(|r| r.product_id != product_id);
        }
        Ok(deleted)
    }
}

#[async_trait]
impl CategoryStore for MemoryMarketplace {
    async fn find_all(&self) -> DatabaseResult<Vec<Category>> {
        let mut categories = self.tables.lock().await.categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn exists(&self, category_id: i64) -> DatabaseResult<bool> {
        let tables = self.tables.lock().await;
        Ok(tables.categories.iter().any(|c| c.category_id == category_id))
    }
}

#[async_trait]
impl ReviewStore for MemoryMarketplace {
    async fn create(&self, review: &NewReview) -> DatabaseResult<Review> {
        let mut tables = self.tables.lock().await;
        let created = Review {
            review_id: tables.reviews.len() as i64 + 1,
            product_id: review.product_id,
            reviewer_name: review.reviewer_name.clone(),
            reviewer_email: review.reviewer_email.clone(),
            rating: review.rating,
            comment: review.comment.clone(),
            created_at: tables.now(),
        };
        tables.reviews.push(created.clone());
        Ok(created)
    }

    async fn find_by_product(&self, product_id: i64) -> DatabaseResult<Vec<Review>> {
        let tables = self.tables.lock().await;
        let mut reviews: Vec<Review> = tables
            .reviews
            .iter()
            .filter(|r| r.product_id == product_id)
            .cloned()
            .collect();
        reviews.sort_by(|a, b| (b.created_at, b.review_id).cmp(&(a.created_at, a.review_id)));
        Ok(reviews)
    }

    async fn find_by_seller(&self, seller_id: i64) -> DatabaseResult<Vec<SellerReview>> {
        let tables = self.tables.lock().await;
        let mut reviews: Vec<SellerReview> = tables
            .reviews
            .iter()
            .filter_map(|r| {
                tables
                    .products
                    .iter()
                    .find(|p| p.product_id == r.product_id && p.seller_id == seller_id)
                    .map(|p| SellerReview {
                        review: r.clone(),
                        product_name: p.name.clone(),
                    })
            })
            .collect();
        reviews.sort_by(|a, b| {
            (b.review.created_at, b.review.review_id).cmp(&(a.review.created_at, a.review.review_id))
        });
        Ok(reviews)
    }
}

#[async_trait]
impl ContactStore for MemoryMarketplace {
    async fn create(&self, message: &NewContactMessage) -> DatabaseResult<ContactMessage> {
        let mut tables = self.tables.lock().await;
        let saved = ContactMessage {
            id: tables.contacts.len() as i64 + 1,
            name: message.name.clone(),
            email: message.email.clone(),
            subject: message.subject.clone(),
            message: message.message.clone(),
            created_at: tables.now(),
        };
        tables.contacts.push(saved.clone());
        Ok(saved)
    }
}

#[async_trait]
impl SellerDirectory for MemoryMarketplace {
    async fn find_public(&self, seller_id: i64) -> DatabaseResult<Option<PublicSeller>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .sellers
            .iter()
            .find(|s| s.seller_id == seller_id)
            .cloned())
    }
}
