//! Repositories for database operations
//!
//! Each store is a trait with a Postgres implementation; handlers only see
//! the traits so the catalog rules can be exercised without a database.

use std::sync::Arc;

pub mod category;
pub mod contact;
pub mod product;
pub mod review;
pub mod seller;

#[cfg(test)]
pub mod memory;

pub use category::{CategoryStore, PgCategoryStore};
pub use contact::{ContactStore, PgContactStore};
pub use product::{PgProductStore, ProductStore};
pub use review::{PgReviewStore, ReviewStore};
pub use seller::{PgSellerDirectory, SellerDirectory};

/// Every store the API service reads or writes
#[derive(Clone)]
pub struct Stores {
    pub products: Arc<dyn ProductStore>,
    pub categories: Arc<dyn CategoryStore>,
    pub reviews: Arc<dyn ReviewStore>,
    pub contacts: Arc<dyn ContactStore>,
    pub sellers: Arc<dyn SellerDirectory>,
}

impl Stores {
    /// Postgres-backed stores sharing one pool
    pub fn postgres(pool: sqlx::PgPool) -> Self {
        Self {
            products: Arc::new(PgProductStore::new(pool.clone())),
            categories: Arc::new(PgCategoryStore::new(pool.clone())),
            reviews: Arc::new(PgReviewStore::new(pool.clone())),
            contacts: Arc::new(PgContactStore::new(pool.clone())),
            sellers: Arc::new(PgSellerDirectory::new(pool)),
        }
    }
}
