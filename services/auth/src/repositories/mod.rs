//! Repositories for database operations

pub mod seller;

#[cfg(test)]
pub mod memory;

pub use seller::{PgSellerStore, SellerStore};
