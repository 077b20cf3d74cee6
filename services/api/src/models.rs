//! API models for request and response payloads

pub mod contact;
pub mod product;
pub mod review;
pub mod seller;

pub use contact::{ContactForm, ContactMessage, NewContactMessage};
pub use product::{Category, NewProduct, Product, ProductChanges, ProductForm, ProductQuery};
pub use review::{NewReview, RatingStats, Review, ReviewForm, ReviewQuery, SellerReview};
pub use seller::{DashboardStats, PublicSeller, Storefront};
