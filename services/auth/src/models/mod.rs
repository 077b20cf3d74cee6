//! Authentication service models

pub mod seller;

// Re-export for convenience
pub use seller::{
    LoginRequest, NewSeller, Seller, SellerProfile, SignupRequest, UpdateProfileRequest,
    UpdateSeller,
};
