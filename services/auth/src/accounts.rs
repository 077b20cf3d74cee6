//! Seller account operations: signup, login and profile management

use common::{
    error::DatabaseError,
    validation::{
        ValidationError, required_text, validate_email, validate_password,
        validate_phone,
    },
};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::{
    error::AuthError,
    models::{
        LoginRequest, NewSeller, Seller, SignupRequest, UpdateProfileRequest, UpdateSeller,
    },
    password,
    repositories::SellerStore,
    throttle::LoginThrottle,
};

const NAME_MAX_LEN: usize = 100;
const DUPLICATE_EMAIL: &str = "An account with this email already exists.";

/// Account operations over a seller store
#[derive(Clone)]
pub struct AccountService {
    sellers: Arc<dyn SellerStore>,
    throttle: LoginThrottle,
}

/// Run CPU-heavy hashing off the async workers
async fn blocking<T, F>(f: F) -> Result<T, AuthError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AuthError::Internal(format!("Blocking task failed: {}", e)))
}

impl AccountService {
    pub fn new(sellers: Arc<dyn SellerStore>, throttle: LoginThrottle) -> Self {
        Self { sellers, throttle }
    }

    /// Register a new seller
    pub async fn signup(&self, form: SignupRequest) -> Result<Seller, AuthError> {
        let first_name = required_text(
            "first_name",
            "First name",
            form.first_name.as_deref(),
            NAME_MAX_LEN,
        )?;
        let last_name = required_text(
            "last_name",
            "Last name",
            form.last_name.as_deref(),
            NAME_MAX_LEN,
        )?;
        let store_name = required_text(
            "store_name",
            "Store name",
            form.store_name.as_deref(),
            NAME_MAX_LEN,
        )?;
        let email = validate_email("email", form.email.as_deref())?;
        let phone_number = validate_phone(form.phone_number.as_deref())?;
        let password = validate_password(form.password.as_deref())?.to_string();

        info!("Signup attempt for store: {}", store_name);

        if self.sellers.find_by_email(&email).await?.is_some() {
            return Err(ValidationError::new("email", DUPLICATE_EMAIL).into());
        }

        let password_hash = blocking(move || password::hash_password(&password)).await??;

        let new_seller = NewSeller {
            email,
            password_hash,
            first_name,
            last_name,
            store_name,
            phone_number,
        };

        match self.sellers.create(&new_seller).await {
            Ok(seller) => {
                info!("Created seller {}", seller.seller_id);
                Ok(seller)
            }
            // Lost a race against a concurrent signup with the same email
            Err(DatabaseError::Conflict(_)) => {
                Err(ValidationError::new("email", DUPLICATE_EMAIL).into())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Check credentials and return the seller they belong to
    ///
    /// Unknown emails and wrong passwords fail with the same error after
    /// the same amount of hashing work.
    pub async fn login(&self, form: LoginRequest) -> Result<Seller, AuthError> {
        let email = form
            .email
            .as_deref()
            .map(|e| e.trim().to_lowercase())
            .unwrap_or_default();
        let password = form.password.unwrap_or_default();

        if email.is_empty() {
            return Err(ValidationError::new("email", "Email is required").into());
        }
        if password.is_empty() {
            return Err(ValidationError::new("password", "Password is required").into());
        }

        if !self.throttle.is_allowed(&email).await {
            warn!("Rejected login while locked out");
            return Err(AuthError::TooManyAttempts);
        }

        let Some(seller) = self.sellers.find_by_email(&email).await? else {
            blocking(move || password::verify_dummy(&password)).await?;
            self.throttle.record_failure(&email).await;
            info!("Failed login attempt");
            return Err(AuthError::InvalidCredentials);
        };

        let hash = seller.password_hash.clone();
        let verified = blocking(move || password::verify_password(&password, &hash)).await?;

        match verified {
            Ok(true) => {
                self.throttle.reset(&email).await;
                info!("Seller {} logged in", seller.seller_id);
                Ok(seller)
            }
            Ok(false) => {
                self.throttle.record_failure(&email).await;
                info!("Failed login attempt for seller {}", seller.seller_id);
                Err(AuthError::InvalidCredentials)
            }
            Err(e) => {
                error!(
                    "Stored password hash for seller {} is unusable: {}",
                    seller.seller_id, e
                );
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    /// Load the profile of the session's seller
    pub async fn profile(&self, seller_id: i64) -> Result<Seller, AuthError> {
        self.sellers
            .find_by_id(seller_id)
            .await?
            .ok_or(AuthError::NotFound)
    }

    /// Apply a partial profile edit for the session's seller
    pub async fn update_profile(
        &self,
        seller_id: i64,
        form: UpdateProfileRequest,
    ) -> Result<Seller, AuthError> {
        let changes = UpdateSeller {
            first_name: form
                .first_name
                .as_deref()
                .map(|v| required_text("first_name", "First name", Some(v), NAME_MAX_LEN))
                .transpose()?,
            last_name: form
                .last_name
                .as_deref()
                .map(|v| required_text("last_name", "Last name", Some(v), NAME_MAX_LEN))
                .transpose()?,
            store_name: form
                .store_name
                .as_deref()
                .map(|v| required_text("store_name", "Store name", Some(v), NAME_MAX_LEN))
                .transpose()?,
            phone_number: form
                .phone_number
                .as_deref()
                .map(|v| validate_phone(Some(v)))
                .transpose()?,
        };

        info!("Profile update for seller {}", seller_id);

        self.sellers
            .update_profile(seller_id, &changes)
            .await?
            .ok_or(AuthError::NotFound)
    }
}
