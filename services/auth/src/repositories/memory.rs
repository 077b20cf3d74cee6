//! In-memory seller store used by the service and router tests

use async_trait::async_trait;
use chrono::Utc;
use common::error::{DatabaseError, DatabaseResult};
use tokio::sync::Mutex;

use super::SellerStore;
use crate::models::{NewSeller, Seller, UpdateSeller};

#[derive(Default)]
pub struct MemorySellerStore {
    sellers: Mutex<Vec<Seller>>,
}

impl MemorySellerStore {
    pub async fn count(&self) -> usize {
        self.sellers.lock().await.len()
    }
}

#[async_trait]
impl SellerStore for MemorySellerStore {
    async fn create(&self, new_seller: &NewSeller) -> DatabaseResult<Seller> {
        let mut sellers = self.sellers.lock().await;

        if sellers
            .iter()
            .any(|s| s.email.eq_ignore_ascii_case(&new_seller.email))
        {
            return Err(DatabaseError::Conflict(
                "duplicate key value violates unique constraint \"sellers_email_lower_idx\""
                    .to_string(),
            ));
        }

        let seller = Seller {
            seller_id: sellers.len() as i64 + 1,
            email: new_seller.email.clone(),
            password_hash: new_seller.password_hash.clone(),
            first_name: new_seller.first_name.clone(),
            last_name: new_seller.last_name.clone(),
            store_name: new_seller.store_name.clone(),
            phone_number: new_seller.phone_number.clone(),
            created_at: Utc::now(),
        };
        sellers.push(seller.clone());
        Ok(seller)
    }

    async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<Seller>> {
        let sellers = self.sellers.lock().await;
        Ok(sellers
            .iter()
            .find(|s| s.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_id(&self, seller_id: i64) -> DatabaseResult<Option<Seller>> {
        let sellers = self.sellers.lock().await;
        Ok(sellers.iter().find(|s| s.seller_id == seller_id).cloned())
    }

    async fn update_profile(
        &self,
        seller_id: i64,
        changes: &UpdateSeller,
    ) -> DatabaseResult<Option<Seller>> {
        let mut sellers = self.sellers.lock().await;
        let Some(seller) = sellers.iter_mut().find(|s| s.seller_id == seller_id) else {
            return Ok(None);
        };

        if let Some(first_name) = &changes.first_name {
            seller.first_name = first_name.clone();
        }
        if let Some(last_name) = &changes.last_name {
            seller.last_name = last_name.clone();
        }
        if let Some(store_name) = &changes.store_name {
            seller.store_name = store_name.clone();
        }
        if let Some(phone_number) = &changes.phone_number {
            seller.phone_number = phone_number.clone();
        }

        Ok(Some(seller.clone()))
    }
}
