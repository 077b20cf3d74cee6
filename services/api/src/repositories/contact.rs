//! Contact message repository

use async_trait::async_trait;
use common::error::DatabaseResult;
use sqlx::PgPool;
use tracing::info;

use crate::models::{ContactMessage, NewContactMessage};

/// Write-only store for contact messages
#[async_trait]
pub trait ContactStore: Send + Sync {
    async fn create(&self, message: &NewContactMessage) -> DatabaseResult<ContactMessage>;
}

#[derive(Clone)]
pub struct PgContactStore {
    pool: PgPool,
}

impl PgContactStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContactStore for PgContactStore {
    async fn create(&self, message: &NewContactMessage) -> DatabaseResult<ContactMessage> {
        info!("Saving contact message");

        let saved = sqlx::query_as::<_, ContactMessage>(
            r#"
            INSERT INTO contacts (name, email, subject, message)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, subject, message, created_at
            "#,
        )
        .bind(&message.name)
        .bind(&message.email)
        .bind(&message.subject)
        .bind(&message.message)
        .fetch_one(&self.pool)
        .await?;

        Ok(saved)
    }
}
