//! Contact messages: persisted first, then handed to a notifier

use anyhow::Result;
use async_trait::async_trait;
use common::validation::{optional_text, required_text, validate_email};
use std::sync::Arc;
use tracing::{info, warn};

use crate::{
    error::ApiResult,
    models::{ContactForm, ContactMessage, NewContactMessage},
    repositories::ContactStore,
};

const NAME_MAX_LEN: usize = 100;
const SUBJECT_MAX_LEN: usize = 200;
const MESSAGE_MAX_LEN: usize = 5000;

/// Outbound notification about a saved contact message
#[async_trait]
pub trait ContactNotifier: Send + Sync {
    async fn notify(&self, message: &ContactMessage) -> Result<()>;
}

/// Notifier that only writes the message to the log
pub struct LogNotifier;

#[async_trait]
impl ContactNotifier for LogNotifier {
    async fn notify(&self, message: &ContactMessage) -> Result<()> {
        info!(
            "New contact message {} from {} (subject: {})",
            message.id,
            message.name,
            message.subject.as_deref().unwrap_or("none")
        );
        Ok(())
    }
}

#[derive(Clone)]
pub struct ContactService {
    contacts: Arc<dyn ContactStore>,
    notifier: Arc<dyn ContactNotifier>,
}

impl ContactService {
    pub fn new(contacts: Arc<dyn ContactStore>, notifier: Arc<dyn ContactNotifier>) -> Self {
        Self { contacts, notifier }
    }

    /// Save a visitor's message, then notify
    ///
    /// A notifier failure is logged and does not undo the saved message.
    pub async fn submit(&self, form: ContactForm) -> ApiResult<ContactMessage> {
        let name = required_text("name", "Name", form.name.as_deref(), NAME_MAX_LEN)?;
        let email = validate_email("email", form.email.as_deref())?;
        let subject = optional_text(
            "subject",
            "Subject",
            form.subject.as_deref(),
            SUBJECT_MAX_LEN,
        )?;
        let message = required_text(
            "message",
            "Message",
            form.message.as_deref(),
            MESSAGE_MAX_LEN,
        )?;

        let saved = self
            .contacts
            .create(&NewContactMessage {
                name,
                email,
                subject,
                message,
            })
            .await?;

        info!("Saved contact message {}", saved.id);

        if let Err(e) = self.notifier.notify(&saved).await {
            warn!(
                "Contact message {} saved but notification failed: {}",
                saved.id, e
            );
        }

        Ok(saved)
    }
}
