//! Notification service
//!
//! Turns review attempts into chat messages addressed to the recipient
//! and sends them in the order given.

use std::sync::Arc;

use reviewbot_client::Result;
use reviewbot_core::domain::ReviewAttempt;
use reviewbot_core::message::{greeting_message, verdict_message};
use tracing::{debug, info};

use crate::repository::MessageRepository;

/// Formats and delivers review notifications
pub struct NotificationService {
    messages: Arc<dyn MessageRepository>,
    recipient: String,
}

impl NotificationService {
    /// Creates a new notification service
    ///
    /// # Arguments
    /// * `messages` - Where messages are delivered
    /// * `recipient` - Name used to address the student
    pub fn new(messages: Arc<dyn MessageRepository>, recipient: impl Into<String>) -> Self {
        Self {
            messages,
            recipient: recipient.into(),
        }
    }

    /// Sends the startup greeting
    pub async fn greet(&self) -> Result<()> {
        info!("Sending greeting to {}", self.recipient);
        self.messages.send(&greeting_message(&self.recipient)).await
    }

    /// Sends one message per attempt, in order
    ///
    /// Stops at the first failed delivery; earlier messages of the batch
    /// have already been sent by then.
    pub async fn notify_all(&self, attempts: &[ReviewAttempt]) -> Result<usize> {
        for attempt in attempts {
            debug!(
                "Notifying about \"{}\" ({})",
                attempt.lesson_title,
                if attempt.is_accepted() { "accepted" } else { "rejected" }
            );
            self.messages
                .send(&verdict_message(&self.recipient, attempt))
                .await?;
        }

        Ok(attempts.len())
    }
}
