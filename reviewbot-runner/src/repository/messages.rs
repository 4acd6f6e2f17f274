//! Messages repository
//!
//! Delivers text to the single configured Telegram chat.

use async_trait::async_trait;
use reviewbot_client::{Result, TelegramClient};

/// Repository trait for outgoing chat messages
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Sends one message to the recipient
    async fn send(&self, text: &str) -> Result<()>;
}

/// Telegram implementation of MessageRepository
pub struct TelegramMessageRepository {
    client: TelegramClient,
    chat_id: i64,
}

impl TelegramMessageRepository {
    /// Creates a repository bound to one chat
    ///
    /// # Arguments
    /// * `client` - Bot API client
    /// * `chat_id` - Chat that receives every message
    pub fn new(client: TelegramClient, chat_id: i64) -> Self {
        Self { client, chat_id }
    }
}

#[async_trait]
impl MessageRepository for TelegramMessageRepository {
    async fn send(&self, text: &str) -> Result<()> {
        self.client.send_message(self.chat_id, text).await
    }
}
