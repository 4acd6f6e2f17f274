//! Telegram Bot API client
//!
//! Only the two methods the notifier needs: resolving the recipient chat
//! and sending plain text to it.

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use reviewbot_core::domain::Chat;
use reviewbot_core::dto::{BotResponse, SendMessage};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{ClientError, Result};
use crate::normalize_base_url;

/// HTTP client for the Telegram Bot API
#[derive(Clone)]
pub struct TelegramClient {
    /// Base URL of the Bot API (e.g., "https://api.telegram.org")
    base_url: String,
    /// Bot token; part of every method URL
    token: String,
    /// Client-side bound on each Bot API call
    request_timeout: Option<Duration>,
    /// HTTP client instance
    client: Client,
}

impl TelegramClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.telegram.org";

    /// Create a new Bot API client
    ///
    /// # Arguments
    /// * `base_url` - The Bot API base URL (e.g., "https://api.telegram.org")
    /// * `token` - The bot token issued by BotFather
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self::with_client(base_url, token, Client::new())
    }

    /// Create a new Bot API client with a custom HTTP client
    pub fn with_client(
        base_url: impl Into<String>,
        token: impl Into<String>,
        client: Client,
    ) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            token: token.into(),
            request_timeout: None,
            client,
        }
    }

    /// Bound every Bot API call by `timeout`
    ///
    /// Calls that outlive it fail with [`ClientError::Timeout`].
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Get the base URL of the Bot API
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token, method)
    }

    fn bounded(&self, request: RequestBuilder) -> RequestBuilder {
        match self.request_timeout {
            Some(timeout) => request.timeout(timeout),
            None => request,
        }
    }

    /// Look up a chat by its id
    ///
    /// # Arguments
    /// * `chat_id` - Numeric chat identifier
    ///
    /// # Returns
    /// The chat, used to address the recipient by name
    pub async fn get_chat(&self, chat_id: i64) -> Result<Chat> {
        debug!("Fetching chat {}", chat_id);

        let request = self
            .client
            .get(self.method_url("getChat"))
            .query(&[("chat_id", chat_id)]);

        let response = self
            .bounded(request)
            .send()
            .await
            .map_err(|e| ClientError::from(e.without_url()))?;

        self.handle_response(response).await
    }

    /// Send a plain text message
    ///
    /// # Arguments
    /// * `chat_id` - Recipient chat
    /// * `text` - Message body
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<()> {
        debug!("Sending {} byte message to chat {}", text.len(), chat_id);

        let request = self.client.post(self.method_url("sendMessage")).json(&SendMessage {
            chat_id,
            text: text.to_string(),
        });

        let response = self
            .bounded(request)
            .send()
            .await
            .map_err(|e| ClientError::from(e.without_url()))?;

        // The sent message is returned but nothing here needs it
        let _: serde_json::Value = self.handle_response(response).await?;

        Ok(())
    }

    /// Unwrap the Bot API envelope
    ///
    /// Error replies come with a 4xx/5xx status and `ok: false`; their
    /// `description` becomes the error message.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::from(e.without_url()))?;

        match serde_json::from_str::<BotResponse<T>>(&body) {
            Ok(envelope) => envelope.into_result().map_err(|(code, description)| {
                let code = if code == 0 { status.as_u16() } else { code };
                ClientError::api_error(code, description)
            }),
            Err(_) if !status.is_success() => Err(ClientError::api_error(status.as_u16(), body)),
            Err(e) => Err(ClientError::ParseError(format!(
                "Failed to parse Bot API response: {}",
                e
            ))),
        }
    }
}

impl std::fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramClient")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}
