//! Review API client
//!
//! Wraps the long-poll endpoint that reports freshly reviewed homework.

use std::time::Duration;

use reqwest::Client;
use reviewbot_core::domain::PollCursor;
use reviewbot_core::dto::PollResponse;
use tracing::debug;

use crate::error::{ClientError, Result};
use crate::normalize_base_url;

/// HTTP client for the review long-poll API
#[derive(Clone)]
pub struct ReviewClient {
    /// Base URL of the API (e.g., "https://dvmn.org")
    base_url: String,
    /// Personal API token, sent as `Authorization: Token <token>`
    token: String,
    /// Client-side bound on a single long-poll request
    request_timeout: Option<Duration>,
    /// HTTP client instance
    client: Client,
}

impl ReviewClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://dvmn.org";

    /// Create a new review client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the review API (e.g., "https://dvmn.org")
    /// * `token` - The personal API token
    ///
    /// # Example
    /// ```
    /// use reviewbot_client::ReviewClient;
    ///
    /// let client = ReviewClient::new("https://dvmn.org/", "secret");
    /// assert_eq!(client.base_url(), "https://dvmn.org");
    /// ```
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self::with_client(base_url, token, Client::new())
    }

    /// Create a new review client with a custom HTTP client
    ///
    /// This allows you to configure proxies, TLS settings, etc.
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

    /// Bound every long-poll request by `timeout`
    ///
    /// Requests that outlive it fail with [`ClientError::Timeout`].
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Get the base URL of the review API
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Wait for new reviews
    ///
    /// # Arguments
    /// * `cursor` - Timestamp from the previous response; `None` on the first call
    ///
    /// # Returns
    /// The parsed poll response (`found`, `timeout` or unrecognized status)
    pub async fn long_poll(&self, cursor: Option<&PollCursor>) -> Result<PollResponse> {
        let url = format!("{}/api/long_polling/", self.base_url);

        let mut request = self
            .client
            .get(&url)
            .header(reqwest::header::AUTHORIZATION, format!("Token {}", self.token));

        if let Some(cursor) = cursor {
            request = request.query(&[("timestamp", cursor.as_str())]);
        }

        if let Some(timeout) = self.request_timeout {
            request = request.timeout(timeout);
        }

        debug!(
            "Long-polling {} (cursor: {})",
            url,
            cursor.map(PollCursor::as_str).unwrap_or("none")
        );

        let response = request.send().await?;

        self.handle_response(response).await
    }

    /// Check the status code and deserialize the poll body
    async fn handle_response(&self, response: reqwest::Response) -> Result<PollResponse> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ClientError::api_error(status.as_u16(), body));
        }

        serde_json::from_str(&body)
            .map_err(|e| ClientError::ParseError(format!("Failed to parse poll response: {}", e)))
    }
}

impl std::fmt::Debug for ReviewClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReviewClient")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}
