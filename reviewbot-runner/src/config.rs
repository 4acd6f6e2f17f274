//! Runner configuration
//!
//! Secrets and tuning knobs for the notifier, read from the environment
//! (optionally seeded from a `.env` file) and validated once at startup.

use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use reviewbot_client::{ReviewClient, TelegramClient};

use crate::scheduler::BackoffPolicy;

/// Runner configuration
#[derive(Clone)]
pub struct Config {
    /// Personal token for the review API
    pub devman_token: String,

    /// Telegram bot token
    pub telegram_token: String,

    /// Chat that receives the notifications
    pub chat_id: i64,

    /// Review API base URL (e.g., "https://dvmn.org")
    pub devman_api_url: String,

    /// Telegram Bot API base URL
    pub telegram_api_url: String,

    /// Client-side bound on one long-poll request
    pub poll_timeout: Duration,

    /// Client-side bound on one Bot API call
    pub telegram_timeout: Duration,

    /// Delay policy for lost connections
    pub backoff: BackoffPolicy,
}

impl Config {
    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - DEVMAN_TOKEN (required)
    /// - TG_BOT_TOKEN (required)
    /// - TG_CHAT_ID (required, positive integer)
    /// - DEVMAN_API_URL (optional, default: https://dvmn.org)
    /// - TELEGRAM_API_URL (optional, default: https://api.telegram.org)
    /// - POLL_REQUEST_TIMEOUT (optional, seconds, default: 5)
    /// - TELEGRAM_REQUEST_TIMEOUT (optional, seconds, default: 10)
    /// - RETRY_THRESHOLD (optional, default: 5)
    /// - RETRY_BASE_DELAY (optional, seconds, default: 5)
    /// - RETRY_MAX_DELAY (optional, seconds, default: 60)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Creates configuration from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .ok_or_else(|| anyhow::anyhow!("{} environment variable not set", key))
        };

        let devman_token = required("DEVMAN_TOKEN")?;
        let telegram_token = required("TG_BOT_TOKEN")?;

        let raw_chat_id = required("TG_CHAT_ID")?;
        let chat_id = raw_chat_id
            .parse::<i64>()
            .ok()
            .filter(|id| *id > 0)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "TG_CHAT_ID must be a positive integer, got '{}'",
                    raw_chat_id
                )
            })?;

        let devman_api_url = lookup("DEVMAN_API_URL")
            .unwrap_or_else(|| ReviewClient::DEFAULT_BASE_URL.to_string());

        let telegram_api_url = lookup("TELEGRAM_API_URL")
            .unwrap_or_else(|| TelegramClient::DEFAULT_BASE_URL.to_string());

        let poll_timeout = Duration::from_secs(optional(&lookup, "POLL_REQUEST_TIMEOUT", 5)?);
        let telegram_timeout =
            Duration::from_secs(optional(&lookup, "TELEGRAM_REQUEST_TIMEOUT", 10)?);

        let backoff = BackoffPolicy {
            retry_threshold: optional(
                &lookup,
                "RETRY_THRESHOLD",
                BackoffPolicy::DEFAULT_RETRY_THRESHOLD,
            )?,
            base_delay: Duration::from_secs(optional(
                &lookup,
                "RETRY_BASE_DELAY",
                BackoffPolicy::DEFAULT_BASE_DELAY.as_secs(),
            )?),
            max_delay: Duration::from_secs(optional(
                &lookup,
                "RETRY_MAX_DELAY",
                BackoffPolicy::DEFAULT_MAX_DELAY.as_secs(),
            )?),
        };

        Ok(Self {
            devman_token,
            telegram_token,
            chat_id,
            devman_api_url,
            telegram_api_url,
            poll_timeout,
            telegram_timeout,
            backoff,
        })
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.devman_token.is_empty() {
            anyhow::bail!("devman_token cannot be empty");
        }

        if self.telegram_token.is_empty() {
            anyhow::bail!("telegram_token cannot be empty");
        }

        if self.chat_id <= 0 {
            anyhow::bail!("chat_id must be a positive integer");
        }

        for (name, url) in [
            ("devman_api_url", &self.devman_api_url),
            ("telegram_api_url", &self.telegram_api_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                anyhow::bail!("{} must start with http:// or https://", name);
            }
        }

        if self.poll_timeout.is_zero() {
            anyhow::bail!("poll_timeout must be greater than 0");
        }

        if self.telegram_timeout.is_zero() {
            anyhow::bail!("telegram_timeout must be greater than 0");
        }

        if self.backoff.base_delay.is_zero() {
            anyhow::bail!("retry base delay must be greater than 0");
        }

        if self.backoff.max_delay < self.backoff.base_delay {
            anyhow::bail!("retry max delay cannot be smaller than the base delay");
        }

        Ok(())
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("devman_token", &"<redacted>")
            .field("telegram_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .field("devman_api_url", &self.devman_api_url)
            .field("telegram_api_url", &self.telegram_api_url)
            .field("poll_timeout", &self.poll_timeout)
            .field("telegram_timeout", &self.telegram_timeout)
            .field("backoff", &self.backoff)
            .finish()
    }
}

/// Parses an optional variable, falling back to `default` when unset
fn optional<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value '{}'", key, raw)),
        _ => Ok(default),
    }
}
