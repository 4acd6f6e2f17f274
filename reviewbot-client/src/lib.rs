//! Reviewbot HTTP Clients
//!
//! Small, type-safe clients for the two remote services the notifier talks to:
//! - [`ReviewClient`]: the homework-review long-poll endpoint
//! - [`TelegramClient`]: the Telegram Bot API (`getChat`, `sendMessage`)
//!
//! Both map transport failures into [`ClientError`] so the poll loop can tell
//! timeouts and lost connections apart from fatal API errors.
//!
//! # Example
//!
//! ```no_run
//! use reviewbot_client::{ReviewClient, TelegramClient};
//! use reviewbot_core::message::verdict_message;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let reviews = ReviewClient::new("https://dvmn.org", "api-token");
//!     let bot = TelegramClient::new("https://api.telegram.org", "bot-token");
//!
//!     let response = reviews.long_poll(None).await?;
//!     for attempt in response.attempts() {
//!         bot.send_message(42, &verdict_message("Ada", attempt)).await?;
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
mod reviews;
mod telegram;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use reviews::ReviewClient;
pub use reviewbot_core::dto::PollResponse;
pub use telegram::TelegramClient;

/// Normalizes a base URL so paths can be appended with `format!`
fn normalize_base_url(base_url: impl Into<String>) -> String {
    base_url.into().trim_end_matches('/').to_string()
}
