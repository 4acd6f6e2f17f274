//! Telegram chat domain model
//!
//! Only the fields needed to address the recipient by name are kept.

use serde::Deserialize;

/// Fallback used when Telegram reports no usable name for the chat
pub const UNKNOWN_RECIPIENT: &str = "student";

/// The chat notifications are delivered to
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Chat {
    pub id: i64,

    #[serde(default)]
    pub first_name: Option<String>,

    #[serde(default)]
    pub username: Option<String>,

    /// Set for groups and channels instead of `first_name`
    #[serde(default)]
    pub title: Option<String>,
}

impl Chat {
    /// Name used to address the recipient in messages
    ///
    /// Prefers the first name, then the group title, then the username.
    pub fn display_name(&self) -> &str {
        [&self.first_name, &self.title, &self.username]
            .into_iter()
            .flatten()
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
            .unwrap_or(UNKNOWN_RECIPIENT)
    }
}
