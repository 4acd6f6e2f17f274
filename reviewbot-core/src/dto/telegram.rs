//! Telegram Bot API DTOs

use serde::{Deserialize, Serialize};

/// Body of a `sendMessage` call
#[derive(Debug, Clone, Serialize)]
pub struct SendMessage {
    pub chat_id: i64,
    pub text: String,
}

/// Envelope every Bot API method answers with
#[derive(Debug, Clone, Deserialize)]
pub struct BotResponse<T> {
    pub ok: bool,

    /// Absent when `ok` is false
    pub result: Option<T>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub error_code: Option<u16>,
}

impl<T> BotResponse<T> {
    /// Unwraps the result, or returns the API's error code and description
    pub fn into_result(self) -> Result<T, (u16, String)> {
        match (self.ok, self.result) {
            (true, Some(result)) => Ok(result),
            _ => Err((
                self.error_code.unwrap_or(0),
                self.description
                    .unwrap_or_else(|| "Bot API returned no result".to_string()),
            )),
        }
    }
}
