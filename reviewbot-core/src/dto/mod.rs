//! Data Transfer Objects
//!
//! Wire shapes of the two remote APIs: the review long-poll endpoint and
//! the Telegram Bot API. They are deserialized by the client crate and
//! turned into domain types as close to the boundary as possible.

pub mod poll;
pub mod telegram;

pub use poll::PollResponse;
pub use telegram::{BotResponse, SendMessage};
