//! Core domain types
//!
//! These types are what the runner reasons about. They are produced by
//! the client crate from API responses and consumed by the poll loop.

pub mod attempt;
pub mod chat;
pub mod cursor;

pub use attempt::ReviewAttempt;
pub use chat::Chat;
pub use cursor::PollCursor;
