//! Repository layer
//!
//! Repositories are thin adapters over the HTTP clients. They give the
//! poll loop narrow, trait-based interfaces so it can be exercised with
//! scripted fakes instead of live services.

mod messages;
mod reviews;

// Re-export traits
pub use messages::MessageRepository;
pub use reviews::ReviewRepository;

// Re-export implementations
pub use messages::TelegramMessageRepository;
pub use reviews::HttpReviewRepository;
