//! Service layer
//!
//! Services hold the runner's business logic on top of the repositories.

mod notification;

pub use notification::NotificationService;
