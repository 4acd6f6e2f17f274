//! Scheduler layer for the runner
//!
//! Drives the long-poll cycle: asks the review API for new verdicts,
//! hands them to the notification service and decides how long to wait
//! before the next request.

pub mod backoff;
pub mod poller;

pub use backoff::BackoffPolicy;
pub use poller::PollLoop;
