//! Reviews repository
//!
//! Fetches new review verdicts from the long-poll endpoint.

use async_trait::async_trait;
use reviewbot_client::{PollResponse, Result, ReviewClient};
use reviewbot_core::domain::PollCursor;

/// Repository trait for the review long-poll API
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Waits for reviews newer than `cursor`
    ///
    /// # Arguments
    /// * `cursor` - Cursor from the last successful poll, `None` on the first
    async fn fetch_reviews(&self, cursor: Option<&PollCursor>) -> Result<PollResponse>;
}

/// HTTP implementation of ReviewRepository
pub struct HttpReviewRepository {
    client: ReviewClient,
}

impl HttpReviewRepository {
    /// Creates a repository over a configured review client
    pub fn new(client: ReviewClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ReviewRepository for HttpReviewRepository {
    async fn fetch_reviews(&self, cursor: Option<&PollCursor>) -> Result<PollResponse> {
        self.client.long_poll(cursor).await
    }
}
