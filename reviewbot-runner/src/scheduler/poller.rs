//! Review poller
//!
//! Long-polls the review API and relays every new verdict to the chat.
//!
//! The loop is a two-state machine. It stays in [`LoopState::Polling`]
//! while requests succeed or merely time out, and enters
//! [`LoopState::Backoff`] when the connection is lost. The cursor only moves
//! forward, and only when a response carries a new one.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reviewbot_client::{ClientError, PollResponse};
use reviewbot_core::domain::PollCursor;
use tracing::{debug, error, info, warn};

use crate::repository::ReviewRepository;
use crate::scheduler::BackoffPolicy;
use crate::service::NotificationService;

/// Where the loop currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Polling,
    /// Waiting after the given number of consecutive connection failures
    Backoff(u32),
}

/// What the driver should do after one cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Poll again right away
    Continue,
    /// Sleep, then poll again
    Sleep(Duration),
}

/// Long-poll loop relaying review verdicts
pub struct PollLoop {
    reviews: Arc<dyn ReviewRepository>,
    notifications: NotificationService,
    backoff: BackoffPolicy,
    cursor: Option<PollCursor>,
    failures: u32,
    state: LoopState,
}

impl PollLoop {
    /// Creates a new poll loop starting without a cursor
    pub fn new(
        reviews: Arc<dyn ReviewRepository>,
        notifications: NotificationService,
        backoff: BackoffPolicy,
    ) -> Self {
        Self {
            reviews,
            notifications,
            backoff,
            cursor: None,
            failures: 0,
            state: LoopState::Polling,
        }
    }

    #[cfg(test)]
    pub fn cursor(&self) -> Option<&PollCursor> {
        self.cursor.as_ref()
    }

    /// Consecutive connection failures since the last successful poll
    #[cfg(test)]
    pub fn failures(&self) -> u32 {
        self.failures
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Runs until a non-recoverable error occurs
    pub async fn run(&mut self) -> Result<()> {
        info!("Starting review polling loop");

        loop {
            let step = self
                .poll_once()
                .await
                .context("Fatal error while polling for reviews")?;

            if let Step::Sleep(delay) = step {
                debug!("{:?}: sleeping for {:?}", self.state(), delay);
                tokio::time::sleep(delay).await;
                self.state = LoopState::Polling;
            }
        }
    }

    /// Performs a single poll cycle
    ///
    /// Transient failures are absorbed and turned into a [`Step`]; any other
    /// error is returned to the caller.
    pub async fn poll_once(&mut self) -> std::result::Result<Step, ClientError> {
        debug!(
            "Polling for reviews (cursor: {})",
            self.cursor
                .as_ref()
                .map(PollCursor::as_str)
                .unwrap_or("none")
        );

        let response = match self.reviews.fetch_reviews(self.cursor.as_ref()).await {
            Ok(response) => response,
            Err(e) => return self.handle_failure(e),
        };

        debug!("Review API answered with status '{}'", response.status());

        match &response {
            PollResponse::Found { new_attempts, .. } => {
                info!("Found {} new review(s)", new_attempts.len());
                match self.notifications.notify_all(new_attempts).await {
                    Ok(sent) => info!("Delivered {} notification(s)", sent),
                    // The cursor stays put so the batch is fetched again
                    Err(e) => return self.handle_failure(e),
                }
            }
            PollResponse::Timeout { .. } => {
                debug!("No new reviews");
            }
            PollResponse::Unrecognized => {
                warn!("Review API answered with an unrecognized status, ignoring");
            }
        }

        if self.failures > 0 {
            info!(
                "Review API reachable again after {} failed attempt(s)",
                self.failures
            );
        }
        self.failures = 0;
        self.state = LoopState::Polling;

        if let Some(next) = response.next_cursor() {
            self.cursor = Some(next.clone());
        }

        Ok(Step::Continue)
    }

    fn handle_failure(&mut self, err: ClientError) -> std::result::Result<Step, ClientError> {
        if err.is_timeout() {
            warn!("Request timed out during polling: {}", err);
            return Ok(Step::Continue);
        }

        if err.is_connection_lost() {
            self.failures = self.failures.saturating_add(1);
            self.state = LoopState::Backoff(self.failures);
            let delay = self.backoff.delay_for(self.failures);
            error!(
                "Connection lost during polling (failure #{}): {}; retrying in {:?}",
                self.failures, err, delay
            );
            return Ok(Step::Sleep(delay));
        }

        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MessageRepository;
    use async_trait::async_trait;
    use reviewbot_core::domain::ReviewAttempt;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays a fixed script of poll outcomes and records the cursors it saw
    #[derive(Default)]
    struct ScriptedReviews {
        script: Mutex<VecDeque<reviewbot_client::Result<PollResponse>>>,
        seen: Mutex<Vec<Option<PollCursor>>>,
    }

    impl ScriptedReviews {
        fn new(script: Vec<reviewbot_client::Result<PollResponse>>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
                seen: Mutex::default(),
            })
        }

        fn seen(&self) -> Vec<Option<PollCursor>> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ReviewRepository for ScriptedReviews {
        async fn fetch_reviews(
            &self,
            cursor: Option<&PollCursor>,
        ) -> reviewbot_client::Result<PollResponse> {
            self.seen.lock().unwrap().push(cursor.cloned());
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ClientError::api_error(410, "script exhausted")))
        }
    }

    /// Records sent messages; fails the next `failing` sends with a lost connection
    #[derive(Default)]
    struct RecordingMessages {
        sent: Mutex<Vec<String>>,
        failing: Mutex<usize>,
    }

    impl RecordingMessages {
        fn sent(&self) -> Vec<String> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MessageRepository for RecordingMessages {
        async fn send(&self, text: &str) -> reviewbot_client::Result<()> {
            let mut failing = self.failing.lock().unwrap();
            if *failing > 0 {
                *failing -= 1;
                return Err(ClientError::ConnectionLost("telegram unreachable".into()));
            }
            self.sent.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    fn attempt(title: &str, url: &str, is_negative: bool) -> ReviewAttempt {
        ReviewAttempt {
            lesson_title: title.to_string(),
            lesson_url: url.to_string(),
            is_negative,
        }
    }

    fn found(attempts: Vec<ReviewAttempt>, cursor: &str) -> reviewbot_client::Result<PollResponse> {
        Ok(PollResponse::Found {
            new_attempts: attempts,
            last_attempt_timestamp: Some(PollCursor::from(cursor)),
        })
    }

    fn timeout(cursor: Option<&str>) -> reviewbot_client::Result<PollResponse> {
        Ok(PollResponse::Timeout {
            timestamp_to_request: cursor.map(PollCursor::from),
        })
    }

    fn connection_lost() -> reviewbot_client::Result<PollResponse> {
        Err(ClientError::ConnectionLost("connection refused".into()))
    }

    fn request_timeout() -> reviewbot_client::Result<PollResponse> {
        Err(ClientError::Timeout("operation timed out".into()))
    }

    fn poll_loop(reviews: Arc<ScriptedReviews>, messages: Arc<RecordingMessages>) -> PollLoop {
        PollLoop::new(
            reviews,
            NotificationService::new(messages, "Ada"),
            BackoffPolicy::default(),
        )
    }

    #[tokio::test]
    async fn test_found_response_sends_one_message_per_attempt() {
        let reviews = ScriptedReviews::new(vec![found(
            vec![
                attempt("Async", "http://x", true),
                attempt("Sockets", "http://y", false),
                attempt("Bots", "http://z", false),
            ],
            "123",
        )]);
        let messages = Arc::new(RecordingMessages::default());
        let mut poller = poll_loop(reviews.clone(), messages.clone());

        let step = poller.poll_once().await.unwrap();

        assert_eq!(step, Step::Continue);
        let sent = messages.sent();
        assert_eq!(sent.len(), 3);
        assert!(sent[0].contains("Async"));
        assert!(sent[1].contains("Sockets"));
        assert!(sent[2].contains("Bots"));
        assert_eq!(poller.cursor(), Some(&PollCursor::from("123")));
    }

    #[tokio::test]
    async fn test_rejected_attempt_message() {
        let body = r#"{"status":"found","new_attempts":[{"lesson_title":"Async","lesson_url":"http://x","is_negative":true}],"last_attempt_timestamp":123}"#;
        let response: PollResponse = serde_json::from_str(body).unwrap();
        let reviews = ScriptedReviews::new(vec![Ok(response)]);
        let messages = Arc::new(RecordingMessages::default());
        let mut poller = poll_loop(reviews, messages.clone());

        poller.poll_once().await.unwrap();

        let sent = messages.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("❌"));
        assert!(sent[0].contains("Async"));
        assert!(sent[0].contains("http://x"));
        assert_eq!(poller.cursor().map(PollCursor::as_str), Some("123"));
    }

    #[tokio::test]
    async fn test_timeout_response_sends_nothing() {
        let reviews = ScriptedReviews::new(vec![timeout(Some("1555609162.8161")), timeout(None)]);
        let messages = Arc::new(RecordingMessages::default());
        let mut poller = poll_loop(reviews.clone(), messages.clone());

        assert_eq!(poller.poll_once().await.unwrap(), Step::Continue);
        assert_eq!(poller.cursor().map(PollCursor::as_str), Some("1555609162.8161"));

        assert_eq!(poller.poll_once().await.unwrap(), Step::Continue);
        assert_eq!(poller.cursor().map(PollCursor::as_str), Some("1555609162.8161"));

        assert!(messages.sent().is_empty());
    }

    #[tokio::test]
    async fn test_cursor_is_echoed_and_never_regresses() {
        let reviews = ScriptedReviews::new(vec![
            timeout(None),
            found(vec![attempt("Async", "http://x", false)], "123"),
            timeout(None),
            Ok(PollResponse::Unrecognized),
            connection_lost(),
            request_timeout(),
            timeout(Some("456")),
        ]);
        let messages = Arc::new(RecordingMessages::default());
        let mut poller = poll_loop(reviews.clone(), messages);

        for _ in 0..7 {
            poller.poll_once().await.unwrap();
        }

        let cursor = |s: &str| Some(PollCursor::from(s));
        assert_eq!(
            reviews.seen(),
            vec![
                None,
                None,
                cursor("123"),
                cursor("123"),
                cursor("123"),
                cursor("123"),
                cursor("123"),
            ]
        );
        assert_eq!(poller.cursor(), Some(&PollCursor::from("456")));
    }

    #[tokio::test]
    async fn test_connection_failures_back_off_and_reset() {
        let mut script: Vec<_> = (0..7).map(|_| connection_lost()).collect();
        script.push(timeout(None));
        script.push(connection_lost());
        let reviews = ScriptedReviews::new(script);
        let mut poller = poll_loop(reviews, Arc::new(RecordingMessages::default()));

        let mut delays = Vec::new();
        for _ in 0..7 {
            match poller.poll_once().await.unwrap() {
                Step::Sleep(delay) => delays.push(delay.as_secs()),
                Step::Continue => panic!("connection failure should back off"),
            }
        }
        assert_eq!(delays, vec![5, 5, 5, 5, 5, 30, 35]);
        assert_eq!(poller.failures(), 7);
        assert_eq!(poller.state(), LoopState::Backoff(7));

        assert_eq!(poller.poll_once().await.unwrap(), Step::Continue);
        assert_eq!(poller.failures(), 0);
        assert_eq!(poller.state(), LoopState::Polling);

        assert_eq!(
            poller.poll_once().await.unwrap(),
            Step::Sleep(Duration::from_secs(5))
        );
        assert_eq!(poller.failures(), 1);
    }

    #[tokio::test]
    async fn test_backoff_is_capped() {
        let script = (0..15).map(|_| connection_lost()).collect();
        let mut poller = poll_loop(
            ScriptedReviews::new(script),
            Arc::new(RecordingMessages::default()),
        );

        let mut last = Step::Continue;
        for _ in 0..15 {
            last = poller.poll_once().await.unwrap();
        }

        assert_eq!(last, Step::Sleep(Duration::from_secs(60)));
    }

    #[tokio::test]
    async fn test_request_timeout_retries_immediately() {
        let reviews = ScriptedReviews::new(vec![
            connection_lost(),
            connection_lost(),
            request_timeout(),
            connection_lost(),
        ]);
        let mut poller = poll_loop(reviews, Arc::new(RecordingMessages::default()));

        poller.poll_once().await.unwrap();
        poller.poll_once().await.unwrap();

        assert_eq!(poller.poll_once().await.unwrap(), Step::Continue);
        assert_eq!(poller.failures(), 2);

        poller.poll_once().await.unwrap();
        assert_eq!(poller.failures(), 3);
    }

    #[tokio::test]
    async fn test_fatal_error_is_returned() {
        let reviews = ScriptedReviews::new(vec![Err(ClientError::api_error(401, "Invalid token."))]);
        let mut poller = poll_loop(reviews, Arc::new(RecordingMessages::default()));

        let err = poller.poll_once().await.unwrap_err();

        assert!(matches!(err, ClientError::ApiError { status: 401, .. }));
    }

    #[tokio::test]
    async fn test_failed_delivery_keeps_cursor_and_refetches_batch() {
        let batch = vec![attempt("Async", "http://x", true)];
        let reviews = ScriptedReviews::new(vec![
            found(batch.clone(), "123"),
            found(batch, "123"),
        ]);
        let messages = Arc::new(RecordingMessages {
            failing: Mutex::new(1),
            ..Default::default()
        });
        let mut poller = poll_loop(reviews.clone(), messages.clone());

        assert_eq!(
            poller.poll_once().await.unwrap(),
            Step::Sleep(Duration::from_secs(5))
        );
        assert!(poller.cursor().is_none());
        assert!(messages.sent().is_empty());

        assert_eq!(poller.poll_once().await.unwrap(), Step::Continue);
        assert_eq!(messages.sent().len(), 1);
        assert_eq!(poller.cursor().map(PollCursor::as_str), Some("123"));
        assert_eq!(reviews.seen(), vec![None, None]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_sleeps_through_backoff_and_stops_on_fatal_error() {
        let reviews = ScriptedReviews::new(vec![
            connection_lost(),
            found(vec![attempt("Async", "http://x", false)], "123"),
            Err(ClientError::api_error(500, "Internal Server Error")),
        ]);
        let messages = Arc::new(RecordingMessages::default());
        let mut poller = poll_loop(reviews.clone(), messages.clone());

        let started = tokio::time::Instant::now();
        let err = poller.run().await.unwrap_err();

        assert!(started.elapsed() >= Duration::from_secs(5));
        assert!(format!("{:#}", err).contains("Internal Server Error"));
        assert_eq!(messages.sent().len(), 1);
        assert_eq!(reviews.seen().len(), 3);
        assert_eq!(poller.state(), LoopState::Polling);
    }
}
