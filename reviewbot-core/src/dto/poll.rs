//! Long-poll response DTO

use serde::Deserialize;

use crate::domain::{PollCursor, ReviewAttempt};

/// Body of a long-poll response, tagged by its `status` field
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PollResponse {
    /// New reviews are available
    Found {
        new_attempts: Vec<ReviewAttempt>,

        #[serde(default)]
        last_attempt_timestamp: Option<PollCursor>,
    },

    /// The server held the request and nothing new arrived
    Timeout {
        #[serde(default)]
        timestamp_to_request: Option<PollCursor>,
    },

    /// Any status this client does not know about
    #[serde(other)]
    Unrecognized,
}

impl PollResponse {
    /// Reviews carried by this response, in server order
    pub fn attempts(&self) -> &[ReviewAttempt] {
        match self {
            PollResponse::Found { new_attempts, .. } => new_attempts,
            _ => &[],
        }
    }

    /// Cursor the next request should carry, if the server supplied one
    pub fn next_cursor(&self) -> Option<&PollCursor> {
        match self {
            PollResponse::Found {
                last_attempt_timestamp,
                ..
            } => last_attempt_timestamp.as_ref(),
            PollResponse::Timeout {
                timestamp_to_request,
            } => timestamp_to_request.as_ref(),
            PollResponse::Unrecognized => None,
        }
    }

    /// Short label for log lines
    pub fn status(&self) -> &'static str {
        match self {
            PollResponse::Found { .. } => "found",
            PollResponse::Timeout { .. } => "timeout",
            PollResponse::Unrecognized => "unrecognized",
        }
    }
}
