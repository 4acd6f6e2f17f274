//! Review attempt domain type

use serde::Deserialize;

/// One reviewed submission reported by the review API
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReviewAttempt {
    pub lesson_title: String,
    pub lesson_url: String,
    /// `true` when the teacher sent the work back for fixes
    pub is_negative: bool,
}

impl ReviewAttempt {
    /// Whether the submission was accepted
    pub fn is_accepted(&self) -> bool {
        !self.is_negative
    }
}
