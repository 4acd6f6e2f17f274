//! Notification text
//!
//! Renders the messages sent to the recipient. Formatting is kept here,
//! away from the poll loop, so it can be checked without any I/O.

use crate::domain::ReviewAttempt;

pub const REJECTED_HEADLINE: &str = "❌ The work was not accepted.";
pub const ACCEPTED_HEADLINE: &str = "✅ The work was accepted!";

pub const REJECTED_VERDICT: &str = "Unfortunately there are mistakes to fix.";
pub const ACCEPTED_VERDICT: &str = "Nothing to fix, move on to the next lesson!";

/// Builds the notification for one reviewed attempt
///
/// # Arguments
/// * `recipient` - Name used to address the student
/// * `attempt` - The review to report
pub fn verdict_message(recipient: &str, attempt: &ReviewAttempt) -> String {
    let (headline, verdict) = if attempt.is_negative {
        (REJECTED_HEADLINE, REJECTED_VERDICT)
    } else {
        (ACCEPTED_HEADLINE, ACCEPTED_VERDICT)
    };

    format!(
        "{headline}\n\n{recipient}, your teacher has reviewed the lesson \"{title}\"\n🔗 {url}\n{verdict}",
        title = attempt.lesson_title,
        url = attempt.lesson_url,
    )
}

/// Builds the message sent once at startup
pub fn greeting_message(recipient: &str) -> String {
    format!(
        "👋 Hi, {recipient}! I'm watching your homework reviews and will message you \
         as soon as a teacher checks a lesson."
    )
}
