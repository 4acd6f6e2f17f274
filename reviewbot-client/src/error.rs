//! Error types for the review and Telegram clients

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when talking to the remote APIs
///
/// Transport failures are split into [`ClientError::Timeout`] and
/// [`ClientError::ConnectionLost`] at the boundary so callers can pick a
/// retry policy without inspecting `reqwest` internals.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request did not complete within its timeout
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// The connection could not be established or broke mid-request
    #[error("Connection lost: {0}")]
    ConnectionLost(String),

    /// API returned an error status code
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code, or the Bot API `error_code`
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Any other HTTP client failure
    #[error("HTTP request failed: {0}")]
    RequestFailed(reqwest::Error),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() || err.is_request() || err.is_body() {
            Self::ConnectionLost(err.to_string())
        } else {
            Self::RequestFailed(err)
        }
    }
}

impl ClientError {
    /// Create an API error from status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    /// Check if this error is a request timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    /// Check if this error is a lost or refused connection
    pub fn is_connection_lost(&self) -> bool {
        matches!(self, Self::ConnectionLost(_))
    }

    /// Check if retrying the same request may succeed
    pub fn is_transient(&self) -> bool {
        self.is_timeout() || self.is_connection_lost()
    }
}
