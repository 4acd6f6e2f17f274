//! Poll cursor
//!
//! The review API hands out a timestamp with every response and expects
//! it back on the next request so that only newer reviews are returned.
//! The value is opaque to us: it arrives as a JSON number (usually with a
//! fractional part) or as a string, and is echoed back verbatim.

use serde::{Deserialize, Deserializer};
use std::fmt;

/// Opaque resumption token for the long-poll endpoint
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PollCursor(String);

impl PollCursor {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Textual form, as sent in the `timestamp` query parameter
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PollCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PollCursor {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCursor {
    Number(serde_json::Number),
    Text(String),
}

impl<'de> Deserialize<'de> for PollCursor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match RawCursor::deserialize(deserializer)? {
            RawCursor::Number(n) => Ok(Self(n.to_string())),
            RawCursor::Text(s) => Ok(Self(s)),
        }
    }
}
