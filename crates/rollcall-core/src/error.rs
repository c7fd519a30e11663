// ── Core error types ──
//
// `CoreError` covers invalid board settings. Feed problems never surface
// as errors: `FeedIssue` carries the fixed status messages the board shows
// while the feed misbehaves.

use std::fmt;

use thiserror::Error;

/// Error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },
}

// ── Feed status shown on the board ───────────────────────────────────

/// Non-fatal feed problems surfaced as a status message.
///
/// Only [`ReconnectExhausted`](Self::ReconnectExhausted) is terminal, and
/// even that is reported, never raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedIssue {
    /// A frame arrived with an empty or missing `data` array.
    NoData,
    /// A frame could not be decoded.
    Processing,
    /// The transport reported an error.
    Connection,
    /// Five reconnects failed in a row. Needs a restart.
    ReconnectExhausted,
}

impl FeedIssue {
    pub fn message(self) -> &'static str {
        match self {
            Self::NoData => "no data to display",
            Self::Processing => "data processing error",
            Self::Connection => "connection error",
            Self::ReconnectExhausted => "maximum reconnect attempts exceeded",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::ReconnectExhausted)
    }
}

impl fmt::Display for FeedIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}
