use thiserror::Error;

/// Top-level error type for the `rollcall-api` crate.
///
/// Only [`FeedConfig::new`](crate::FeedConfig::new) returns one to callers.
/// Inside the feed task, transport and decoding failures are reported as
/// [`FeedEvent`](crate::FeedEvent)s carrying the rendered message.
#[derive(Debug, Error)]
pub enum Error {
    // ── Endpoint ────────────────────────────────────────────────────
    /// The endpoint scheme is not one of `ws`, `wss`, `http`, `https`.
    #[error("Unsupported URL scheme '{0}' (expected ws, wss, http, or https)")]
    UnsupportedScheme(String),

    // ── WebSocket ───────────────────────────────────────────────────
    /// WebSocket connection or read failed.
    #[error("WebSocket connection failed: {0}")]
    WebSocketConnect(String),

    /// Writing a frame to the socket failed.
    #[error("WebSocket send failed: {0}")]
    WebSocketSend(String),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_failure() {
        assert_eq!(
            Error::UnsupportedScheme("ftp".into()).to_string(),
            "Unsupported URL scheme 'ftp' (expected ws, wss, http, or https)"
        );
        assert_eq!(
            Error::WebSocketConnect("refused".into()).to_string(),
            "WebSocket connection failed: refused"
        );
    }
}
