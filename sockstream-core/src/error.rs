//! Domain-specific error types for the stream client.
//!
//! Framing itself never fails: desyncs, invalid headers and allocation
//! failures are handled inside the framer and only logged. The errors
//! below cover configuration and the connection lifecycle.

use std::time::Duration;
use thiserror::Error;

/// The canonical error type for `sockstream-core`.
#[derive(Debug, Error)]
pub enum StreamError {
    // ── Parameter Errors ─────────────────────────────────────────
    /// Receiver parameters cannot describe a frame.
    #[error("invalid receiver parameters: {0}")]
    InvalidParameters(&'static str),

    /// A wire header could not be decoded.
    #[error("invalid header: {0}")]
    InvalidHeader(&'static str),

    /// A command string did not name a known remote command.
    #[error("unknown remote command: {0}")]
    UnknownCommand(String),

    // ── Connection Errors ────────────────────────────────────────
    /// The TCP/IO layer reported an error.
    #[error("connection error: {0}")]
    Connection(#[from] std::io::Error),

    /// An operation needed a live connection but there is none.
    #[error("not connected")]
    NotConnected,

    /// `connect` was called while a connection is already open.
    #[error("already connected")]
    AlreadyConnected,

    /// An mpsc channel was closed unexpectedly.
    #[error("channel closed")]
    ChannelClosed,

    /// An operation exceeded its deadline.
    #[error("timeout after {0:?}")]
    Timeout(Duration),

    /// Catch-all for errors that do not fit another variant.
    #[error("{0}")]
    Other(String),
}

// ── Convenient From implementations ──────────────────────────────

impl From<String> for StreamError {
    fn from(s: String) -> Self {
        StreamError::Other(s)
    }
}

impl From<&str> for StreamError {
    fn from(s: &str) -> Self {
        StreamError::Other(s.to_string())
    }
}

impl<T> From<tokio::sync::mpsc::error::SendError<T>> for StreamError {
    fn from(_: tokio::sync::mpsc::error::SendError<T>) -> Self {
        StreamError::ChannelClosed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let e = StreamError::InvalidParameters("bit depth must be 1..=32");
        assert!(e.to_string().contains("bit depth"));

        let e = StreamError::Timeout(Duration::from_millis(250));
        assert!(e.to_string().contains("250ms"));
    }

    #[test]
    fn from_string() {
        let e: StreamError = "something broke".into();
        assert!(matches!(e, StreamError::Other(_)));
    }

    #[test]
    fn from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let e: StreamError = io_err.into();
        assert!(matches!(e, StreamError::Connection(_)));
    }

    #[test]
    fn from_send_error() {
        let e: StreamError = tokio::sync::mpsc::error::SendError(1u8).into();
        assert!(matches!(e, StreamError::ChannelClosed));
    }
}
