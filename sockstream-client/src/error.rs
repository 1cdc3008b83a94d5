//! Errors raised by the client binary and its helpers.

use sockstream_core::StreamError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Stream(#[from] StreamError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),

    /// Geometry or bit depth that cannot be converted.
    #[error("invalid frame dimensions: {width}x{height} at {bit_depth} bits")]
    InvalidDimensions {
        width: u32,
        height: u32,
        bit_depth: u8,
    },

    #[error("frame too short: expected {expected} bytes, got {actual}")]
    FrameTooShort { expected: usize, actual: usize },
}

impl From<toml::ser::Error> for ClientError {
    fn from(e: toml::ser::Error) -> Self {
        Self::Config(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_errors_pass_through() {
        let e: ClientError = StreamError::NotConnected.into();
        assert_eq!(e.to_string(), StreamError::NotConnected.to_string());
    }

    #[test]
    fn frame_too_short_message() {
        let e = ClientError::FrameTooShort {
            expected: 16,
            actual: 3,
        };
        assert_eq!(e.to_string(), "frame too short: expected 16 bytes, got 3");
    }
}
