//! Out-of-band control messages sent to the streaming server.
//!
//! The server understands two literal ASCII strings on the data socket.
//! Nothing is sent back in acknowledgment.

use crate::error::StreamError;
use std::fmt;
use std::str::FromStr;

/// Requests the server can act on while a connection is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteCommand {
    /// Ask the server to start streaming.
    Start,
    /// Ask the server to stop streaming.
    Stop,
}

impl RemoteCommand {
    /// Exact bytes written to the socket.
    pub const fn as_str(self) -> &'static str {
        match self {
            RemoteCommand::Start => "remote_start",
            RemoteCommand::Stop => "remote_stop",
        }
    }

    pub const fn as_bytes(self) -> &'static [u8] {
        self.as_str().as_bytes()
    }
}

impl FromStr for RemoteCommand {
    type Err = StreamError;

    /// Accepts the wire strings as well as the short `start` / `stop`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "remote_start" | "start" => Ok(RemoteCommand::Start),
            "remote_stop" | "stop" => Ok(RemoteCommand::Stop),
            other => Err(StreamError::UnknownCommand(other.to_string())),
        }
    }
}

impl fmt::Display for RemoteCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
