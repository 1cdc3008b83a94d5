//! Commands typed on stdin while the client runs.

use std::fmt;
use std::str::FromStr;

use sockstream_core::StreamError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// Ask the server to start streaming.
    Start,
    /// Ask the server to stop streaming.
    Stop,
    /// Switch header framing on or off.
    Headers(bool),
    Connect,
    Disconnect,
    Quit,
}

impl FromStr for ConsoleCommand {
    type Err = StreamError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let command = match (words.next(), words.next(), words.next()) {
            (Some("start"), None, _) => Self::Start,
            (Some("stop"), None, _) => Self::Stop,
            (Some("headers"), Some("on"), None) => Self::Headers(true),
            (Some("headers"), Some("off"), None) => Self::Headers(false),
            (Some("connect"), None, _) => Self::Connect,
            (Some("disconnect"), None, _) => Self::Disconnect,
            (Some("quit" | "exit"), None, _) => Self::Quit,
            _ => return Err(StreamError::UnknownCommand(line.trim().to_string())),
        };
        Ok(command)
    }
}

impl fmt::Display for ConsoleCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => f.write_str("start"),
            Self::Stop => f.write_str("stop"),
            Self::Headers(true) => f.write_str("headers on"),
            Self::Headers(false) => f.write_str("headers off"),
            Self::Connect => f.write_str("connect"),
            Self::Disconnect => f.write_str("disconnect"),
            Self::Quit => f.write_str("quit"),
        }
    }
}

/// One-line usage shown for unknown input.
pub const USAGE: &str = "commands: start | stop | headers on|off | connect | disconnect | quit";
