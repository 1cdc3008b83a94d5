//! # sockstream-client: headless frame-stream test client
//!
//! Connects a `DataReceiver` to a frame server, logs what arrives,
//! tracks frame rate and throughput, and can dump frames as 8-bit PGM
//! images. The server is driven with commands typed on stdin.

pub mod config;
pub mod console;
pub mod converter;
pub mod error;
pub mod sink;
pub mod stats;

pub use config::ClientConfig;
pub use console::ConsoleCommand;
pub use converter::BitDepthConverter;
pub use error::ClientError;
pub use sink::FrameSink;
pub use stats::{FrameStats, StatsTracker};
