//! # sockstream-core
//!
//! Client-side library for servers that stream image frames over TCP.
//!
//! This crate contains:
//! - **Buffer**: `AccumulationBuffer` holding bytes not yet cut into frames
//! - **Framing**: `RawFramer` (fixed size) and `HeaderFramer` (13-byte
//!   big-endian headers with resynchronization and renegotiation)
//! - **Parameters**: `ReceiverParameters` and the `ParameterStore`
//! - **Session**: buffer, store and framer as one resettable value
//! - **Codec**: `StreamCodec` for framed TCP I/O via `tokio_util`
//! - **Network**: `DataReceiver` owning the connection task
//! - **Error**: `StreamError`, typed, `thiserror`-based errors

pub mod buffer;
pub mod codec;
pub mod error;
pub mod frame;
pub mod framer;
pub mod header;
pub mod message;
pub mod network;
pub mod params;
pub mod session;

// ── Re-exports for ergonomic usage ───────────────────────────────

pub use buffer::AccumulationBuffer;
pub use codec::StreamCodec;
pub use error::StreamError;
pub use frame::{Frame, StreamEvent};
pub use framer::{Framer, FramerConfig, FramingState, HeaderFramer, InvalidHeaderPolicy, RawFramer};
pub use header::{FrameHeader, HEADER_SIZE, MAGIC_NUMBER, MAX_ALLOWED_SIZE};
pub use message::RemoteCommand;
pub use network::{DataReceiver, EventReceiver, ReceiverConfig};
pub use params::{ParameterStore, ReceiverParameters};
pub use session::Session;
