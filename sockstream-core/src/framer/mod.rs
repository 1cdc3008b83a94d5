//! Framing strategies that cut frames out of the accumulation buffer.
//!
//! | Strategy         | Frame length comes from                 | Resync |
//! |------------------|-----------------------------------------|--------|
//! | [`RawFramer`]    | the configured [`ReceiverParameters`]   | no     |
//! | [`HeaderFramer`] | a 13-byte header in front of every frame | yes    |
//!
//! Both are driven one event at a time through [`Framer::next_event`]
//! and return `None` when they have to wait for more bytes. Nothing is
//! held across those suspensions except the buffer itself and, for the
//! header framer, its [`FramingState`].
//!
//! [`ReceiverParameters`]: crate::params::ReceiverParameters

pub mod header;
pub mod raw;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::buffer::AccumulationBuffer;
use crate::frame::StreamEvent;
use crate::params::ParameterStore;

pub use header::HeaderFramer;
pub use raw::RawFramer;

// ── FramingState ─────────────────────────────────────────────────

/// Position of the header framer within the current record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FramingState {
    /// Next bytes are expected to be a header.
    #[default]
    AwaitingHeader,
    /// A header was consumed; `frame_size` payload bytes follow.
    AwaitingFrame { frame_size: usize },
}

// ── InvalidHeaderPolicy ──────────────────────────────────────────

/// What to do with a header whose magic matches but whose declared
/// size or geometry is out of bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvalidHeaderPolicy {
    /// Drop one byte and scan for the next magic.
    #[default]
    Resync,
    /// Keep the header in place and wait. Every later drain looks at the
    /// same bytes again, so a persistently bad header blocks the stream.
    Stall,
}

/// Tuning shared by all framers of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FramerConfig {
    pub invalid_header_policy: InvalidHeaderPolicy,
}

// ── Framer ───────────────────────────────────────────────────────

/// A framing strategy.
pub trait Framer: Send + fmt::Debug {
    /// Produce the next event from `buffer`, or `None` if more bytes are
    /// needed. Callers loop until `None` to drain the buffer.
    fn next_event(
        &mut self,
        buffer: &mut AccumulationBuffer,
        store: &mut ParameterStore,
    ) -> Option<StreamEvent>;

    /// Current header/payload position, if the strategy has one.
    fn state(&self) -> Option<FramingState> {
        None
    }
}

/// Build the strategy selected by `use_headers`.
pub fn for_mode(use_headers: bool, config: FramerConfig) -> Box<dyn Framer> {
    if use_headers {
        Box::new(HeaderFramer::new(config.invalid_header_policy))
    } else {
        Box::new(RawFramer::new())
    }
}

/// Copy `bytes` into a fresh allocation, or `None` if the allocator
/// refuses the request.
pub(crate) fn copy_payload(bytes: &[u8]) -> Option<Vec<u8>> {
    let mut data = Vec::new();
    data.try_reserve_exact(bytes.len()).ok()?;
    data.extend_from_slice(bytes);
    Some(data)
}
