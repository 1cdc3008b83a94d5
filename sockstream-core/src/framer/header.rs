//! Header-delimited framing with resynchronization and live parameter
//! renegotiation.
//!
//! ```text
//!           ┌──────────────── frame emitted ────────────────┐
//!           ▼                                               │
//!   AwaitingHeader ── valid header consumed ──► AwaitingFrame
//!     │    ▲
//!     │    └── bad magic: skip to next magic / drop buffer
//!     └── invalid size: drop one byte (Resync) or wait (Stall)
//! ```

use tracing::{debug, error, info, warn};

use super::{Framer, FramingState, InvalidHeaderPolicy, copy_payload};
use crate::buffer::AccumulationBuffer;
use crate::frame::{Frame, StreamEvent};
use crate::header::{FrameHeader, HEADER_SIZE, MAGIC_PATTERN};
use crate::params::{ParameterStore, ReceiverParameters};

/// Outcome of one attempt to read a header.
enum HeaderStep {
    /// Header consumed and it renegotiated the parameters.
    Changed(ReceiverParameters),
    /// Header consumed, parameters unchanged.
    Consumed,
    /// Not enough usable bytes.
    Suspend,
}

/// State machine for the self-describing wire format.
#[derive(Debug)]
pub struct HeaderFramer {
    state: FramingState,
    policy: InvalidHeaderPolicy,
    /// Set while stalled on an invalid header so it is logged once.
    stalled: bool,
}

impl HeaderFramer {
    pub fn new(policy: InvalidHeaderPolicy) -> Self {
        Self {
            state: FramingState::AwaitingHeader,
            policy,
            stalled: false,
        }
    }

    /// Consume one header if possible, moving to `AwaitingFrame`.
    fn read_header(
        &mut self,
        buffer: &mut AccumulationBuffer,
        store: &mut ParameterStore,
    ) -> HeaderStep {
        loop {
            let Some(header) = buffer
                .peek_front(HEADER_SIZE)
                .and_then(|raw| FrameHeader::decode(raw).ok())
            else {
                return HeaderStep::Suspend;
            };

            if !header.has_valid_magic() {
                match buffer.find_pattern(&MAGIC_PATTERN) {
                    Some(offset) => {
                        debug!(skipped = offset, "resynchronized on magic number");
                        buffer.discard_front(offset);
                        continue;
                    }
                    None => {
                        let keep = buffer.partial_suffix_len(&MAGIC_PATTERN);
                        let dropped = buffer.len() - keep;
                        warn!(dropped, "no magic number in buffered data; discarding");
                        buffer.discard_front(dropped);
                        return HeaderStep::Suspend;
                    }
                }
            }

            if !(header.has_valid_size() && header.has_valid_geometry()) {
                if !self.stalled {
                    warn!(
                        payload_byte_size = header.payload_byte_size,
                        width = header.width,
                        height = header.height,
                        bit_depth = header.bit_depth,
                        policy = ?self.policy,
                        "invalid frame header"
                    );
                }
                match self.policy {
                    InvalidHeaderPolicy::Resync => {
                        buffer.discard_front(1);
                        continue;
                    }
                    InvalidHeaderPolicy::Stall => {
                        self.stalled = true;
                        return HeaderStep::Suspend;
                    }
                }
            }
            self.stalled = false;

            let step = if store.differs_from(&header) {
                let params = store.params().negotiated(&header);
                store.update_params(params.clone());
                store.set_buffer_byte_size(header.payload_byte_size as usize);
                info!(
                    bit_depth = params.bit_depth,
                    samples_per_line = params.samples_per_line,
                    lines_per_frame = params.lines_per_frame,
                    frames_per_buffer = params.frames_per_buffer,
                    "stream parameters changed"
                );
                HeaderStep::Changed(params)
            } else {
                HeaderStep::Consumed
            };

            buffer.discard_front(HEADER_SIZE);
            self.state = FramingState::AwaitingFrame {
                frame_size: header.payload_byte_size as usize,
            };
            return step;
        }
    }
}

impl Default for HeaderFramer {
    fn default() -> Self {
        Self::new(InvalidHeaderPolicy::default())
    }
}

impl Framer for HeaderFramer {
    fn next_event(
        &mut self,
        buffer: &mut AccumulationBuffer,
        store: &mut ParameterStore,
    ) -> Option<StreamEvent> {
        loop {
            match self.state {
                FramingState::AwaitingHeader => match self.read_header(buffer, store) {
                    HeaderStep::Changed(params) => {
                        return Some(StreamEvent::ParametersChanged(params));
                    }
                    HeaderStep::Consumed => continue,
                    HeaderStep::Suspend => return None,
                },
                FramingState::AwaitingFrame { frame_size } => {
                    let bytes = buffer.consume_front(frame_size)?;
                    self.state = FramingState::AwaitingHeader;

                    let Some(data) = copy_payload(&bytes) else {
                        error!(frame_size, "frame allocation failed; dropping frame");
                        continue;
                    };
                    let params = store.params();
                    return Some(StreamEvent::FrameReady(Frame::new(
                        data,
                        params.bit_depth,
                        params.samples_per_line,
                        params.lines_per_frame,
                    )));
                }
            }
        }
    }

    fn state(&self) -> Option<FramingState> {
        Some(self.state)
    }
}
