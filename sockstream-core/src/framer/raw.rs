//! Raw fixed-size framing.
//!
//! The frame length is `ParameterStore::buffer_byte_size`, set from the
//! receiver parameters before connecting. There is no marker to realign
//! on, so a single lost byte shifts every following frame until the
//! session is rebuilt.

use tracing::error;

use super::{Framer, copy_payload};
use crate::buffer::AccumulationBuffer;
use crate::frame::{Frame, StreamEvent};
use crate::params::ParameterStore;

#[derive(Debug, Default)]
pub struct RawFramer;

impl RawFramer {
    pub fn new() -> Self {
        Self
    }
}

impl Framer for RawFramer {
    fn next_event(
        &mut self,
        buffer: &mut AccumulationBuffer,
        store: &mut ParameterStore,
    ) -> Option<StreamEvent> {
        let size = store.buffer_byte_size();
        if size == 0 {
            return None;
        }

        loop {
            let bytes = buffer.consume_front(size)?;
            let Some(data) = copy_payload(&bytes) else {
                error!(size, "frame allocation failed; dropping frame");
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
