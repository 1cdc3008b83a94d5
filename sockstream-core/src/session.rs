//! A framing session: accumulation buffer, parameter store and the active
//! strategy, treated as one value.
//!
//! Reconnecting or switching the framing mode builds a new session instead
//! of patching fields in place, so no buffered bytes or half-read header
//! leak from one stream (or one mode) into the next.

use bytes::BytesMut;

use crate::buffer::AccumulationBuffer;
use crate::frame::StreamEvent;
use crate::framer::{self, Framer, FramerConfig, FramingState};
use crate::params::{ParameterStore, ReceiverParameters};

#[derive(Debug)]
pub struct Session {
    buffer: AccumulationBuffer,
    store: ParameterStore,
    framer: Box<dyn Framer>,
    config: FramerConfig,
}

impl Session {
    pub fn new(params: ReceiverParameters, config: FramerConfig) -> Self {
        let framer = framer::for_mode(params.use_headers, config);
        Self {
            buffer: AccumulationBuffer::new(),
            store: ParameterStore::new(params),
            framer,
            config,
        }
    }

    /// Append a chunk received from the socket.
    pub fn append(&mut self, chunk: &[u8]) {
        self.buffer.append(chunk);
    }

    pub fn append_bytes(&mut self, chunk: BytesMut) {
        self.buffer.append_bytes(chunk);
    }

    /// Run the framer one step. `None` means more bytes are needed.
    pub fn next_event(&mut self) -> Option<StreamEvent> {
        self.framer.next_event(&mut self.buffer, &mut self.store)
    }

    /// Append `chunk` and drain until the framer suspends.
    pub fn drain(&mut self, chunk: &[u8]) -> Vec<StreamEvent> {
        self.append(chunk);
        std::iter::from_fn(|| self.next_event()).collect()
    }

    /// Start over with an empty buffer, keeping the current parameters.
    pub fn reset(&mut self) {
        *self = Self::new(self.store.params().clone(), self.config);
    }

    /// Switch framing mode. Buffered bytes are discarded.
    pub fn set_use_headers(&mut self, use_headers: bool) {
        let params = ReceiverParameters {
            use_headers,
            ..self.store.params().clone()
        };
        *self = Self::new(params, self.config);
    }

    /// Replace the parameters. Buffered bytes are discarded.
    pub fn update_params(&mut self, params: ReceiverParameters) {
        *self = Self::new(params, self.config);
    }

    pub fn params(&self) -> &ReceiverParameters {
        self.store.params()
    }

    /// Frame length the next raw frame (or last negotiated header) uses.
    pub fn buffer_byte_size(&self) -> usize {
        self.store.buffer_byte_size()
    }

    /// Bytes received but not yet cut into a frame.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Header framer position; `None` in raw mode.
    pub fn state(&self) -> Option<FramingState> {
        self.framer.state()
    }

    pub fn config(&self) -> FramerConfig {
        self.config
    }
}
