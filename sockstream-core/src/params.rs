//! Receiver parameters and the store holding the negotiated values.

use serde::{Deserialize, Serialize};

use crate::error::StreamError;
use crate::header::FrameHeader;

// ── ReceiverParameters ───────────────────────────────────────────

/// Connection target, frame geometry and framing mode.
///
/// In raw mode the geometry fully determines the frame length. In header
/// mode it only serves as the starting point until the first header
/// arrives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReceiverParameters {
    pub host: String,
    pub port: u16,
    /// Significant bits per sample, `1..=32`.
    pub bit_depth: u8,
    pub samples_per_line: u32,
    pub lines_per_frame: u32,
    pub frames_per_buffer: u32,
    /// Frames are delimited by wire headers instead of a fixed size.
    pub use_headers: bool,
}

impl Default for ReceiverParameters {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 1234,
            bit_depth: 8,
            samples_per_line: 0,
            lines_per_frame: 0,
            frames_per_buffer: 0,
            use_headers: true,
        }
    }
}

impl ReceiverParameters {
    /// `ceil(bit_depth / 8)`.
    pub fn bytes_per_sample(&self) -> usize {
        bytes_per_sample(self.bit_depth)
    }

    /// Bytes in a single frame.
    pub fn frame_byte_size(&self) -> usize {
        self.samples_per_line as usize * self.lines_per_frame as usize * self.bytes_per_sample()
    }

    /// Bytes in one raw-mode buffer (`frame_byte_size * frames_per_buffer`).
    pub fn buffer_byte_size(&self) -> usize {
        self.frame_byte_size() * self.frames_per_buffer as usize
    }

    /// `host:port` suitable for `TcpStream::connect`.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check that the parameters describe at least one non-empty frame.
    pub fn validate(&self) -> Result<(), StreamError> {
        if !(1..=32).contains(&self.bit_depth) {
            return Err(StreamError::InvalidParameters("bit depth must be 1..=32"));
        }
        if self.samples_per_line == 0 || self.lines_per_frame == 0 {
            return Err(StreamError::InvalidParameters("frame geometry must be non-zero"));
        }
        if self.frames_per_buffer == 0 {
            return Err(StreamError::InvalidParameters("frames per buffer must be non-zero"));
        }
        Ok(())
    }

    /// Parameters negotiated by `header`, keeping host, port and mode.
    ///
    /// `frames_per_buffer` is the number of whole frames the payload
    /// holds, never less than one.
    pub fn negotiated(&self, header: &FrameHeader) -> Self {
        let frame = bytes_per_sample(header.bit_depth) * header.width as usize * header.height as usize;
        let frames = if frame == 0 {
            1
        } else {
            (header.payload_byte_size as usize / frame).max(1)
        };
        Self {
            bit_depth: header.bit_depth,
            samples_per_line: u32::from(header.width),
            lines_per_frame: u32::from(header.height),
            frames_per_buffer: u32::try_from(frames).unwrap_or(u32::MAX),
            ..self.clone()
        }
    }
}

/// `ceil(bit_depth / 8)`.
pub fn bytes_per_sample(bit_depth: u8) -> usize {
    (bit_depth as usize).div_ceil(8)
}

// ── ParameterStore ───────────────────────────────────────────────

/// Holds the current [`ReceiverParameters`] and the derived buffer size.
#[derive(Debug, Clone)]
pub struct ParameterStore {
    params: ReceiverParameters,
    buffer_byte_size: usize,
}

impl ParameterStore {
    pub fn new(params: ReceiverParameters) -> Self {
        let buffer_byte_size = params.buffer_byte_size();
        Self {
            params,
            buffer_byte_size,
        }
    }

    /// Replace the parameters and recompute the buffer size.
    pub fn update_params(&mut self, params: ReceiverParameters) {
        self.buffer_byte_size = params.buffer_byte_size();
        self.params = params;
    }

    /// Record the payload size announced by the wire, which may include
    /// trailing bytes that do not fill a whole frame.
    pub fn set_buffer_byte_size(&mut self, size: usize) {
        self.buffer_byte_size = size;
    }

    pub fn params(&self) -> &ReceiverParameters {
        &self.params
    }

    pub fn buffer_byte_size(&self) -> usize {
        self.buffer_byte_size
    }

    /// Whether `header` announces anything other than what is stored.
    pub fn differs_from(&self, header: &FrameHeader) -> bool {
        self.params.bit_depth != header.bit_depth
            || self.params.samples_per_line != u32::from(header.width)
            || self.params.lines_per_frame != u32::from(header.height)
            || self.buffer_byte_size != header.payload_byte_size as usize
    }
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new(ReceiverParameters::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mono8(w: u32, h: u32, frames: u32) -> ReceiverParameters {
        ReceiverParameters {
            bit_depth: 8,
            samples_per_line: w,
            lines_per_frame: h,
            frames_per_buffer: frames,
            use_headers: false,
            ..Default::default()
        }
    }

    #[test]
    fn bytes_per_sample_rounds_up() {
        assert_eq!(bytes_per_sample(1), 1);
        assert_eq!(bytes_per_sample(8), 1);
        assert_eq!(bytes_per_sample(9), 2);
        assert_eq!(bytes_per_sample(12), 2);
        assert_eq!(bytes_per_sample(16), 2);
        assert_eq!(bytes_per_sample(17), 3);
        assert_eq!(bytes_per_sample(32), 4);
    }

    #[test]
    fn derived_sizes() {
        let p = ReceiverParameters {
            bit_depth: 12,
            ..mono8(100, 50, 3)
        };
        assert_eq!(p.frame_byte_size(), 100 * 50 * 2);
        assert_eq!(p.buffer_byte_size(), 100 * 50 * 2 * 3);
    }

    #[test]
    fn validate_rejects_bad_values() {
        assert!(mono8(4, 4, 1).validate().is_ok());
        assert!(mono8(0, 4, 1).validate().is_err());
        assert!(mono8(4, 0, 1).validate().is_err());
        assert!(mono8(4, 4, 0).validate().is_err());
        let p = ReceiverParameters {
            bit_depth: 33,
            ..mono8(4, 4, 1)
        };
        assert!(p.validate().is_err());
    }

    #[test]
    fn negotiated_keeps_connection_fields() {
        let base = ReceiverParameters {
            host: "10.0.0.7".into(),
            port: 9000,
            use_headers: true,
            ..mono8(1, 1, 1)
        };
        let header = FrameHeader::new(3 * 64 * 32 * 2, 64, 32, 16);
        let p = base.negotiated(&header);
        assert_eq!(p.host, "10.0.0.7");
        assert_eq!(p.port, 9000);
        assert!(p.use_headers);
        assert_eq!(p.bit_depth, 16);
        assert_eq!(p.samples_per_line, 64);
        assert_eq!(p.lines_per_frame, 32);
        assert_eq!(p.frames_per_buffer, 3);
    }

    #[test]
    fn negotiated_frames_never_zero() {
        let header = FrameHeader::new(10, 64, 64, 8);
        assert_eq!(ReceiverParameters::default().negotiated(&header).frames_per_buffer, 1);
    }

    #[test]
    fn store_recomputes_on_update() {
        let mut store = ParameterStore::new(mono8(2, 2, 1));
        assert_eq!(store.buffer_byte_size(), 4);
        store.update_params(mono8(4, 4, 2));
        assert_eq!(store.buffer_byte_size(), 32);
        assert_eq!(store.params().frames_per_buffer, 2);
    }

    #[test]
    fn store_difference_covers_every_field() {
        let mut store = ParameterStore::new(mono8(8, 4, 1));
        assert!(!store.differs_from(&FrameHeader::new(32, 8, 4, 8)));
        assert!(store.differs_from(&FrameHeader::new(64, 8, 4, 8)));
        assert!(store.differs_from(&FrameHeader::new(32, 4, 8, 8)));
        assert!(store.differs_from(&FrameHeader::new(32, 8, 4, 7)));

        store.set_buffer_byte_size(33);
        assert!(store.differs_from(&FrameHeader::new(32, 8, 4, 8)));
        assert!(!store.differs_from(&FrameHeader::new(33, 8, 4, 8)));
    }

    #[test]
    fn default_parameters() {
        let p = ReceiverParameters::default();
        assert_eq!(p.address(), "127.0.0.1:1234");
        assert!(p.use_headers);
        assert_eq!(p.buffer_byte_size(), 0);
    }
}
