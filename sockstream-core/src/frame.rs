//! Frames and the events produced by the framing engine.

use std::fmt;

use crate::params::{ReceiverParameters, bytes_per_sample};

// ── Frame ────────────────────────────────────────────────────────

/// One complete payload cut out of the byte stream.
///
/// The payload is an owned copy, never a view into the accumulation
/// buffer. `Frame` is deliberately not `Clone`: it moves to the consumer
/// and is released there.
pub struct Frame {
    data: Vec<u8>,
    bit_depth: u8,
    width: u32,
    height: u32,
}

impl Frame {
    pub fn new(data: Vec<u8>, bit_depth: u8, width: u32, height: u32) -> Self {
        Self {
            data,
            bit_depth,
            width,
            height,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Take the payload out of the frame.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn bit_depth(&self) -> u8 {
        self.bit_depth
    }

    /// Samples per line.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Lines per frame.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes occupied by one image of this geometry.
    pub fn image_byte_size(&self) -> usize {
        self.width as usize * self.height as usize * bytes_per_sample(self.bit_depth)
    }

    /// Number of whole images carried by the payload.
    pub fn image_count(&self) -> usize {
        match self.image_byte_size() {
            0 => 0,
            n => self.data.len() / n,
        }
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("len", &self.data.len())
            .field("bit_depth", &self.bit_depth)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

// ── StreamEvent ──────────────────────────────────────────────────

/// Everything the receiver reports to its consumer, in stream order.
#[derive(Debug)]
pub enum StreamEvent {
    /// A complete frame was cut from the stream.
    FrameReady(Frame),
    /// A wire header announced new geometry or bit depth.
    ParametersChanged(ReceiverParameters),
    /// The TCP connection went up (`true`) or down (`false`).
    ConnectionStateChanged(bool),
}

impl StreamEvent {
    pub fn into_frame(self) -> Option<Frame> {
        match self {
            StreamEvent::FrameReady(frame) => Some(frame),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_count_for_multi_frame_buffer() {
        let frame = Frame::new(vec![0; 3 * 4 * 4 * 2], 12, 4, 4);
        assert_eq!(frame.image_byte_size(), 32);
        assert_eq!(frame.image_count(), 3);
    }

    #[test]
    fn debug_omits_payload() {
        let frame = Frame::new(vec![0xAB; 1024], 8, 32, 32);
        let text = format!("{frame:?}");
        assert!(text.contains("len: 1024"));
        assert!(!text.contains("171"));
    }

    #[test]
    fn into_frame_only_for_frames() {
        assert!(StreamEvent::ConnectionStateChanged(true).into_frame().is_none());
        let frame = StreamEvent::FrameReady(Frame::new(vec![1, 2], 8, 2, 1))
            .into_frame()
            .unwrap();
        assert_eq!(frame.into_data(), vec![1, 2]);
    }
}
