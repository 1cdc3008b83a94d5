//! Wire header used in header-delimited framing.
//!
//! ```text
//! offset  size  field
//!   0      4    magic              (299792458)
//!   4      4    payload_byte_size  bytes of frame data that follow
//!   8      2    width              samples per line
//!  10      2    height             lines per frame
//!  12      1    bit_depth          1..=32
//! ```
//!
//! All integers are big-endian.

use crate::error::StreamError;

/// Marks the start of every header on the wire.
pub const MAGIC_NUMBER: u32 = 299_792_458;

/// Encoded size of a [`FrameHeader`].
pub const HEADER_SIZE: usize = 13;

/// Exclusive upper bound for a declared payload size.
pub const MAX_ALLOWED_SIZE: u32 = 4 * 4096 * 4096 * 8;

/// Big-endian byte pattern of [`MAGIC_NUMBER`], used for resynchronization.
pub const MAGIC_PATTERN: [u8; 4] = MAGIC_NUMBER.to_be_bytes();

pub type FrameHeaderBytes = [u8; HEADER_SIZE];

/// A decoded frame header. Parsed and discarded once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub magic: u32,
    pub payload_byte_size: u32,
    pub width: u16,
    pub height: u16,
    pub bit_depth: u8,
}

impl FrameHeader {
    /// Build a header carrying the protocol magic.
    pub fn new(payload_byte_size: u32, width: u16, height: u16, bit_depth: u8) -> Self {
        Self {
            magic: MAGIC_NUMBER,
            payload_byte_size,
            width,
            height,
            bit_depth,
        }
    }

    pub fn to_bytes(&self) -> FrameHeaderBytes {
        let mut out: FrameHeaderBytes = [0; HEADER_SIZE];
        out[0..4].copy_from_slice(&self.magic.to_be_bytes());
        out[4..8].copy_from_slice(&self.payload_byte_size.to_be_bytes());
        out[8..10].copy_from_slice(&self.width.to_be_bytes());
        out[10..12].copy_from_slice(&self.height.to_be_bytes());
        out[12] = self.bit_depth;
        out
    }

    /// Decode the fields without validating them.
    ///
    /// Magic and size checks are the framer's job because a bad magic
    /// triggers resynchronization rather than an error.
    pub fn from_bytes(b: &FrameHeaderBytes) -> Self {
        Self {
            magic: u32::from_be_bytes([b[0], b[1], b[2], b[3]]),
            payload_byte_size: u32::from_be_bytes([b[4], b[5], b[6], b[7]]),
            width: u16::from_be_bytes([b[8], b[9]]),
            height: u16::from_be_bytes([b[10], b[11]]),
            bit_depth: b[12],
        }
    }

    /// Decode from a slice of at least [`HEADER_SIZE`] bytes.
    pub fn decode(data: &[u8]) -> Result<Self, StreamError> {
        let bytes: &FrameHeaderBytes = data
            .get(..HEADER_SIZE)
            .and_then(|s| s.try_into().ok())
            .ok_or(StreamError::InvalidHeader("fewer than 13 bytes"))?;
        Ok(Self::from_bytes(bytes))
    }

    pub fn has_valid_magic(&self) -> bool {
        self.magic == MAGIC_NUMBER
    }

    /// `0 < payload_byte_size < MAX_ALLOWED_SIZE`.
    pub fn has_valid_size(&self) -> bool {
        self.payload_byte_size > 0 && self.payload_byte_size < MAX_ALLOWED_SIZE
    }

    /// Non-zero geometry and a bit depth in `1..=32`.
    pub fn has_valid_geometry(&self) -> bool {
        self.width > 0 && self.height > 0 && (1..=32).contains(&self.bit_depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magic_pattern_is_big_endian() {
        assert_eq!(MAGIC_PATTERN, [0x11, 0xDE, 0x78, 0x4A]);
        assert_eq!(MAX_ALLOWED_SIZE, 536_870_912);
    }

    #[test]
    fn known_bytes_decode() {
        let raw = [
            0x11, 0xDE, 0x78, 0x4A, // magic
            0x00, 0x00, 0x10, 0x00, // 4096
            0x00, 0x40, // 64
            0x00, 0x20, // 32
            0x10, // 16 bit
        ];
        let h = FrameHeader::decode(&raw).unwrap();
        assert!(h.has_valid_magic());
        assert_eq!(h.payload_byte_size, 4096);
        assert_eq!(h.width, 64);
        assert_eq!(h.height, 32);
        assert_eq!(h.bit_depth, 16);
        assert_eq!(h.to_bytes(), raw);
    }

    #[test]
    fn decode_too_short() {
        assert!(FrameHeader::decode(&[0u8; 12]).is_err());
    }

    #[test]
    fn size_bounds() {
        let mut h = FrameHeader::new(MAX_ALLOWED_SIZE - 1, 1, 1, 8);
        assert!(h.has_valid_size());
        h.payload_byte_size = MAX_ALLOWED_SIZE;
        assert!(!h.has_valid_size());
        h.payload_byte_size = 0;
        assert!(!h.has_valid_size());
    }

    #[test]
    fn geometry_bounds() {
        assert!(FrameHeader::new(1, 1, 1, 32).has_valid_geometry());
        assert!(!FrameHeader::new(1, 0, 1, 8).has_valid_geometry());
        assert!(!FrameHeader::new(1, 1, 0, 8).has_valid_geometry());
        assert!(!FrameHeader::new(1, 1, 1, 0).has_valid_geometry());
        assert!(!FrameHeader::new(1, 1, 1, 33).has_valid_geometry());
    }
}
