//! Reduces frames of any supported bit depth to 8-bit samples.

use sockstream_core::Frame;
use sockstream_core::params::bytes_per_sample;

use crate::error::ClientError;

/// Converts the first image of a frame to one byte per sample.
///
/// The output buffer is kept between calls and only grows.
#[derive(Debug, Default)]
pub struct BitDepthConverter {
    output: Vec<u8>,
}

impl BitDepthConverter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert `frame` and return `width * height` 8-bit samples.
    ///
    /// Samples above 8 bits are little-endian and `ceil(bit_depth / 8)`
    /// bytes wide, the same packing the framer sizes frames with. They are
    /// scaled by `255 / (2^bit_depth - 1)`, truncating.
    pub fn convert(&mut self, frame: &Frame) -> Result<&[u8], ClientError> {
        let bit_depth = frame.bit_depth();
        let samples = frame.width() as usize * frame.height() as usize;
        if samples == 0 || !(1..=32).contains(&bit_depth) {
            return Err(ClientError::InvalidDimensions {
                width: frame.width(),
                height: frame.height(),
                bit_depth,
            });
        }

        let expected = frame.image_byte_size();
        let data = frame.data();
        if data.len() < expected {
            return Err(ClientError::FrameTooShort {
                expected,
                actual: data.len(),
            });
        }
        let image = &data[..expected];

        self.output.clear();
        match bytes_per_sample(bit_depth) {
            1 => self.output.extend_from_slice(image),
            width => self.output.extend(
                image
                    .chunks_exact(width)
                    .map(|s| scale(le_sample(s), bit_depth)),
            ),
        }
        Ok(&self.output)
    }
}

fn le_sample(bytes: &[u8]) -> u64 {
    bytes.iter().rev().fold(0, |acc, &b| (acc << 8) | b as u64)
}

fn scale(sample: u64, bit_depth: u8) -> u8 {
    let max = (1u64 << bit_depth) - 1;
    (sample * 255 / max).min(255) as u8
}
