//! Accumulation buffer for bytes not yet consumed into a frame.
//!
//! Backed by `bytes::BytesMut`: appends grow the tail with amortized
//! reallocation, consuming from the head advances the start without
//! moving the remaining bytes.

use bytes::BytesMut;

/// Initial capacity reserved for a fresh buffer.
const INITIAL_CAPACITY: usize = 64 * 1024;

/// Ordered byte sequence, append at the tail, consume from the head.
#[derive(Debug)]
pub struct AccumulationBuffer {
    bytes: BytesMut,
}

impl AccumulationBuffer {
    pub fn new() -> Self {
        Self::with_capacity(INITIAL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: BytesMut::with_capacity(capacity),
        }
    }

    /// Append a chunk at the tail.
    pub fn append(&mut self, chunk: &[u8]) {
        self.bytes.extend_from_slice(chunk);
    }

    /// Append an owned chunk, taking over its allocation when the buffer
    /// is empty.
    pub fn append_bytes(&mut self, chunk: BytesMut) {
        if self.bytes.is_empty() {
            self.bytes = chunk;
        } else {
            self.bytes.unsplit(chunk);
        }
    }

    /// Remove and return the first `n` bytes.
    ///
    /// Returns `None` and leaves the buffer untouched when fewer than `n`
    /// bytes are buffered.
    pub fn consume_front(&mut self, n: usize) -> Option<BytesMut> {
        if n > self.bytes.len() {
            return None;
        }
        Some(self.bytes.split_to(n))
    }

    /// Drop up to `n` bytes from the head.
    pub fn discard_front(&mut self, n: usize) {
        let n = n.min(self.bytes.len());
        let _ = self.bytes.split_to(n);
    }

    /// Look at the first `n` bytes without removing them.
    pub fn peek_front(&self, n: usize) -> Option<&[u8]> {
        self.bytes.get(..n)
    }

    /// Offset of the first exact occurrence of `pattern`.
    pub fn find_pattern(&self, pattern: &[u8]) -> Option<usize> {
        if pattern.is_empty() {
            return Some(0);
        }
        self.bytes
            .windows(pattern.len())
            .position(|window| window == pattern)
    }

    /// Length of the longest tail that is a proper prefix of `pattern`.
    ///
    /// Used to keep a marker that is split across two reads.
    pub fn partial_suffix_len(&self, pattern: &[u8]) -> usize {
        let max = pattern.len().saturating_sub(1).min(self.bytes.len());
        (1..=max)
            .rev()
            .find(|&len| self.bytes[self.bytes.len() - len..] == pattern[..len])
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn clear(&mut self) {
        self.bytes.clear();
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }
}

impl Default for AccumulationBuffer {
    fn default() -> Self {
        Self::new()
    }
}
