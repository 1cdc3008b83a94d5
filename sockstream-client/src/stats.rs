//! Receive statistics.
//!
//! Frames are recorded as `(timestamp, bytes)` samples over a rolling
//! window, from which the current frame rate and throughput are derived.

use std::collections::VecDeque;
use std::fmt;
use std::time::{Duration, Instant};

/// Snapshot of the receive statistics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameStats {
    /// Frames per second over the rolling window.
    pub fps: f64,
    /// Bytes per second over the rolling window.
    pub bytes_per_sec: u64,
    pub total_frames: u64,
    pub total_bytes: u64,
    /// Geometry of the last frame.
    pub width: u32,
    pub height: u32,
    pub bit_depth: u8,
}

impl fmt::Display for FrameStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.1} fps, {:.2} MB/s, {} frames ({} bytes) total, last {}x{} @ {} bit",
            self.fps,
            self.bytes_per_sec as f64 / 1_000_000.0,
            self.total_frames,
            self.total_bytes,
            self.width,
            self.height,
            self.bit_depth,
        )
    }
}

/// Rolling-window frame rate and throughput tracker.
pub struct StatsTracker {
    samples: VecDeque<(Instant, u64)>,
    window: Duration,
    window_bytes: u64,
    last: FrameStats,
}

impl StatsTracker {
    /// Tracker with a 1-second rolling window.
    pub fn new() -> Self {
        Self::with_window(Duration::from_secs(1))
    }

    pub fn with_window(window: Duration) -> Self {
        Self {
            samples: VecDeque::with_capacity(256),
            window,
            window_bytes: 0,
            last: FrameStats::default(),
        }
    }

    /// Record a frame of `bytes` received now.
    pub fn record(&mut self, bytes: u64, width: u32, height: u32, bit_depth: u8) {
        self.record_at(Instant::now(), bytes);
        self.last.width = width;
        self.last.height = height;
        self.last.bit_depth = bit_depth;
    }

    /// Record with an explicit timestamp (useful for testing).
    pub fn record_at(&mut self, when: Instant, bytes: u64) {
        self.samples.push_back((when, bytes));
        self.window_bytes += bytes;
        self.last.total_frames += 1;
        self.last.total_bytes += bytes;
        self.evict(when);
    }

    /// Current statistics.
    pub fn snapshot(&self) -> FrameStats {
        let span = self.span();
        let secs = span.as_secs_f64();
        FrameStats {
            fps: if self.samples.len() < 2 {
                0.0
            } else {
                (self.samples.len() - 1) as f64 / secs
            },
            bytes_per_sec: if self.samples.len() < 2 {
                0
            } else {
                (self.window_bytes as f64 / secs) as u64
            },
            ..self.last.clone()
        }
    }

    /// Forget everything, e.g. after reconnecting.
    pub fn reset(&mut self) {
        self.samples.clear();
        self.window_bytes = 0;
        self.last = FrameStats::default();
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    // ── Internal ─────────────────────────────────────────────────

    fn span(&self) -> Duration {
        match (self.samples.front(), self.samples.back()) {
            (Some((first, _)), Some((last, _))) => {
                let d = last.duration_since(*first);
                if d.is_zero() {
                    Duration::from_millis(1)
                } else {
                    d
                }
            }
            _ => Duration::from_millis(1),
        }
    }

    fn evict(&mut self, now: Instant) {
        while let Some(&(ts, bytes)) = self.samples.front() {
            if now.duration_since(ts) > self.window {
                self.samples.pop_front();
                self.window_bytes = self.window_bytes.saturating_sub(bytes);
            } else {
                break;
            }
        }
    }
}

impl Default for StatsTracker {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ────────────────────────────────────────────────────────
