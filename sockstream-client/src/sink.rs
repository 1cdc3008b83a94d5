//! Consumer side of the event channel: statistics, logging and optional
//! PGM dumps of received frames.

use std::path::{Path, PathBuf};

use sockstream_core::{Frame, ReceiverParameters, StreamEvent};
use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::converter::BitDepthConverter;
use crate::error::ClientError;
use crate::stats::{FrameStats, StatsTracker};

#[derive(Debug, Clone)]
struct DumpTarget {
    dir: PathBuf,
    every: u64,
}

pub struct FrameSink {
    stats: StatsTracker,
    converter: BitDepthConverter,
    dump: Option<DumpTarget>,
    frames_seen: u64,
}

impl FrameSink {
    pub fn new(dump_dir: Option<PathBuf>, dump_every: u64) -> Self {
        Self {
            stats: StatsTracker::new(),
            converter: BitDepthConverter::new(),
            dump: dump_dir.map(|dir| DumpTarget {
                dir,
                every: dump_every.max(1),
            }),
            frames_seen: 0,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.dump_dir(), config.output.dump_every)
    }

    /// Handle one event from the receiver.
    ///
    /// Conversion or dump failures are returned; the sink stays usable.
    pub async fn handle(&mut self, event: StreamEvent) -> Result<(), ClientError> {
        match event {
            StreamEvent::FrameReady(frame) => self.on_frame(frame).await,
            StreamEvent::ParametersChanged(params) => {
                log_params(&params);
                Ok(())
            }
            StreamEvent::ConnectionStateChanged(true) => {
                info!("connection up");
                self.stats.reset();
                self.frames_seen = 0;
                Ok(())
            }
            StreamEvent::ConnectionStateChanged(false) => {
                info!(stats = %self.stats.snapshot(), "connection down");
                Ok(())
            }
        }
    }

    pub fn stats(&self) -> FrameStats {
        self.stats.snapshot()
    }

    async fn on_frame(&mut self, frame: Frame) -> Result<(), ClientError> {
        self.stats
            .record(frame.len() as u64, frame.width(), frame.height(), frame.bit_depth());
        let index = self.frames_seen;
        self.frames_seen += 1;

        let images = frame.image_count();
        if images > 1 {
            debug!(images, "buffer holds several images; converting the first");
        }
        let image = self.converter.convert(&frame)?;
        let Some(dump) = &self.dump else {
            return Ok(());
        };
        if index % dump.every != 0 {
            return Ok(());
        }

        let path = dump.dir.join(format!("frame_{index:06}.pgm"));
        write_pgm(&path, frame.width(), frame.height(), image).await?;
        debug!(path = %path.display(), "frame written");
        Ok(())
    }
}

fn log_params(params: &ReceiverParameters) {
    info!(
        bit_depth = params.bit_depth,
        samples_per_line = params.samples_per_line,
        lines_per_frame = params.lines_per_frame,
        frames_per_buffer = params.frames_per_buffer,
        "stream parameters changed"
    );
}

/// Write 8-bit samples as a binary PGM (`P5`) image.
pub async fn write_pgm(path: &Path, width: u32, height: u32, samples: &[u8]) -> Result<(), ClientError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let mut out = format!("P5\n{width} {height}\n255\n").into_bytes();
    out.extend_from_slice(samples);
    tokio::fs::write(path, out).await?;
    Ok(())
}
