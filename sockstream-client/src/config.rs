//! Client configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sockstream_core::{FramerConfig, InvalidHeaderPolicy, ReceiverConfig, ReceiverParameters};

use crate::error::ClientError;

/// Top-level configuration for the client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub network: NetworkConfig,
    pub stream: StreamConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

/// Where the frame server lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub host: String,
    pub port: u16,
    /// Connection timeout in milliseconds.
    pub connect_timeout_ms: u64,
}

/// Frame geometry and framing mode.
///
/// With `use_headers` the geometry is only a starting point; every
/// header on the wire replaces it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    pub bit_depth: u8,
    pub samples_per_line: u32,
    pub lines_per_frame: u32,
    pub frames_per_buffer: u32,
    pub use_headers: bool,
    pub invalid_header_policy: InvalidHeaderPolicy,
}

/// What happens to received frames.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for PGM dumps. Empty disables dumping.
    pub dump_dir: String,
    /// Write every N-th frame.
    pub dump_every: u64,
    /// How often statistics are logged, in milliseconds.
    pub stats_interval_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    pub level: String,
}

// ── Defaults ─────────────────────────────────────────────────────

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 1234,
            connect_timeout_ms: 5000,
        }
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            bit_depth: 8,
            samples_per_line: 0,
            lines_per_frame: 0,
            frames_per_buffer: 1,
            use_headers: true,
            invalid_header_policy: InvalidHeaderPolicy::default(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dump_dir: String::new(),
            dump_every: 100,
            stats_interval_ms: 1000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

// ── Loading ──────────────────────────────────────────────────────

impl ClientConfig {
    /// Load from a TOML file, falling back to defaults.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!("invalid config {}: {e}; using defaults", path.display());
                Self::default()
            }),
            Err(_) => {
                tracing::info!("no config at {}; using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Default configuration as pretty TOML.
    pub fn default_toml() -> Result<String, ClientError> {
        Ok(toml::to_string_pretty(&Self::default())?)
    }

    /// Write default config to a file.
    pub fn write_default(path: &Path) -> Result<(), ClientError> {
        std::fs::write(path, Self::default_toml()?)?;
        Ok(())
    }

    /// Parameters handed to the receiver.
    pub fn receiver_params(&self) -> ReceiverParameters {
        ReceiverParameters {
            host: self.network.host.clone(),
            port: self.network.port,
            bit_depth: self.stream.bit_depth,
            samples_per_line: self.stream.samples_per_line,
            lines_per_frame: self.stream.lines_per_frame,
            frames_per_buffer: self.stream.frames_per_buffer,
            use_headers: self.stream.use_headers,
        }
    }

    pub fn receiver_config(&self) -> ReceiverConfig {
        ReceiverConfig {
            connect_timeout: Duration::from_millis(self.network.connect_timeout_ms),
            framer: FramerConfig {
                invalid_header_policy: self.stream.invalid_header_policy,
            },
        }
    }

    pub fn dump_dir(&self) -> Option<PathBuf> {
        (!self.output.dump_dir.is_empty()).then(|| PathBuf::from(&self.output.dump_dir))
    }

    pub fn stats_interval(&self) -> Duration {
        Duration::from_millis(self.output.stats_interval_ms.max(1))
    }
}

// ── Tests ────────────────────────────────────────────────────────
