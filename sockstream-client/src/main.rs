//! sockstream-client: entry point.
//!
//! ```text
//! sockstream-client                       Connect with defaults
//! sockstream-client --config <path>       Use custom config TOML
//! sockstream-client --gen-config          Dump default config and exit
//! sockstream-client --raw --samples-per-line 512 --lines-per-frame 256
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use sockstream_core::{DataReceiver, EventReceiver};

use sockstream_client::config::ClientConfig;
use sockstream_client::console::{ConsoleCommand, USAGE};
use sockstream_client::sink::FrameSink;

// ── CLI ──────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "sockstream-client", about = "Test client for TCP frame-streaming servers")]
struct Cli {
    /// Path to configuration TOML file.
    #[arg(short, long, default_value = "sockstream-client.toml")]
    config: PathBuf,

    /// Print the default configuration to stdout and exit.
    #[arg(long)]
    gen_config: bool,

    /// Server host (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Server port (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    #[arg(long)]
    bit_depth: Option<u8>,

    #[arg(long)]
    samples_per_line: Option<u32>,

    #[arg(long)]
    lines_per_frame: Option<u32>,

    #[arg(long)]
    frames_per_buffer: Option<u32>,

    /// Fixed-size frames without wire headers.
    #[arg(long)]
    raw: bool,

    /// Send `remote_start` after connecting and `remote_stop` on exit.
    #[arg(long)]
    remote_start: bool,

    /// Write every N-th frame as PGM into this directory.
    #[arg(long)]
    dump_dir: Option<PathBuf>,
}

impl Cli {
    fn apply(&self, config: &mut ClientConfig) {
        if let Some(host) = &self.host {
            config.network.host = host.clone();
        }
        if let Some(port) = self.port {
            config.network.port = port;
        }
        if let Some(bd) = self.bit_depth {
            config.stream.bit_depth = bd;
        }
        if let Some(n) = self.samples_per_line {
            config.stream.samples_per_line = n;
        }
        if let Some(n) = self.lines_per_frame {
            config.stream.lines_per_frame = n;
        }
        if let Some(n) = self.frames_per_buffer {
            config.stream.frames_per_buffer = n;
        }
        if self.raw {
            config.stream.use_headers = false;
        }
        if let Some(dir) = &self.dump_dir {
            config.output.dump_dir = dir.display().to_string();
        }
    }
}

// ── Main ─────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.gen_config {
        println!("{}", ClientConfig::default_toml()?);
        return Ok(());
    }

    let mut config = ClientConfig::load(&cli.config);
    cli.apply(&mut config);

    // Init tracing.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("sockstream-client v{}", env!("CARGO_PKG_VERSION"));

    // ── 1. Receiver and sink ────────────────────────────────────

    let (mut receiver, events) =
        DataReceiver::with_config(config.receiver_params(), config.receiver_config());
    let sink = FrameSink::from_config(&config);
    let sink_handle = tokio::spawn(run_sink(sink, events, config.stats_interval()));

    // ── 2. Connect ──────────────────────────────────────────────

    receiver.connect().await?;
    if cli.remote_start {
        receiver.remote_start().await?;
    }
    info!("{USAGE}");

    // ── 3. Command loop ─────────────────────────────────────────

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line,
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted");
                break;
            }
        };
        let line = match line {
            Ok(Some(line)) => line,
            Ok(None) => {
                info!("stdin closed");
                break;
            }
            Err(e) => {
                error!("stdin error: {e}");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<ConsoleCommand>() {
            Ok(command) => command,
            Err(e) => {
                warn!("{e}; {USAGE}");
                continue;
            }
        };
        let result = match command {
            ConsoleCommand::Start => receiver.remote_start().await,
            ConsoleCommand::Stop => receiver.remote_stop().await,
            ConsoleCommand::Headers(on) => receiver.set_use_headers(on).await,
            ConsoleCommand::Connect => receiver.connect().await,
            ConsoleCommand::Disconnect => receiver.disconnect().await,
            ConsoleCommand::Quit => break,
        };
        if let Err(e) = result {
            warn!(%command, "command failed: {e}");
        }
    }

    // ── 4. Shutdown ─────────────────────────────────────────────

    info!("shutting down");
    if cli.remote_start && receiver.is_connected() {
        if let Err(e) = receiver.remote_stop().await {
            warn!("failed to send remote_stop: {e}");
        }
    }
    receiver.disconnect().await?;
    drop(receiver);
    let _ = sink_handle.await;

    Ok(())
}

/// Feed events into the sink and log statistics periodically until the
/// receiver goes away.
async fn run_sink(mut sink: FrameSink, mut events: EventReceiver, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut last_reported = 0;

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(event) => {
                    if let Err(e) = sink.handle(event).await {
                        warn!("frame handling failed: {e}");
                    }
                }
                None => break,
            },
            _ = ticker.tick() => {
                let stats = sink.stats();
                if stats.total_frames != last_reported {
                    last_reported = stats.total_frames;
                    info!(%stats, "receiving");
                }
            }
        }
    }

    info!(stats = %sink.stats(), "final statistics");
}
