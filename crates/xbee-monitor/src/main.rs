//! xbee-monitor: print XBee ZigBee API frames arriving on a serial port.

use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use xbee_monitor::{
    ConsoleSink, Monitor, MonitorConfig, MonitorResult, ReplaySource, SerialSource,
};

/// Decode and print XBee ZigBee API frames from a serial link.
#[derive(Parser, Debug)]
#[command(name = "xbee-monitor", version, about)]
struct Args {
    /// Serial device (e.g. /dev/ttyUSB0, COM3).
    #[arg(short, long)]
    port: Option<String>,

    /// Baud rate [default: 9600].
    #[arg(short, long)]
    baud: Option<u32>,

    /// YAML config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// AT command to send at start-up; repeat for several [default: ID].
    #[arg(short, long = "query")]
    queries: Vec<String>,

    /// Decode a raw capture file instead of a serial port.
    #[arg(long, conflicts_with = "port")]
    replay: Option<PathBuf>,

    /// Log every received byte (at trace level).
    #[arg(long)]
    echo_bytes: bool,

    /// Log filter used when RUST_LOG is not set.
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> MonitorResult<()> {
    let args = Args::parse();
    init_logging(&args.log_level);

    let mut config = match &args.config {
        Some(path) => MonitorConfig::load(path)?,
        None => MonitorConfig::default(),
    };
    config.apply_overrides(args.port, args.baud, args.queries, args.echo_bytes);
    let queries = config.at_queries()?;

    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop = stop.clone();
        ctrlc::set_handler(move || stop.store(true, Ordering::Relaxed))?;
    }

    let sink = ConsoleSink::new(io::stdout());
    match &args.replay {
        Some(path) => {
            info!("replaying {}", path.display());
            let source = ReplaySource::from_file(path)?;
            Monitor::with_config(source, sink, &config).run(&stop)
        }
        None => {
            let port = config.require_port()?;
            info!("opening {} at {} baud", port, config.baud_rate);
            let source = SerialSource::open(port, config.baud_rate)?;
            let mut monitor = Monitor::with_config(source, sink, &config);
            monitor.send_queries(&queries)?;
            monitor.run(&stop)
        }
    }
}
