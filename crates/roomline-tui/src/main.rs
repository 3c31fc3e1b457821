//! Roomline TUI entry point.
//!
//! # Usage
//!
//! ```bash
//! # Connect to a local relay
//! roomline-tui
//!
//! # Connect elsewhere, logging debug output
//! roomline-tui --server ws://chat.example:8080/ --log-level debug
//! ```

use std::{fs::File, path::PathBuf, sync::Mutex};

use clap::Parser;
use roomline_app::{App, Runtime};
use roomline_client::TransportConfig;
use roomline_core::DEFAULT_SERVER_ADDRESS;
use roomline_tui::TerminalDriver;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Roomline terminal chat client
#[derive(Parser, Debug)]
#[command(name = "roomline-tui")]
#[command(about = "Terminal client for Roomline chat relays")]
#[command(version)]
struct Args {
    /// Relay WebSocket URL
    #[arg(short, long, default_value = DEFAULT_SERVER_ADDRESS)]
    server: String,

    /// File to write logs to (the terminal is in use)
    #[arg(long, default_value = "roomline-tui.log")]
    log_file: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Seconds allowed for the WebSocket handshake
    #[arg(long, default_value = "5")]
    connect_timeout: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    let log_file = File::create(&args.log_file)?;
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(Mutex::new(log_file)).with_ansi(false))
        .with(filter)
        .init();

    tracing::info!(server = %args.server, "Roomline TUI starting");

    let transport = TransportConfig {
        connect_timeout: std::time::Duration::from_secs(args.connect_timeout),
        ..TransportConfig::default()
    };
    let driver = TerminalDriver::new(transport)?;

    Runtime::new(driver, App::new(args.server)).run().await?;

    Ok(())
}
