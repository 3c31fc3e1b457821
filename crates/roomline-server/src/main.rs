//! Roomline relay binary.
//!
//! # Usage
//!
//! ```bash
//! # Start on the default address
//! roomline-server
//!
//! # Public relay with tagged frames and a short history
//! roomline-server --bind 0.0.0.0:8080 --history 500 --envelope
//! ```

use std::time::Duration;

use clap::Parser;
use roomline_server::{DEFAULT_BIND_ADDRESS, FrameFormat, RelayConfig, Server, ServerConfig};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Roomline chat relay
#[derive(Parser, Debug)]
#[command(name = "roomline-server")]
#[command(about = "Single-room WebSocket chat relay")]
#[command(version)]
struct Args {
    /// Address to bind to
    #[arg(short, long, default_value = DEFAULT_BIND_ADDRESS)]
    bind: String,

    /// Lines of history replayed to newcomers
    #[arg(long, default_value = "5000")]
    history: usize,

    /// Live frames queued per client before lines are dropped for it
    #[arg(long, default_value = "256")]
    outbox: usize,

    /// Seconds without a pong before a client is dropped
    #[arg(long, default_value = "15")]
    heartbeat_timeout: u64,

    /// Send tagged JSON frames instead of the legacy line format
    #[arg(long)]
    envelope: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    let format = if args.envelope { FrameFormat::Envelope } else { FrameFormat::Legacy };
    tracing::info!(bind = %args.bind, history = args.history, ?format, "Roomline relay starting");

    let config = ServerConfig {
        bind_address: args.bind,
        outbox_capacity: args.outbox,
        relay: RelayConfig {
            history_capacity: args.history,
            heartbeat_timeout: Duration::from_secs(args.heartbeat_timeout),
            format,
        },
        ..ServerConfig::default()
    };

    let server = Server::bind(config).await?;

    tracing::info!("Relay listening on {}", server.local_addr()?);

    server.run().await?;

    Ok(())
}
