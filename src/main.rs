//! Admission gate (v1)
//!
//! Front door for the marketing site's lead-capture forms.
//!
//! # Architecture Overview
//!
//! ```text
//!     Form POST            ┌──────────────────────────────────────────────────────┐
//!     ─────────────────────┼─▶ http server ─▶ admission middleware                │
//!                          │                    │                                 │
//!                          │                    ▼                                 │
//!                          │            ┌───────────────┐   reject   400 / 429    │
//!                          │            │   honeypot    │──────────────────────◀──┼──
//!                          │            └───────┬───────┘                         │
//!                          │                    ▼                                 │
//!                          │            ┌───────────────┐   reject                │
//!                          │            │ rate limiter  │──────────────────────◀──┼──
//!                          │            │ (rate store)◀─┼── sweeper (timer)       │
//!                          │            └───────┬───────┘                         │
//!                          │                    ▼                                 │
//!     200 / 400 / 503      │            ┌───────────────┐                         │
//!     ◀────────────────────┼────────────│form processor │                         │
//!                          │            └───────────────┘                         │
//!                          └──────────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

use admission_gate::config::{load_config, GateConfig};
use admission_gate::forms::LoggingProcessor;
use admission_gate::lifecycle::{signals, Gate, Shutdown};
use admission_gate::observability::{logging, metrics};
use admission_gate::HttpServer;

#[derive(Parser, Debug)]
#[command(name = "admission-gate")]
#[command(about = "Honeypot and rate-limit gate for form submissions", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file. Built-in defaults when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Validate the configuration and exit.
    #[arg(long)]
    check_config: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => GateConfig::default(),
    };

    if cli.check_config {
        println!("configuration OK");
        return Ok(());
    }

    logging::init_logging(&config.observability)?;
    tracing::info!("admission-gate v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        endpoints = config.endpoints.len(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(shutdown.clone());

    let gate = Gate::build(config);
    let server = HttpServer::new(gate, Arc::new(LoggingProcessor));
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
