//! Request relay
//!
//! Backend of a browser-based API tester. The browser cannot call arbitrary
//! third-party APIs because of CORS, so it describes the call to this
//! service, which performs it and returns a normalized result.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌──────────────────────────────────────────────┐
//!                         │                 REQUEST RELAY                 │
//!                         │                                               │
//!   POST /api/proxy       │  ┌─────────┐   ┌───────────┐   ┌───────────┐ │
//!   ──────────────────────┼─▶│  http   │──▶│  proxy::  │──▶│  proxy::  │─┼──▶ Origin
//!                         │  │handlers │   │validation │   │ forwarder │ │
//!                         │  └────┬────┘   └───────────┘   └─────┬─────┘ │
//!   { status, data, ... } │       │                              │       │
//!   ◀─────────────────────┼───────┴──────────────────────────────┘       │
//!                         │       │ (detached)                           │
//!                         │       ▼                                      │
//!                         │  ┌─────────┐                                 │
//!                         │  │  audit  │─────────────────────────────────┼──▶ Audit sink
//!                         │  └─────────┘                                 │
//!                         │                                               │
//!                         │  config · observability · lifecycle          │
//!                         └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use request_relay::config::{load_config, RelayConfig};
use request_relay::lifecycle::{signals, startup, Shutdown};
use request_relay::observability::logging;

#[derive(Parser)]
#[command(name = "request-relay")]
#[command(about = "Forwarding proxy for a browser-based API tester", long_about = None)]
struct Cli {
    /// TOML configuration file; built-in defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => RelayConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config_file = ?cli.config,
        bind_address = %config.listener.bind_address,
        forward_timeout_secs = config.forwarding.timeout_secs,
        audit_backend = ?config.audit.backend,
        "request-relay starting"
    );

    let started = startup::start(config).await?;

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(shutdown.clone());

    started
        .server
        .run(started.listener, shutdown.subscribe())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
