//! Startup orchestration.
//!
//! # Responsibilities
//! - Resolve the audit sink (degrading to disabled on failure)
//! - Start the metrics exporter when enabled
//! - Build the HTTP server and bind its listener
//!
//! # Design Decisions
//! - Fail fast on anything the forwarding path needs (client, listener)
//! - Never fail on the audit sink; the relay runs without it
//! - Listener binds last so traffic only arrives once everything is ready

use std::net::SocketAddr;

use tokio::net::TcpListener;

use crate::audit::AuditDispatcher;
use crate::config::RelayConfig;
use crate::http::{HttpServer, ServerError};
use crate::observability::metrics;

/// Server and listener ready to run.
pub struct Started {
    pub server: HttpServer,
    pub listener: TcpListener,
    pub local_addr: SocketAddr,
}

/// Initialize every subsystem from `config` in dependency order.
///
/// Logging must already be initialized.
pub async fn start(config: RelayConfig) -> Result<Started, ServerError> {
    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let audit = AuditDispatcher::from_config(&config.audit);
    let bind_address = config.listener.bind_address.clone();
    let server = HttpServer::new(config, audit)?;

    let listener = TcpListener::bind(&bind_address).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!(address = %local_addr, "Listening for connections");

    Ok(Started {
        server,
        listener,
        local_addr,
    })
}
