//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_forwards_total` (counter): forwards by method, status, outcome
//! - `relay_forward_duration_seconds` (histogram): outbound call latency
//! - `relay_validation_failures_total` (counter): requests rejected with 400
//! - `relay_audit_writes_total` (counter): audit writes by sink and result
//!
//! Without an installed recorder every call here is a no-op, so tests and
//! embedders pay nothing.

use std::net::SocketAddr;
use std::time::Duration;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape endpoint.
///
/// Must be called from within the tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one forward. `outcome` is `forwarded`, `timeout`, `unreachable`
/// or `internal`.
pub fn record_forward(method: &str, status: u16, outcome: &'static str, elapsed: Duration) {
    metrics::counter!(
        "relay_forwards_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "outcome" => outcome
    )
    .increment(1);

    metrics::histogram!(
        "relay_forward_duration_seconds",
        "method" => method.to_string(),
        "outcome" => outcome
    )
    .record(elapsed.as_secs_f64());
}

pub fn record_validation_failure() {
    metrics::counter!("relay_validation_failures_total").increment(1);
}

pub fn record_audit_write(sink: &'static str, success: bool) {
    let result = if success { "ok" } else { "error" };
    metrics::counter!("relay_audit_writes_total", "sink" => sink, "result" => result).increment(1);
}
