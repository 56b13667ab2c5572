//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers, forwarder, audit dispatch produce:
//!     → logging.rs (structured log events, x-request-id on every forward)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```

pub mod logging;
pub mod metrics;
