//! Audit logging subsystem.
//!
//! # Data Flow
//! ```text
//! ProxyRequest + ProxyResult
//!     → record.rs (AuditRecord, built on the request path)
//!     → dispatch.rs (tokio::spawn, not awaited)
//!     → sink.rs trait → file.rs | http.rs
//! ```
//!
//! # Design Decisions
//! - The sink is resolved once at startup; when it cannot be, dispatch is a
//!   no-op for the life of the process
//! - Writes are never awaited by the response path and never retried
//! - Failures go to the operational log and the metrics counter only

pub mod dispatch;
pub mod file;
pub mod http;
pub mod record;
pub mod sink;

pub use dispatch::AuditDispatcher;
pub use record::AuditRecord;
pub use sink::{resolve_sink, AuditError, AuditSink};
