//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request
//!     → server.rs (middleware: request ID, trace, timeout, CORS, body limit)
//!     → handlers.rs (decode payload, validate, forward)
//!     → proxy::Forwarder (outbound call)
//!     → 200 envelope, or error.rs envelope
//!     ↘ audit::AuditDispatcher (detached)
//! ```

pub mod error;
pub mod handlers;
pub mod request;
pub mod server;

pub use error::{ErrorCode, ProxyError};
pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer, ServerError};
