//! Forwarding core.
//!
//! # Data Flow
//! ```text
//! ForwardPayload (caller JSON)
//!     → validation.rs (method + url checks, no I/O)
//!     → ProxyRequest
//!     → forwarder.rs (outbound call, timing, size)
//!     → ProxyResult, or ForwardError on transport failure
//! ```

pub mod error;
pub mod forwarder;
pub mod request;
pub mod result;
pub mod validation;

pub use error::ForwardError;
pub use forwarder::Forwarder;
pub use request::{ForwardPayload, HttpMethod, OrderedPairs, ProxyRequest};
pub use result::{PayloadKind, ProxyResult};
pub use validation::{validate_request, FieldError, FieldErrorCode};
