//! Request relay library: forwards caller-described HTTP requests to
//! third-party origins and logs each exchange.

pub mod audit;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod proxy;

pub use audit::AuditDispatcher;
pub use config::RelayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
