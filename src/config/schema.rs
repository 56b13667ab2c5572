//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! All types derive Serde traits for deserialization from config files, and
//! every section falls back to its defaults so an empty file is valid.

use serde::{Deserialize, Serialize};

/// Root configuration for the request relay.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Listener configuration (bind address, inbound limits).
    pub listener: ListenerConfig,

    /// Outbound forwarding settings.
    pub forwarding: ForwardingConfig,

    /// Audit sink settings.
    pub audit: AuditConfig,

    /// Cross-origin settings for the browser client.
    pub cors: CorsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:5000").
    pub bind_address: String,

    /// Maximum size of an inbound forward request body in bytes.
    pub max_body_bytes: usize,

    /// Server-side bound on handling one inbound request, in seconds.
    /// Must be larger than the forwarding timeout.
    pub request_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:5000".to_string(),
            max_body_bytes: 10 * 1024 * 1024,
            request_timeout_secs: 35,
        }
    }
}

/// Outbound call settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ForwardingConfig {
    /// Upper bound on one outbound call (connect, send and body read).
    pub timeout_secs: u64,

    /// Redirects followed before the reply is returned as-is. 0 disables.
    pub max_redirects: usize,

    /// Replies larger than this are refused with a gateway error.
    pub max_response_bytes: usize,
}

impl Default for ForwardingConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_redirects: 5,
            max_response_bytes: 50 * 1024 * 1024,
        }
    }
}

/// Which audit sink receives request logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditBackend {
    None,
    File,
    Http,
}

/// Audit sink configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Master switch; `false` behaves like `backend = "none"`.
    pub enabled: bool,

    /// Sink implementation.
    pub backend: AuditBackend,

    /// JSON-lines file for the `file` backend.
    pub file_path: String,

    /// Document store base URL for the `http` backend.
    pub endpoint: String,

    /// Logical collection records are appended to.
    pub collection: String,

    /// Environment variable holding the document store credential.
    pub api_key_env: String,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            backend: AuditBackend::None,
            file_path: "request_logs.jsonl".to_string(),
            endpoint: String::new(),
            collection: "request_logs".to_string(),
            api_key_env: "AUDIT_API_KEY".to_string(),
        }
    }
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Allowed origins; `"*"` allows any origin.
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Human-readable or JSON log lines.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
