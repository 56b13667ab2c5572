//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, limits > 0)
//! - Check that the chosen audit backend has what it needs
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RelayConfig → Result<(), Vec<ValidationError>>
//! - Credentials are not checked here; a missing credential degrades the
//!   audit sink at startup instead of refusing to start

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::{AuditBackend, RelayConfig};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field, e.g. `forwarding.timeout_secs`.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }
    if config.listener.max_body_bytes == 0 {
        errors.push(ValidationError::new("listener.max_body_bytes", "must be greater than 0"));
    }

    if config.forwarding.timeout_secs == 0 {
        errors.push(ValidationError::new("forwarding.timeout_secs", "must be greater than 0"));
    }
    if config.forwarding.max_response_bytes == 0 {
        errors.push(ValidationError::new(
            "forwarding.max_response_bytes",
            "must be greater than 0",
        ));
    }
    if config.listener.request_timeout_secs <= config.forwarding.timeout_secs {
        errors.push(ValidationError::new(
            "listener.request_timeout_secs",
            format!(
                "must exceed forwarding.timeout_secs ({}) so gateway timeouts reach the caller",
                config.forwarding.timeout_secs
            ),
        ));
    }

    if config.audit.enabled {
        match config.audit.backend {
            AuditBackend::None => {}
            AuditBackend::File => {
                if config.audit.file_path.trim().is_empty() {
                    errors.push(ValidationError::new(
                        "audit.file_path",
                        "required when backend = \"file\"",
                    ));
                }
            }
            AuditBackend::Http => {
                match url::Url::parse(&config.audit.endpoint) {
                    Ok(endpoint) if matches!(endpoint.scheme(), "http" | "https") => {}
                    _ => errors.push(ValidationError::new(
                        "audit.endpoint",
                        "must be an absolute http(s) URL when backend = \"http\"",
                    )),
                }
                if config.audit.collection.trim().is_empty() {
                    errors.push(ValidationError::new("audit.collection", "must not be empty"));
                }
            }
        }
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!(
                "'{}' is not a socket address",
                config.observability.metrics_address
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
