//! Audit sink abstraction and startup resolution.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::audit::file::FileSink;
use crate::audit::http::DocumentStoreSink;
use crate::audit::record::AuditRecord;
use crate::config::{AuditBackend, AuditConfig};

/// Errors from resolving or writing to an audit sink.
#[derive(Debug, Error)]
pub enum AuditError {
    /// The sink cannot be used at all (missing credential, bad path).
    #[error("audit sink unavailable: {0}")]
    Unavailable(String),

    #[error("failed to serialize audit record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("audit file write failed: {0}")]
    Io(#[from] std::io::Error),

    /// The store answered but refused the write.
    #[error("audit store rejected write with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("audit store request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Append-only destination for audit records.
///
/// Implementations must be safe to call from many tasks at once without
/// extra locking; each call is one independent append.
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Short name used in logs, metrics and the health endpoint.
    fn name(&self) -> &'static str;

    /// Append one record.
    async fn append(&self, record: &AuditRecord) -> Result<(), AuditError>;
}

/// Resolve the configured sink once at startup.
///
/// `Ok(None)` means auditing is switched off; `Err` means it was requested
/// but cannot work, which callers treat the same as off.
pub fn resolve_sink(config: &AuditConfig) -> Result<Option<Arc<dyn AuditSink>>, AuditError> {
    if !config.enabled {
        return Ok(None);
    }

    match config.backend {
        AuditBackend::None => Ok(None),
        AuditBackend::File => {
            let sink: Arc<dyn AuditSink> = Arc::new(FileSink::open(&config.file_path)?);
            Ok(Some(sink))
        }
        AuditBackend::Http => {
            let sink: Arc<dyn AuditSink> = Arc::new(DocumentStoreSink::from_config(config)?);
            Ok(Some(sink))
        }
    }
}
