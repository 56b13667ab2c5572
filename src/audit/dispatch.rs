//! Fire-and-forget audit dispatch.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::audit::record::AuditRecord;
use crate::audit::sink::{resolve_sink, AuditSink};
use crate::config::AuditConfig;
use crate::observability::metrics;

/// Hands audit records to the sink on detached tasks.
///
/// Holds `None` for the whole life of the process when no sink could be
/// resolved at startup; dispatch is then a no-op.
#[derive(Clone, Default)]
pub struct AuditDispatcher {
    sink: Option<Arc<dyn AuditSink>>,
}

impl AuditDispatcher {
    pub fn new(sink: Option<Arc<dyn AuditSink>>) -> Self {
        Self { sink }
    }

    /// A dispatcher that drops every record.
    pub fn disabled() -> Self {
        Self { sink: None }
    }

    /// Resolve the configured sink, degrading to disabled when it is unusable.
    pub fn from_config(config: &AuditConfig) -> Self {
        match resolve_sink(config) {
            Ok(Some(sink)) => {
                tracing::info!(sink = sink.name(), "Audit sink ready");
                Self::new(Some(sink))
            }
            Ok(None) => {
                tracing::info!("Audit logging disabled");
                Self::disabled()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Audit sink unavailable, request logging disabled");
                Self::disabled()
            }
        }
    }

    /// Name of the active sink, or `"disabled"`.
    pub fn sink_name(&self) -> &'static str {
        self.sink.as_ref().map_or("disabled", |sink| sink.name())
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    /// Spawn the write and return immediately.
    ///
    /// The handle is only useful to tests; request handlers drop it. A
    /// failed write is logged and counted, never retried.
    pub fn dispatch(&self, record: AuditRecord) -> Option<JoinHandle<()>> {
        let sink = self.sink.clone()?;
        Some(tokio::spawn(async move {
            match sink.append(&record).await {
                Ok(()) => {
                    metrics::record_audit_write(sink.name(), true);
                    tracing::debug!(audit_id = %record.id, sink = sink.name(), "Audit record written");
                }
                Err(e) => {
                    metrics::record_audit_write(sink.name(), false);
                    tracing::warn!(
                        audit_id = %record.id,
                        sink = sink.name(),
                        error = %e,
                        "Audit write failed"
                    );
                }
            }
        }))
    }
}
