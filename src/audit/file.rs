//! JSON-lines file sink.

use std::fs::OpenOptions as StdOpenOptions;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

use crate::audit::record::AuditRecord;
use crate::audit::sink::{AuditError, AuditSink};

/// Appends one JSON document per line to a local file.
///
/// The file is opened in append mode for every write, and each record is
/// written with a single buffer, so concurrent writers never share a handle.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    /// Check the file can be created or appended to, then return the sink.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AuditError> {
        let path = path.as_ref();
        StdOpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                AuditError::Unavailable(format!("cannot open {}: {}", path.display(), e))
            })?;
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl AuditSink for FileSink {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn append(&self, record: &AuditRecord) -> Result<(), AuditError> {
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(&line).await?;
        file.flush().await?;
        Ok(())
    }
}
