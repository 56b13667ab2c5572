//! Remote document store sink.
//!
//! Records are POSTed as JSON to `{endpoint}/{collection}` with a bearer
//! credential read from the environment at startup.

use std::env;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::audit::record::AuditRecord;
use crate::audit::sink::{AuditError, AuditSink};
use crate::config::AuditConfig;

/// Appends records to a collection in an HTTP document store.
#[derive(Debug)]
pub struct DocumentStoreSink {
    client: Client,
    collection_url: Url,
    api_key: String,
}

impl DocumentStoreSink {
    /// Build the sink from config; the credential must be present.
    pub fn from_config(config: &AuditConfig) -> Result<Self, AuditError> {
        let api_key = env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                AuditError::Unavailable(format!(
                    "credential variable {} is not set",
                    config.api_key_env
                ))
            })?;

        Self::new(&config.endpoint, &config.collection, api_key)
    }

    pub fn new(endpoint: &str, collection: &str, api_key: String) -> Result<Self, AuditError> {
        let collection_url = collection_url(endpoint, collection)?;
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            collection_url,
            api_key,
        })
    }
}

fn collection_url(endpoint: &str, collection: &str) -> Result<Url, AuditError> {
    let base = format!("{}/", endpoint.trim_end_matches('/'));
    Url::parse(&base)
        .and_then(|base| base.join(collection.trim_matches('/')))
        .map_err(|e| AuditError::Unavailable(format!("invalid audit endpoint: {}", e)))
}

#[async_trait]
impl AuditSink for DocumentStoreSink {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn append(&self, record: &AuditRecord) -> Result<(), AuditError> {
        let response = self
            .client
            .post(self.collection_url.clone())
            .bearer_auth(&self.api_key)
            .json(record)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(AuditError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}
