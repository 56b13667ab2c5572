//! Audit record written once per forward.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::proxy::result::PayloadKind;
use crate::proxy::{ProxyRequest, ProxyResult};

/// One entry in the `request_logs` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRecord {
    pub id: Uuid,
    /// Caller's account identifier, `null` when anonymous.
    pub user_id: Option<String>,
    /// Value of `x-request-id` for correlating with operational logs.
    pub request_id: Option<String>,
    pub method: String,
    pub url: String,
    pub status: u16,
    pub response_time: u64,
    pub response_size: u64,
    /// Decoded JSON payload, or `{"raw": "<text>"}` for non-JSON replies.
    /// A reply that is itself a JSON string is stored as that string.
    pub response: Value,
    pub request_body: Value,
    pub created_at: DateTime<Utc>,
}

impl AuditRecord {
    pub fn new(request: &ProxyRequest, result: &ProxyResult, request_id: Option<&str>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: request.identity.clone(),
            request_id: request_id.map(str::to_string),
            method: request.method.as_str().to_string(),
            url: request.url.to_string(),
            status: result.status,
            response_time: result.response_time_ms,
            response_size: result.response_size_bytes,
            response: wrap_payload(&result.data, result.payload_kind),
            request_body: request.body.clone().unwrap_or(Value::Null),
            created_at: Utc::now(),
        }
    }
}

fn wrap_payload(data: &Value, kind: PayloadKind) -> Value {
    match kind {
        PayloadKind::Text => json!({ "raw": data }),
        PayloadKind::Json => data.clone(),
    }
}
