//! Normalized outcome of one forward.

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::{json, Value};

/// How `data` was obtained from the origin's payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PayloadKind {
    /// The payload parsed as JSON, a JSON string included.
    #[default]
    Json,
    /// The payload was not JSON and `data` holds its text.
    Text,
}

/// What the caller receives for a forward.
///
/// Serializes to `{ status, statusText, headers, data, responseTime, responseSize }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyResult {
    pub status: u16,
    pub status_text: String,
    pub headers: BTreeMap<String, String>,
    /// JSON when the payload parsed as JSON, otherwise the raw text.
    pub data: Value,
    #[serde(rename = "responseTime")]
    pub response_time_ms: u64,
    /// Length of the undecoded payload as received.
    #[serde(rename = "responseSize")]
    pub response_size_bytes: u64,
    #[serde(skip)]
    pub payload_kind: PayloadKind,
}

impl ProxyResult {
    /// Build a result from an origin reply.
    ///
    /// `reason` is the origin's own reason phrase when it differs from the
    /// canonical one for `status`.
    pub fn from_reply(
        status: StatusCode,
        reason: Option<&str>,
        headers: &HeaderMap,
        raw_body: &[u8],
        elapsed: Duration,
    ) -> Self {
        let (data, payload_kind) = decode_payload(raw_body);
        Self {
            status: status.as_u16(),
            status_text: reason.map_or_else(|| status_text(status), str::to_string),
            headers: flatten_headers(headers),
            data,
            response_time_ms: elapsed_millis(elapsed),
            response_size_bytes: raw_body.len() as u64,
            payload_kind,
        }
    }

    /// Build a result locally when the origin could not be reached.
    pub fn synthesized(status: StatusCode, message: &str, elapsed: Duration) -> Self {
        Self {
            status: status.as_u16(),
            status_text: status_text(status),
            headers: BTreeMap::new(),
            data: json!({
                "error": status.canonical_reason().unwrap_or_default(),
                "message": message,
            }),
            response_time_ms: elapsed_millis(elapsed),
            response_size_bytes: 0,
            payload_kind: PayloadKind::Json,
        }
    }
}

/// Decode a payload as JSON, falling back to the text itself.
pub fn decode_payload(raw: &[u8]) -> (Value, PayloadKind) {
    match serde_json::from_slice(raw) {
        Ok(value) => (value, PayloadKind::Json),
        Err(_) => (
            Value::String(String::from_utf8_lossy(raw).into_owned()),
            PayloadKind::Text,
        ),
    }
}

fn status_text(status: StatusCode) -> String {
    status.canonical_reason().unwrap_or_default().to_string()
}

fn elapsed_millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

/// Collapse a header map to one string per name; repeated headers are joined
/// with ", ".
fn flatten_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    let mut flat: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in headers {
        let value = String::from_utf8_lossy(value.as_bytes());
        flat.entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert_with(|| value.into_owned());
    }
    flat
}
