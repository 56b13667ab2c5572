//! Outbound forwarding engine.
//!
//! # Responsibilities
//! - Translate a validated [`ProxyRequest`] into one outbound call
//! - Bound the call (connect, send and body read) by the forwarding timeout
//! - Capture the raw reply whatever its status, and measure time and size
//! - Classify transport failures into gateway errors
//!
//! # Design Decisions
//! - One pooled client shared by all calls; no per-call state is kept
//! - Caller headers are forwarded verbatim and in caller order. Two
//!   defaults fill in only when the caller set none: `content-type:
//!   application/json` for a structured body, and the client's
//!   `accept: */*`
//! - Query parameters are appended in caller order
//! - An origin's own reason phrase is kept as `statusText`
//! - A JSON string body is sent as raw text, unquoted

use std::time::{Duration, Instant};

use hyper::ext::ReasonPhrase;
use reqwest::header::CONTENT_TYPE;
use reqwest::redirect::Policy;
use reqwest::{Client, Response};
use serde_json::Value;

use crate::config::ForwardingConfig;
use crate::proxy::error::ForwardError;
use crate::proxy::request::ProxyRequest;
use crate::proxy::result::ProxyResult;

/// Executes forwards against arbitrary origins.
#[derive(Debug, Clone)]
pub struct Forwarder {
    client: Client,
    timeout: Duration,
    max_response_bytes: usize,
}

impl Forwarder {
    /// Build the shared outbound client.
    pub fn new(config: &ForwardingConfig) -> Result<Self, reqwest::Error> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let redirect = if config.max_redirects == 0 {
            Policy::none()
        } else {
            Policy::limited(config.max_redirects)
        };

        let client = Client::builder()
            .timeout(timeout)
            .redirect(redirect)
            .build()?;

        Ok(Self {
            client,
            timeout,
            max_response_bytes: config.max_response_bytes,
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Forward one request and normalize the reply.
    ///
    /// Every status the origin returns yields `Ok`; `Err` means no usable
    /// reply was received.
    pub async fn forward(&self, request: &ProxyRequest) -> Result<ProxyResult, ForwardError> {
        let mut builder = self
            .client
            .request(request.method.to_reqwest(), request.url.clone());

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        if !request.query_params.is_empty() {
            builder = builder.query(&request.query_params);
        }

        match request.outbound_body() {
            None => {}
            Some(Value::String(raw)) => {
                builder = builder.body(raw.clone());
            }
            Some(structured) => {
                let encoded = serde_json::to_vec(structured).map_err(|e| {
                    ForwardError::Internal(format!("Failed to encode request body: {}", e))
                })?;
                if !request.has_header(CONTENT_TYPE.as_str()) {
                    builder = builder.header(CONTENT_TYPE, "application/json");
                }
                builder = builder.body(encoded);
            }
        }

        let start = Instant::now();
        let response = builder
            .send()
            .await
            .map_err(|e| ForwardError::from_transport(e, self.timeout, start.elapsed()))?;

        let status = response.status();
        let reason = response
            .extensions()
            .get::<ReasonPhrase>()
            .map(|phrase| String::from_utf8_lossy(phrase.as_bytes()).into_owned());
        let headers = response.headers().clone();
        let raw_body = self.read_body(response, start).await?;
        let elapsed = start.elapsed();

        Ok(ProxyResult::from_reply(
            status,
            reason.as_deref(),
            &headers,
            &raw_body,
            elapsed,
        ))
    }

    /// Read the whole reply body, refusing anything above the size limit.
    async fn read_body(&self, mut response: Response, start: Instant) -> Result<Vec<u8>, ForwardError> {
        let too_large = || ForwardError::ResponseTooLarge {
            max: self.max_response_bytes,
            elapsed: start.elapsed(),
        };

        if let Some(declared) = response.content_length() {
            if declared > self.max_response_bytes as u64 {
                return Err(too_large());
            }
        }

        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| ForwardError::from_transport(e, self.timeout, start.elapsed()))?
        {
            if body.len() + chunk.len() > self.max_response_bytes {
                return Err(too_large());
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }
}
