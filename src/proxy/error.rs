//! Forwarding failures and how they are classified.
//!
//! Only failures to talk to the origin are errors here. An origin that
//! answers with any status code, 4xx and 5xx included, is a successful
//! forward and never reaches this module.

use std::error::Error as StdError;
use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

use crate::proxy::result::ProxyResult;

/// Why a forward produced no origin reply.
#[derive(Debug, Error)]
pub enum ForwardError {
    /// The origin did not answer within the forwarding bound.
    #[error("Request timed out after {timeout_secs}s: {reason}")]
    Timeout {
        timeout_secs: u64,
        reason: String,
        elapsed: Duration,
    },

    /// The origin's host name could not be resolved.
    #[error("DNS resolution failed: {reason}")]
    Dns { reason: String, elapsed: Duration },

    /// No connection could be established (refused, TLS handshake, ...).
    #[error("Connection failed: {reason}")]
    Connect { reason: String, elapsed: Duration },

    /// The connection was made but the origin's reply was unusable:
    /// reset mid-reply, malformed HTTP, redirect loop.
    #[error("Upstream error: {reason}")]
    Upstream { reason: String, elapsed: Duration },

    /// The reply exceeded the configured size limit.
    #[error("Response body too large: more than {max} bytes")]
    ResponseTooLarge { max: usize, elapsed: Duration },

    /// A defect in the relay itself rather than in the origin.
    #[error("{0}")]
    Internal(String),
}

impl ForwardError {
    /// Classify a transport error from the outbound client.
    ///
    /// The URL is stripped from the error first so that credentials in the
    /// target never end up in messages.
    pub fn from_transport(err: reqwest::Error, timeout: Duration, elapsed: Duration) -> Self {
        let err = err.without_url();
        let reason = error_chain(&err);

        if err.is_timeout() {
            ForwardError::Timeout {
                timeout_secs: timeout.as_secs(),
                reason,
                elapsed,
            }
        } else if err.is_connect() {
            if looks_like_dns_failure(&reason) {
                ForwardError::Dns { reason, elapsed }
            } else {
                ForwardError::Connect { reason, elapsed }
            }
        } else if err.is_request() || err.is_body() || err.is_decode() || err.is_redirect() {
            ForwardError::Upstream { reason, elapsed }
        } else {
            ForwardError::Internal(reason)
        }
    }

    /// Outer HTTP status for this failure.
    pub fn status(&self) -> StatusCode {
        match self {
            ForwardError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            ForwardError::Dns { .. }
            | ForwardError::Connect { .. }
            | ForwardError::Upstream { .. }
            | ForwardError::ResponseTooLarge { .. } => StatusCode::BAD_GATEWAY,
            ForwardError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Time spent on the outbound call before it failed.
    pub fn elapsed(&self) -> Option<Duration> {
        match self {
            ForwardError::Timeout { elapsed, .. }
            | ForwardError::Dns { elapsed, .. }
            | ForwardError::Connect { elapsed, .. }
            | ForwardError::Upstream { elapsed, .. }
            | ForwardError::ResponseTooLarge { elapsed, .. } => Some(*elapsed),
            ForwardError::Internal(_) => None,
        }
    }

    /// Gateway failures are about reaching the origin; everything else is ours.
    pub fn is_gateway(&self) -> bool {
        !matches!(self, ForwardError::Internal(_))
    }

    /// The locally built result describing a gateway failure.
    ///
    /// `None` for internal errors, which are not attributed to the origin.
    pub fn synthesized_result(&self) -> Option<ProxyResult> {
        let elapsed = self.elapsed()?;
        Some(ProxyResult::synthesized(
            self.status(),
            &self.to_string(),
            elapsed,
        ))
    }
}

/// Render an error together with all of its sources.
pub(crate) fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

fn looks_like_dns_failure(reason: &str) -> bool {
    let lower = reason.to_lowercase();
    lower.contains("dns")
        || lower.contains("resolve")
        || lower.contains("lookup address")
        || lower.contains("getaddrinfo")
        || lower.contains("name or service not known")
}
