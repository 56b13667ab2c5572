//! Error envelopes returned to the caller.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt;

use crate::proxy::{FieldError, ForwardError};

/// Machine-readable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Caller input failed validation
    InvalidRequest,
    /// Origin did not answer in time
    Timeout,
    /// Origin host could not be resolved
    DnsError,
    /// Origin refused or failed the connection
    ConnectionError,
    /// Origin answered with something unusable
    UpstreamError,
    /// Origin reply exceeded the size limit
    ResponseTooLarge,
    /// Defect in the relay
    Internal,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            ErrorCode::InvalidRequest => "INVALID_REQUEST",
            ErrorCode::Timeout => "TIMEOUT",
            ErrorCode::DnsError => "DNS_ERROR",
            ErrorCode::ConnectionError => "CONNECTION_ERROR",
            ErrorCode::UpstreamError => "UPSTREAM_ERROR",
            ErrorCode::ResponseTooLarge => "RESPONSE_TOO_LARGE",
            ErrorCode::Internal => "INTERNAL",
        };
        f.write_str(code)
    }
}

/// Body of every non-200 reply: `{ error, message, code, errors? }`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Reason phrase of the outer status, e.g. "Bad Gateway".
    pub error: String,
    pub message: String,
    pub code: ErrorCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

/// Error with its outer HTTP status.
#[derive(Debug)]
pub struct ProxyError {
    pub status: StatusCode,
    pub response: ErrorResponse,
}

impl ProxyError {
    pub fn new(status: StatusCode, message: impl Into<String>, code: ErrorCode) -> Self {
        Self {
            status,
            response: ErrorResponse {
                error: status.canonical_reason().unwrap_or("Error").to_string(),
                message: message.into(),
                code,
                errors: None,
            },
        }
    }

    pub fn validation(errors: Vec<FieldError>) -> Self {
        let mut err = Self::new(
            StatusCode::BAD_REQUEST,
            "Request validation failed",
            ErrorCode::InvalidRequest,
        );
        err.response.errors = Some(errors);
        err
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message, ErrorCode::Internal)
    }
}

impl From<ForwardError> for ProxyError {
    fn from(err: ForwardError) -> Self {
        let code = match &err {
            ForwardError::Timeout { .. } => ErrorCode::Timeout,
            ForwardError::Dns { .. } => ErrorCode::DnsError,
            ForwardError::Connect { .. } => ErrorCode::ConnectionError,
            ForwardError::Upstream { .. } => ErrorCode::UpstreamError,
            ForwardError::ResponseTooLarge { .. } => ErrorCode::ResponseTooLarge,
            ForwardError::Internal(_) => {
                // Details stay in the operational log.
                return Self::internal("Unexpected error while forwarding the request");
            }
        };
        Self::new(err.status(), err.to_string(), code)
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

impl fmt::Display for ProxyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.response.code, self.response.message)
    }
}

impl std::error::Error for ProxyError {}
