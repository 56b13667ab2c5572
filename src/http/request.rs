//! Request identification.
//!
//! # Responsibilities
//! - Generate a UUID v4 `x-request-id` for every inbound request that lacks one
//! - Echo it on the response
//! - Let handlers read it for logs and audit records

use axum::http::{HeaderMap, HeaderName};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

pub const X_REQUEST_ID: &str = "x-request-id";

fn header_name() -> HeaderName {
    HeaderName::from_static(X_REQUEST_ID)
}

pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::new(header_name(), MakeRequestUuid)
}

pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(header_name())
}

/// Read the request ID set by [`set_request_id_layer`].
pub fn request_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_request_id_read_from_headers() {
        let mut headers = HeaderMap::new();
        assert!(request_id(&headers).is_none());

        headers.insert(X_REQUEST_ID, HeaderValue::from_static("abc-123"));
        assert_eq!(request_id(&headers).as_deref(), Some("abc-123"));
    }
}
