//! HTTP route handlers.

use std::time::Duration;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    Json,
};
use serde::Serialize;

use crate::audit::AuditRecord;
use crate::http::error::ProxyError;
use crate::http::request::request_id;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::proxy::validation::sanitize_url_for_logging;
use crate::proxy::{validate_request, FieldError, ForwardError, ForwardPayload, ProxyResult};

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// Active audit sink, or "disabled".
    pub audit: &'static str,
}

/// GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        audit: state.audit.sink_name(),
    })
}

/// POST /api/proxy - forward a request and log the exchange.
///
/// Any status the origin returns comes back as a 200 envelope. Only
/// validation (400), gateway (502/504) and internal (500) failures use
/// another outer status.
pub async fn forward_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<ForwardPayload>, JsonRejection>,
) -> Result<Json<ProxyResult>, ProxyError> {
    let request_id = request_id(&headers);

    let Json(payload) = payload.map_err(|rejection| {
        metrics::record_validation_failure();
        tracing::debug!(request_id = ?request_id, error = %rejection, "Malformed forward payload");
        ProxyError::validation(vec![FieldError::invalid_payload(rejection.body_text())])
    })?;

    let request = validate_request(payload).map_err(|errors| {
        metrics::record_validation_failure();
        tracing::debug!(request_id = ?request_id, errors = errors.len(), "Forward request rejected");
        ProxyError::validation(errors)
    })?;

    let safe_url = sanitize_url_for_logging(&request.url);
    let method = request.method.as_str();

    tracing::debug!(
        request_id = ?request_id,
        method = method,
        url = %safe_url,
        "Forwarding request"
    );

    match state.forwarder.forward(&request).await {
        Ok(result) => {
            tracing::info!(
                request_id = ?request_id,
                method = method,
                url = %safe_url,
                status = result.status,
                elapsed_ms = result.response_time_ms,
                size = result.response_size_bytes,
                "Forward completed"
            );
            metrics::record_forward(
                method,
                result.status,
                "forwarded",
                Duration::from_millis(result.response_time_ms),
            );
            state
                .audit
                .dispatch(AuditRecord::new(&request, &result, request_id.as_deref()));
            Ok(Json(result))
        }
        Err(err) => {
            let outcome = match &err {
                ForwardError::Timeout { .. } => "timeout",
                ForwardError::Internal(_) => "internal",
                _ => "unreachable",
            };

            if err.is_gateway() {
                tracing::warn!(
                    request_id = ?request_id,
                    method = method,
                    url = %safe_url,
                    error = %err,
                    "Forward failed"
                );
            } else {
                tracing::error!(
                    request_id = ?request_id,
                    method = method,
                    url = %safe_url,
                    error = %err,
                    "Forward failed with internal error"
                );
            }

            metrics::record_forward(
                method,
                err.status().as_u16(),
                outcome,
                err.elapsed().unwrap_or_default(),
            );

            if let Some(synthesized) = err.synthesized_result() {
                state.audit.dispatch(AuditRecord::new(
                    &request,
                    &synthesized,
                    request_id.as_deref(),
                ));
            }

            Err(err.into())
        }
    }
}
