//! Audit logging never affects what the caller sees.

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{http::StatusCode, routing::get, Router};
use serde_json::{json, Value};

use request_relay::audit::AuditDispatcher;
use request_relay::config::{AuditBackend, AuditConfig};

mod common;

async fn json_origin() -> std::net::SocketAddr {
    common::start_origin(Router::new().route(
        "/users/1",
        get(|| async { axum::Json(json!({ "id": 1, "name": "Ana" })) }),
    ))
    .await
}

#[tokio::test]
async fn test_failing_sink_does_not_change_response_or_latency() {
    let origin = json_origin().await;
    let payload = json!({ "method": "GET", "url": format!("http://{}/users/1", origin) });

    let baseline = common::start_relay(AuditDispatcher::disabled()).await;
    let expected: Value = baseline.forward(payload.clone()).await.json().await.unwrap();

    let sink = Arc::new(common::FailingSink::new(Duration::from_secs(2)));
    let relay = common::start_relay(AuditDispatcher::new(Some(sink.clone()))).await;

    let start = Instant::now();
    let res = relay.forward(payload).await;
    let elapsed = start.elapsed();

    assert_eq!(res.status(), StatusCode::OK);
    assert!(elapsed < Duration::from_secs(1), "audit write blocked the response: {elapsed:?}");

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], expected["status"]);
    assert_eq!(body["data"], expected["data"]);
    assert_eq!(body["responseSize"], expected["responseSize"]);

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(sink.attempts.load(Ordering::SeqCst), 1, "write attempted exactly once");
}

#[tokio::test]
async fn test_record_describes_exchange() {
    let origin = json_origin().await;
    let sink = Arc::new(common::RecordingSink::default());
    let relay = common::start_relay(AuditDispatcher::new(Some(sink.clone()))).await;

    let res = relay
        .forward(json!({
            "method": "get",
            "url": format!("http://{}/users/1", origin),
            "identity": "acct-42",
        }))
        .await;
    let request_id = res
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    assert_eq!(res.status(), StatusCode::OK);

    let records = sink.wait_for(1).await;
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.user_id.as_deref(), Some("acct-42"));
    assert_eq!(record.method, "GET");
    assert_eq!(record.url, format!("http://{}/users/1", origin));
    assert_eq!(record.status, 200);
    assert_eq!(record.response_size, 21);
    assert_eq!(record.response, json!({ "id": 1, "name": "Ana" }));
    assert_eq!(record.request_body, Value::Null);
    assert!(request_id.is_some());
    assert_eq!(record.request_id, request_id);
}

#[tokio::test]
async fn test_gateway_failure_is_recorded_but_validation_is_not() {
    let sink = Arc::new(common::RecordingSink::default());
    let relay = common::start_relay(AuditDispatcher::new(Some(sink.clone()))).await;

    let res = relay
        .forward(json!({ "method": "PUT", "url": "nope" }))
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = relay
        .forward(json!({
            "method": "POST",
            "url": format!("http://{}/x", common::closed_addr()),
            "body": { "a": 1 },
        }))
        .await;
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);

    let records = sink.wait_for(1).await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(sink.records().len(), 1);
    assert_eq!(records[0].status, 502);
    assert_eq!(records[0].method, "POST");
    assert_eq!(records[0].request_body, json!({ "a": 1 }));
}

#[tokio::test]
async fn test_unavailable_sink_degrades_to_noop() {
    let config = AuditConfig {
        backend: AuditBackend::Http,
        endpoint: "https://store.example.com/v1".into(),
        api_key_env: "REQUEST_RELAY_TEST_MISSING_CREDENTIAL".into(),
        ..AuditConfig::default()
    };
    let dispatcher = AuditDispatcher::from_config(&config);
    assert!(!dispatcher.is_enabled());

    let origin = json_origin().await;
    let relay = common::start_relay(dispatcher).await;

    let res = relay
        .forward(json!({ "method": "GET", "url": format!("http://{}/users/1", origin) }))
        .await;
    assert_eq!(res.status(), StatusCode::OK);

    let health: Value = relay
        .client
        .get(format!("http://{}/health", relay.addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["audit"], "disabled");
}

#[tokio::test]
async fn test_file_sink_receives_records() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("request_logs.jsonl");
    let config = AuditConfig {
        backend: AuditBackend::File,
        file_path: path.display().to_string(),
        ..AuditConfig::default()
    };

    let origin = common::start_origin(Router::new().route("/t", get(|| async { "plain" }))).await;
    let relay = common::start_relay(AuditDispatcher::from_config(&config)).await;

    let res = relay
        .forward(json!({ "method": "GET", "url": format!("http://{}/t", origin) }))
        .await;
    assert_eq!(res.status(), StatusCode::OK);

    let mut lines = Vec::new();
    for _ in 0..100 {
        let content = std::fs::read_to_string(&path).unwrap_or_default();
        lines = content.lines().map(str::to_string).collect();
        if !lines.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(lines.len(), 1);
    let record: Value = serde_json::from_str(&lines[0]).unwrap();
    assert_eq!(record["response"], json!({ "raw": "plain" }));
    assert_eq!(record["status"], 200);
}
