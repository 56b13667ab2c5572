//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::RawQuery,
    http::{HeaderMap, Method},
    routing::any,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use request_relay::audit::{AuditDispatcher, AuditError, AuditRecord, AuditSink};
use request_relay::config::RelayConfig;
use request_relay::http::HttpServer;
use request_relay::lifecycle::Shutdown;

/// A running relay bound to an ephemeral port.
pub struct Relay {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
    shutdown: Shutdown,
}

impl Relay {
    pub fn proxy_url(&self) -> String {
        format!("http://{}/api/proxy", self.addr)
    }

    pub async fn forward(&self, payload: Value) -> reqwest::Response {
        self.client
            .post(self.proxy_url())
            .json(&payload)
            .send()
            .await
            .unwrap()
    }

    /// Send a payload as literal JSON text, keeping its key order.
    pub async fn forward_raw(&self, payload: &str) -> reqwest::Response {
        self.client
            .post(self.proxy_url())
            .header("content-type", "application/json")
            .body(payload.to_string())
            .send()
            .await
            .unwrap()
    }
}

impl Drop for Relay {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the relay with test-friendly defaults.
pub async fn start_relay(audit: AuditDispatcher) -> Relay {
    start_relay_with(RelayConfig::default(), audit).await
}

pub async fn start_relay_with(mut config: RelayConfig, audit: AuditDispatcher) -> Relay {
    config.listener.bind_address = "127.0.0.1:0".into();
    config.observability.metrics_enabled = false;

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(config, audit).unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    Relay {
        addr,
        client: reqwest::Client::builder().no_proxy().build().unwrap(),
        shutdown,
    }
}

/// Serve an axum router as an origin on an ephemeral port.
pub async fn start_origin(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// Origin that reflects the request it received and counts hits.
pub async fn start_echo_origin(hits: Arc<AtomicUsize>) -> SocketAddr {
    let app = Router::new().route(
        "/{*path}",
        any(
            move |method: Method, headers: HeaderMap, RawQuery(query): RawQuery, body: Bytes| {
                let hits = hits.clone();
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    let headers: serde_json::Map<String, Value> = headers
                        .iter()
                        .map(|(k, v)| {
                            (k.to_string(), json!(v.to_str().unwrap_or_default()))
                        })
                        .collect();
                    Json(json!({
                        "method": method.as_str(),
                        "query": query,
                        "headers": headers,
                        "body": String::from_utf8_lossy(&body),
                    }))
                }
            },
        ),
    );
    start_origin(app).await
}

/// Origin that writes a fixed raw HTTP response to every connection.
pub async fn start_raw_origin(response: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let mut buf = [0u8; 4096];
                        let _ = socket.read(&mut buf).await;
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });
    addr
}

/// Origin that accepts connections and never answers.
pub async fn start_silent_origin() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    addr
}

/// An address with nothing listening on it.
pub fn closed_addr() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Sink that keeps every record in memory.
#[derive(Default)]
pub struct RecordingSink {
    records: Mutex<Vec<AuditRecord>>,
}

impl RecordingSink {
    pub fn records(&self) -> Vec<AuditRecord> {
        self.records.lock().unwrap().clone()
    }

    /// Poll until `count` records arrived or a second passed.
    pub async fn wait_for(&self, count: usize) -> Vec<AuditRecord> {
        for _ in 0..100 {
            let records = self.records();
            if records.len() >= count {
                return records;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.records()
    }
}

#[async_trait]
impl AuditSink for RecordingSink {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn append(&self, record: &AuditRecord) -> Result<(), AuditError> {
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}

/// Sink that waits and then always fails.
pub struct FailingSink {
    pub delay: Duration,
    pub attempts: AtomicUsize,
}

impl FailingSink {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            attempts: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl AuditSink for FailingSink {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn append(&self, _record: &AuditRecord) -> Result<(), AuditError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        Err(AuditError::Rejected {
            status: 503,
            body: "store offline".into(),
        })
    }
}
