//! Integration tests for the `/api` forwarding handler, driven against a
//! recording stub upstream.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::Bytes;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::IntoResponse;
use serde_json::{json, Value};
use tokio::sync::mpsc;

use gatehouse::error::GatewayError;
use gatehouse::metrics::{Exposition, MetricsCollector, PROMETHEUS_CONTENT_TYPE};
use gatehouse::proxy::upstream::UpstreamClient;
use gatehouse::server::{self, AppState};

struct NullCollector;

impl MetricsCollector for NullCollector {
    fn render(&self) -> Result<Exposition, GatewayError> {
        Ok(Exposition {
            content_type: PROMETHEUS_CONTENT_TYPE.to_string(),
            body: String::new(),
        })
    }
}

#[derive(Debug)]
struct Recorded {
    method: String,
    path_and_query: String,
    content_type: Option<String>,
    body: Bytes,
}

/// Stub upstream: records every request it receives and replies with a
/// fixed status and JSON body.
async fn start_stub(
    status: StatusCode,
    reply: Value,
) -> (SocketAddr, mpsc::UnboundedReceiver<Recorded>) {
    let (tx, rx) = mpsc::unbounded_channel();

    let app = axum::Router::new().fallback(
        move |method: Method, uri: Uri, headers: HeaderMap, body: Bytes| {
            let tx = tx.clone();
            let reply = reply.clone();
            async move {
                let _ = tx.send(Recorded {
                    method: method.to_string(),
                    path_and_query: uri
                        .path_and_query()
                        .map_or_else(|| uri.path().to_string(), |pq| pq.as_str().to_string()),
                    content_type: headers
                        .get("content-type")
                        .and_then(|v| v.to_str().ok())
                        .map(String::from),
                    body,
                });
                (status, axum::Json(reply)).into_response()
            }
        },
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, rx)
}

fn write_bundle(dir: &Path) {
    std::fs::write(dir.join("index.html"), "<!doctype html>").unwrap();
}

async fn start_gateway(upstream: &str, assets: &Path) -> SocketAddr {
    let state = Arc::new(AppState {
        upstream: UpstreamClient::new(
            server::build_http_client(),
            upstream,
            Duration::from_millis(2000),
        ),
        collector: Arc::new(NullCollector),
        start_time: Instant::now(),
    });

    let router = server::build_router(state, assets, 1_048_576);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    addr
}

#[tokio::test]
async fn method_and_full_path_and_query_are_preserved() {
    let (stub, mut recorded) = start_stub(StatusCode::OK, json!({"ok": true})).await;
    let bundle = tempfile::tempdir().unwrap();
    write_bundle(bundle.path());
    let gateway = start_gateway(&format!("http://{stub}"), bundle.path()).await;

    let client = reqwest::Client::new();
    for method in ["GET", "POST", "PUT", "DELETE", "PATCH"] {
        let resp = client
            .request(
                reqwest::Method::from_bytes(method.as_bytes()).unwrap(),
                format!("http://{gateway}/api/v1/items/42?limit=5&offset=10"),
            )
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);

        let seen = recorded.recv().await.unwrap();
        assert_eq!(seen.method, method);
        // Byte-identical: prefix kept, query kept, nothing rewritten.
        assert_eq!(seen.path_and_query, "/api/v1/items/42?limit=5&offset=10");
    }
}

#[tokio::test]
async fn created_item_round_trips_status_and_body() {
    let (stub, mut recorded) =
        start_stub(StatusCode::CREATED, json!({"id": 1, "name": "x"})).await;
    let bundle = tempfile::tempdir().unwrap();
    write_bundle(bundle.path());
    let gateway = start_gateway(&format!("http://{stub}"), bundle.path()).await;

    let resp = reqwest::Client::new()
        .post(format!("http://{gateway}/api/v1/items"))
        .json(&json!({"name": "x"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({"id": 1, "name": "x"}));

    let seen = recorded.recv().await.unwrap();
    assert_eq!(seen.content_type.as_deref(), Some("application/json"));
    let forwarded: Value = serde_json::from_slice(&seen.body).unwrap();
    assert_eq!(forwarded, json!({"name": "x"}));
}

#[tokio::test]
async fn missing_body_is_forwarded_as_an_empty_object() {
    let (stub, mut recorded) = start_stub(StatusCode::OK, json!([])).await;
    let bundle = tempfile::tempdir().unwrap();
    write_bundle(bundle.path());
    let gateway = start_gateway(&format!("http://{stub}"), bundle.path()).await;

    let resp = reqwest::get(format!("http://{gateway}/api/v1/items"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let seen = recorded.recv().await.unwrap();
    let forwarded: Value = serde_json::from_slice(&seen.body).unwrap();
    assert_eq!(forwarded, json!({}));
}

#[tokio::test]
async fn undecodable_body_is_forwarded_as_an_empty_object() {
    let (stub, mut recorded) = start_stub(StatusCode::OK, json!([])).await;
    let bundle = tempfile::tempdir().unwrap();
    write_bundle(bundle.path());
    let gateway = start_gateway(&format!("http://{stub}"), bundle.path()).await;

    let resp = reqwest::Client::new()
        .post(format!("http://{gateway}/api/v1/items"))
        .body("definitely not json")
        .send()
        .await
        .unwrap();
    // The request still goes through; a bad body alone never fails it.
    assert_eq!(resp.status(), 200);

    let seen = recorded.recv().await.unwrap();
    let forwarded: Value = serde_json::from_slice(&seen.body).unwrap();
    assert_eq!(forwarded, json!({}));
}

#[tokio::test]
async fn the_api_root_itself_is_forwarded() {
    let (stub, mut recorded) = start_stub(StatusCode::OK, json!({"ok": true})).await;
    let bundle = tempfile::tempdir().unwrap();
    write_bundle(bundle.path());
    let gateway = start_gateway(&format!("http://{stub}"), bundle.path()).await;

    let resp = reqwest::get(format!("http://{gateway}/api")).await.unwrap();
    assert_eq!(resp.status(), 200);

    let seen = recorded.recv().await.unwrap();
    assert_eq!(seen.path_and_query, "/api");
}

#[tokio::test]
async fn non_2xx_upstream_status_propagates_with_an_error_body() {
    let (stub, _recorded) = start_stub(StatusCode::NOT_FOUND, json!({"error": "Not found"})).await;
    let bundle = tempfile::tempdir().unwrap();
    write_bundle(bundle.path());
    let gateway = start_gateway(&format!("http://{stub}"), bundle.path()).await;

    let resp = reqwest::get(format!("http://{gateway}/api/v1/items/999"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    let message = body.get("error").and_then(Value::as_str).unwrap();
    assert!(message.contains("404"));
}

#[tokio::test]
async fn unreachable_upstream_returns_500_with_an_error_body() {
    let bundle = tempfile::tempdir().unwrap();
    write_bundle(bundle.path());
    let gateway = start_gateway("http://127.0.0.1:9", bundle.path()).await;

    let resp = reqwest::get(format!("http://{gateway}/api/v1/items/999"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 500);
    let body: Value = resp.json().await.unwrap();
    let message = body.get("error").and_then(Value::as_str).unwrap();
    assert!(!message.is_empty());
}

#[tokio::test]
async fn empty_upstream_body_round_trips_as_json_null() {
    // A stub that replies 200 with no body at all.
    let app = axum::Router::new().fallback(|| async { StatusCode::OK });
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let stub = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let bundle = tempfile::tempdir().unwrap();
    write_bundle(bundle.path());
    let gateway = start_gateway(&format!("http://{stub}"), bundle.path()).await;

    let resp = reqwest::get(format!("http://{gateway}/api/v1/items"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "null");
}
