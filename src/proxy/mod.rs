//! Core HTTP request forwarding handler.
//!
//! [`forward_handler`] receives every request under the `/api` prefix,
//! translates it into exactly one outbound call via
//! [`upstream::UpstreamClient`], and writes exactly one response to the
//! caller: the upstream's status and body on success, or
//! `{"error": "<message>"}` with the mapped status on failure. Nothing
//! is retried and no partial response is ever streamed.

pub mod upstream;

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;
use metrics::counter;
use serde_json::{json, Map, Value};

use crate::metrics::{REQUESTS_FAILED, REQUESTS_FORWARDED};
use crate::server::AppState;

pub async fn forward_handler(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Response {
    // The matched prefix is forwarded as-is: the upstream routes under
    // the same /api namespace it was called with.
    let target = uri.path_and_query().map_or(uri.path(), |pq| pq.as_str());
    let payload = coerce_json_body(&body);

    tracing::debug!(method = %method, path = %target, "forwarding request");

    match state.upstream.send(method.clone(), target, &payload).await {
        Ok(response) => {
            counter!(REQUESTS_FORWARDED).increment(1);
            tracing::info!(
                method = %method,
                path = %target,
                status = response.status.as_u16(),
                "upstream responded"
            );
            (response.status, Json(response.body)).into_response()
        }
        Err(e) => {
            counter!(REQUESTS_FAILED).increment(1);
            let status = e
                .status_code()
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            // Message only — the cause chain stays in the logs, never the response.
            tracing::error!(
                method = %method,
                path = %target,
                status = status.as_u16(),
                error = %e,
                "upstream request failed"
            );
            (status, Json(json!({ "error": e.to_string() }))).into_response()
        }
    }
}

/// An absent or undecodable inbound body is forwarded as `{}` — a bad
/// body alone never fails the request.
fn coerce_json_body(body: &Bytes) -> Value {
    if body.is_empty() {
        return Value::Object(Map::new());
    }
    serde_json::from_slice(body).unwrap_or_else(|_| Value::Object(Map::new()))
}
