//! Outbound HTTP calls to the upstream service.
//!
//! [`UpstreamClient::send`] issues one outbound request per call and
//! resolves to either [`UpstreamResponse`] (a 2xx status with its JSON
//! body) or [`UpstreamError`] — the failure sum type whose optional
//! status code drives the caller-visible mapping: trust the upstream's
//! status when it reported one, treat everything else as a 500.

use std::time::Duration;

use bytes::Bytes;
use http::header;
use http::{Method, StatusCode};
use http_body_util::{BodyExt, Full};
use serde_json::Value;

use crate::server::HttpClient;

/// A successful (2xx) upstream response. The body is an opaque JSON
/// value relayed verbatim — its shape is never inspected.
#[derive(Debug)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub body: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("upstream responded with status {0}")]
    Status(StatusCode),

    #[error("upstream request failed: {source}")]
    Transport {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("upstream request timed out after {0}ms")]
    Timeout(u64),

    #[error("upstream returned malformed JSON: {source}")]
    MalformedBody {
        #[source]
        source: serde_json::Error,
    },
}

impl UpstreamError {
    /// The status the upstream reported, if it reported one. `None`
    /// means no usable response was obtained and the caller sees 500.
    #[must_use]
    pub const fn status_code(&self) -> Option<StatusCode> {
        match self {
            Self::Status(status) => Some(*status),
            _ => None,
        }
    }
}

pub struct UpstreamClient {
    client: HttpClient,
    base: String,
    timeout: Duration,
}

impl UpstreamClient {
    /// `base` must be a valid absolute URL; callers validate it at
    /// startup. Trailing slashes are trimmed so concatenation with the
    /// original path yields a single separator.
    #[must_use]
    pub fn new(client: HttpClient, base: &str, timeout: Duration) -> Self {
        Self {
            client,
            base: base.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    /// Issue one outbound request: same method, the original path+query
    /// appended to the base verbatim, the payload serialized as JSON
    /// with a fixed `Content-Type: application/json`.
    #[allow(clippy::cast_possible_truncation)]
    pub async fn send(
        &self,
        method: Method,
        path_and_query: &str,
        payload: &Value,
    ) -> Result<UpstreamResponse, UpstreamError> {
        let url = self.outbound_url(path_and_query);
        let uri: hyper::Uri = url.parse().map_err(|e: http::uri::InvalidUri| {
            UpstreamError::Transport {
                source: Box::new(e),
            }
        })?;

        let request = hyper::Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Full::new(Bytes::from(payload.to_string())))
            .map_err(|e| UpstreamError::Transport {
                source: Box::new(e),
            })?;

        let response = tokio::time::timeout(self.timeout, self.client.request(request))
            .await
            .map_err(|_| UpstreamError::Timeout(self.timeout.as_millis() as u64))?
            .map_err(|e| UpstreamError::Transport {
                source: Box::new(e),
            })?;

        let status = response.status();
        let body = response
            .into_body()
            .collect()
            .await
            .map_err(|e| UpstreamError::Transport {
                source: Box::new(e),
            })?
            .to_bytes();

        if !status.is_success() {
            return Err(UpstreamError::Status(status));
        }

        let body = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).map_err(|e| UpstreamError::MalformedBody { source: e })?
        };

        Ok(UpstreamResponse { status, body })
    }

    fn outbound_url(&self, path_and_query: &str) -> String {
        format!("{}{path_and_query}", self.base)
    }
}
