//! Unified error types for Gatehouse.
//!
//! [`GatewayError`] covers startup and CLI failures; per-request upstream
//! failures use [`UpstreamError`](crate::proxy::upstream::UpstreamError)
//! instead, since those are surfaced to the caller rather than the
//! operator. Error messages include contextual hints to guide the user
//! toward a fix.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum GatewayError {
    #[error("Invalid listen address: {0}")]
    AddressParse(#[from] std::net::AddrParseError),

    #[error("Invalid upstream URL '{url}': {source}\n\n  Set --upstream or BACKEND_URL to a full base URL, e.g. http://localhost:8080")]
    UpstreamUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Entry document not found: {}\n\n  The asset directory must contain an index.html.\n  Point --assets or ASSET_DIR at the built client bundle.", path.display())]
    EntryDocumentMissing { path: PathBuf },

    #[error("Metrics exporter setup failed: {source}")]
    MetricsInstall {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Metrics exposition failed: {0}")]
    MetricsRender(String),

    #[error("Invalid URI: {source}")]
    UriParse {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("HTTP request failed: {source}")]
    HttpRequest {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Health check failed with status {0}")]
    HealthCheckFailed(hyper::StatusCode),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}
