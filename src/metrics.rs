//! Metrics collection and the `GET /metrics` exposition handler.
//!
//! The process-wide Prometheus recorder is installed once at startup;
//! the returned handle is wrapped in the [`MetricsCollector`] trait and
//! owned by [`AppState`](crate::server::AppState), so handlers receive
//! the collector explicitly instead of reaching for a global. Each
//! scrape renders a fresh point-in-time exposition — nothing is cached
//! between scrapes.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::error::GatewayError;
use crate::server::AppState;

pub const REQUESTS_FORWARDED: &str = "gatehouse_requests_forwarded_total";
pub const REQUESTS_FAILED: &str = "gatehouse_requests_failed_total";

/// Content type of the Prometheus text exposition format.
pub const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// A rendered point-in-time exposition.
pub struct Exposition {
    pub content_type: String,
    pub body: String,
}

pub trait MetricsCollector: Send + Sync {
    fn render(&self) -> Result<Exposition, GatewayError>;
}

/// Collector backed by the `metrics-exporter-prometheus` recorder.
pub struct PrometheusCollector {
    handle: PrometheusHandle,
}

impl PrometheusCollector {
    /// Install the process-wide recorder. Must be called at most once;
    /// a second install fails and is treated as a startup error.
    pub fn install() -> Result<Self, GatewayError> {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .map_err(|e| GatewayError::MetricsInstall {
                source: Box::new(e),
            })?;
        describe_counters();
        Ok(Self { handle })
    }
}

impl MetricsCollector for PrometheusCollector {
    fn render(&self) -> Result<Exposition, GatewayError> {
        Ok(Exposition {
            content_type: PROMETHEUS_CONTENT_TYPE.to_string(),
            body: self.handle.render(),
        })
    }
}

/// Both series must exist before the first scrape, not on first increment.
fn describe_counters() {
    metrics::describe_counter!(
        REQUESTS_FORWARDED,
        "Requests forwarded to the upstream service"
    );
    metrics::describe_counter!(
        REQUESTS_FAILED,
        "Requests that failed at the upstream boundary"
    );
    metrics::counter!(REQUESTS_FORWARDED).absolute(0);
    metrics::counter!(REQUESTS_FAILED).absolute(0);
}

pub async fn metrics_handler(State(state): State<Arc<AppState>>) -> Response {
    match state.collector.render() {
        Ok(exposition) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, exposition.content_type)],
            exposition.body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "metrics exposition failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}
