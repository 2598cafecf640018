//! `GET /health` liveness handler.
//!
//! Answers "this process is alive", never "the upstream is alive" — the
//! payload is fixed and the handler touches no shared state, so health
//! stays green while the upstream is down.

use axum::Json;
use serde::{Deserialize, Serialize};

/// Name this service reports to operational tooling.
pub const SERVICE_NAME: &str = "frontend";

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}

impl HealthResponse {
    #[must_use]
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            service: SERVICE_NAME.to_string(),
        }
    }
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_is_the_fixed_liveness_document() {
        let value = serde_json::to_value(HealthResponse::healthy()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"status": "healthy", "service": "frontend"})
        );
    }
}
