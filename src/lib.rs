//! Gatehouse is an edge-facing HTTP gateway.
//!
//! It serves the bundled single-page web client, exposes liveness and
//! Prometheus probes, and transparently forwards every request under
//! `/api` to a single upstream service. The upstream response is relayed
//! verbatim; upstream failures are translated into an HTTP error with a
//! JSON `{"error": ...}` body.
//!
//! # Architecture
//!
//! - [`cli`] -- Command-line argument parsing with clap derive macros.
//! - [`cmd`] -- Subcommand dispatch and execution (run, health).
//! - [`error`] -- Unified error types using `thiserror`.
//! - [`health`] -- `GET /health` liveness handler with a fixed payload.
//! - [`metrics`](crate::metrics) -- The [`MetricsCollector`](crate::metrics::MetricsCollector)
//!   trait, its Prometheus-backed implementation, and the `GET /metrics`
//!   exposition handler.
//! - [`logging`] -- Structured tracing setup with JSON and pretty-print
//!   output.
//! - [`proxy`] -- Core request forwarding: inbound-to-outbound translation
//!   and upstream failure mapping.
//! - [`assets`] -- Static bundle serving with an entry-document fallback
//!   for client-side routing.
//! - [`server`] -- Axum router assembly, shared application state, HTTP
//!   client, and graceful shutdown.

// Binary crate — public functions are internal, not consumed by external users.
#![allow(clippy::missing_errors_doc)]

pub mod assets;
pub mod cli;
pub mod cmd;
pub mod error;
pub mod health;
pub mod logging;
pub mod metrics;
pub mod proxy;
pub mod server;
