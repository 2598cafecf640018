//! `gatehouse run` — start the gateway server.
//!
//! Validates the startup configuration (listen address, upstream base
//! URL, asset bundle), installs the Prometheus recorder, and serves the
//! Axum router with graceful shutdown. Configuration is read once here
//! and never mutated afterwards; these validations are the only fatal
//! errors in the process.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::assets;
use crate::cli::RunArgs;
use crate::error::GatewayError;
use crate::logging;
use crate::metrics::PrometheusCollector;
use crate::proxy::upstream::UpstreamClient;
use crate::server::{self, AppState};

pub async fn execute(args: RunArgs) -> Result<(), GatewayError> {
    let log_format = logging::resolve_format(args.pretty, args.json);
    logging::init(&args.log_level, log_format);

    let upstream_base: url::Url =
        args.upstream
            .parse()
            .map_err(|source| GatewayError::UpstreamUrl {
                url: args.upstream.clone(),
                source,
            })?;

    assets::ensure_entry_document(&args.assets).await?;

    let collector = PrometheusCollector::install()?;

    let state = Arc::new(AppState {
        upstream: UpstreamClient::new(
            server::build_http_client(),
            upstream_base.as_str(),
            Duration::from_millis(args.timeout),
        ),
        collector: Arc::new(collector),
        start_time: Instant::now(),
    });

    let router = server::build_router(Arc::clone(&state), &args.assets, args.max_body);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(
        addr = %addr,
        upstream = %upstream_base,
        assets = %args.assets.display(),
        version = env!("CARGO_PKG_VERSION"),
        git = env!("GATEHOUSE_GIT_SHORT"),
        profile = env!("GATEHOUSE_BUILD_PROFILE"),
        "gatehouse started"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(server::shutdown_signal())
        .await?;

    tracing::info!(
        uptime_seconds = state.start_time.elapsed().as_secs(),
        "gatehouse stopped"
    );
    Ok(())
}
