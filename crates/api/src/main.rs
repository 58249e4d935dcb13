//! `ocsp-demo-api` — binary entry point.
//!
//! Startup sequence:
//! 1. Load and validate [`Config`] from environment variables.
//! 2. Initialise the telemetry pipeline (JSON logs, optional OTLP export).
//! 3. Load TLS material, when configured.
//! 4. Build the Axum router and serve until SIGINT/SIGTERM.

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use tracing::info;

use ocsp_demo_api::{
    config::Config,
    server::{listener, router, shutdown, tls},
    telemetry,
};

#[tokio::main]
async fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e:#}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init_telemetry(&cfg.log_level, cfg.otel_exporter_otlp_endpoint.as_deref())?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        port = cfg.port,
        tls = cfg.tls().is_some(),
        otlp = cfg.otel_exporter_otlp_endpoint.is_some(),
        "ocsp-demo-api starting"
    );

    // -----------------------------------------------------------------------
    // 3. TLS
    // -----------------------------------------------------------------------
    let tls_config = cfg
        .tls()
        .map(|paths| tls::load_server_config(&paths))
        .transpose()
        .context("failed to load TLS material")?;

    // -----------------------------------------------------------------------
    // 4. HTTP server
    // -----------------------------------------------------------------------
    let router = router::build(cfg.request_timeout());
    let addr = cfg.bind_addr()?;
    let tcp = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(addr = %tcp.local_addr()?, "listening");

    let shutdown_token = CancellationToken::new();
    tokio::spawn(shutdown::cancel_on_signal(shutdown_token.clone()));

    let served = match tls_config {
        Some(tls_config) => {
            listener::serve_https(tcp, router, tls_config, shutdown_token, cfg.shutdown_grace())
                .await
        }
        None => listener::serve_http(tcp, router, shutdown_token, cfg.shutdown_grace()).await,
    };

    info!("ocsp-demo-api stopped");
    telemetry::shutdown_telemetry();
    served
}
