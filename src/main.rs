//! API documentation gateway.
//!
//! Serves the documentation shell and OpenAPI document, and forwards every
//! request under the proxy prefix to the backend.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌───────────────────────────────────────────────┐
//!                      │                 DOCS GATEWAY                  │
//!   Client Request     │  ┌────────┐   ┌──────────┐   ┌─────────────┐  │
//!   ───────────────────┼─▶│ axum   │──▶│ /api/**  │──▶│  request    │  │
//!                      │  │ router │   │ handler  │   │  builder    │  │
//!                      │  └───┬────┘   └──────────┘   └──────┬──────┘  │
//!                      │      │ docs, health, version        ▼         │
//!                      │      ▼                       ┌─────────────┐  │
//!                      │  ┌────────┐                  │ connector + │  │
//!                      │  │ static │                  │  resolver   │──┼──▶ Backend
//!                      │  └────────┘                  └─────────────┘  │
//!   Client Response    │  ┌──────────────────┐                         │
//!   ◀──────────────────┼──│ response copy +  │◀────────────────────────┼─── Backend
//!                      │  │ streamed body    │                         │
//!                      │  └──────────────────┘                         │
//!                      └───────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use docs_gateway::config::{resolve_config, Overrides};
use docs_gateway::lifecycle::{signals, Shutdown};
use docs_gateway::observability::{logging, metrics};
use docs_gateway::HttpServer;

#[derive(Parser)]
#[command(name = "docs-gateway")]
#[command(about = "API documentation host and backend reverse proxy", long_about = None)]
struct Cli {
    /// TOML configuration file; built-in defaults are used without one.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listener bind address, e.g. 0.0.0.0:5000.
    #[arg(short, long)]
    bind: Option<String>,

    /// Backend base URL.
    #[arg(long, env = "BACKEND_URL")]
    backend_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = resolve_config(
        cli.config.as_deref(),
        Overrides {
            bind_address: cli.bind,
            backend_url: cli.backend_url,
        },
    )?;

    logging::init(&config.observability);
    tracing::info!("docs-gateway v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        backend = %config.backend.url,
        timeout_secs = config.backend.timeout_secs,
        tls = config.listener.tls.is_some(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        if let Err(e) = metrics::init_metrics(addr) {
            tracing::error!(error = %e, "Failed to start metrics endpoint");
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::new(config)?;

    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        match signals::wait_for_signal().await {
            Ok(signal) => tracing::info!(signal, "Termination signal received"),
            Err(e) => tracing::error!(error = %e, "Failed to listen for signals, shutting down"),
        }
        signal_shutdown.trigger();
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
