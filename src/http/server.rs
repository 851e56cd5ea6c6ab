//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, CORS)
//! - Mount the catch-all proxy route under the configured prefix
//! - Serve over plain TCP or rustls, with graceful shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{any, get},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{DocsConfig, ProxyConfig};
use crate::http::docs;
use crate::http::proxy::{proxy_handler, ForwardingEngine};
use crate::http::request::EndpointError;
use crate::net::tls::load_tls_config;

/// How long in-flight TLS connections get to finish after shutdown starts.
const TLS_DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ForwardingEngine>,
    pub docs: Arc<DocsConfig>,
}

/// HTTP server for the documentation gateway.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Result<Self, EndpointError> {
        let engine = ForwardingEngine::from_config(&config.backend)?;
        tracing::info!(
            backend = engine.endpoint().base(),
            prefix = %config.proxy.path_prefix,
            "Backend forwarding configured"
        );

        let state = AppState {
            engine: Arc::new(engine),
            docs: Arc::new(config.docs.clone()),
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        let prefix = config.proxy.path_prefix.as_str();

        Router::new()
            .route("/", get(docs::redirect_to_index))
            .route("/index.html", get(docs::index))
            .route(docs::OPENAPI_PATH, get(docs::openapi_document))
            .route("/health", get(docs::health))
            .route("/version", get(docs::version))
            .route(prefix, any(proxy_handler))
            .route(&format!("{prefix}/"), any(proxy_handler))
            .route(&format!("{prefix}/{{*path}}"), any(proxy_handler))
            .with_state(state)
            .layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            )
            .layer(TraceLayer::new_for_http())
    }

    /// The fully layered router, for serving it elsewhere or in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server on `listener` until `shutdown` fires.
    pub async fn run(self, listener: TcpListener, mut shutdown: broadcast::Receiver<()>) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;

        match &self.config.listener.tls {
            None => {
                tracing::info!(address = %addr, "HTTP server starting");
                axum::serve(listener, self.router)
                    .with_graceful_shutdown(async move {
                        let _ = shutdown.recv().await;
                        tracing::info!("Shutdown signal received");
                    })
                    .await?;
            }
            Some(tls) => {
                let rustls = load_tls_config(tls).await?;
                tracing::info!(address = %addr, "HTTPS server starting");

                let handle = axum_server::Handle::new();
                let drain = handle.clone();
                tokio::spawn(async move {
                    let _ = shutdown.recv().await;
                    tracing::info!("Shutdown signal received");
                    drain.graceful_shutdown(Some(TLS_DRAIN_TIMEOUT));
                });

                axum_server::from_tcp_rustls(listener.into_std()?, rustls)
                    .handle(handle)
                    .serve(self.router.into_make_service())
                    .await?;
            }
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}
