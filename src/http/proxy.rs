//! Forwarding engine.
//!
//! ```text
//! building → sent-awaiting-headers → streaming-body → complete
//!     \______________\_____________________\________→ failed
//! ```
//!
//! A request fails cleanly (502) only while nothing has been written to the
//! caller. Once status and headers are out, a backend failure truncates the
//! streamed body instead.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, Response};
use axum::response::IntoResponse;
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::{TokioExecutor, TokioTimer};
use tracing::Instrument;
use uuid::Uuid;

use crate::config::BackendConfig;
use crate::http::request::{build_outbound, BackendEndpoint, EndpointError};
use crate::http::response::{into_caller_response, ForwardError};
use crate::http::server::AppState;
use crate::net::connector::{BackendConnector, ConnectStrategy, ResolveThenDial};
use crate::net::resolver::AddressResolver;
use crate::net::tls::https_connector;
use crate::observability::metrics;

/// HTTP client used for backend traffic.
pub type BackendClient = Client<HttpsConnector<BackendConnector>, Body>;

/// Forwards requests to the single configured backend.
#[derive(Clone)]
pub struct ForwardingEngine {
    client: BackendClient,
    endpoint: BackendEndpoint,
    timeout: Duration,
}

impl std::fmt::Debug for ForwardingEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForwardingEngine")
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl ForwardingEngine {
    /// Engine using the resolve-then-dial strategy from the backend config.
    pub fn from_config(config: &BackendConfig) -> Result<Self, EndpointError> {
        let strategy = ResolveThenDial::new(
            AddressResolver::from_config(config),
            Duration::from_secs(config.connect_timeout_secs),
        );
        Self::with_strategy(config, strategy)
    }

    /// Engine dialing the backend through `strategy`.
    pub fn with_strategy(config: &BackendConfig, strategy: impl ConnectStrategy) -> Result<Self, EndpointError> {
        let endpoint = BackendEndpoint::from_config(config)?;
        let connector = https_connector(BackendConnector::new(strategy));
        let client = Client::builder(TokioExecutor::new())
            .pool_idle_timeout(Duration::from_secs(config.pool_idle_timeout_secs))
            .pool_timer(TokioTimer::new())
            .build(connector);

        Ok(Self {
            client,
            endpoint,
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }

    pub fn endpoint(&self) -> &BackendEndpoint {
        &self.endpoint
    }

    /// Send `inbound` to the backend and return its response with the body
    /// still streaming.
    pub async fn forward(&self, inbound: Request<Body>) -> Result<Response<Body>, ForwardError> {
        let outbound = build_outbound(inbound, &self.endpoint)?;
        tracing::debug!(target_uri = %outbound.uri(), "Sending request to backend");

        let upstream = tokio::time::timeout(self.timeout, self.client.request(outbound))
            .await
            .map_err(|_| ForwardError::Timeout(self.timeout))??;

        tracing::debug!(status = %upstream.status(), "Backend response headers received");
        Ok(into_caller_response(upstream))
    }
}

/// Catch-all handler for the proxied prefix.
pub async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> impl IntoResponse {
    let engine: Arc<ForwardingEngine> = state.engine;
    let start_time = Instant::now();
    let method = request.method().to_string();
    let span = tracing::info_span!(
        "proxy",
        request_id = %Uuid::new_v4(),
        method = %method,
        path = %request.uri().path(),
    );

    async move {
        match engine.forward(request).await {
            Ok(response) => {
                tracing::info!(
                    status = response.status().as_u16(),
                    elapsed_ms = start_time.elapsed().as_millis() as u64,
                    "Request forwarded"
                );
                metrics::record_request(&method, response.status().as_u16(), start_time);
                response
            }
            Err(e) => {
                tracing::error!(kind = e.kind(), error = %e.detail(), "Backend request failed");
                metrics::record_upstream_error(e.kind());
                let response = e.into_response();
                metrics::record_request(&method, response.status().as_u16(), start_time);
                response
            }
        }
    }
    .instrument(span)
    .await
}
