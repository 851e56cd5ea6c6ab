//! Metrics collection and exposition.
//!
//! # Metrics
//! - `proxy_requests_total` (counter): forwarded requests by method, status
//! - `proxy_request_duration_seconds` (histogram): time to response headers
//! - `proxy_upstream_errors_total` (counter): failed forwards by kind
//!
//! Without an installed recorder every call here is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record a completed proxy request.
pub fn record_request(method: &str, status: u16, start: Instant) {
    let status = status.to_string();
    ::metrics::counter!(
        "proxy_requests_total",
        "method" => method.to_string(),
        "status" => status.clone()
    )
    .increment(1);
    ::metrics::histogram!(
        "proxy_request_duration_seconds",
        "method" => method.to_string(),
        "status" => status
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record a forward that failed before the caller got a backend response.
pub fn record_upstream_error(kind: &'static str) {
    ::metrics::counter!("proxy_upstream_errors_total", "kind" => kind).increment(1);
}
