//! Response handling and transformation.
//!
//! # Responsibilities
//! - Copy backend status and headers onto the caller's response
//! - Stream the backend body through without buffering
//! - Map transport failures to 502 Bad Gateway
//!
//! # Design Decisions
//! - `Transfer-Encoding` is always dropped; the server picks its own framing
//! - Failures after headers are sent truncate the body; they cannot be rewritten
//! - Only this layer decides what a failure looks like to the caller

use std::error::Error as _;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::TRANSFER_ENCODING;
use axum::http::uri::InvalidUri;
use axum::http::{HeaderMap, Response, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use futures_util::TryStreamExt;
use hyper::body::Incoming;
use serde::Serialize;
use thiserror::Error;

/// Error text reported to callers when the backend cannot be reached.
pub const BACKEND_UNAVAILABLE: &str = "Backend unavailable";

/// A forward attempt failed before any response bytes reached the caller.
#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("invalid backend target")]
    InvalidTarget(#[from] InvalidUri),
    #[error("upstream request failed")]
    Upstream(#[from] hyper_util::client::legacy::Error),
    #[error("backend did not respond within {0:?}")]
    Timeout(Duration),
}

impl ForwardError {
    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ForwardError::InvalidTarget(_) => "invalid_target",
            ForwardError::Upstream(e) if e.is_connect() => "connect",
            ForwardError::Upstream(_) => "transport",
            ForwardError::Timeout(_) => "timeout",
        }
    }

    /// The error with every underlying cause, outermost first.
    pub fn detail(&self) -> String {
        let mut message = self.to_string();
        let mut source = self.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        message
    }
}

/// JSON body of a 502 response.
#[derive(Debug, Serialize)]
pub struct GatewayErrorBody {
    pub error: &'static str,
    pub message: String,
}

impl IntoResponse for ForwardError {
    fn into_response(self) -> axum::response::Response {
        let body = GatewayErrorBody {
            error: BACKEND_UNAVAILABLE,
            message: self.detail(),
        };
        (StatusCode::BAD_GATEWAY, Json(body)).into_response()
    }
}

/// Copy every response header, then drop `Transfer-Encoding`.
pub fn copy_response_headers(src: &HeaderMap, dst: &mut HeaderMap) {
    for (name, value) in src {
        dst.append(name.clone(), value.clone());
    }
    dst.remove(TRANSFER_ENCODING);
}

/// Rebuild the backend response for the caller, streaming its body.
pub fn into_caller_response(upstream: Response<Incoming>) -> Response<Body> {
    let (parts, incoming) = upstream.into_parts();

    let mut response = Response::new(stream_body(Body::new(incoming)));
    *response.status_mut() = parts.status;
    copy_response_headers(&parts.headers, response.headers_mut());
    response
}

fn stream_body(body: Body) -> Body {
    let stream = body.into_data_stream().inspect_err(|e| {
        tracing::warn!(error = %e, "Backend body failed mid-stream, response truncated");
    });
    Body::from_stream(stream)
}
