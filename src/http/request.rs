//! Outbound request construction.
//!
//! # Responsibilities
//! - Build the backend target URI from the inbound path and query
//! - Copy inbound headers, minus `Host`, onto the outbound request
//! - Inject the configured tenant header
//! - Hand the inbound body stream over without buffering it
//!
//! # Design Decisions
//! - Path and query are appended verbatim; nothing is re-encoded
//! - The injected header replaces any inbound header of the same name
//! - Bodies are attached only when the caller declared one

use axum::body::Body;
use axum::http::header::{CONTENT_LENGTH, CONTENT_TYPE, HOST, TRANSFER_ENCODING};
use axum::http::uri::InvalidUri;
use axum::http::{HeaderMap, HeaderName, HeaderValue, Request, Uri};
use thiserror::Error;
use url::Url;

use crate::config::BackendConfig;

/// The backend configuration is unusable.
#[derive(Debug, Error)]
pub enum EndpointError {
    #[error("invalid backend url '{url}': {source}")]
    Url {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("invalid tenant header: {0}")]
    Header(String),
}

/// Base address of the backend plus the header injected into every request.
#[derive(Debug, Clone)]
pub struct BackendEndpoint {
    /// Scheme, authority and optional base path, without a trailing slash.
    base: String,
    injected: Option<(HeaderName, HeaderValue)>,
}

impl BackendEndpoint {
    pub fn from_config(config: &BackendConfig) -> Result<Self, EndpointError> {
        let url = Url::parse(&config.url).map_err(|source| EndpointError::Url {
            url: config.url.clone(),
            source,
        })?;

        let injected = config
            .tenant_header
            .as_ref()
            .map(|header| {
                let name = HeaderName::from_bytes(header.name.as_bytes())
                    .map_err(|e| EndpointError::Header(e.to_string()))?;
                let value = HeaderValue::from_str(&header.value)
                    .map_err(|e| EndpointError::Header(e.to_string()))?;
                Ok::<_, EndpointError>((name, value))
            })
            .transpose()?;

        Ok(Self {
            base: url.as_str().trim_end_matches('/').to_string(),
            injected,
        })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Target on the backend for an inbound URI: base + path + query.
    pub fn target_uri(&self, inbound: &Uri) -> Result<Uri, InvalidUri> {
        let path_and_query = inbound.path_and_query().map_or("/", |pq| pq.as_str());
        format!("{}{}", self.base, path_and_query).parse()
    }
}

/// Whether the inbound request carries a body worth forwarding.
pub fn declares_body(headers: &HeaderMap) -> bool {
    let has_length = headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .is_some_and(|len| len > 0);
    has_length || headers.contains_key(TRANSFER_ENCODING)
}

/// Copy every header except `Host`, keeping all values in order.
pub fn copy_request_headers(src: &HeaderMap, dst: &mut HeaderMap) {
    for (name, value) in src {
        if name != HOST {
            dst.append(name.clone(), value.clone());
        }
    }
}

/// Turn the inbound request into a request for the backend.
///
/// The inbound body is moved into the outbound request when one is declared
/// and dropped otherwise.
pub fn build_outbound(inbound: Request<Body>, endpoint: &BackendEndpoint) -> Result<Request<Body>, InvalidUri> {
    let (parts, body) = inbound.into_parts();
    let uri = endpoint.target_uri(&parts.uri)?;

    let body = if declares_body(&parts.headers) {
        body
    } else {
        drop(body);
        Body::empty()
    };

    let mut outbound = Request::new(body);
    *outbound.method_mut() = parts.method;
    *outbound.uri_mut() = uri;

    let headers = outbound.headers_mut();
    copy_request_headers(&parts.headers, headers);
    if let Some((name, value)) = &endpoint.injected {
        headers.insert(name.clone(), value.clone());
    }
    if declares_body(&parts.headers) {
        if let Some(content_type) = parts.headers.get(CONTENT_TYPE) {
            headers.insert(CONTENT_TYPE, content_type.clone());
        }
    }

    Ok(outbound)
}
