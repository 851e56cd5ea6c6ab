//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Check the backend URL and proxy prefix are usable
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::{HeaderName, HeaderValue};
use url::Url;

use crate::config::schema::ProxyConfig;

/// Paths the gateway answers itself; the proxy prefix may not shadow them.
const RESERVED_PATHS: [&str; 4] = ["/index.html", "/openapi.json", "/health", "/version"];

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Validate a parsed configuration.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    if let Some(tls) = &config.listener.tls {
        if tls.cert_path.is_empty() || tls.key_path.is_empty() {
            errors.push(ValidationError::new(
                "listener.tls",
                "cert_path and key_path must both be set",
            ));
        }
    }

    validate_backend(config, &mut errors);

    let prefix = &config.proxy.path_prefix;
    if !prefix.starts_with('/') || prefix.ends_with('/') || prefix.contains(['{', '}', '*']) {
        errors.push(ValidationError::new(
            "proxy.path_prefix",
            format!("'{prefix}' must start with '/', must not end with '/' and must be a literal path"),
        ));
    } else if RESERVED_PATHS.contains(&prefix.as_str()) {
        errors.push(ValidationError::new(
            "proxy.path_prefix",
            format!("'{prefix}' is served by the gateway itself"),
        ));
    }

    if config.docs.spec_file.is_empty() {
        errors.push(ValidationError::new("docs.spec_file", "must not be empty"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_backend(config: &ProxyConfig, errors: &mut Vec<ValidationError>) {
    let backend = &config.backend;

    match Url::parse(&backend.url) {
        Ok(url) => {
            if !matches!(url.scheme(), "http" | "https") {
                errors.push(ValidationError::new(
                    "backend.url",
                    format!("unsupported scheme '{}'", url.scheme()),
                ));
            }
            if url.host_str().is_none() {
                errors.push(ValidationError::new("backend.url", "missing host"));
            }
            if url.query().is_some() || url.fragment().is_some() {
                errors.push(ValidationError::new(
                    "backend.url",
                    "must not carry a query or fragment",
                ));
            }
        }
        Err(e) => errors.push(ValidationError::new("backend.url", e.to_string())),
    }

    if backend.timeout_secs == 0 {
        errors.push(ValidationError::new("backend.timeout_secs", "must be greater than 0"));
    }
    if backend.connect_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "backend.connect_timeout_secs",
            "must be greater than 0",
        ));
    }

    if let Some(header) = &backend.tenant_header {
        if HeaderName::from_bytes(header.name.as_bytes()).is_err() {
            errors.push(ValidationError::new(
                "backend.tenant_header.name",
                format!("'{}' is not a valid header name", header.name),
            ));
        }
        if HeaderValue::from_str(&header.value).is_err() {
            errors.push(ValidationError::new(
                "backend.tenant_header.value",
                "is not a valid header value",
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::InjectedHeader;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&ProxyConfig::default()).is_ok());
    }

    #[test]
    fn collects_every_error() {
        let mut config = ProxyConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.backend.url = "ftp://files.example.com".into();
        config.backend.timeout_secs = 0;
        config.proxy.path_prefix = "api/".into();
        config.backend.tenant_header = Some(InjectedHeader {
            name: "bad header".into(),
            value: "ok".into(),
        });

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "listener.bind_address",
                "backend.url",
                "backend.timeout_secs",
                "backend.tenant_header.name",
                "proxy.path_prefix",
            ]
        );
    }

    #[test]
    fn rejects_root_prefix() {
        let mut config = ProxyConfig::default();
        config.proxy.path_prefix = "/".into();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn rejects_prefix_shadowing_docs_routes() {
        let mut config = ProxyConfig::default();
        config.proxy.path_prefix = "/health".into();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "proxy.path_prefix");
    }
}
