//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use std::net::IpAddr;

use serde::{Deserialize, Serialize};

/// Root configuration for the documentation gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address, TLS).
    pub listener: ListenerConfig,

    /// The single upstream backend traffic is forwarded to.
    pub backend: BackendConfig,

    /// Proxy route settings.
    pub proxy: ProxyRouteConfig,

    /// Documentation pages and informational endpoints.
    pub docs: DocsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:5000").
    pub bind_address: String,

    /// Optional TLS configuration.
    pub tls: Option<TlsConfig>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:5000".to_string(),
            tls: None,
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

/// Backend configuration.
///
/// `fallback_address` is unset by default, so a trusted host that fails to
/// resolve is reported as unresolvable until an address is configured.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the backend (scheme, host and optional port).
    pub url: String,

    /// Time allowed for a forwarded request to produce response headers.
    pub timeout_secs: u64,

    /// Time allowed to establish a TCP connection.
    pub connect_timeout_secs: u64,

    /// How long idle pooled connections to the backend are kept.
    pub pool_idle_timeout_secs: u64,

    /// Hostname suffix for which `fallback_address` may be used.
    pub trusted_suffix: String,

    /// Address used when resolution of a trusted host fails. Unset means
    /// no fallback, even for trusted hosts.
    pub fallback_address: Option<IpAddr>,

    /// Header added to every forwarded request.
    pub tenant_header: Option<InjectedHeader>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: "https://test93.p4books.cloud".to_string(),
            timeout_secs: 300,
            connect_timeout_secs: 30,
            pool_idle_timeout_secs: 90,
            trusted_suffix: "p4books.cloud".to_string(),
            fallback_address: None,
            tenant_header: Some(InjectedHeader {
                name: "x-tenant-id".to_string(),
                value: "test93".to_string(),
            }),
        }
    }
}

/// A fixed header injected into outbound requests.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct InjectedHeader {
    pub name: String,
    pub value: String,
}

/// Proxy route settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProxyRouteConfig {
    /// Path prefix whose whole subtree is forwarded (e.g., "/api").
    pub path_prefix: String,
}

impl Default for ProxyRouteConfig {
    fn default() -> Self {
        Self {
            path_prefix: "/api".to_string(),
        }
    }
}

/// Documentation pages configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DocsConfig {
    /// Directory holding the static OpenAPI document.
    pub content_root: String,

    /// File name of the OpenAPI document inside `content_root`.
    pub spec_file: String,

    /// `max-age` sent with the OpenAPI document.
    pub cache_max_age_secs: u64,

    /// Page title, also reported as the service name by `/health`.
    pub title: String,

    /// API name reported by `/version`.
    pub api_name: String,

    /// API version reported by `/version`.
    pub api_version: String,

    /// OpenAPI document version reported by `/version`.
    pub openapi_version: String,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            content_root: ".".to_string(),
            spec_file: "openapi.json".to_string(),
            cache_max_age_secs: 300,
            title: "P4Books API Documentation".to_string(),
            api_name: "P4Books ERP".to_string(),
            api_version: "1.0.0".to_string(),
            openapi_version: "3.0.3".to_string(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
