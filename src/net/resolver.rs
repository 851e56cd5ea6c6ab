//! Backend address resolution.
//!
//! # Responsibilities
//! - Resolve a hostname to exactly one IP address
//! - Fall back to a fixed address for hosts under the trusted suffix
//!
//! # Design Decisions
//! - First address in resolver order wins; no health-aware selection
//! - Nothing is cached: every connection attempt resolves again
//! - Timeouts and cancellation come from the caller dropping the future

use std::io;
use std::net::{IpAddr, SocketAddr};

use thiserror::Error;

use crate::config::BackendConfig;

/// Resolution failed and no fallback applied.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("failed to resolve host '{host}': {source}")]
    Unresolved {
        host: String,
        #[source]
        source: io::Error,
    },
    #[error("host '{host}' resolved to no addresses")]
    NoAddresses { host: String },
}

/// Policy applied when live resolution fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackPolicy {
    /// Lowercased suffix without a leading dot.
    trusted_suffix: String,
    address: Option<IpAddr>,
}

impl FallbackPolicy {
    pub fn new(trusted_suffix: &str, address: Option<IpAddr>) -> Self {
        Self {
            trusted_suffix: trusted_suffix.trim_start_matches('.').to_ascii_lowercase(),
            address,
        }
    }

    /// A policy that never substitutes an address.
    pub fn disabled() -> Self {
        Self::new("", None)
    }

    /// Whether `host` equals the trusted suffix or is a subdomain of it.
    pub fn is_trusted(&self, host: &str) -> bool {
        if self.trusted_suffix.is_empty() {
            return false;
        }
        let host = host.trim_end_matches('.').to_ascii_lowercase();
        host == self.trusted_suffix
            || host
                .strip_suffix(self.trusted_suffix.as_str())
                .is_some_and(|rest| rest.ends_with('.'))
    }

    /// The fallback address for `host`, if the policy allows one.
    pub fn fallback_for(&self, host: &str) -> Option<IpAddr> {
        self.address.filter(|_| self.is_trusted(host))
    }
}

/// Resolves backend hostnames with the configured fallback policy.
#[derive(Debug, Clone)]
pub struct AddressResolver {
    policy: FallbackPolicy,
}

impl AddressResolver {
    pub fn new(policy: FallbackPolicy) -> Self {
        Self { policy }
    }

    pub fn from_config(config: &BackendConfig) -> Self {
        Self::new(FallbackPolicy::new(&config.trusted_suffix, config.fallback_address))
    }

    pub fn policy(&self) -> &FallbackPolicy {
        &self.policy
    }

    /// Resolve `host` to a single address.
    pub async fn resolve(&self, host: &str) -> Result<IpAddr, ResolveError> {
        let host = host.trim_start_matches('[').trim_end_matches(']');
        if let Ok(ip) = host.parse::<IpAddr>() {
            return Ok(ip);
        }

        // Port is irrelevant to the lookup, only the addresses are kept.
        let lookup = tokio::net::lookup_host((host, 0))
            .await
            .map(|addrs| addrs.collect::<Vec<_>>());
        select_address(host, lookup, &self.policy)
    }
}

/// Pick the address to use from a lookup outcome.
pub fn select_address(
    host: &str,
    lookup: io::Result<Vec<SocketAddr>>,
    policy: &FallbackPolicy,
) -> Result<IpAddr, ResolveError> {
    let failure = match lookup {
        Ok(addrs) => match addrs.first() {
            Some(addr) => {
                tracing::trace!(host, address = %addr.ip(), candidates = addrs.len(), "Host resolved");
                return Ok(addr.ip());
            }
            None => ResolveError::NoAddresses {
                host: host.to_string(),
            },
        },
        Err(source) => ResolveError::Unresolved {
            host: host.to_string(),
            source,
        },
    };

    match policy.fallback_for(host) {
        Some(fallback) => {
            tracing::warn!(host, fallback = %fallback, error = %failure, "Resolution failed, using fallback address");
            Ok(fallback)
        }
        None => Err(failure),
    }
}
