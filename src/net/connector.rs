//! Outbound TCP connection establishment.
//!
//! # Responsibilities
//! - Dial the backend through a pluggable [`ConnectStrategy`]
//! - Disable Nagle's algorithm on every outbound stream
//! - Expose the strategy to hyper as a `Service<Uri>`
//!
//! # Design Decisions
//! - One fresh TCP connection per connect call; pooling belongs to the client
//! - Dropping the connect future aborts the attempt and closes the socket
//! - Errors are surfaced raw; translation happens in the forwarding engine

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use axum::http::Uri;
use futures_util::future::BoxFuture;
use hyper_util::rt::TokioIo;
use thiserror::Error;
use tokio::net::TcpStream;
use tower::Service;

use crate::net::resolver::{AddressResolver, ResolveError};

/// Failure to establish a backend connection.
#[derive(Debug, Error)]
pub enum ConnectError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error("connection to {addr} failed: {source}")]
    Io {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
    #[error("connection to {addr} timed out after {timeout:?}")]
    Timeout { addr: SocketAddr, timeout: Duration },
    #[error("target URI '{0}' has no host")]
    MissingHost(Uri),
}

/// How a backend connection is established.
pub trait ConnectStrategy: Send + Sync + 'static {
    /// Open a stream to `host:port`.
    fn connect<'a>(&'a self, host: &'a str, port: u16) -> BoxFuture<'a, Result<TcpStream, ConnectError>>;
}

/// Resolve the host with [`AddressResolver`], then dial the chosen address.
#[derive(Debug, Clone)]
pub struct ResolveThenDial {
    resolver: AddressResolver,
    connect_timeout: Duration,
}

impl ResolveThenDial {
    pub fn new(resolver: AddressResolver, connect_timeout: Duration) -> Self {
        Self {
            resolver,
            connect_timeout,
        }
    }
}

impl ConnectStrategy for ResolveThenDial {
    fn connect<'a>(&'a self, host: &'a str, port: u16) -> BoxFuture<'a, Result<TcpStream, ConnectError>> {
        Box::pin(async move {
            let ip = self.resolver.resolve(host).await?;
            dial(SocketAddr::new(ip, port), self.connect_timeout).await
        })
    }
}

/// Open a TCP stream to `addr` with `TCP_NODELAY` set.
pub async fn dial(addr: SocketAddr, timeout: Duration) -> Result<TcpStream, ConnectError> {
    let stream = match tokio::time::timeout(timeout, TcpStream::connect(addr)).await {
        Ok(Ok(stream)) => stream,
        Ok(Err(source)) => return Err(ConnectError::Io { addr, source }),
        Err(_) => return Err(ConnectError::Timeout { addr, timeout }),
    };

    // On error the stream is dropped here, closing the socket.
    stream
        .set_nodelay(true)
        .map_err(|source| ConnectError::Io { addr, source })?;

    tracing::debug!(address = %addr, "Backend connection established");
    Ok(stream)
}

/// hyper connector backed by a [`ConnectStrategy`].
#[derive(Clone)]
pub struct BackendConnector {
    strategy: Arc<dyn ConnectStrategy>,
}

impl BackendConnector {
    pub fn new(strategy: impl ConnectStrategy) -> Self {
        Self {
            strategy: Arc::new(strategy),
        }
    }
}

impl std::fmt::Debug for BackendConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConnector").finish_non_exhaustive()
    }
}

impl Service<Uri> for BackendConnector {
    type Response = TokioIo<TcpStream>;
    type Error = ConnectError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, dst: Uri) -> Self::Future {
        let strategy = Arc::clone(&self.strategy);
        Box::pin(async move {
            let host = dst
                .host()
                .map(|h| h.trim_start_matches('[').trim_end_matches(']').to_string())
                .ok_or_else(|| ConnectError::MissingHost(dst.clone()))?;
            let port = dst.port_u16().unwrap_or(match dst.scheme_str() {
                Some("https") => 443,
                _ => 80,
            });
            let stream = strategy.connect(&host, port).await?;
            Ok(TokioIo::new(stream))
        })
    }
}
