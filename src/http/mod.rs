//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound connection
//!     → server.rs (Axum setup, CORS, tracing)
//!     → docs.rs (documentation shell, OpenAPI file, health, version)
//!     → proxy.rs (catch-all under the proxy prefix)
//!         → request.rs (target URI, header copy, body hand-over)
//!         → backend via net::connector
//!         → response.rs (status/header copy, streamed body, 502 mapping)
//!     → Send to client
//! ```

pub mod docs;
pub mod proxy;
pub mod request;
pub mod response;
pub mod server;

pub use proxy::ForwardingEngine;
pub use request::{BackendEndpoint, EndpointError};
pub use response::ForwardError;
pub use server::HttpServer;
