//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Outbound request to backend
//!     → tls.rs (https connector, plain http passes through)
//!     → connector.rs (ConnectStrategy: resolve then dial, TCP_NODELAY)
//!     → resolver.rs (system lookup, trusted-suffix fallback)
//!     → TcpStream handed to hyper
//!
//! Inbound:
//!     tls.rs loads listener certificates when TLS is configured
//! ```
//!
//! # Design Decisions
//! - Resolution happens per connection attempt, never cached
//! - Only the connector touches sockets directly
//! - TLS is optional and handled transparently

pub mod connector;
pub mod resolver;
pub mod tls;

pub use connector::{BackendConnector, ConnectError, ConnectStrategy, ResolveThenDial};
pub use resolver::{AddressResolver, FallbackPolicy, ResolveError};
