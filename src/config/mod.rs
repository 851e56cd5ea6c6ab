//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML), CLI flags, BACKEND_URL
//!     → loader.rs (parse, deserialize, apply overrides)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → shared via Arc to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no hot reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{parse_config, resolve_config, ConfigError, Overrides};
pub use schema::BackendConfig;
pub use schema::DocsConfig;
pub use schema::InjectedHeader;
pub use schema::ListenerConfig;
pub use schema::LogFormat;
pub use schema::ObservabilityConfig;
pub use schema::ProxyConfig;
