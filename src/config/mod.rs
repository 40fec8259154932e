//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! process environment
//!     → loader.rs (read vars, normalize base URL, validate)
//!     → ProxyConfig (validated, immutable)
//!     → shared via Arc to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup and immutable for the process lifetime
//! - Missing credentials are fatal before the listener is bound
//! - Secrets live in a redacting wrapper so they cannot leak through
//!   Debug/Display formatting

pub mod loader;
pub mod schema;

pub use loader::{from_env, ConfigError};
pub use schema::{ProxyConfig, Secret};
