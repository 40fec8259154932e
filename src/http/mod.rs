//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, admission checks)
//!     → headers.rs (strip excluded headers, substitute credential)
//!     → relay.rs (send upstream, pick relay strategy, relay response)
//!     → Send to client (buffered body or live chunk stream)
//! ```

pub mod headers;
pub mod relay;
pub mod server;

pub use relay::{RelayError, RelayMode};
pub use server::HttpServer;
