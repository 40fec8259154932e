//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Logging → Config (fatal on error) → Metrics → Upstream client
//!     → Bind listener → Serve
//!
//! Shutdown:
//!     SIGINT/SIGTERM (signals.rs) → Shutdown::trigger (shutdown.rs)
//!     → server stops accepting → in-flight requests drain
//!     → upstream client dropped → pooled connections released
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal, raised before the listener
//! - The upstream pool is torn down after traffic stops, not before

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
