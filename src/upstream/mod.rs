//! Upstream connection management.
//!
//! One connection-pooled client is built at process start, handed to the
//! HTTP server by handle, and dropped at shutdown to release the pool.
//! Requests never build their own client.

pub mod client;

pub use client::{build, UpstreamClient};
