//! keygate — authenticating reverse proxy for an OpenAI-compatible API.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌───────────────────────────────────────────────┐
//!                      │                   KEYGATE                      │
//!                      │                                                │
//!   Client Request     │  ┌──────────┐   ┌───────────┐   ┌─────────┐   │
//!   ──────────────────▶│  │  http    │──▶│ security  │──▶│  http   │   │
//!   x-api-key: …       │  │ server   │   │ allowlist │   │  relay  │   │
//!                      │  └──────────┘   │ + api key │   └────┬────┘   │
//!                      │                 └───────────┘        │        │
//!                      │                                      ▼        │
//!   Client Response    │  ┌──────────┐                 ┌───────────┐   │
//!   ◀──────────────────│  │ buffered │◀────────────────│ upstream  │◀──┼── OpenAI API
//!   (or SSE stream)    │  │ / stream │                 │  client   │   │   Authorization:
//!                      │  └──────────┘                 │  (pooled) │   │   Bearer …
//!                      │                               └───────────┘   │
//!                      │                                                │
//!                      │  config · lifecycle · observability           │
//!                      └───────────────────────────────────────────────┘
//! ```
//!
//! The proxy accepts requests on `/v1/{*path}` bearing a proxy-specific
//! `x-api-key` credential, validates the path against a fixed allowlist,
//! swaps the credential for the real upstream `Authorization` header, and
//! relays the upstream response back — buffered for ordinary responses,
//! chunk-by-chunk for `text/event-stream` responses.

// Core subsystems
pub mod config;
pub mod http;
pub mod security;
pub mod upstream;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
