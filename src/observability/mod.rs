//! Observability subsystem.
//!
//! Structured logging via `tracing` and an optional Prometheus metrics
//! endpoint. Log events never contain credential material: secrets are
//! held in redacting wrappers and the outbound `Authorization` value is
//! marked sensitive.

pub mod logging;
pub mod metrics;
