//! Metrics collection and exposition.
//!
//! # Metrics
//! - `proxy_requests_total` (counter): requests by method, status, mode
//!   (`buffered`, `streaming`, `rejected`, `error`)
//! - `proxy_request_duration_seconds` (histogram): handler latency; for
//!   streaming relays this covers time-to-headers, not the whole stream

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape endpoint on its own listener.
///
/// Failure to start metrics is logged, not fatal: the proxy can serve
/// traffic without an exporter.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "metrics endpoint started"),
        Err(error) => tracing::error!(error = %error, "failed to start metrics endpoint"),
    }
}

/// Record the outcome of one proxied request.
pub fn record_request(method: &str, status: u16, mode: &str, start: Instant) {
    metrics::counter!(
        "proxy_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "mode" => mode.to_string()
    )
    .increment(1);

    metrics::histogram!(
        "proxy_request_duration_seconds",
        "method" => method.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}
