//! keygate — authenticating reverse proxy for an OpenAI-compatible API.
//!
//! Startup order matters: configuration is loaded (and can fail) before
//! the listener is bound, so a misconfigured process never accepts
//! traffic; the upstream connection pool is created once here and torn
//! down after the server drains.

use std::sync::Arc;

use tokio::net::TcpListener;

use keygate::lifecycle::{signals, Shutdown};
use keygate::observability::{logging, metrics};
use keygate::{config, upstream, HttpServer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    tracing::info!("keygate v{} starting", env!("CARGO_PKG_VERSION"));

    // Fatal before the listener is bound: missing credentials must never
    // reach the serving phase.
    let config = match config::from_env() {
        Ok(config) => Arc::new(config),
        Err(error) => {
            tracing::error!(error = %error, "configuration error");
            return Err(error.into());
        }
    };

    tracing::info!(
        bind_address = %config.bind_address,
        upstream = %config.upstream_base_url,
        metrics = ?config.metrics_address,
        "configuration loaded"
    );

    if let Some(addr) = config.metrics_address {
        metrics::init_metrics(addr);
    }

    // The one shared connection pool for the process lifetime.
    let client = upstream::build();

    let listener = TcpListener::bind(&config.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "listening for connections");

    let shutdown = Arc::new(Shutdown::new());
    signals::spawn_signal_listener(shutdown.clone());

    let server = HttpServer::new(config, client.clone());
    server.run(listener, shutdown.subscribe()).await?;

    // Traffic has drained; releasing the last client handle closes the
    // pooled upstream connections.
    drop(client);
    tracing::info!("upstream connection pool released, shutdown complete");

    Ok(())
}
