//! HTTP server setup and the proxy handler.
//!
//! # Responsibilities
//! - Create the Axum router for the `/v1` surface
//! - Wire up middleware (tracing, request ID)
//! - Run the fixed admission order: allowlist → credential → relay
//! - Serve with graceful shutdown

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::{Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{on, MethodFilter},
    Json, Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::ProxyConfig;
use crate::http::relay;
use crate::observability::metrics;
use crate::security::{allowlist, credentials};
use crate::upstream::UpstreamClient;

/// Routing prefix in front of every proxied path.
const ROUTE_PREFIX: &str = "/v1";

/// Application state injected into the handler. The client handle is the
/// only shared mutable state in the process; the pool inside it is safe
/// for unsynchronized concurrent use.
#[derive(Clone)]
pub struct AppState {
    pub client: UpstreamClient,
    pub config: Arc<ProxyConfig>,
}

/// HTTP server for the proxy.
pub struct HttpServer {
    router: Router,
    config: Arc<ProxyConfig>,
}

impl HttpServer {
    /// Create a new HTTP server around an already-built upstream client.
    pub fn new(config: Arc<ProxyConfig>, client: UpstreamClient) -> Self {
        let state = AppState {
            client,
            config: config.clone(),
        };
        let router = Self::build_router(state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        let methods = MethodFilter::GET
            .or(MethodFilter::POST)
            .or(MethodFilter::PUT)
            .or(MethodFilter::PATCH)
            .or(MethodFilter::DELETE);

        Router::new()
            .route("/v1/{*path}", on(methods, proxy_handler))
            .route("/v1", on(methods, proxy_handler))
            .with_state(state)
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// Run the server until the shutdown signal fires; in-flight requests
    /// drain before this returns.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream_base_url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Main proxy handler.
///
/// Admission order is fixed: path allowlist, then credential, then relay.
/// Rejected requests never touch the upstream.
async fn proxy_handler(State(state): State<AppState>, request: Request) -> Response<Body> {
    let start = Instant::now();
    let method = request.method().to_string();
    let full_path = request.uri().path().to_string();
    let path = full_path.strip_prefix(ROUTE_PREFIX).unwrap_or(&full_path);

    if !allowlist::is_allowed_path(path) {
        tracing::debug!(method = %method, path = %full_path, "path not allowlisted");
        metrics::record_request(&method, 404, "rejected", start);
        return (StatusCode::NOT_FOUND, "not found").into_response();
    }

    let presented = request
        .headers()
        .get(&credentials::X_API_KEY)
        .and_then(|value| value.to_str().ok());
    if !credentials::is_authorized(presented, &state.config.proxy_api_key) {
        tracing::debug!(method = %method, path = %full_path, "client credential rejected");
        metrics::record_request(&method, 401, "rejected", start);
        return (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({"error": "unauthorized"})),
        )
            .into_response();
    }

    match relay::relay(&state.client, &state.config, request).await {
        Ok((response, mode)) => {
            tracing::debug!(
                method = %method,
                path = %full_path,
                status = %response.status(),
                mode = mode.as_str(),
                "relayed upstream response"
            );
            metrics::record_request(&method, response.status().as_u16(), mode.as_str(), start);
            response
        }
        Err(error) => {
            let response = error.into_response();
            metrics::record_request(&method, response.status().as_u16(), "error", start);
            response
        }
    }
}
