//! Shared connection-pooled client for the upstream API.

use std::time::Duration;

use axum::body::Body;
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

/// TCP connect bound; the overall send phase is bounded separately by the
/// relay.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(60);

/// The shared upstream client. Cloning is cheap (handles share one pool)
/// and the pool is safe for unsynchronized concurrent use.
pub type UpstreamClient = Client<HttpsConnector<HttpConnector>, Body>;

/// Build the process-wide upstream client.
///
/// TLS uses compiled-in webpki roots; plain HTTP stays available so tests
/// and local deployments can point at an `http://` upstream.
pub fn build() -> UpstreamClient {
    let mut http = HttpConnector::new();
    http.enforce_http(false);
    http.set_connect_timeout(Some(CONNECT_TIMEOUT));

    let https = HttpsConnectorBuilder::new()
        .with_webpki_roots()
        .https_or_http()
        .enable_http1()
        .wrap_connector(http);

    Client::builder(TokioExecutor::new()).build(https)
}
