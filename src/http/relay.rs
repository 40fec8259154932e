//! Request forwarding and response relay.
//!
//! # Responsibilities
//! - Build the upstream request: rewritten URL, filtered headers,
//!   substituted credential, body passed through as a live stream
//! - Send it over the shared connection pool with a bounded send phase
//! - Choose the relay strategy from the upstream `content-type`
//! - Relay the response: buffered for ordinary responses, incremental
//!   for `text/event-stream`
//!
//! # Design Decisions
//! - The relay decision is made exactly once, from headers alone, before
//!   any body byte is read or written
//! - Only the connect/send/headers phase is timeout-bounded; the body
//!   read is deliberately unbounded so long-lived event streams survive
//! - Upstream connection release rides on ownership: the upstream body
//!   is dropped on completion, on error, and when the caller disconnects
//!   (the server drops the response, which drops the upstream body)

use std::time::Duration;

use axum::{
    body::Body,
    http::{header, HeaderMap, Request, Response, StatusCode, Uri},
    response::IntoResponse,
};

use crate::config::ProxyConfig;
use crate::http::headers;
use crate::upstream::UpstreamClient;

/// Bound on the connect/send/response-headers phase. The body read phase
/// has no timeout.
pub const UPSTREAM_SEND_TIMEOUT: Duration = Duration::from_secs(60);

/// How an upstream response was relayed to the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RelayMode {
    /// Whole body read into memory, sent as one unit.
    Buffered,
    /// Body chunks forwarded as they arrive.
    Streaming,
}

impl RelayMode {
    pub fn as_str(self) -> &'static str {
        match self {
            RelayMode::Buffered => "buffered",
            RelayMode::Streaming => "streaming",
        }
    }
}

/// Failures while talking to the upstream. Never retried: this proxy is a
/// single-hop relay, not a resilient client.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("invalid upstream URL: {0}")]
    InvalidUri(#[from] axum::http::uri::InvalidUri),

    #[error("failed to build upstream request: {0}")]
    BuildRequest(#[from] axum::http::Error),

    #[error("upstream request failed: {0}")]
    Upstream(#[from] hyper_util::client::legacy::Error),

    #[error("upstream did not respond within {}s", UPSTREAM_SEND_TIMEOUT.as_secs())]
    UpstreamTimeout,

    #[error("failed to read upstream body: {0}")]
    ReadBody(#[source] axum::Error),
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response<Body> {
        tracing::error!(error = %self, "relay failed");
        let status = match self {
            RelayError::UpstreamTimeout => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::BAD_GATEWAY,
        };
        (status, "upstream request failed").into_response()
    }
}

/// Forward an authorized inbound request upstream and relay the response.
///
/// The caller has already run the allowlist and credential checks; the
/// path is forwarded verbatim, query string byte-for-byte.
pub async fn relay(
    client: &UpstreamClient,
    config: &ProxyConfig,
    request: Request<Body>,
) -> Result<(Response<Body>, RelayMode), RelayError> {
    let (parts, body) = request.into_parts();

    let mut upstream_request = Request::builder()
        .method(parts.method)
        .uri(upstream_uri(&config.upstream_base_url, &parts.uri)?)
        .body(body)?;
    *upstream_request.headers_mut() =
        headers::build_upstream_headers(&parts.headers, &config.upstream_authorization);

    let response = match tokio::time::timeout(UPSTREAM_SEND_TIMEOUT, client.request(upstream_request)).await {
        Ok(result) => result?,
        Err(_) => return Err(RelayError::UpstreamTimeout),
    };

    // Headers are in hand, no body byte has been read: decide the relay
    // strategy here and nowhere else.
    let streaming = is_event_stream(response.headers());
    let (mut parts, upstream_body) = response.into_parts();
    headers::filter_response_headers(&mut parts.headers, streaming);

    if streaming {
        // The caller owns the upstream body from here on; dropping it
        // (normal end, error, client disconnect) releases the connection.
        let response = Response::from_parts(parts, Body::new(upstream_body));
        return Ok((response, RelayMode::Streaming));
    }

    // Buffered relay: consume the body fully, returning the connection to
    // the pool, then respond as one unit with a consistent content-length.
    let bytes = axum::body::to_bytes(Body::new(upstream_body), usize::MAX)
        .await
        .map_err(RelayError::ReadBody)?;
    let response = Response::from_parts(parts, Body::from(bytes));
    Ok((response, RelayMode::Buffered))
}

/// Target URL: normalized base + inbound path-and-query verbatim, so query
/// parameter order and duplicates survive untouched.
fn upstream_uri(base_url: &str, inbound: &Uri) -> Result<Uri, RelayError> {
    let path_and_query = inbound
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| inbound.path());
    Ok(format!("{base_url}{path_and_query}").parse()?)
}

/// Content-type sniff: `text/event-stream` (with any parameters) selects
/// the streaming relay.
fn is_event_stream(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|ct| {
            ct.trim_start()
                .to_ascii_lowercase()
                .starts_with("text/event-stream")
        })
        .unwrap_or(false)
}
