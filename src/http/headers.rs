//! Header filtering for both directions of the relay.
//!
//! # Responsibilities
//! - Strip hop-by-hop headers, which are scoped to one connection and
//!   invalid to forward across the proxy boundary
//! - Keep the client credential (`x-api-key`) from ever reaching upstream
//! - Keep the client's own `authorization` from shadowing the upstream key
//! - Drop connection-framing headers the transport regenerates itself

use axum::http::{header, HeaderMap, HeaderValue};

/// Inbound request headers never forwarded upstream: hop-by-hop headers,
/// proxy-internal credentials, and framing headers owned by the new
/// connection. `HeaderName` is always lowercase, so a plain `contains`
/// gives case-insensitive matching.
const REQUEST_EXCLUDED: &[&str] = &[
    "authorization",
    "connection",
    "content-length",
    "host",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailers",
    "transfer-encoding",
    "upgrade",
    "x-api-key",
];

/// Upstream response headers never relayed back to the caller.
const RESPONSE_HOP_BY_HOP: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailers",
    "transfer-encoding",
    "upgrade",
];

/// Build the outbound header map: inbound headers minus the excluded set,
/// duplicates preserved, plus the upstream `Authorization` credential.
pub fn build_upstream_headers(inbound: &HeaderMap, authorization: &HeaderValue) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(inbound.len() + 1);

    for (name, value) in inbound.iter() {
        if REQUEST_EXCLUDED.contains(&name.as_str()) {
            continue;
        }
        headers.append(name.clone(), value.clone());
    }

    // Unconditional: overrides anything the client sent.
    headers.insert(header::AUTHORIZATION, authorization.clone());

    headers
}

/// Strip hop-by-hop headers from an upstream response, and in streaming
/// mode also `content-length` — the relayed body length is unknown ahead
/// of time and a stale declared length would corrupt the framing.
pub fn filter_response_headers(headers: &mut HeaderMap, streaming: bool) {
    for name in RESPONSE_HOP_BY_HOP {
        headers.remove(*name);
    }
    if streaming {
        headers.remove(header::CONTENT_LENGTH);
    }
}
