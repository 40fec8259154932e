//! Client credential verification.

use axum::http::HeaderName;
use subtle::ConstantTimeEq;

use crate::config::Secret;

/// Inbound header carrying the proxy-facing credential.
pub static X_API_KEY: HeaderName = HeaderName::from_static("x-api-key");

/// Check the client-supplied credential against the configured proxy key.
///
/// Absent or empty credentials fail. The comparison itself is constant
/// time over the value bytes; only the length can leak through the
/// short-circuit inside `ct_eq`.
pub fn is_authorized(presented: Option<&str>, expected: &Secret) -> bool {
    let presented = match presented {
        Some(value) if !value.is_empty() => value.as_bytes(),
        _ => return false,
    };

    bool::from(presented.ct_eq(expected.expose().as_bytes()))
}
