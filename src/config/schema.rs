//! Configuration schema definitions.

use std::fmt;
use std::net::SocketAddr;

use axum::http::HeaderValue;

use crate::config::loader::ConfigError;

/// A secret value (API key) that must never appear in logs or errors.
///
/// `Debug` and `Display` print a redaction marker instead of the value;
/// code that genuinely needs the bytes calls [`Secret::expose`].
#[derive(Clone)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Access the underlying secret value.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(<redacted>)")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

/// Root configuration for the proxy. Immutable once loaded.
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    /// Listener bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Normalized upstream base URL: no trailing `/`, no trailing `/v1`.
    pub upstream_base_url: String,

    /// Prebuilt outbound `Authorization` value (`Bearer {upstream key}`),
    /// marked sensitive so it never renders in header debug output.
    pub upstream_authorization: HeaderValue,

    /// Credential expected in the inbound `x-api-key` header.
    pub proxy_api_key: Secret,

    /// Prometheus scrape address; metrics are disabled when unset.
    pub metrics_address: Option<SocketAddr>,
}

impl ProxyConfig {
    /// Build a config from already-resolved values.
    ///
    /// The upstream credential is baked into a `HeaderValue` here so the
    /// relay path has no fallible header construction left to do. A key
    /// containing bytes that are invalid in a header is a startup error.
    pub fn new(
        upstream_api_key: &str,
        proxy_api_key: &str,
        upstream_base_url: &str,
    ) -> Result<Self, ConfigError> {
        let mut authorization = HeaderValue::from_str(&format!("Bearer {upstream_api_key}"))
            .map_err(|_| ConfigError::InvalidCredential("OPENAI_API_KEY"))?;
        authorization.set_sensitive(true);

        Ok(Self {
            bind_address: crate::config::loader::DEFAULT_BIND_ADDRESS.to_string(),
            upstream_base_url: crate::config::loader::normalize_base_url(upstream_base_url),
            upstream_authorization: authorization,
            proxy_api_key: Secret::new(proxy_api_key),
            metrics_address: None,
        })
    }
}
