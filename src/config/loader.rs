//! Configuration loading from the process environment.

use std::env;

use crate::config::schema::ProxyConfig;

/// Upstream credential, used for the outbound `Authorization` header.
pub const UPSTREAM_KEY_VAR: &str = "OPENAI_API_KEY";
/// Proxy credential, expected in the inbound `x-api-key` header.
pub const PROXY_KEY_VAR: &str = "PROXY_X_API_KEY";
/// Upstream base URL override.
pub const BASE_URL_VAR: &str = "OPENAI_BASE_URL";
/// Listener bind address override.
pub const BIND_VAR: &str = "KEYGATE_BIND";
/// Prometheus scrape address; metrics stay off when unset.
pub const METRICS_VAR: &str = "KEYGATE_METRICS_ADDR";

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

/// Error type for configuration loading. Always fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),

    #[error("{0} contains bytes that are not valid in an HTTP header")]
    InvalidCredential(&'static str),

    #[error("{0} is not a valid socket address: {1}")]
    InvalidAddress(&'static str, std::net::AddrParseError),
}

/// Load and validate configuration from the environment.
///
/// Must run before the listener is bound: a missing credential prevents
/// the process from serving any traffic.
pub fn from_env() -> Result<ProxyConfig, ConfigError> {
    let upstream_key = required_var(UPSTREAM_KEY_VAR)?;
    let proxy_key = required_var(PROXY_KEY_VAR)?;
    let base_url = env::var(BASE_URL_VAR).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

    let mut config = ProxyConfig::new(&upstream_key, &proxy_key, &base_url)?;

    if let Ok(bind) = env::var(BIND_VAR) {
        config.bind_address = bind;
    }
    if let Ok(addr) = env::var(METRICS_VAR) {
        config.metrics_address =
            Some(addr.parse().map_err(|e| ConfigError::InvalidAddress(METRICS_VAR, e))?);
    }

    Ok(config)
}

/// An env var that is unset or empty counts as missing.
fn required_var(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .ok()
        .filter(|value| !value.is_empty())
        .ok_or(ConfigError::MissingVar(name))
}

/// Strip a trailing `/`, then a trailing `/v1` suffix.
///
/// Callers configure the base URL with or without the `/v1` prefix; the
/// relay always appends the inbound `/v1/{path}` itself, so the suffix
/// must not be present twice.
pub fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim_end_matches('/');
    trimmed.strip_suffix("/v1").unwrap_or(trimmed).to_string()
}
