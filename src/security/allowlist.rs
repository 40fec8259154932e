//! Upstream endpoint allowlist.
//!
//! This is an allowlist, not a denylist: any path not explicitly listed is
//! rejected, so new upstream endpoints are never exposed by accident.

/// Endpoints matched exactly after stripping leading slashes.
const EXACT: &[&str] = &["chat/completions", "completions", "embeddings"];

/// Endpoint families matched as `prefix` or `prefix/...`.
const PREFIXES: &[&str] = &["responses", "images", "audio"];

/// Decide whether `path` (the suffix after the `/v1` routing prefix) may
/// be forwarded upstream.
pub fn is_allowed_path(path: &str) -> bool {
    let normalized = path.trim_start_matches('/');

    if EXACT.contains(&normalized) {
        return true;
    }

    PREFIXES.iter().any(|prefix| {
        normalized == *prefix
            || normalized
                .strip_prefix(prefix)
                .and_then(|rest| rest.strip_prefix('/'))
                .is_some()
    })
}
