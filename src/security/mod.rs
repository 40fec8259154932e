//! Request authorization subsystem.
//!
//! Two pure, side-effect-free checks gate every inbound request, in a
//! fixed order: the path allowlist first, the client credential second.
//! Nothing reaches the upstream until both pass, so a disallowed endpoint
//! can never be used to probe credential validity and rejected requests
//! consume no upstream resources.

pub mod allowlist;
pub mod credentials;

pub use allowlist::is_allowed_path;
pub use credentials::{is_authorized, X_API_KEY};
