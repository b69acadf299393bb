//! # Portiere (Authentication Gateway)
//!
//! `portiere` is an HTTP gateway for account lifecycle management:
//! registration, credential verification, profile and credential mutation,
//! session refresh and revocation. It owns no credential storage; every
//! account operation is delegated to an external identity provider through a
//! narrow adapter interface.
//!
//! ## Request pipeline
//!
//! Inbound requests to the auth route group pass through, in order:
//!
//! 1. **Rate governor**: per-client fixed window, 10 requests per
//!    60 seconds, keyed by forwarded headers or the peer address.
//! 2. **Bearer gate**: the `Authorization: Bearer <token>` header is
//!    resolved to a claims set via the provider. Failures are `401` with
//!    internal detail suppressed outside debug mode.
//! 3. **Verification gate**: sensitive mutations (profile, password, email)
//!    additionally require the claims to carry a verified email. Denial is
//!    `403`, distinct from authentication failure.
//!
//! ## Error payloads
//!
//! All error responses share the shape `{"error": "...", "details": "..."}`
//! where `details` is only populated when the server runs with
//! `--debug-errors`. Upstream provider failures are logged with full context
//! and downgraded to a generic `500` for the client.

pub mod api;
pub mod cli;
pub mod provider;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
