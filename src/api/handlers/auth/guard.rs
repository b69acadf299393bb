//! Request gates: bearer authentication and email-verification authorization.
//!
//! Gates are explicit calls at the top of each handler rather than implicit
//! middleware fallthrough, so the ordering (governor, bearer gate,
//! verification gate) is visible at every call site. Neither gate mutates
//! state or retries; assertion verification failures are deterministic.

use axum::http::{header::AUTHORIZATION, HeaderMap};
use tracing::warn;

use super::state::ApiState;
use crate::api::error::ApiError;
use crate::provider::{Claims, ProviderError};

const NO_TOKEN: &str = "Unauthorized - No token provided";
const BAD_TOKEN: &str = "Unauthorized - Invalid or expired token";

/// Extract the bearer token, requiring the literal `Bearer <token>` shape.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?;
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// Authenticate the request, binding provider claims to it.
///
/// A provider-rejected assertion is `401`, never a `500`; the rejection
/// reason only reaches the client in debug-error mode.
pub(crate) async fn require_auth(
    headers: &HeaderMap,
    state: &ApiState,
) -> Result<Claims, ApiError> {
    let Some(token) = bearer_token(headers) else {
        return Err(ApiError::Unauthenticated {
            error: NO_TOKEN,
            details: None,
        });
    };

    match state.provider().verify_assertion(token).await {
        Ok(claims) => Ok(claims),
        Err(ProviderError::InvalidAssertion(reason)) => Err(ApiError::Unauthenticated {
            error: BAD_TOKEN,
            details: state.config().detail(&reason),
        }),
        Err(err) => Err(ApiError::Unauthenticated {
            error: BAD_TOKEN,
            details: state.config().detail(&err),
        }),
    }
}

/// Authorize a sensitive mutation: the bound claims must carry a verified
/// email. Runs only after [`require_auth`].
pub(crate) fn require_verified(claims: &Claims) -> Result<(), ApiError> {
    if claims.email_verified {
        Ok(())
    } else {
        warn!("Blocked action for unverified email: {}", claims.uid);
        Err(ApiError::EmailNotVerified)
    }
}
