//! Identity provider adapter.
//!
//! The gateway never stores accounts or credentials; everything is delegated
//! to an external identity provider behind the [`IdentityProvider`] trait.
//! Handlers only ever see the typed operations below, so the whole core can
//! be exercised against an in-memory fake.

use std::{fmt, future::Future, pin::Pin};

pub mod http;

pub use http::HttpProvider;

/// Boxed future returned by adapter operations, so the trait stays object safe.
pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ProviderError>> + Send + 'a>>;

/// Account record owned by the provider. Held only for the lifetime of one
/// request, never persisted by the gateway.
#[derive(Clone, Debug, Default)]
pub struct Account {
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    pub email_verified: bool,
    pub provider_data: Vec<ProviderEntry>,
}

/// One upstream provider entry linked to an account. All sub-fields may be
/// missing and are projected as nulls on the wire.
#[derive(Clone, Debug, Default)]
pub struct ProviderEntry {
    pub provider_id: Option<String>,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
}

/// Claims decoded from a bearer assertion. Single-request lifetime.
#[derive(Clone, Debug)]
pub struct Claims {
    pub uid: String,
    pub email_verified: bool,
}

/// Partial account update. `None` fields are left untouched by the provider.
#[derive(Clone, Debug, Default)]
pub struct AccountUpdate {
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Result of exchanging a refresh credential for a fresh bearer assertion.
/// The exchange endpoint may issue a token without rotating the refresh
/// credential, in which case `refresh_token` is `None`.
#[derive(Clone, Debug)]
pub struct RefreshedSession {
    pub token: String,
    pub refresh_token: Option<String>,
}

/// Failure modes surfaced by adapter operations.
#[derive(Debug)]
pub enum ProviderError {
    /// The email is already registered.
    DuplicateAccount,
    /// The bearer assertion is malformed, expired, or carries a bad signature.
    InvalidAssertion(String),
    /// The token exchange endpoint did not issue a token for the credential.
    InvalidRefreshCredential,
    /// Any other remote failure: transport errors, unexpected statuses.
    Upstream(anyhow::Error),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateAccount => write!(f, "email already registered"),
            Self::InvalidAssertion(reason) => write!(f, "invalid assertion: {reason}"),
            Self::InvalidRefreshCredential => write!(f, "invalid refresh credential"),
            Self::Upstream(err) => write!(f, "upstream provider error: {err:#}"),
        }
    }
}

impl std::error::Error for ProviderError {}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        Self::Upstream(err.into())
    }
}

/// Operations the gateway requires from the identity provider.
///
/// Each call is an atomic remote operation with its own failure mode; no
/// operation is retried by the gateway.
pub trait IdentityProvider: Send + Sync {
    /// Create an account with `email_verified = false`.
    fn create_account<'a>(
        &'a self,
        display_name: &'a str,
        email: &'a str,
        password: &'a str,
    ) -> ProviderFuture<'a, Account>;

    /// Trigger a verification email. Best effort at the call site: a failure
    /// here must not fail the enclosing registration.
    fn send_verification_email<'a>(&'a self, email: &'a str) -> ProviderFuture<'a, ()>;

    /// Decode and verify a bearer assertion into claims.
    fn verify_assertion<'a>(&'a self, token: &'a str) -> ProviderFuture<'a, Claims>;

    fn get_account<'a>(&'a self, uid: &'a str) -> ProviderFuture<'a, Account>;

    fn update_account<'a>(
        &'a self,
        uid: &'a str,
        update: AccountUpdate,
    ) -> ProviderFuture<'a, Account>;

    /// Revoke all sessions for the account. Idempotent.
    fn revoke_sessions<'a>(&'a self, uid: &'a str) -> ProviderFuture<'a, ()>;

    /// Exchange a refresh credential for a new assertion and credential.
    fn exchange_refresh<'a>(&'a self, refresh_token: &'a str)
        -> ProviderFuture<'a, RefreshedSession>;
}

impl AccountUpdate {
    /// True when no field is set, in which case the provider call is skipped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.display_name.is_none()
            && self.photo_url.is_none()
            && self.email.is_none()
            && self.password.is_none()
    }
}
