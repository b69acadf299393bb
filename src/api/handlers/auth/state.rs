//! Gateway state and configuration shared by all auth handlers.

use std::fmt;
use std::sync::Arc;

use super::rate_limit::{RateLimitDecision, RateLimiter};
use crate::api::error::ApiError;
use crate::provider::IdentityProvider;

#[derive(Clone, Debug)]
pub struct AuthConfig {
    debug_errors: bool,
    api_key_configured: bool,
}

impl AuthConfig {
    #[must_use]
    pub fn new() -> Self {
        Self {
            debug_errors: false,
            api_key_configured: false,
        }
    }

    #[must_use]
    pub fn with_debug_errors(mut self, debug_errors: bool) -> Self {
        self.debug_errors = debug_errors;
        self
    }

    #[must_use]
    pub fn with_api_key_configured(mut self, configured: bool) -> Self {
        self.api_key_configured = configured;
        self
    }

    #[must_use]
    pub fn debug_errors(&self) -> bool {
        self.debug_errors
    }

    #[must_use]
    pub fn api_key_configured(&self) -> bool {
        self.api_key_configured
    }

    /// Internal error detail for the client, populated only in debug mode.
    pub fn detail(&self, err: &impl fmt::Display) -> Option<String> {
        if self.debug_errors {
            Some(err.to_string())
        } else {
            None
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::new()
    }
}

pub struct ApiState {
    config: AuthConfig,
    provider: Arc<dyn IdentityProvider>,
    rate_limiter: Arc<dyn RateLimiter>,
}

impl ApiState {
    pub fn new(
        config: AuthConfig,
        provider: Arc<dyn IdentityProvider>,
        rate_limiter: Arc<dyn RateLimiter>,
    ) -> Self {
        Self {
            config,
            provider,
            rate_limiter,
        }
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    #[must_use]
    pub fn provider(&self) -> &dyn IdentityProvider {
        self.provider.as_ref()
    }

    /// Run the rate governor for a client key. Called first in every auth
    /// handler, before any provider work.
    pub fn admit(&self, key: &str) -> Result<(), ApiError> {
        match self.rate_limiter.admit(key) {
            RateLimitDecision::Allowed => Ok(()),
            RateLimitDecision::Limited => Err(ApiError::RateLimitExceeded),
        }
    }
}
