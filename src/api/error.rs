//! Uniform error taxonomy for the gateway surface.
//!
//! Every failure a handler can produce maps to one variant here, and every
//! variant renders the same payload shape: `{"error": ..., "details": ...}`.
//! `details` carries internal context only when the server runs in debug-error
//! mode; the decision is made where the configuration is in scope, so the
//! renderer stays stateless.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use utoipa::ToSchema;

/// Wire shape shared by all error responses.
#[derive(Serialize, Debug, ToSchema)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug)]
pub enum ApiError {
    /// Missing or malformed input. The message is user facing.
    Validation(String),
    /// Missing, malformed, or provider-rejected bearer assertion.
    Unauthenticated {
        error: &'static str,
        details: Option<String>,
    },
    /// Authenticated, but the account email is not verified.
    EmailNotVerified,
    /// The rate governor denied the request.
    RateLimitExceeded,
    /// The email is already registered.
    DuplicateAccount,
    /// The token exchange endpoint did not recognize the refresh credential.
    InvalidRefreshCredential,
    /// Server-side misconfiguration. Detail is never sent to the client.
    Configuration,
    /// Unexpected provider failure, downgraded to a generic message.
    Upstream {
        error: &'static str,
        details: Option<String>,
    },
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::DuplicateAccount => StatusCode::BAD_REQUEST,
            Self::Unauthenticated { .. } | Self::InvalidRefreshCredential => {
                StatusCode::UNAUTHORIZED
            }
            Self::EmailNotVerified => StatusCode::FORBIDDEN,
            Self::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            Self::Configuration | Self::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(self) -> ErrorBody {
        match self {
            Self::Validation(error) => ErrorBody {
                error,
                details: None,
            },
            Self::Unauthenticated { error, details } => ErrorBody {
                error: error.to_string(),
                details,
            },
            Self::EmailNotVerified => ErrorBody {
                error: "Email not verified. Please verify your email to perform this action."
                    .to_string(),
                details: None,
            },
            Self::RateLimitExceeded => ErrorBody {
                error: "Too many requests, please try again later.".to_string(),
                details: None,
            },
            Self::DuplicateAccount => ErrorBody {
                error: "Email already registered.".to_string(),
                details: None,
            },
            Self::InvalidRefreshCredential => ErrorBody {
                error: "Invalid refresh token".to_string(),
                details: None,
            },
            Self::Configuration => ErrorBody {
                error: "Server misconfiguration.".to_string(),
                details: None,
            },
            Self::Upstream { error, details } => ErrorBody {
                error: error.to_string(),
                details,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(self.body())).into_response()
    }
}
