//! Account registration.

use axum::{
    extract::{ConnectInfo, Extension},
    http::HeaderMap,
    http::StatusCode,
    Json,
};
use std::{net::SocketAddr, sync::Arc};
use tracing::{error, info, instrument, warn};

use super::{
    client_key,
    state::ApiState,
    types::{MessageResponse, RegisterRequest},
    valid_email,
};
use crate::api::error::{ApiError, ErrorBody};
use crate::provider::ProviderError;

const MISSING_FIELDS: &str = "Name, email, and password are required.";

#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created, verification email triggered", body = MessageResponse),
        (status = 400, description = "Missing fields or email already registered", body = ErrorBody),
        (status = 429, description = "Rate limit exceeded", body = ErrorBody),
    ),
    tag = "auth"
)]
#[instrument(skip(state, payload))]
pub async fn register(
    headers: HeaderMap,
    peer: Option<ConnectInfo<SocketAddr>>,
    Extension(state): Extension<Arc<ApiState>>,
    payload: Option<Json<RegisterRequest>>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    state.admit(&client_key(&headers, peer.map(|ConnectInfo(addr)| addr)))?;

    let Some(Json(payload)) = payload else {
        return Err(ApiError::Validation(MISSING_FIELDS.to_string()));
    };

    let name = payload.name.trim();
    let email = payload.email.trim();
    if name.is_empty() || email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::Validation(MISSING_FIELDS.to_string()));
    }
    if !valid_email(email) {
        return Err(ApiError::Validation("Invalid email address.".to_string()));
    }

    let account = match state
        .provider()
        .create_account(name, email, &payload.password)
        .await
    {
        Ok(account) => account,
        Err(ProviderError::DuplicateAccount) => return Err(ApiError::DuplicateAccount),
        Err(err) => {
            error!("Registration failed: {err}");
            return Err(ApiError::Validation("Registration failed.".to_string()));
        }
    };

    // Best effort: the account exists either way, so a failed send is only
    // logged and never fails the registration.
    if let Err(err) = state.provider().send_verification_email(email).await {
        warn!("User created but failed to send verification email: {err} (email: {email})");
    }

    info!("User registered: {} ({email})", account.uid);

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "User registered. Please verify your email.".to_string(),
        }),
    ))
}
