//! Refresh-token exchange.

use axum::{
    extract::{ConnectInfo, Extension},
    http::HeaderMap,
    Json,
};
use std::{net::SocketAddr, sync::Arc};
use tracing::{error, info, instrument, warn};

use super::{
    client_key,
    state::ApiState,
    types::{RefreshRequest, RefreshResponse},
};
use crate::api::error::{ApiError, ErrorBody};
use crate::provider::ProviderError;

#[utoipa::path(
    post,
    path = "/auth/refresh-token",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "New assertion and refresh credential", body = RefreshResponse),
        (status = 400, description = "Missing refresh token", body = ErrorBody),
        (status = 401, description = "Refresh token not recognized", body = ErrorBody),
        (status = 429, description = "Rate limit exceeded", body = ErrorBody),
        (status = 500, description = "Missing API key or exchange failure", body = ErrorBody),
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn refresh_token(
    headers: HeaderMap,
    peer: Option<ConnectInfo<SocketAddr>>,
    Extension(state): Extension<Arc<ApiState>>,
    payload: Option<Json<RefreshRequest>>,
) -> Result<Json<RefreshResponse>, ApiError> {
    state.admit(&client_key(&headers, peer.map(|ConnectInfo(addr)| addr)))?;

    let refresh = payload
        .map(|Json(payload)| payload.refresh_token)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| ApiError::Validation("refreshToken is required.".to_string()))?;

    // The key never reaches the client, not even as an error detail.
    if !state.config().api_key_configured() {
        error!("Refresh token exchange attempted without a configured API key");
        return Err(ApiError::Configuration);
    }

    match state.provider().exchange_refresh(&refresh).await {
        Ok(session) => {
            info!("Refresh token used successfully");
            Ok(Json(RefreshResponse {
                token: session.token,
                refresh_token: session.refresh_token,
            }))
        }
        // No issued token means the credential is invalid, not that the
        // upstream failed.
        Err(ProviderError::InvalidRefreshCredential) => {
            warn!("Invalid refresh token used");
            Err(ApiError::InvalidRefreshCredential)
        }
        Err(err) => {
            error!("Error refreshing token: {err}");
            Err(ApiError::Upstream {
                error: "Failed to refresh token",
                details: state.config().detail(&err),
            })
        }
    }
}
