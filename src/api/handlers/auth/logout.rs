//! Session revocation.

use axum::{
    extract::{ConnectInfo, Extension},
    http::HeaderMap,
    Json,
};
use std::{net::SocketAddr, sync::Arc};
use tracing::{error, info};

use super::{client_key, guard::require_auth, state::ApiState, types::MessageResponse};
use crate::api::error::{ApiError, ErrorBody};

#[utoipa::path(
    get,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Sessions revoked", body = MessageResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorBody),
        (status = 429, description = "Rate limit exceeded", body = ErrorBody),
        (status = 500, description = "Provider failure", body = ErrorBody),
    ),
    tag = "auth"
)]
pub async fn logout(
    headers: HeaderMap,
    peer: Option<ConnectInfo<SocketAddr>>,
    Extension(state): Extension<Arc<ApiState>>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.admit(&client_key(&headers, peer.map(|ConnectInfo(addr)| addr)))?;
    let claims = require_auth(&headers, &state).await?;

    // Revocation is idempotent upstream; repeated logouts succeed.
    match state.provider().revoke_sessions(&claims.uid).await {
        Ok(()) => {
            info!("Tokens revoked for user: {}", claims.uid);
            Ok(Json(MessageResponse {
                message: "Logged out successfully.".to_string(),
            }))
        }
        Err(err) => {
            error!("Error during logout: {err}");
            Err(ApiError::Upstream {
                error: "Logout failed",
                details: state.config().detail(&err),
            })
        }
    }
}
