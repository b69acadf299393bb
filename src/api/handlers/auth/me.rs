//! Authenticated profile fetch.

use axum::{
    extract::{ConnectInfo, Extension},
    http::HeaderMap,
    Json,
};
use std::{net::SocketAddr, sync::Arc};
use tracing::{error, info};

use super::{client_key, guard::require_auth, state::ApiState, types::MeResponse};
use crate::api::error::{ApiError, ErrorBody};

#[utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "Profile for the authenticated account", body = MeResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorBody),
        (status = 429, description = "Rate limit exceeded", body = ErrorBody),
        (status = 500, description = "Provider failure", body = ErrorBody),
    ),
    tag = "auth"
)]
pub async fn me(
    headers: HeaderMap,
    peer: Option<ConnectInfo<SocketAddr>>,
    Extension(state): Extension<Arc<ApiState>>,
) -> Result<Json<MeResponse>, ApiError> {
    state.admit(&client_key(&headers, peer.map(|ConnectInfo(addr)| addr)))?;
    let claims = require_auth(&headers, &state).await?;

    match state.provider().get_account(&claims.uid).await {
        Ok(account) => {
            info!("User profile fetched: {}", account.uid);
            Ok(Json(account.into()))
        }
        Err(err) => {
            error!("Error fetching user: {err}");
            Err(ApiError::Upstream {
                error: "Error fetching user data",
                details: state.config().detail(&err),
            })
        }
    }
}
