//! Display-profile updates, restricted to `displayName` and `photoURL`.

use axum::{
    extract::{ConnectInfo, Extension},
    http::HeaderMap,
    Json,
};
use std::{net::SocketAddr, sync::Arc};
use tracing::{error, info};

use super::{
    client_key,
    guard::{require_auth, require_verified},
    state::ApiState,
    types::{ProfileResponse, ProfileUpdateRequest},
};
use crate::api::error::{ApiError, ErrorBody};
use crate::provider::AccountUpdate;

#[utoipa::path(
    put,
    path = "/auth/profile",
    request_body = ProfileUpdateRequest,
    responses(
        (status = 200, description = "Updated profile", body = ProfileResponse),
        (status = 400, description = "No fields to update", body = ErrorBody),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorBody),
        (status = 403, description = "Email not verified", body = ErrorBody),
        (status = 429, description = "Rate limit exceeded", body = ErrorBody),
        (status = 500, description = "Provider failure", body = ErrorBody),
    ),
    tag = "auth"
)]
pub async fn update_profile(
    headers: HeaderMap,
    peer: Option<ConnectInfo<SocketAddr>>,
    Extension(state): Extension<Arc<ApiState>>,
    payload: Option<Json<ProfileUpdateRequest>>,
) -> Result<Json<ProfileResponse>, ApiError> {
    state.admit(&client_key(&headers, peer.map(|ConnectInfo(addr)| addr)))?;
    let claims = require_auth(&headers, &state).await?;
    require_verified(&claims)?;

    let payload = payload.map(|Json(payload)| payload).unwrap_or_default();
    // Only these two fields are updatable here; email and password have
    // their own gated endpoints.
    let update = AccountUpdate {
        display_name: payload.display_name,
        photo_url: payload.photo_url,
        ..AccountUpdate::default()
    };
    if update.is_empty() {
        return Err(ApiError::Validation("No fields to update".to_string()));
    }

    match state.provider().update_account(&claims.uid, update).await {
        Ok(account) => {
            info!("User profile updated: {}", account.uid);
            Ok(Json(account.into()))
        }
        Err(err) => {
            error!("Error updating profile: {err}");
            Err(ApiError::Upstream {
                error: "Error updating profile",
                details: state.config().detail(&err),
            })
        }
    }
}
