//! Account detail (email) updates.

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
    types::{DetailsUpdateRequest, MessageResponse},
    valid_email,
};
use crate::api::error::{ApiError, ErrorBody};
use crate::provider::AccountUpdate;

#[utoipa::path(
    put,
    path = "/auth/updatedetails",
    request_body = DetailsUpdateRequest,
    responses(
        (status = 200, description = "Details updated", body = MessageResponse),
        (status = 400, description = "Missing or invalid email", body = ErrorBody),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorBody),
        (status = 403, description = "Email not verified", body = ErrorBody),
        (status = 429, description = "Rate limit exceeded", body = ErrorBody),
        (status = 500, description = "Provider failure", body = ErrorBody),
    ),
    tag = "auth"
)]
pub async fn update_details(
    headers: HeaderMap,
    peer: Option<ConnectInfo<SocketAddr>>,
    Extension(state): Extension<Arc<ApiState>>,
    payload: Option<Json<DetailsUpdateRequest>>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.admit(&client_key(&headers, peer.map(|ConnectInfo(addr)| addr)))?;
    let claims = require_auth(&headers, &state).await?;
    require_verified(&claims)?;

    let email = payload
        .map(|Json(payload)| payload.email.trim().to_string())
        .filter(|email| !email.is_empty())
        .ok_or_else(|| ApiError::Validation("Email must be provided.".to_string()))?;
    if !valid_email(&email) {
        return Err(ApiError::Validation("Invalid email address.".to_string()));
    }

    let update = AccountUpdate {
        email: Some(email),
        ..AccountUpdate::default()
    };

    match state.provider().update_account(&claims.uid, update).await {
        Ok(_) => {
            info!("Email updated for user: {}", claims.uid);
            Ok(Json(MessageResponse {
                message: "User details updated successfully.".to_string(),
            }))
        }
        Err(err) => {
            error!("Error updating user details: {err}");
            Err(ApiError::Upstream {
                error: "Error updating user details",
                details: state.config().detail(&err),
            })
        }
    }
}
