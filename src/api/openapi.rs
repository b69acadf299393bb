//! `OpenAPI` document for the gateway surface.

use utoipa::OpenApi;

use crate::api::error::ErrorBody;
use crate::api::handlers::auth::types::{
    DetailsUpdateRequest, MeResponse, MessageResponse, PasswordUpdateRequest, ProfileResponse,
    ProfileUpdateRequest, ProviderData, RefreshRequest, RefreshResponse, RegisterRequest,
};

// Info (title, version, description) defaults to the Cargo package metadata.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::handlers::health::health,
        crate::api::handlers::auth::register::register,
        crate::api::handlers::auth::me::me,
        crate::api::handlers::auth::profile::update_profile,
        crate::api::handlers::auth::password::update_password,
        crate::api::handlers::auth::details::update_details,
        crate::api::handlers::auth::logout::logout,
        crate::api::handlers::auth::refresh::refresh_token,
    ),
    components(schemas(
        ErrorBody,
        RegisterRequest,
        MessageResponse,
        MeResponse,
        ProviderData,
        ProfileUpdateRequest,
        ProfileResponse,
        PasswordUpdateRequest,
        DetailsUpdateRequest,
        RefreshRequest,
        RefreshResponse,
    )),
    tags(
        (name = "auth", description = "Account lifecycle and session endpoints"),
        (name = "health", description = "Service liveness"),
    )
)]
pub struct ApiDoc;
