//! Request/response types for the auth endpoints.
//!
//! Field names follow the provider's wire convention (camelCase, `photoURL`).
//! Missing sub-fields in provider projections are serialized as explicit
//! nulls, so the response shape is stable.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::provider::{Account, ProviderEntry};

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ProviderData {
    #[serde(rename = "providerId")]
    pub provider_id: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
    #[serde(rename = "photoURL")]
    pub photo_url: Option<String>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct MeResponse {
    pub uid: String,
    pub email: Option<String>,
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
    #[serde(rename = "photoURL")]
    pub photo_url: Option<String>,
    #[serde(rename = "emailVerified")]
    pub email_verified: bool,
    #[serde(rename = "providerData")]
    pub provider_data: Vec<ProviderData>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug, Default)]
pub struct ProfileUpdateRequest {
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
    #[serde(rename = "photoURL")]
    pub photo_url: Option<String>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ProfileResponse {
    pub uid: String,
    pub email: Option<String>,
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
    #[serde(rename = "photoURL")]
    pub photo_url: Option<String>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct PasswordUpdateRequest {
    #[serde(rename = "currentPassword")]
    pub current_password: String,
    #[serde(rename = "newPassword")]
    pub new_password: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct DetailsUpdateRequest {
    pub email: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct RefreshRequest {
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
}

/// `refreshToken` is omitted when the exchange did not rotate the credential.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct RefreshResponse {
    pub token: String,
    #[serde(rename = "refreshToken", skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl From<ProviderEntry> for ProviderData {
    fn from(entry: ProviderEntry) -> Self {
        Self {
            provider_id: entry.provider_id,
            email: entry.email,
            display_name: entry.display_name,
            photo_url: entry.photo_url,
        }
    }
}

impl From<Account> for MeResponse {
    fn from(account: Account) -> Self {
        Self {
            uid: account.uid,
            email: account.email,
            display_name: account.display_name,
            photo_url: account.photo_url,
            email_verified: account.email_verified,
            // Entries keep the provider's order; missing sub-fields become
            // nulls rather than being dropped.
            provider_data: account.provider_data.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<Account> for ProfileResponse {
    fn from(account: Account) -> Self {
        Self {
            uid: account.uid,
            email: account.email,
            display_name: account.display_name,
            photo_url: account.photo_url,
        }
    }
}
