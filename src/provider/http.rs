//! HTTP implementation of the identity provider adapter.
//!
//! Talks to the provider's account API and to the token exchange endpoint
//! over REST. Wire shapes mirror the provider contract: account payloads are
//! camelCase JSON, the token exchange is a form POST returning
//! `{id_token, refresh_token}`.

use anyhow::{anyhow, Context, Result};
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{
    Account, AccountUpdate, Claims, IdentityProvider, ProviderEntry, ProviderError,
    ProviderFuture, RefreshedSession,
};
use crate::APP_USER_AGENT;

pub struct HttpProvider {
    client: Client,
    account_url: String,
    token_url: String,
    api_key: Option<SecretString>,
}

#[derive(Deserialize, Debug)]
struct AccountPayload {
    uid: String,
    email: Option<String>,
    #[serde(rename = "displayName")]
    display_name: Option<String>,
    #[serde(rename = "photoURL")]
    photo_url: Option<String>,
    #[serde(rename = "emailVerified", default)]
    email_verified: bool,
    #[serde(rename = "providerData", default)]
    provider_data: Vec<ProviderEntryPayload>,
}

#[derive(Deserialize, Debug)]
struct ProviderEntryPayload {
    #[serde(rename = "providerId")]
    provider_id: Option<String>,
    email: Option<String>,
    #[serde(rename = "displayName")]
    display_name: Option<String>,
    #[serde(rename = "photoURL")]
    photo_url: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ClaimsPayload {
    uid: String,
    #[serde(rename = "emailVerified", default)]
    email_verified: bool,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct UpdatePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    display_name: Option<String>,
    #[serde(rename = "photoURL", skip_serializing_if = "Option::is_none")]
    photo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    password: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ExchangePayload {
    id_token: Option<String>,
    refresh_token: Option<String>,
}

impl HttpProvider {
    /// Build the adapter over a shared `reqwest` client.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(
        provider_url: &str,
        token_url: &str,
        api_key: Option<SecretString>,
    ) -> Result<Self> {
        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .build()
            .context("Error creating reqwest client")?;

        Ok(Self {
            client,
            account_url: provider_url.trim_end_matches('/').to_string(),
            token_url: token_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    async fn read_account(response: reqwest::Response) -> Result<Account, ProviderError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Upstream(anyhow!(
                "provider returned {status}: {body}"
            )));
        }
        let payload: AccountPayload = response.json().await?;
        Ok(payload.into())
    }
}

impl From<AccountPayload> for Account {
    fn from(payload: AccountPayload) -> Self {
        Self {
            uid: payload.uid,
            email: payload.email,
            display_name: payload.display_name,
            photo_url: payload.photo_url,
            email_verified: payload.email_verified,
            provider_data: payload
                .provider_data
                .into_iter()
                .map(|entry| ProviderEntry {
                    provider_id: entry.provider_id,
                    email: entry.email,
                    display_name: entry.display_name,
                    photo_url: entry.photo_url,
                })
                .collect(),
        }
    }
}

/// Map an exchange response body to a refreshed session.
///
/// A missing `id_token` means the endpoint did not issue a token for the
/// credential, which is an invalid-credential failure, not an upstream error.
/// A missing `refresh_token` alone is fine; the endpoint is not required to
/// rotate the credential.
fn parse_exchange(payload: ExchangePayload) -> Result<RefreshedSession, ProviderError> {
    match payload.id_token {
        Some(token) => Ok(RefreshedSession {
            token,
            refresh_token: payload.refresh_token,
        }),
        None => Err(ProviderError::InvalidRefreshCredential),
    }
}

/// Decode an exchange response body. A body that is not JSON at all is an
/// upstream fault; only a decoded body lacking `id_token` indicts the
/// credential.
fn decode_exchange(body: &[u8]) -> Result<RefreshedSession, ProviderError> {
    let payload: ExchangePayload =
        serde_json::from_slice(body).map_err(|err| ProviderError::Upstream(err.into()))?;
    parse_exchange(payload)
}

impl IdentityProvider for HttpProvider {
    fn create_account<'a>(
        &'a self,
        display_name: &'a str,
        email: &'a str,
        password: &'a str,
    ) -> ProviderFuture<'a, Account> {
        Box::pin(async move {
            let response = self
                .client
                .post(format!("{}/v1/accounts", self.account_url))
                .json(&json!({
                    "displayName": display_name,
                    "email": email,
                    "password": password,
                    "emailVerified": false,
                }))
                .send()
                .await?;

            if response.status() == StatusCode::CONFLICT {
                return Err(ProviderError::DuplicateAccount);
            }

            Self::read_account(response).await
        })
    }

    fn send_verification_email<'a>(&'a self, email: &'a str) -> ProviderFuture<'a, ()> {
        Box::pin(async move {
            let response = self
                .client
                .post(format!("{}/v1/verification-email", self.account_url))
                .json(&json!({ "email": email }))
                .send()
                .await?;

            let status = response.status();
            if status.is_success() {
                Ok(())
            } else {
                Err(ProviderError::Upstream(anyhow!(
                    "verification email request returned {status}"
                )))
            }
        })
    }

    fn verify_assertion<'a>(&'a self, token: &'a str) -> ProviderFuture<'a, Claims> {
        Box::pin(async move {
            let response = self
                .client
                .post(format!("{}/v1/accounts:verify", self.account_url))
                .json(&json!({ "token": token }))
                .send()
                .await?;

            let status = response.status();
            if status.is_client_error() {
                let body = response.text().await.unwrap_or_default();
                return Err(ProviderError::InvalidAssertion(body));
            }
            if !status.is_success() {
                return Err(ProviderError::Upstream(anyhow!(
                    "assertion verification returned {status}"
                )));
            }

            let payload: ClaimsPayload = response.json().await?;
            Ok(Claims {
                uid: payload.uid,
                email_verified: payload.email_verified,
            })
        })
    }

    fn get_account<'a>(&'a self, uid: &'a str) -> ProviderFuture<'a, Account> {
        Box::pin(async move {
            let response = self
                .client
                .get(format!("{}/v1/accounts/{uid}", self.account_url))
                .send()
                .await?;

            Self::read_account(response).await
        })
    }

    fn update_account<'a>(
        &'a self,
        uid: &'a str,
        update: AccountUpdate,
    ) -> ProviderFuture<'a, Account> {
        Box::pin(async move {
            let payload = UpdatePayload {
                display_name: update.display_name,
                photo_url: update.photo_url,
                email: update.email,
                password: update.password,
            };

            let response = self
                .client
                .patch(format!("{}/v1/accounts/{uid}", self.account_url))
                .json(&payload)
                .send()
                .await?;

            Self::read_account(response).await
        })
    }

    fn revoke_sessions<'a>(&'a self, uid: &'a str) -> ProviderFuture<'a, ()> {
        Box::pin(async move {
            let response = self
                .client
                .post(format!("{}/v1/accounts/{uid}:revoke", self.account_url))
                .send()
                .await?;

            let status = response.status();
            if status.is_success() {
                Ok(())
            } else {
                Err(ProviderError::Upstream(anyhow!(
                    "session revocation returned {status}"
                )))
            }
        })
    }

    fn exchange_refresh<'a>(
        &'a self,
        refresh_token: &'a str,
    ) -> ProviderFuture<'a, RefreshedSession> {
        Box::pin(async move {
            // The caller checks key presence first; this is a backstop.
            let api_key = self
                .api_key
                .as_ref()
                .ok_or_else(|| ProviderError::Upstream(anyhow!("no API key configured")))?;

            let response = self
                .client
                .post(format!("{}/v1/token", self.token_url))
                .query(&[("key", api_key.expose_secret())])
                .form(&[
                    ("grant_type", "refresh_token"),
                    ("refresh_token", refresh_token),
                ])
                .send()
                .await?;

            let status = response.status();
            if status.is_server_error() {
                return Err(ProviderError::Upstream(anyhow!(
                    "token exchange returned {status}"
                )));
            }

            // The exchange endpoint reports bad credentials in the body, not
            // just the status, so decode before deciding.
            let body = response.bytes().await?;
            decode_exchange(&body)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_exchange_requires_issued_token() {
        let payload = ExchangePayload {
            id_token: Some("assertion".to_string()),
            refresh_token: Some("refresh".to_string()),
        };
        let session = parse_exchange(payload).expect("session");
        assert_eq!(session.token, "assertion");
        assert_eq!(session.refresh_token.as_deref(), Some("refresh"));

        let payload = ExchangePayload {
            id_token: None,
            refresh_token: Some("refresh".to_string()),
        };
        assert!(matches!(
            parse_exchange(payload),
            Err(ProviderError::InvalidRefreshCredential)
        ));
    }

    #[test]
    fn parse_exchange_tolerates_missing_rotation() {
        let payload = ExchangePayload {
            id_token: Some("assertion".to_string()),
            refresh_token: None,
        };
        let session = parse_exchange(payload).expect("session");
        assert_eq!(session.token, "assertion");
        assert!(session.refresh_token.is_none());
    }

    #[test]
    fn non_json_exchange_body_is_upstream_error() {
        let result = decode_exchange(b"<html>bad gateway</html>");
        assert!(matches!(result, Err(ProviderError::Upstream(_))));
    }

    #[test]
    fn decoded_error_body_is_invalid_credential() {
        let result = decode_exchange(br#"{"error": {"message": "INVALID_REFRESH_TOKEN"}}"#);
        assert!(matches!(
            result,
            Err(ProviderError::InvalidRefreshCredential)
        ));
    }

    #[test]
    fn account_payload_projects_missing_fields() {
        let payload: AccountPayload = serde_json::from_value(serde_json::json!({
            "uid": "u-1",
            "providerData": [{"providerId": "password"}],
        }))
        .expect("payload");
        let account = Account::from(payload);
        assert_eq!(account.uid, "u-1");
        assert!(!account.email_verified);
        assert_eq!(account.provider_data.len(), 1);
        assert_eq!(
            account.provider_data[0].provider_id.as_deref(),
            Some("password")
        );
        assert!(account.provider_data[0].email.is_none());
    }

    #[test]
    fn update_payload_skips_unset_fields() {
        let payload = UpdatePayload {
            display_name: Some("Alice".to_string()),
            photo_url: None,
            email: None,
            password: None,
        };
        let value = serde_json::to_value(&payload).expect("serialize");
        assert_eq!(value, serde_json::json!({"displayName": "Alice"}));
    }

    #[test]
    fn base_urls_are_normalized() {
        let provider =
            HttpProvider::new("https://id.example.com/", "https://token.example.com/", None)
                .expect("provider");
        assert_eq!(provider.account_url, "https://id.example.com");
        assert_eq!(provider.token_url, "https://token.example.com");
    }
}
