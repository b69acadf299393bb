use crate::api::{self, handlers::auth::rate_limit::FixedWindowLimiter, ApiState};
use crate::api::handlers::auth::state::AuthConfig;
use crate::cli::{actions::Action, globals::GlobalArgs};
use crate::provider::HttpProvider;
use anyhow::{Context, Result};
use std::sync::Arc;
use url::Url;

/// Handle the server action
pub async fn handle(action: Action, globals: &GlobalArgs) -> Result<()> {
    match action {
        Action::Server {
            port,
            provider_url,
            token_url,
            debug_errors,
        } => {
            // Fail fast on unparseable endpoints instead of at first request.
            Url::parse(&provider_url)
                .with_context(|| format!("Invalid provider URL: {provider_url}"))?;
            Url::parse(&token_url).with_context(|| format!("Invalid token URL: {token_url}"))?;

            let provider =
                HttpProvider::new(&provider_url, &token_url, globals.api_key.clone())?;

            let config = AuthConfig::new()
                .with_debug_errors(debug_errors)
                .with_api_key_configured(globals.api_key_configured());

            let state = Arc::new(ApiState::new(
                config,
                Arc::new(provider),
                Arc::new(FixedWindowLimiter::default()),
            ));

            api::new(port, state).await?;
        }
    }

    Ok(())
}
