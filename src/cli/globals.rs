use secrecy::SecretString;

/// Secrets shared across actions. The API key for the token exchange
/// endpoint is optional at startup; its absence only surfaces when the
/// refresh flow is used.
#[derive(Debug, Clone, Default)]
pub struct GlobalArgs {
    pub api_key: Option<SecretString>,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(api_key: Option<SecretString>) -> Self {
        Self { api_key }
    }

    #[must_use]
    pub fn api_key_configured(&self) -> bool {
        self.api_key.is_some()
    }
}
