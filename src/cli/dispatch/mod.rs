use crate::cli::{actions::Action, globals::GlobalArgs};
use anyhow::Result;
use secrecy::SecretString;

pub fn handler(matches: &clap::ArgMatches) -> Result<(Action, GlobalArgs)> {
    let globals = GlobalArgs::new(
        matches
            .get_one::<String>("api-key")
            .map(|key| SecretString::from(key.clone())),
    );

    let action = Action::Server {
        port: matches.get_one::<u16>("port").copied().unwrap_or(8080),
        provider_url: matches
            .get_one("provider-url")
            .map(|s: &String| s.to_string())
            .ok_or_else(|| anyhow::anyhow!("missing required argument: --provider-url"))?,
        token_url: matches
            .get_one("token-url")
            .map(|s: &String| s.to_string())
            .ok_or_else(|| anyhow::anyhow!("missing required argument: --token-url"))?,
        debug_errors: matches.get_flag("debug-errors"),
    };

    Ok((action, globals))
}
