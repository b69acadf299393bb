use clap::{
    builder::{
        styling::{AnsiColor, Effects, Styles},
        ValueParser,
    },
    Arg, ArgAction, ColorChoice, Command,
};

pub fn validator_log_level() -> ValueParser {
    ValueParser::from(move |level: &str| -> std::result::Result<u8, String> {
        if let Ok(parsed) = level.parse::<u8>() {
            // Successfully parsed as a number
            if parsed <= 5 {
                return Ok(parsed);
            }
        }

        match level.to_lowercase().as_str() {
            "error" => Ok(0),
            "warn" => Ok(1),
            "info" => Ok(2),
            "debug" => Ok(3),
            "trace" => Ok(4),
            _ => Err("invalid log level".to_string()),
        }
    })
}

pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    Command::new("portiere")
        .about("Authentication gateway fronting a delegated identity provider")
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("8080")
                .env("PORTIERE_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new("provider-url")
                .long("provider-url")
                .help("Base URL of the identity provider account API, example: https://id.example.com")
                .env("PORTIERE_PROVIDER_URL")
                .required(true),
        )
        .arg(
            Arg::new("token-url")
                .long("token-url")
                .help("Base URL of the refresh-token exchange endpoint")
                .env("PORTIERE_TOKEN_URL")
                .required(true),
        )
        .arg(
            Arg::new("api-key")
                .long("api-key")
                .help("API key for the token exchange endpoint")
                .env("PORTIERE_API_KEY"),
        )
        .arg(
            Arg::new("debug-errors")
                .long("debug-errors")
                .help("Include internal error detail in error payloads (never in production)")
                .env("PORTIERE_DEBUG_ERRORS")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbose")
                .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
                .env("PORTIERE_LOG_LEVEL")
                .global(true)
                .action(ArgAction::Count)
                .value_parser(validator_log_level()),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "portiere");
        assert_eq!(
            command.get_about().unwrap().to_string(),
            "Authentication gateway fronting a delegated identity provider"
        );
        assert_eq!(
            command.get_version().unwrap().to_string(),
            env!("CARGO_PKG_VERSION")
        );
    }

    #[test]
    fn test_check_port_and_urls() {
        let command = new();
        let matches = command.get_matches_from(vec![
            "portiere",
            "--port",
            "8080",
            "--provider-url",
            "https://id.example.com",
            "--token-url",
            "https://token.example.com",
            "--api-key",
            "k-123",
        ]);

        assert_eq!(matches.get_one::<u16>("port").map(|s| *s), Some(8080));
        assert_eq!(
            matches
                .get_one::<String>("provider-url")
                .map(|s| s.to_string()),
            Some("https://id.example.com".to_string())
        );
        assert_eq!(
            matches
                .get_one::<String>("token-url")
                .map(|s| s.to_string()),
            Some("https://token.example.com".to_string())
        );
        assert_eq!(
            matches.get_one::<String>("api-key").map(|s| s.to_string()),
            Some("k-123".to_string())
        );
        assert!(!matches.get_flag("debug-errors"));
    }

    #[test]
    fn test_check_env() {
        temp_env::with_vars(
            [
                ("PORTIERE_PORT", Some("443")),
                ("PORTIERE_PROVIDER_URL", Some("https://id.example.com")),
                ("PORTIERE_TOKEN_URL", Some("https://token.example.com")),
                ("PORTIERE_API_KEY", Some("k-123")),
                ("PORTIERE_LOG_LEVEL", Some("info")),
            ],
            || {
                let command = new();
                let matches = command.get_matches_from(vec!["portiere"]);
                assert_eq!(matches.get_one::<u16>("port").map(|s| *s), Some(443));
                assert_eq!(
                    matches
                        .get_one::<String>("provider-url")
                        .map(|s| s.to_string()),
                    Some("https://id.example.com".to_string())
                );
                assert_eq!(
                    matches
                        .get_one::<String>("token-url")
                        .map(|s| s.to_string()),
                    Some("https://token.example.com".to_string())
                );
                assert_eq!(matches.get_one::<u8>("verbosity").map(|s| *s), Some(2));
            },
        );
    }

    #[test]
    fn test_check_log_level_env() {
        // loop cover all possible value_parse
        let levels = vec!["error", "warn", "info", "debug", "trace"];
        for (index, &level) in levels.iter().enumerate() {
            temp_env::with_vars(
                [
                    ("PORTIERE_LOG_LEVEL", Some(level)),
                    ("PORTIERE_PROVIDER_URL", Some("https://id.example.com")),
                    ("PORTIERE_TOKEN_URL", Some("https://token.example.com")),
                ],
                || {
                    let command = new();
                    let matches = command.get_matches_from(vec!["portiere"]);
                    assert_eq!(
                        matches.get_one::<u8>("verbosity").map(|s| *s),
                        Some(index as u8)
                    );
                },
            );
        }
    }

    #[test]
    fn test_check_log_level_verbosity() {
        // loop cover all possible value_parse
        let levels = vec!["error", "warn", "info", "debug", "trace"];
        for (index, _) in levels.iter().enumerate() {
            temp_env::with_vars([("PORTIERE_LOG_LEVEL", None::<String>)], || {
                let mut args = vec![
                    "portiere".to_string(),
                    "--provider-url".to_string(),
                    "https://id.example.com".to_string(),
                    "--token-url".to_string(),
                    "https://token.example.com".to_string(),
                ];

                // Add the appropriate number of "-v" flags based on the index
                if index > 0 {
                    let v = format!("-{}", "v".repeat(index));
                    args.push(v);
                }

                let command = new();

                let matches = command.get_matches_from(args);

                assert_eq!(
                    matches.get_one::<u8>("verbosity").map(|s| *s),
                    Some(index as u8)
                );
            });
        }
    }
}
