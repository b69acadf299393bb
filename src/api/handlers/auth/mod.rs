pub mod guard;
pub mod rate_limit;
pub mod state;
pub mod types;

pub mod register;
pub use self::register::register;

pub mod me;
pub use self::me::me;

pub mod profile;
pub use self::profile::update_profile;

pub mod password;
pub use self::password::update_password;

pub mod details;
pub use self::details::update_details;

pub mod logout;
pub use self::logout::logout;

pub mod refresh;
pub use self::refresh::refresh_token;

// common functions for the handlers
use axum::http::HeaderMap;
use regex::Regex;
use std::net::SocketAddr;

pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|re| re.is_match(email))
}

/// Client key for the rate governor: proxy headers first, then the peer
/// socket address for direct connections. Traffic with neither still shares
/// one catch-all bucket rather than bypassing the governor.
pub fn client_key(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty());
    if let Some(ip) = forwarded {
        return ip.to_string();
    }
    let real_ip = headers
        .get("x-real-ip")
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty());
    if let Some(ip) = real_ip {
        return ip.to_string();
    }
    peer.map_or_else(|| "unknown".to_string(), |addr| addr.ip().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn valid_email_accepts_basic_format() {
        assert!(valid_email("a@example.com"));
        assert!(valid_email("name.surname@example.co"));
    }

    #[test]
    fn valid_email_rejects_missing_parts() {
        assert!(!valid_email("not-an-email"));
        assert!(!valid_email("missing-at.example.com"));
        assert!(!valid_email("missing-domain@"));
    }

    fn peer(ip: &str) -> Option<SocketAddr> {
        format!("{ip}:4000").parse().ok()
    }

    #[test]
    fn client_key_prefers_forwarded() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("1.2.3.4, 5.6.7.8"),
        );
        headers.insert("x-real-ip", HeaderValue::from_static("9.9.9.9"));
        assert_eq!(client_key(&headers, peer("7.7.7.7")), "1.2.3.4");
    }

    #[test]
    fn client_key_falls_back_to_real_ip() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("9.9.9.9"));
        assert_eq!(client_key(&headers, peer("7.7.7.7")), "9.9.9.9");
    }

    #[test]
    fn client_key_falls_back_to_peer_address() {
        let headers = HeaderMap::new();
        assert_eq!(client_key(&headers, peer("7.7.7.7")), "7.7.7.7");
    }

    #[test]
    fn client_key_shared_bucket_without_peer() {
        let headers = HeaderMap::new();
        assert_eq!(client_key(&headers, None), "unknown");
    }
}
