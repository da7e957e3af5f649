//! Client configuration loaded from environment variables.
//!
//! All settings have defaults so the client can start with nothing but an
//! API token.

use std::time::Duration;

use huddle_shared::constants::{DEFAULT_API_URL, MEMBERS_PAGE_SIZE, TYPING_TIMEOUT_MS};
use huddle_shared::UserId;

/// Client configuration.
#[derive(Clone)]
pub struct ClientConfig {
    /// Base URL of the messaging API; endpoint paths are appended to it.
    /// Env: `HUDDLE_API_URL`
    /// Default: `https://slack.com/api`
    pub api_url: String,

    /// Bearer token sent with every request.
    /// Env: `HUDDLE_TOKEN`
    /// Default: none (requests go out unauthenticated).
    pub token: Option<String>,

    /// Id of the signed-in user, used to hide the self-chat.
    /// Env: `HUDDLE_SELF_USER_ID`
    pub self_user_id: Option<UserId>,

    /// How long a typing signal stays visible.
    /// Env: `HUDDLE_TYPING_TIMEOUT_MS`
    /// Default: 5000 ms
    pub typing_timeout: Duration,

    /// Member ids requested per page.
    /// Env: `HUDDLE_MEMBERS_PAGE_SIZE`
    /// Default: 100
    pub members_page_size: u32,

    /// Per-request timeout of the HTTP adapter.
    /// Env: `HUDDLE_REQUEST_TIMEOUT_SECS`
    /// Default: 30 s
    pub request_timeout: Duration,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_url", &self.api_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("self_user_id", &self.self_user_id)
            .field("typing_timeout", &self.typing_timeout)
            .field("members_page_size", &self.members_page_size)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: None,
            self_user_id: None,
            typing_timeout: Duration::from_millis(TYPING_TIMEOUT_MS),
            members_page_size: MEMBERS_PAGE_SIZE,
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = var("HUDDLE_API_URL") {
            config.api_url = url.trim_end_matches('/').to_string();
        }

        if let Some(token) = var("HUDDLE_TOKEN") {
            if !token.is_empty() {
                config.token = Some(token);
            }
        }

        if let Some(id) = var("HUDDLE_SELF_USER_ID") {
            if !id.is_empty() {
                config.self_user_id = Some(UserId(id));
            }
        }

        if let Some(val) = var("HUDDLE_TYPING_TIMEOUT_MS") {
            match val.parse::<u64>() {
                Ok(ms) => config.typing_timeout = Duration::from_millis(ms),
                Err(e) => tracing::warn!(
                    value = %val,
                    error = %e,
                    "Invalid HUDDLE_TYPING_TIMEOUT_MS, using default"
                ),
            }
        }

        if let Some(val) = var("HUDDLE_MEMBERS_PAGE_SIZE") {
            match val.parse::<u32>() {
                Ok(n) if n > 0 => config.members_page_size = n,
                _ => tracing::warn!(
                    value = %val,
                    "Invalid HUDDLE_MEMBERS_PAGE_SIZE, using default"
                ),
            }
        }

        if let Some(val) = var("HUDDLE_REQUEST_TIMEOUT_SECS") {
            match val.parse::<u64>() {
                Ok(secs) => config.request_timeout = Duration::from_secs(secs),
                Err(e) => tracing::warn!(
                    value = %val,
                    error = %e,
                    "Invalid HUDDLE_REQUEST_TIMEOUT_SECS, using default"
                ),
            }
        }

        // RUST_LOG is handled directly by tracing-subscriber's EnvFilter,
        // so we do not store it here.

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.api_url, "https://slack.com/api");
        assert_eq!(config.typing_timeout, Duration::from_millis(5000));
        assert_eq!(config.members_page_size, 100);
        assert!(config.token.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("HUDDLE_API_URL", "http://localhost:9000/api/"),
            ("HUDDLE_TOKEN", "xoxp-1"),
            ("HUDDLE_SELF_USER_ID", "U1"),
            ("HUDDLE_TYPING_TIMEOUT_MS", "250"),
            ("HUDDLE_MEMBERS_PAGE_SIZE", "20"),
        ]));
        assert_eq!(config.api_url, "http://localhost:9000/api");
        assert_eq!(config.token.as_deref(), Some("xoxp-1"));
        assert_eq!(config.self_user_id, Some(UserId::from("U1")));
        assert_eq!(config.typing_timeout, Duration::from_millis(250));
        assert_eq!(config.members_page_size, 20);
    }

    #[test]
    fn test_invalid_values_keep_defaults() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("HUDDLE_TYPING_TIMEOUT_MS", "soon"),
            ("HUDDLE_MEMBERS_PAGE_SIZE", "0"),
            ("HUDDLE_TOKEN", ""),
        ]));
        assert_eq!(config.typing_timeout, Duration::from_millis(5000));
        assert_eq!(config.members_page_size, 100);
        assert!(config.token.is_none());
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = ClientConfig {
            token: Some("secret".into()),
            ..ClientConfig::default()
        };
        assert!(!format!("{config:?}").contains("secret"));
    }
}
