//! Application Configuration
//!
//! Configuration for the API client and the auth gate.

use std::env;
use std::time::Duration;

use url::Url;

use crate::error::{GatewayError, GatewayResult};

/// Re-export cookie defaults from platform
pub use platform::cookie::SESSION_COOKIE_NAME;

/// Production API endpoint
pub const DEFAULT_BASE_URL: &str = "https://junebao.top/api";

/// Local API server used during development
pub const DEVELOPMENT_BASE_URL: &str = "http://127.0.0.1:8080";

/// Application code the API uses for success
pub const SUCCESS_CODE: i64 = 200;

/// API client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL every request path is appended to
    pub base_url: Url,
    /// Whole-request timeout
    pub timeout: Duration,
    /// Application-level success code inside response bodies
    pub success_code: i64,
    /// Name of the session cookie checked by the auth gate
    pub session_cookie_name: String,
    /// Quiet window for repeated error notices
    pub error_debounce: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            timeout: Duration::from_secs(60),
            success_code: SUCCESS_CODE,
            session_cookie_name: SESSION_COOKIE_NAME.to_string(),
            error_debounce: Duration::from_millis(200),
        }
    }
}

impl ClientConfig {
    /// Config pointing at `base_url`
    pub fn with_base_url(base_url: &str) -> GatewayResult<Self> {
        Ok(Self {
            base_url: Url::parse(base_url)?,
            ..Default::default()
        })
    }

    /// Create config for development (local API server)
    pub fn development() -> Self {
        Self {
            base_url: Url::parse(DEVELOPMENT_BASE_URL).expect("development base URL is valid"),
            ..Default::default()
        }
    }

    /// Defaults overridden by `BLOG_API_BASE_URL`, `BLOG_API_TIMEOUT_SECS`
    /// and `BLOG_SESSION_COOKIE`
    pub fn from_env() -> GatewayResult<Self> {
        let mut config = Self::default();

        if let Ok(base_url) = env::var("BLOG_API_BASE_URL") {
            config.base_url = Url::parse(&base_url)?;
        }
        if let Ok(secs) = env::var("BLOG_API_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                GatewayError::Config(format!("BLOG_API_TIMEOUT_SECS is not a number: {secs}"))
            })?;
            config.timeout = Duration::from_secs(secs);
        }
        if let Ok(name) = env::var("BLOG_SESSION_COOKIE") {
            if name.trim().is_empty() {
                return Err(GatewayError::Config(
                    "BLOG_SESSION_COOKIE must not be empty".to_string(),
                ));
            }
            config.session_cookie_name = name;
        }

        Ok(config)
    }

    /// Full URL for a request path
    ///
    /// Absolute URLs pass through untouched; anything else is appended to
    /// the base URL with exactly one `/` between them.
    pub fn endpoint(&self, path: &str) -> GatewayResult<Url> {
        if path.starts_with("http://") || path.starts_with("https://") {
            return Ok(Url::parse(path)?);
        }
        if path.is_empty() {
            return Ok(self.base_url.clone());
        }

        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    /// Get timeout in milliseconds
    pub fn timeout_ms(&self) -> u64 {
        self.timeout.as_millis() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url.as_str(), "https://junebao.top/api");
        assert_eq!(config.timeout_ms(), 60_000);
        assert_eq!(config.success_code, 200);
        assert_eq!(config.session_cookie_name, "SESSION_ID");
        assert_eq!(config.error_debounce, Duration::from_millis(200));
    }

    #[test]
    fn test_endpoint_joining() {
        let config = ClientConfig::default();
        assert_eq!(
            config.endpoint("/article/list").unwrap().as_str(),
            "https://junebao.top/api/article/list"
        );
        assert_eq!(
            config.endpoint("tag").unwrap().as_str(),
            "https://junebao.top/api/tag"
        );
        assert_eq!(
            config.endpoint("https://example.com/x").unwrap().as_str(),
            "https://example.com/x"
        );
        assert_eq!(config.endpoint("").unwrap().as_str(), "https://junebao.top/api");
    }

    #[test]
    fn test_trailing_slash_base() {
        let config = ClientConfig::with_base_url("http://127.0.0.1:8080/api/").unwrap();
        assert_eq!(
            config.endpoint("/detail").unwrap().as_str(),
            "http://127.0.0.1:8080/api/detail"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            ClientConfig::with_base_url("not a url"),
            Err(GatewayError::InvalidUrl(_))
        ));
    }
}
