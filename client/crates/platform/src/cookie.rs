//! Cookie access
//!
//! The client never creates the session cookie itself (the login flow on the
//! server sets it); it only needs to read cookies back. [`CookieSource`] is
//! the read-only seam the auth gate depends on.

use std::collections::HashMap;

use http::{HeaderMap, header};
use parking_lot::RwLock;

/// Default name of the session cookie set by the API on login
pub const SESSION_COOKIE_NAME: &str = "SESSION_ID";

/// Read-only view over a cookie store
pub trait CookieSource: Send + Sync {
    /// Value of the cookie `name`, if present
    fn cookie(&self, name: &str) -> Option<String>;

    /// True when the cookie exists and is not an empty string
    fn has_non_empty(&self, name: &str) -> bool {
        self.cookie(name).is_some_and(|value| !value.is_empty())
    }
}

/// Find a cookie in a `Cookie` header value (`a=1; b=2`)
pub fn parse_cookie_header(header_value: &str, name: &str) -> Option<String> {
    header_value.split(';').find_map(|cookie| {
        let (key, value) = cookie.trim().split_once('=')?;

        if key == name {
            Some(value.to_string())
        } else {
            None
        }
    })
}

/// Find a cookie in the `Cookie` headers of a header map
pub fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|value| parse_cookie_header(value, name))
}

impl CookieSource for HeaderMap {
    fn cookie(&self, name: &str) -> Option<String> {
        extract_cookie(self, name)
    }
}

/// In-process cookie store
///
/// Used where no HTTP cookie jar exists (command line runs, tests).
#[derive(Debug, Default)]
pub struct MemoryCookies {
    cookies: RwLock<HashMap<String, String>>,
}

impl MemoryCookies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a `Cookie` header value
    pub fn from_header(header_value: &str) -> Self {
        let cookies = header_value
            .split(';')
            .filter_map(|cookie| {
                let (key, value) = cookie.trim().split_once('=')?;
                Some((key.to_string(), value.to_string()))
            })
            .collect();
        Self {
            cookies: RwLock::new(cookies),
        }
    }

    pub fn set(&self, name: impl Into<String>, value: impl Into<String>) {
        self.cookies.write().insert(name.into(), value.into());
    }

    pub fn remove(&self, name: &str) {
        self.cookies.write().remove(name);
    }
}

impl CookieSource for MemoryCookies {
    fn cookie(&self, name: &str) -> Option<String> {
        self.cookies.read().get(name).cloned()
    }
}
