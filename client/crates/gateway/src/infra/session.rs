//! Session Cookie Jar
//!
//! The HTTP client sends credentials with every request. Cookies set by the
//! API (the session cookie in particular) land in one shared jar, which the
//! auth gate reads back through [`CookieSource`].

use std::sync::Arc;

use platform::cookie::{CookieSource, parse_cookie_header};
use reqwest::cookie::{CookieStore, Jar};
use url::Url;

/// Cookie jar scoped to the API base URL
#[derive(Debug, Clone)]
pub struct SessionJar {
    jar: Arc<Jar>,
    url: Url,
}

impl SessionJar {
    pub fn new(url: Url) -> Self {
        Self {
            jar: Arc::new(Jar::default()),
            url,
        }
    }

    /// Underlying store, shared with the HTTP client
    pub fn store(&self) -> Arc<Jar> {
        Arc::clone(&self.jar)
    }

    /// Add a cookie in `Set-Cookie` syntax (`SESSION_ID=abc; Path=/`)
    pub fn add_cookie_str(&self, cookie: &str) {
        self.jar.add_cookie_str(cookie, &self.url);
    }

    /// `Cookie` header the client would send to the base URL
    pub fn header_value(&self) -> Option<String> {
        self.jar
            .cookies(&self.url)
            .and_then(|value| value.to_str().ok().map(str::to_string))
    }
}

impl CookieSource for SessionJar {
    fn cookie(&self, name: &str) -> Option<String> {
        parse_cookie_header(&self.header_value()?, name)
    }
}
