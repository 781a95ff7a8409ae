//! Auth Gate
//!
//! Login state on the client is nothing more than the presence of the
//! session cookie. The server remains the authority; this gate only avoids
//! showing views that would fail anyway.

use std::sync::Arc;

use platform::cookie::CookieSource;
use platform::notify::Notifier;

use crate::domain::navigation::Navigator;
use crate::domain::route::Route;

/// Notice shown when a protected view is opened without a session
pub const LOGIN_REQUIRED_MESSAGE: &str = "please login...";

/// Session-cookie based navigation guard
#[derive(Clone)]
pub struct AuthGate {
    cookies: Arc<dyn CookieSource>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    cookie_name: String,
}

impl AuthGate {
    pub fn new(
        cookies: Arc<dyn CookieSource>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
        cookie_name: impl Into<String>,
    ) -> Self {
        Self {
            cookies,
            notifier,
            navigator,
            cookie_name: cookie_name.into(),
        }
    }

    /// True when the session cookie exists and is not empty
    pub fn check_logined(&self) -> bool {
        self.cookies.has_non_empty(&self.cookie_name)
    }

    /// `true` when logged in; otherwise notifies, navigates home and returns `false`
    pub fn check_auth(&self) -> bool {
        if self.check_logined() {
            return true;
        }

        tracing::debug!(cookie = %self.cookie_name, "No session, redirecting home");
        self.notifier.error(LOGIN_REQUIRED_MESSAGE);
        self.navigator.push(&Route::Home);
        false
    }

    /// Whether `route` may be shown; protected routes go through [`AuthGate::check_auth`]
    pub fn allow(&self, route: &Route) -> bool {
        !route.requires_auth() || self.check_auth()
    }
}

impl std::fmt::Debug for AuthGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthGate")
            .field("cookie_name", &self.cookie_name)
            .finish()
    }
}
