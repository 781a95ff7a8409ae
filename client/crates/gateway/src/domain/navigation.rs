//! Navigation
//!
//! The auth gate redirects through [`Navigator`]; the UI layer supplies the
//! real router, headless runs use [`History`].

use parking_lot::Mutex;

use super::route::Route;

/// Client-side navigation
pub trait Navigator: Send + Sync {
    fn push(&self, route: &Route);
}

/// In-memory navigation history
#[derive(Debug)]
pub struct History {
    entries: Mutex<Vec<Route>>,
}

impl History {
    /// History positioned at `start`
    pub fn new(start: Route) -> Self {
        Self {
            entries: Mutex::new(vec![start]),
        }
    }

    pub fn current(&self) -> Route {
        self.entries
            .lock()
            .last()
            .cloned()
            .unwrap_or(Route::Home)
    }

    pub fn entries(&self) -> Vec<Route> {
        self.entries.lock().clone()
    }

    /// Go back one entry; `None` when already at the first one
    pub fn back(&self) -> Option<Route> {
        let mut entries = self.entries.lock();
        if entries.len() < 2 {
            return None;
        }
        entries.pop();
        entries.last().cloned()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(Route::Home)
    }
}

impl Navigator for History {
    fn push(&self, route: &Route) {
        tracing::debug!(path = %route, "Navigate");
        self.entries.lock().push(route.clone());
    }
}
