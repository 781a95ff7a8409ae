//! User-visible notifications
//!
//! Errors and confirmations are surfaced to the user at the point where they
//! are detected. [`Notifier`] is the sink; the UI layer provides its own
//! implementation, headless runs use [`TracingNotifier`].
//!
//! [`DebouncedNotifier`] collapses floods (for example a page firing several
//! requests that all fail) into a single notice.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

/// Default quiet window for debounced notices
pub const DEFAULT_DEBOUNCE_WINDOW: Duration = Duration::from_millis(200);

/// Severity of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A notice as delivered to a [`Notifier`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Sink for user-visible notices
pub trait Notifier: Send + Sync {
    fn notify(&self, level: NoticeLevel, message: &str);

    fn error(&self, message: &str) {
        self.notify(NoticeLevel::Error, message);
    }

    fn success(&self, message: &str) {
        self.notify(NoticeLevel::Success, message);
    }
}

/// Reports notices through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, level: NoticeLevel, message: &str) {
        match level {
            NoticeLevel::Error => tracing::warn!(notice = %message, "error notice"),
            NoticeLevel::Success => tracing::info!(notice = %message, "success notice"),
        }
    }
}

/// Keeps every notice in memory
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().clone()
    }

    /// Messages only, in delivery order
    pub fn messages(&self) -> Vec<String> {
        self.notices
            .lock()
            .iter()
            .map(|notice| notice.message.clone())
            .collect()
    }

    pub fn clear(&self) {
        self.notices.lock().clear();
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, level: NoticeLevel, message: &str) {
        self.notices.lock().push(Notice {
            level,
            message: message.to_string(),
        });
    }
}

// ============================================================================
// Debounce
// ============================================================================

#[derive(Debug, Default)]
struct DebounceState {
    generation: u64,
    pending: Option<Notice>,
}

/// Trailing-edge debounce in front of another notifier
///
/// Every trigger restarts the quiet window; when the window elapses without
/// a new trigger the most recent notice is delivered. A burst therefore
/// yields exactly one notice, carrying the last message.
///
/// Timers run on the ambient tokio runtime. Outside a runtime notices are
/// delivered immediately.
#[derive(Clone)]
pub struct DebouncedNotifier {
    inner: Arc<dyn Notifier>,
    window: Duration,
    state: Arc<Mutex<DebounceState>>,
}

impl DebouncedNotifier {
    pub fn new(inner: Arc<dyn Notifier>, window: Duration) -> Self {
        Self {
            inner,
            window,
            state: Arc::new(Mutex::new(DebounceState::default())),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Queue a notice, replacing any pending one
    pub fn trigger(&self, level: NoticeLevel, message: impl Into<String>) {
        let notice = Notice {
            level,
            message: message.into(),
        };

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::debug!("no runtime for debounce timer, delivering notice directly");
            self.inner.notify(notice.level, &notice.message);
            return;
        };

        let generation = {
            let mut state = self.state.lock();
            state.generation += 1;
            state.pending = Some(notice);
            state.generation
        };

        let state = Arc::clone(&self.state);
        let inner = Arc::clone(&self.inner);
        let window = self.window;
        handle.spawn(async move {
            tokio::time::sleep(window).await;
            let due = {
                let mut state = state.lock();
                if state.generation != generation {
                    return;
                }
                state.pending.take()
            };
            if let Some(notice) = due {
                inner.notify(notice.level, &notice.message);
            }
        });
    }

    /// Deliver the pending notice now, if any
    pub fn flush(&self) {
        let due = {
            let mut state = self.state.lock();
            state.generation += 1;
            state.pending.take()
        };
        if let Some(notice) = due {
            self.inner.notify(notice.level, &notice.message);
        }
    }

    /// Drop the pending notice and disarm running timers
    pub fn reset(&self) {
        let mut state = self.state.lock();
        state.generation += 1;
        state.pending = None;
    }

    pub fn has_pending(&self) -> bool {
        self.state.lock().pending.is_some()
    }
}

impl Notifier for DebouncedNotifier {
    fn notify(&self, level: NoticeLevel, message: &str) {
        self.trigger(level, message);
    }
}

impl std::fmt::Debug for DebouncedNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DebouncedNotifier")
            .field("window", &self.window)
            .field("pending", &self.has_pending())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn debounced() -> (Arc<RecordingNotifier>, DebouncedNotifier) {
        let recorder = Arc::new(RecordingNotifier::new());
        let notifier = DebouncedNotifier::new(recorder.clone(), DEFAULT_DEBOUNCE_WINDOW);
        (recorder, notifier)
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_delivers_last_message_once() {
        let (recorder, notifier) = debounced();

        for i in 0..5 {
            notifier.error(&format!("failure {i}"));
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        assert!(recorder.notices().is_empty());

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(recorder.messages(), vec!["failure 4".to_string()]);
        assert_eq!(recorder.notices()[0].level, NoticeLevel::Error);
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_bursts_deliver_separately() {
        let (recorder, notifier) = debounced();

        notifier.error("first");
        tokio::time::sleep(Duration::from_millis(250)).await;
        notifier.error("second");
        tokio::time::sleep(Duration::from_millis(250)).await;

        assert_eq!(
            recorder.messages(),
            vec!["first".to_string(), "second".to_string()]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_discards_pending() {
        let (recorder, notifier) = debounced();

        notifier.error("dropped");
        assert!(notifier.has_pending());
        notifier.reset();
        tokio::time::sleep(Duration::from_millis(500)).await;

        assert!(recorder.notices().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_delivers_immediately() {
        let (recorder, notifier) = debounced();

        notifier.success("saved");
        notifier.flush();
        assert_eq!(recorder.messages(), vec!["saved".to_string()]);

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(recorder.notices().len(), 1);
    }

    #[test]
    fn test_without_runtime_delivers_directly() {
        let (recorder, notifier) = debounced();
        notifier.error("no runtime");
        assert_eq!(recorder.messages(), vec!["no runtime".to_string()]);
    }
}
