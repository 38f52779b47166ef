//! Notification sink for crawl progress
//!
//! The coordinator reports what it does through a [`Notifier`] instead of
//! printing directly, so the binary decides how messages are rendered and tests
//! can capture them.

use std::sync::Mutex;

/// Severity of a progress notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Notice {
    /// Work is starting (a page, a notice)
    Progress,
    /// A unit of work finished and produced data
    Success,
    /// Expected, recoverable skip (already collected, no data tab)
    Skipped,
    /// Something could not be fetched or saved
    Failure,
    /// The operator stopped the run; not an error
    Stopped,
}

/// Receives leveled, human-readable messages from the crawler
pub trait Notifier: Send + Sync {
    fn notify(&self, level: Notice, message: &str);
}

/// Forwards notices to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, level: Notice, message: &str) {
        match level {
            Notice::Progress => tracing::debug!("{}", message),
            Notice::Success => tracing::info!("✓ {}", message),
            Notice::Skipped => tracing::info!("↷ {}", message),
            Notice::Failure => tracing::warn!("✗ {}", message),
            Notice::Stopped => tracing::info!("■ {}", message),
        }
    }
}

/// Keeps every notice in memory
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    notices: Mutex<Vec<(Notice, String)>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything received so far
    pub fn notices(&self) -> Vec<(Notice, String)> {
        self.notices
            .lock()
            .map(|notices| notices.clone())
            .unwrap_or_default()
    }

    /// Messages received at `level`
    pub fn messages(&self, level: Notice) -> Vec<String> {
        self.notices()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m)
            .collect()
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, level: Notice, message: &str) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.push((level, message.to_string()));
        }
    }
}

impl<N: Notifier + ?Sized> Notifier for std::sync::Arc<N> {
    fn notify(&self, level: Notice, message: &str) {
        (**self).notify(level, message)
    }
}
