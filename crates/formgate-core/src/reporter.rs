//! Single-slot error notification channel.

use crate::types::Key;
use serde::{Deserialize, Serialize};

/// The one notification a form can show
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorNotification {
    /// Last message shown; kept after dismissal
    pub message: String,
    /// Whether it is currently displayed
    pub visible: bool,
}

/// Shows at most one message at a time.
///
/// `show` replaces whatever is visible. `dismiss` hides without clearing,
/// so the last message stays inspectable.
#[derive(Debug, Clone, Default)]
pub struct ErrorReporter {
    current: ErrorNotification,
    shown_count: u64,
}

impl ErrorReporter {
    /// Empty, hidden reporter
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Display `message`, replacing any visible one
    pub fn show(&mut self, message: impl Into<String>) {
        self.current.message = message.into();
        self.current.visible = true;
        self.shown_count += 1;
    }

    /// Hide the current message. Returns whether anything was visible.
    pub fn dismiss(&mut self) -> bool {
        std::mem::replace(&mut self.current.visible, false)
    }

    /// Global key handler; only the confirmation key dismisses
    pub fn on_key(&mut self, key: Key) -> bool {
        match key {
            Key::Enter if self.current.visible => self.dismiss(),
            _ => false,
        }
    }

    /// Current notification
    #[inline]
    #[must_use]
    pub fn notification(&self) -> &ErrorNotification {
        &self.current
    }

    /// Last message, visible or not
    #[inline]
    #[must_use]
    pub fn message(&self) -> &str {
        &self.current.message
    }

    /// Whether a message is displayed
    #[inline]
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.current.visible
    }

    /// Number of `show` calls so far
    #[inline]
    #[must_use]
    pub fn shown_count(&self) -> u64 {
        self.shown_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_overwrites_previous() {
        let mut reporter = ErrorReporter::new();
        reporter.show("first");
        reporter.show("second");
        assert_eq!(reporter.message(), "second");
        assert!(reporter.is_visible());
        assert_eq!(reporter.shown_count(), 2);
    }

    #[test]
    fn dismiss_keeps_message() {
        let mut reporter = ErrorReporter::new();
        reporter.show("boom");
        assert!(reporter.dismiss());
        assert!(!reporter.is_visible());
        assert_eq!(reporter.message(), "boom");
        // idempotent
        assert!(!reporter.dismiss());
    }

    #[test]
    fn enter_dismisses_only_when_visible() {
        let mut reporter = ErrorReporter::new();
        assert!(!reporter.on_key(Key::Enter));
        reporter.show("boom");
        assert!(!reporter.on_key(Key::Escape));
        assert!(reporter.is_visible());
        assert!(reporter.on_key(Key::Enter));
        assert!(!reporter.is_visible());
    }
}
