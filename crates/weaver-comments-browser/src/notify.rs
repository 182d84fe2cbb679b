//! Blocking browser prompts.

use weaver_comments_core::Notifier;

/// Notifier backed by `window.alert` and `window.confirm`.
#[derive(Clone, Debug)]
pub struct WindowNotifier {
    window: web_sys::Window,
}

impl WindowNotifier {
    pub fn new(window: web_sys::Window) -> Self {
        Self { window }
    }

    /// Notifier for the current global window, if there is one.
    pub fn from_global() -> Option<Self> {
        web_sys::window().map(Self::new)
    }
}

impl Notifier for WindowNotifier {
    fn alert(&self, message: &str) {
        if let Err(e) = self.window.alert_with_message(message) {
            tracing::warn!("alert failed: {:?}", e);
        }
    }

    fn confirm(&self, message: &str) -> bool {
        match self.window.confirm_with_message(message) {
            Ok(answer) => answer,
            Err(e) => {
                // Treat a blocked prompt as "no".
                tracing::warn!("confirm failed: {:?}", e);
                false
            }
        }
    }
}
