//! User-facing notifications.

/// Blocking prompts shown to the user.
///
/// In the browser these are `window.alert` and `window.confirm`.
pub trait Notifier {
    /// Tell the user something went wrong (or needs their attention).
    fn alert(&self, message: &str);

    /// Ask the user to confirm a destructive action.
    fn confirm(&self, message: &str) -> bool;
}

impl<N: Notifier + ?Sized> Notifier for &N {
    fn alert(&self, message: &str) {
        (**self).alert(message)
    }

    fn confirm(&self, message: &str) -> bool {
        (**self).confirm(message)
    }
}
