//! Emoji picker state and caret-aware insertion.
//!
//! The picker tracks one target text input per page session. Opening a
//! picker retargets it; picking a glyph splices into that input at the
//! caret, replacing any selection.

use std::cell::RefCell;

use ropey::Rope;

use crate::dom::{FormKey, TextInputState, ThreadDom};

/// Insert `glyph` into `state` at its selection.
///
/// The selection may be reversed or extend past the end; it is ordered and
/// clamped first. The caret ends up right after the glyph.
pub fn splice(state: &TextInputState, glyph: &str) -> TextInputState {
    let mut rope = Rope::from_str(&state.value);
    let len = rope.len_chars();
    let a = state.selection.start.min(len);
    let b = state.selection.end.min(len);
    let (start, end) = if a <= b { (a, b) } else { (b, a) };

    rope.remove(start..end);
    rope.insert(start, glyph);

    TextInputState::with_caret(rope.to_string(), start + glyph.chars().count())
}

/// Convert a UTF-16 code unit offset (as reported by `selectionStart`) into
/// a char offset. Offsets past the end clamp to the end.
pub fn utf16_to_char(text: &str, utf16_offset: usize) -> usize {
    let rope = Rope::from_str(text);
    rope.utf16_cu_to_char(utf16_offset.min(rope.len_utf16_cu()))
}

/// Convert a char offset into a UTF-16 code unit offset for the browser.
pub fn char_to_utf16(text: &str, char_offset: usize) -> usize {
    let rope = Rope::from_str(text);
    rope.char_to_utf16_cu(char_offset.min(rope.len_chars()))
}

/// Emoji insertion engine.
#[derive(Debug, Default)]
pub struct EmojiPicker {
    target: RefCell<Option<FormKey>>,
}

impl EmojiPicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Form whose text input receives the next glyph.
    pub fn target(&self) -> Option<FormKey> {
        self.target.borrow().clone()
    }

    /// Handle a click on a form's emoji toggle.
    ///
    /// Closes every other panel, flips this one and retargets to the form's
    /// text input. Returns whether the panel is now open.
    pub fn toggle(&self, dom: &impl ThreadDom, form: &FormKey) -> bool {
        let was_open = dom.emoji_panel_visible(form);
        dom.hide_emoji_panels();
        *self.target.borrow_mut() = Some(form.clone());

        let open = !was_open && dom.set_emoji_panel_visible(form, true);
        tracing::debug!(%form, open, "emoji panel toggled");
        open
    }

    /// Handle a click on a glyph inside `panel`'s emoji panel.
    ///
    /// Returns false if there is no target (or it left the page), in which
    /// case nothing changes.
    pub fn pick(&self, dom: &impl ThreadDom, panel: &FormKey, glyph: &str) -> bool {
        let Some(target) = self.target() else {
            return false;
        };
        let Some(state) = dom.text_input(&target) else {
            tracing::debug!(form = %target, "emoji target is gone");
            *self.target.borrow_mut() = None;
            return false;
        };

        let next = splice(&state, glyph);
        dom.set_text_input(&target, &next);
        dom.set_emoji_panel_visible(panel, false);
        true
    }

    /// Outside click: close every panel.
    pub fn dismiss(&self, dom: &impl ThreadDom) {
        dom.hide_emoji_panels();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryDom, test_comment};
    use crate::types::CommentId;

    #[test]
    fn test_splice_at_caret() {
        let next = splice(&TextInputState::with_caret("ab", 1), "😊");
        assert_eq!(next.value, "a😊b");
        assert_eq!(next.caret(), 2);
        assert_eq!(next.selection, 2..2);
    }

    #[test]
    fn test_splice_replaces_selection() {
        let state = TextInputState {
            value: "hello world".into(),
            selection: 6..11,
        };
        let next = splice(&state, "🔥");
        assert_eq!(next.value, "hello 🔥");
        assert_eq!(next.caret(), 7);
    }

    #[test]
    fn test_splice_reversed_and_out_of_range_selection() {
        let state = TextInputState {
            value: "abc".into(),
            selection: 9..1,
        };
        let next = splice(&state, "!");
        assert_eq!(next.value, "a!");
        assert_eq!(next.caret(), 2);
    }

    #[test]
    fn test_splice_multi_scalar_glyph() {
        let next = splice(&TextInputState::with_caret("", 0), "❤️");
        assert_eq!(next.value, "❤️");
        assert_eq!(next.caret(), 2);
    }

    #[test]
    fn test_utf16_conversion() {
        let text = "a😊b";
        assert_eq!(utf16_to_char(text, 3), 2);
        assert_eq!(char_to_utf16(text, 2), 3);
        assert_eq!(utf16_to_char(text, 99), 3);
    }

    #[test]
    fn test_toggle_keeps_one_panel_open() {
        let dom = MemoryDom::new().with_main_form("/comments/add/1/", "tok");
        dom.seed(&test_comment("1", None)).unwrap();
        let picker = EmojiPicker::new();
        let reply = FormKey::Reply(CommentId::new("1"));

        assert!(picker.toggle(&dom, &FormKey::Main));
        assert!(picker.toggle(&dom, &reply));
        assert_eq!(dom.visible_emoji_panels(), vec![reply.clone()]);
        assert_eq!(picker.target(), Some(reply.clone()));

        // Second click on the same toggle closes it.
        assert!(!picker.toggle(&dom, &reply));
        assert!(dom.visible_emoji_panels().is_empty());
    }

    #[test]
    fn test_pick_inserts_into_target_and_closes() {
        let dom = MemoryDom::new().with_main_form("/comments/add/1/", "tok");
        dom.type_text(&FormKey::Main, "ab");
        dom.select(&FormKey::Main, 1..1);
        let picker = EmojiPicker::new();

        picker.toggle(&dom, &FormKey::Main);
        assert!(picker.pick(&dom, &FormKey::Main, "😊"));

        let input = dom.text_input(&FormKey::Main).unwrap();
        assert_eq!(input.value, "a😊b");
        assert_eq!(input.caret(), 2);
        assert_eq!(dom.focused_input(), Some(FormKey::Main));
        assert!(dom.visible_emoji_panels().is_empty());
    }

    #[test]
    fn test_pick_without_target_does_nothing() {
        let dom = MemoryDom::new().with_main_form("/comments/add/1/", "tok");
        let before = dom.snapshot();
        assert!(!EmojiPicker::new().pick(&dom, &FormKey::Main, "😊"));
        assert_eq!(dom.snapshot(), before);
    }

    #[test]
    fn test_dismiss_closes_everything() {
        let dom = MemoryDom::new().with_main_form("/comments/add/1/", "tok");
        let picker = EmojiPicker::new();
        picker.toggle(&dom, &FormKey::Main);
        picker.dismiss(&dom);
        assert!(dom.visible_emoji_panels().is_empty());
    }
}
