//! DOM abstraction for the comment thread.
//!
//! `ThreadDom` is the seam between the protocol logic in this crate and
//! whatever actually holds the page: the browser DOM (`weaver-comments-browser`)
//! or the in-memory model in [`crate::memory`].
//!
//! Methods take `&self`. Implementations use interior mutability, the same
//! way the browser DOM behaves, so the submission flow never holds a borrow
//! across an `.await`.

use std::fmt;
use std::future::Future;
use std::ops::Range;

use crate::error::DomError;
use crate::types::{Comment, CommentId};

/// Identifies a comment form on the page.
///
/// There is one top-level form per page and one reply form per card, so a
/// form (and the text input and emoji panel inside it) is fully identified
/// by the comment it replies to.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum FormKey {
    /// The top-level "write a comment" form.
    Main,
    /// The reply-editor nested in a comment's card.
    Reply(CommentId),
}

impl FormKey {
    /// The comment whose reply-editor holds this form, if any.
    pub fn reply_to(&self) -> Option<&CommentId> {
        match self {
            FormKey::Main => None,
            FormKey::Reply(id) => Some(id),
        }
    }
}

impl fmt::Display for FormKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormKey::Main => f.write_str("main"),
            FormKey::Reply(id) => write!(f, "reply-{id}"),
        }
    }
}

/// Where a new card is attached.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Anchor {
    /// First child of the root comment list.
    ListStart,
    /// Last child of the given card's reply container.
    RepliesOf(CommentId),
}

/// Value and selection of a text input.
///
/// Offsets are in chars (Unicode scalar values), not bytes or UTF-16.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextInputState {
    pub value: String,
    pub selection: Range<usize>,
}

impl TextInputState {
    /// Input with a collapsed caret.
    pub fn with_caret(value: impl Into<String>, caret: usize) -> Self {
        Self {
            value: value.into(),
            selection: caret..caret,
        }
    }

    pub fn caret(&self) -> usize {
        self.selection.end
    }
}

/// File picked in a form's image input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub mime: Option<String>,
    pub bytes: Vec<u8>,
}

/// A serialized comment form, ready to send.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommentForm {
    /// The form's declared action URL.
    pub action: String,
    /// Text fields in document order.
    pub fields: Vec<(String, String)>,
    pub image: Option<Attachment>,
}

impl CommentForm {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            ..Default::default()
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// First value of the named field.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Page operations the comment protocol needs.
pub trait ThreadDom {
    /// Nesting depth of a live card (top-level is 0), or `None` if the card
    /// isn't on the page or has been replaced by a deletion notice.
    fn card_depth(&self, id: &CommentId) -> Option<usize>;

    /// Whether the root comment list exists.
    fn has_comment_list(&self) -> bool;

    /// Attach rendered markup for `comment` at `anchor`.
    fn insert_card(&self, anchor: &Anchor, comment: &Comment, html: &str) -> Result<(), DomError>;

    /// Serialize a form's fields. `None` if the form isn't on the page.
    fn read_form(&self, form: &FormKey) -> impl Future<Output = Option<CommentForm>>;

    /// Clear user input in a form. Hidden fields keep their values.
    fn reset_form(&self, form: &FormKey);

    /// Show or hide a card's reply-editor. Returns false if there is none.
    fn set_reply_editor_visible(&self, id: &CommentId, visible: bool) -> bool;

    /// Hide every reply-editor on the page.
    fn hide_reply_editors(&self);

    /// Set the text of a card's like counter. Returns false if not found.
    fn set_like_count(&self, id: &CommentId, count: u64) -> bool;

    /// Replace a card's whole content, replies included, with `html`.
    fn replace_card_content(&self, id: &CommentId, html: &str) -> bool;

    fn emoji_panel_visible(&self, form: &FormKey) -> bool;

    /// Show or hide the emoji panel of a form. Returns false if there is none.
    fn set_emoji_panel_visible(&self, form: &FormKey, visible: bool) -> bool;

    /// Hide every emoji panel on the page.
    fn hide_emoji_panels(&self);

    /// Current value and selection of a form's text input.
    fn text_input(&self, form: &FormKey) -> Option<TextInputState>;

    /// Write value and selection back and focus the input.
    fn set_text_input(&self, form: &FormKey, state: &TextInputState) -> bool;

    /// The page's cookie string (`document.cookie`).
    fn cookies(&self) -> String;
}
