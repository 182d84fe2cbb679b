//! Control roles and click decoding.
//!
//! Every interactive element the renderer emits declares its role in a
//! `data-role` attribute. The browser layer reads the role plus a little
//! context (comment id, enclosing form, glyph text) off the clicked element
//! and hands it to [`Control::decode`]; the widget then dispatches on the
//! resulting [`Control`]. Nothing is bound per element, so cards inserted
//! later need no extra wiring.

use std::fmt;

use crate::dom::FormKey;
use crate::types::CommentId;

/// Attribute carrying a control's role.
pub const ROLE_ATTRIBUTE: &str = "data-role";

/// Attribute carrying the comment id on cards and their controls.
pub const COMMENT_ID_ATTRIBUTE: &str = "data-comment-id";

/// Declared role of an interactive element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ControlRole {
    Reply,
    Like,
    Delete,
    EmojiToggle,
    Emoji,
}

impl ControlRole {
    pub const ALL: [ControlRole; 5] = [
        ControlRole::Reply,
        ControlRole::Like,
        ControlRole::Delete,
        ControlRole::EmojiToggle,
        ControlRole::Emoji,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ControlRole::Reply => "reply",
            ControlRole::Like => "like",
            ControlRole::Delete => "delete",
            ControlRole::EmojiToggle => "emoji-toggle",
            ControlRole::Emoji => "emoji",
        }
    }

    pub fn parse(role: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == role)
    }

    /// Whether clicking this role leaves open emoji panels alone.
    pub fn is_emoji(self) -> bool {
        matches!(self, ControlRole::EmojiToggle | ControlRole::Emoji)
    }
}

impl fmt::Display for ControlRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded click.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Control {
    /// Open a card's reply-editor.
    Reply(CommentId),
    Like(CommentId),
    Delete(CommentId),
    /// Flip the emoji panel of a form.
    EmojiToggle(FormKey),
    /// A glyph in a form's emoji panel.
    Emoji { panel: FormKey, glyph: String },
    /// Anything without a usable role.
    Outside,
}

impl Control {
    /// Decode a click from what the DOM layer found on the target.
    ///
    /// - `role`: `data-role` of the closest element that has one.
    /// - `comment_id`: `data-comment-id` of that element.
    /// - `form`: the form enclosing the element, if any.
    /// - `glyph`: text content of the element (emoji glyphs only).
    ///
    /// Roles missing the context they need decode to [`Control::Outside`].
    pub fn decode(
        role: Option<&str>,
        comment_id: Option<&str>,
        form: Option<FormKey>,
        glyph: Option<&str>,
    ) -> Control {
        let Some(role) = role.and_then(ControlRole::parse) else {
            return Control::Outside;
        };
        let comment = comment_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(CommentId::new);

        let control = match role {
            ControlRole::Reply => comment.map(Control::Reply),
            ControlRole::Like => comment.map(Control::Like),
            ControlRole::Delete => comment.map(Control::Delete),
            ControlRole::EmojiToggle => form.map(Control::EmojiToggle),
            ControlRole::Emoji => {
                let glyph = glyph.map(str::trim).filter(|g| !g.is_empty());
                form.zip(glyph).map(|(panel, glyph)| Control::Emoji {
                    panel,
                    glyph: glyph.to_owned(),
                })
            }
        };
        control.unwrap_or_else(|| {
            tracing::debug!(%role, "control is missing its context");
            Control::Outside
        })
    }

    pub fn role(&self) -> Option<ControlRole> {
        match self {
            Control::Reply(_) => Some(ControlRole::Reply),
            Control::Like(_) => Some(ControlRole::Like),
            Control::Delete(_) => Some(ControlRole::Delete),
            Control::EmojiToggle(_) => Some(ControlRole::EmojiToggle),
            Control::Emoji { .. } => Some(ControlRole::Emoji),
            Control::Outside => None,
        }
    }
}

/// Network work a click left to do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Pending {
    Like(CommentId),
    Delete(CommentId),
}
