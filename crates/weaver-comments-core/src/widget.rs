//! The comment widget: one per page.
//!
//! Owns the DOM handle, the endpoint client, the notifier and the emoji
//! picker state, and implements the UI toggle coordinator on top of them.
//! Form submission lives in [`crate::submit`].

use crate::api::CommentApi;
use crate::config::CommentsConfig;
use crate::controls::{Control, Pending};
use crate::cookie::cookie_value;
use crate::dom::ThreadDom;
use crate::emoji::EmojiPicker;
use crate::error::ActionError;
use crate::notify::Notifier;
use crate::render::render_deleted_notice;
use crate::types::{CommentId, DeleteResponse};

/// Result of a delete request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The user declined the confirmation; nothing was sent.
    Cancelled,
    /// The card now shows the deletion notice.
    Deleted,
}

pub struct CommentWidget<D, A, N> {
    pub(crate) dom: D,
    pub(crate) api: A,
    pub(crate) notifier: N,
    pub(crate) config: CommentsConfig,
    pub(crate) emoji: EmojiPicker,
}

impl<D, A, N> CommentWidget<D, A, N>
where
    D: ThreadDom,
    A: CommentApi,
    N: Notifier,
{
    pub fn new(dom: D, api: A, notifier: N, config: CommentsConfig) -> Self {
        Self {
            dom,
            api,
            notifier,
            config,
            emoji: EmojiPicker::new(),
        }
    }

    pub fn dom(&self) -> &D {
        &self.dom
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn config(&self) -> &CommentsConfig {
        &self.config
    }

    pub fn emoji(&self) -> &EmojiPicker {
        &self.emoji
    }

    /// Apply the synchronous part of a click.
    ///
    /// Reply-editor and emoji panel changes happen here, before this
    /// returns. Like and delete come back as [`Pending`] work for
    /// [`CommentWidget::run`].
    pub fn dispatch(&self, control: Control) -> Option<Pending> {
        tracing::debug!(?control, "dispatching control");

        // Clicking anything but an emoji control dismisses open panels.
        if !control.role().is_some_and(|r| r.is_emoji()) {
            self.emoji.dismiss(&self.dom);
        }

        match control {
            Control::Reply(id) => {
                self.open_reply_editor(&id);
                None
            }
            Control::Like(id) => Some(Pending::Like(id)),
            Control::Delete(id) => Some(Pending::Delete(id)),
            Control::EmojiToggle(form) => {
                self.emoji.toggle(&self.dom, &form);
                None
            }
            Control::Emoji { panel, glyph } => {
                if !self.emoji.pick(&self.dom, &panel, &glyph) {
                    self.emoji.dismiss(&self.dom);
                }
                None
            }
            Control::Outside => None,
        }
    }

    /// Finish work left by [`CommentWidget::dispatch`]. Failures have
    /// already been shown to the user; they are only logged here.
    pub async fn run(&self, pending: Pending) {
        let result = match &pending {
            Pending::Like(id) => self.like(id).await.map(|_| ()),
            Pending::Delete(id) => self.delete(id).await.map(|_| ()),
        };
        if let Err(err) = result {
            tracing::warn!(?pending, error = %err, "comment action failed");
        }
    }

    /// Dispatch a click and run whatever it leaves pending.
    pub async fn handle(&self, control: Control) {
        if let Some(pending) = self.dispatch(control) {
            self.run(pending).await;
        }
    }

    /// Close every reply-editor, then open the one for `id`.
    ///
    /// Opening an already open editor leaves it open.
    pub fn open_reply_editor(&self, id: &CommentId) -> bool {
        self.dom.hide_reply_editors();
        let opened = self.dom.set_reply_editor_visible(id, true);
        if !opened {
            tracing::debug!(comment_id = %id, "no reply editor to open");
        }
        opened
    }

    fn cookie_token(&self) -> Option<String> {
        let cookies = self.dom.cookies();
        cookie_value(&cookies, &self.config.csrf.cookie_name).map(str::to_owned)
    }

    /// Like a comment and show the server's count.
    pub async fn like(&self, id: &CommentId) -> Result<u64, ActionError> {
        let token = self.cookie_token();
        let response = match self.api.like(id, token.as_deref()).await {
            Ok(response) => response,
            Err(err) => {
                self.notifier.alert(&self.config.labels.like_failed);
                return Err(err.into());
            }
        };

        if self.dom.set_like_count(id, response.likes_count) {
            Ok(response.likes_count)
        } else {
            Err(ActionError::MissingCard(id.clone()))
        }
    }

    /// Confirm, then delete a comment and replace its card with a notice.
    pub async fn delete(&self, id: &CommentId) -> Result<DeleteOutcome, ActionError> {
        if !self.notifier.confirm(&self.config.labels.confirm_delete) {
            return Ok(DeleteOutcome::Cancelled);
        }

        let token = self.cookie_token();
        match self.api.delete(id, token.as_deref()).await {
            Ok(DeleteResponse { success: true, .. }) => {
                let notice = render_deleted_notice(&self.config.labels);
                if self.dom.replace_card_content(id, &notice) {
                    tracing::debug!(comment_id = %id, "comment deleted");
                    Ok(DeleteOutcome::Deleted)
                } else {
                    Err(ActionError::MissingCard(id.clone()))
                }
            }
            Ok(DeleteResponse { message, .. }) => {
                let message = message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| self.config.labels.delete_failed.clone());
                self.notifier.alert(&message);
                Err(ActionError::Refused {
                    id: id.clone(),
                    message,
                })
            }
            Err(err) => {
                self.notifier.alert(&self.config.labels.delete_failed);
                Err(err.into())
            }
        }
    }
}
