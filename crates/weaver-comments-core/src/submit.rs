//! Form submission.
//!
//! `submit` serializes a form, posts it and applies the response:
//!
//! 1. transport or decode failure: generic alert, page untouched, input kept
//! 2. server rejection: alert with the server's message, page untouched
//!    (replies to a card at `thread.max_depth` are refused before posting)
//! 3. success: render, place, clear the form, collapse its reply-editor
//!
//! The response is fully received and decoded before anything on the page
//! changes. Nothing is retried.

use crate::api::CommentApi;
use crate::dom::{FormKey, ThreadDom};
use crate::error::{PlacementError, SubmitError};
use crate::notify::Notifier;
use crate::placement::render_and_place;
use crate::types::{CommentId, CreateOutcome};
use crate::widget::CommentWidget;

/// What a successful submission did to the page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The new card is on the page.
    Placed(CommentId),
    /// The server stored the comment but it could not be attached here
    /// (e.g. its parent card is gone). The user was told to reload.
    Detached {
        id: CommentId,
        reason: PlacementError,
    },
}

impl<D, A, N> CommentWidget<D, A, N>
where
    D: ThreadDom,
    A: CommentApi,
    N: Notifier,
{
    /// Submit a comment form and apply the result.
    pub async fn submit(&self, key: &FormKey) -> Result<SubmitOutcome, SubmitError> {
        let Some(form) = self.dom.read_form(key).await else {
            tracing::error!(form = %key, "submitted form is not on the page");
            return Err(SubmitError::MissingForm(key.clone()));
        };

        if let Some(parent) = key.reply_to()
            && let Some(depth) = self.dom.card_depth(parent)
            && !self.config.thread.allows_replies_at(depth)
        {
            tracing::warn!(form = %key, depth, "reply past the nesting cap refused");
            self.notifier.alert(&self.config.labels.reply_too_deep);
            return Err(SubmitError::TooDeep {
                parent: parent.clone(),
                depth,
            });
        }

        let outcome = match self.api.create(&form).await {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::warn!(form = %key, error = %err, "comment submission failed");
                self.notifier.alert(&self.config.labels.submit_failed);
                return Err(err.into());
            }
        };

        let comment = match outcome {
            CreateOutcome::Created(comment) => comment,
            CreateOutcome::Rejected(message) => {
                tracing::debug!(form = %key, %message, "comment rejected by server");
                self.notifier.alert(&message);
                return Err(SubmitError::Rejected(message));
            }
        };

        match render_and_place(&self.dom, &comment, &self.config) {
            Ok(id) => {
                self.clear_form(key);
                Ok(SubmitOutcome::Placed(id))
            }
            Err(reason) => {
                // Already saved server-side: clear the form regardless.
                tracing::warn!(
                    form = %key,
                    comment_id = %comment.id,
                    error = %reason,
                    "saved comment could not be placed"
                );
                self.clear_form(key);
                let labels = &self.config.labels;
                self.notifier.alert(match comment.parent_id {
                    Some(_) => &labels.reply_detached,
                    None => &labels.comment_detached,
                });
                Ok(SubmitOutcome::Detached {
                    id: comment.id,
                    reason,
                })
            }
        }
    }

    fn clear_form(&self, key: &FormKey) {
        self.dom.reset_form(key);
        if let Some(id) = key.reply_to() {
            self.dom.set_reply_editor_visible(id, false);
        }
    }
}
