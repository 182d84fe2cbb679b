//! Thread insertion policy.
//!
//! Top-level comments are prepended to the comment list (newest first).
//! Replies are appended to their parent's reply container (oldest first).
//! A reply whose parent card isn't on the page is never attached anywhere
//! else.

use crate::config::CommentsConfig;
use crate::dom::{Anchor, ThreadDom};
use crate::error::PlacementError;
use crate::render::render_comment;
use crate::types::{Comment, CommentId};

/// Resolved insertion point for a comment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Slot {
    pub anchor: Anchor,
    /// Nesting depth the new card will have.
    pub depth: usize,
}

/// Find where `comment` belongs in the thread currently on the page.
pub fn locate(dom: &impl ThreadDom, comment: &Comment) -> Result<Slot, PlacementError> {
    match &comment.parent_id {
        Some(parent) => {
            let parent_depth = dom
                .card_depth(parent)
                .ok_or_else(|| PlacementError::MissingParent {
                    parent: parent.clone(),
                })?;
            Ok(Slot {
                anchor: Anchor::RepliesOf(parent.clone()),
                depth: parent_depth + 1,
            })
        }
        None if dom.has_comment_list() => Ok(Slot {
            anchor: Anchor::ListStart,
            depth: 0,
        }),
        None => Err(PlacementError::MissingList),
    }
}

/// Attach already rendered markup at `slot`.
pub fn place(
    dom: &impl ThreadDom,
    slot: &Slot,
    comment: &Comment,
    markup: &str,
) -> Result<(), PlacementError> {
    dom.insert_card(&slot.anchor, comment, markup)?;
    tracing::debug!(
        comment_id = %comment.id,
        depth = slot.depth,
        anchor = ?slot.anchor,
        "placed comment card"
    );
    Ok(())
}

/// Locate, render and place in one step. Returns the new card's id.
pub fn render_and_place(
    dom: &impl ThreadDom,
    comment: &Comment,
    config: &CommentsConfig,
) -> Result<CommentId, PlacementError> {
    let slot = locate(dom, comment)?;
    let markup = render_comment(comment, slot.depth, config);
    place(dom, &slot, comment, &markup)?;
    Ok(comment.id.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryDom, test_comment};

    #[test]
    fn test_top_level_goes_to_list_start() {
        let dom = MemoryDom::new();
        let config = CommentsConfig::default();
        render_and_place(&dom, &test_comment("1", None), &config).unwrap();
        render_and_place(&dom, &test_comment("2", None), &config).unwrap();
        assert_eq!(dom.top_level_ids(), vec!["2", "1"]);
    }

    #[test]
    fn test_replies_append_in_order() {
        let dom = MemoryDom::new();
        let config = CommentsConfig::default();
        render_and_place(&dom, &test_comment("1", None), &config).unwrap();
        render_and_place(&dom, &test_comment("2", Some("1")), &config).unwrap();
        render_and_place(&dom, &test_comment("3", Some("1")), &config).unwrap();
        assert_eq!(dom.reply_ids(&CommentId::new("1")), Some(vec!["2".into(), "3".into()]));
        assert_eq!(dom.card_depth(&CommentId::new("3")), Some(1));
    }

    #[test]
    fn test_nested_depth_increments() {
        let dom = MemoryDom::new();
        let config = CommentsConfig::default();
        render_and_place(&dom, &test_comment("1", None), &config).unwrap();
        render_and_place(&dom, &test_comment("2", Some("1")), &config).unwrap();
        let slot = locate(&dom, &test_comment("3", Some("2"))).unwrap();
        assert_eq!(slot.anchor, Anchor::RepliesOf(CommentId::new("2")));
        assert_eq!(slot.depth, 2);
    }

    #[test]
    fn test_missing_parent_is_not_placed() {
        let dom = MemoryDom::new();
        let config = CommentsConfig::default();
        render_and_place(&dom, &test_comment("1", None), &config).unwrap();
        let err = render_and_place(&dom, &test_comment("9", Some("404")), &config).unwrap_err();
        assert_eq!(
            err,
            PlacementError::MissingParent {
                parent: CommentId::new("404")
            }
        );
        assert!(!dom.contains(&CommentId::new("9")));
        assert_eq!(dom.top_level_ids(), vec!["1"]);
    }

    #[test]
    fn test_missing_list() {
        let dom = MemoryDom::without_comment_list();
        let err = locate(&dom, &test_comment("1", None)).unwrap_err();
        assert_eq!(err, PlacementError::MissingList);
    }
}
