//! weaver-comments-core: comment thread protocol without a browser.
//!
//! This crate provides:
//! - `Comment` and the endpoint response types
//! - `render_comment` - card markup with nested reply-editor and emoji panel
//! - `locate`/`place` - where a new card goes in the thread
//! - `CommentWidget` - form submission, reply/like/delete handling and the
//!   emoji picker, generic over `ThreadDom`, `CommentApi` and `Notifier`
//! - `HttpCommentApi` - reqwest client for the comment endpoints
//! - `MemoryDom` - in-memory page implementing `ThreadDom`

pub mod api;
pub mod config;
pub mod controls;
pub mod cookie;
pub mod dom;
pub mod emoji;
pub mod error;
pub mod memory;
pub mod notify;
pub mod placement;
pub mod render;
pub mod submit;
pub mod types;
pub mod widget;

pub use api::{CommentApi, HttpCommentApi};
pub use config::{CommentsConfig, CsrfConfig, EmojiPalette, Endpoints, Labels, ThreadConfig};
pub use controls::{COMMENT_ID_ATTRIBUTE, Control, ControlRole, Pending, ROLE_ATTRIBUTE};
pub use cookie::cookie_value;
pub use dom::{Anchor, Attachment, CommentForm, FormKey, TextInputState, ThreadDom};
pub use emoji::{EmojiPicker, char_to_utf16, splice, utf16_to_char};
pub use error::{ActionError, ApiError, ConfigError, DomError, PlacementError, SubmitError};
pub use memory::{MemoryDom, PageSnapshot};
pub use notify::Notifier;
pub use placement::{Slot, locate, place, render_and_place};
pub use render::{render_comment, render_deleted_notice, render_emoji_panel};
pub use submit::SubmitOutcome;
pub use types::{ArticleId, Comment, CommentId, CreateOutcome, DeleteResponse, LikeResponse};
pub use widget::{CommentWidget, DeleteOutcome};
