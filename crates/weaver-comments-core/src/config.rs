//! Widget configuration.
//!
//! Every field has a default matching the stock blog deployment, so an
//! empty JSON object (or no config at all) yields a working widget.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{ArticleId, CommentId};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentsConfig {
    pub endpoints: Endpoints,
    pub csrf: CsrfConfig,
    pub thread: ThreadConfig,
    /// Glyphs offered by every emoji picker, in display order.
    pub emoji: EmojiPalette,
    pub labels: Labels,
}

impl CommentsConfig {
    /// Parse a config from JSON. Missing sections and fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Endpoint paths. `{id}` and `{article_id}` are substituted per request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    /// Base URL relative paths resolve against. `None` means paths must
    /// already be absolute; the browser layer fills in the page origin.
    pub base_url: Option<String>,
    pub add: String,
    pub like: String,
    pub delete: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            base_url: None,
            add: "/comments/add/{article_id}/".to_owned(),
            like: "/comments/like/{id}/".to_owned(),
            delete: "/comments/delete/{id}/".to_owned(),
        }
    }
}

impl Endpoints {
    pub fn add_path(&self, article: &ArticleId) -> String {
        self.add.replace("{article_id}", article.as_str())
    }

    pub fn like_path(&self, id: &CommentId) -> String {
        self.like.replace("{id}", id.as_str())
    }

    pub fn delete_path(&self, id: &CommentId) -> String {
        self.delete.replace("{id}", id.as_str())
    }
}

/// Where the anti-forgery token lives and how it is sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsrfConfig {
    pub cookie_name: String,
    pub header_name: String,
    /// Hidden form field carrying the token in rendered forms.
    pub form_field: String,
}

impl Default for CsrfConfig {
    fn default() -> Self {
        Self {
            cookie_name: "csrftoken".to_owned(),
            header_name: "X-CSRFToken".to_owned(),
            form_field: "csrfmiddlewaretoken".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreadConfig {
    /// Maximum nesting depth; cards at this depth get no reply controls and
    /// submissions replying to them are refused. Top-level cards are depth
    /// 0. `None` allows unbounded nesting.
    pub max_depth: Option<usize>,
    /// Avatar shown when the server sends an empty avatar URL.
    pub default_avatar: String,
}

impl Default for ThreadConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            default_avatar: "/static/images/default-avatar.png".to_owned(),
        }
    }
}

impl ThreadConfig {
    /// Whether a card at `depth` may be replied to.
    pub fn allows_replies_at(&self, depth: usize) -> bool {
        self.max_depth.is_none_or(|max| depth < max)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmojiPalette(pub Vec<String>);

impl Default for EmojiPalette {
    fn default() -> Self {
        Self(
            [
                "😄", "😆", "😂", "🤣", "😊", "😍", "😭", "😡", "👍", "👎", "🎉", "❤️", "🔥",
            ]
            .into_iter()
            .map(str::to_owned)
            .collect(),
        )
    }
}

impl EmojiPalette {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// User-facing strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Labels {
    pub reply: String,
    pub delete: String,
    pub avatar_alt: String,
    pub deleted_notice: String,
    pub confirm_delete: String,
    pub submit_failed: String,
    pub like_failed: String,
    pub delete_failed: String,
    pub reply_detached: String,
    pub comment_detached: String,
    pub reply_too_deep: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            reply: "Reply".to_owned(),
            delete: "Delete".to_owned(),
            avatar_alt: "Avatar".to_owned(),
            deleted_notice: "This comment has been deleted".to_owned(),
            confirm_delete: "Delete this comment?".to_owned(),
            submit_failed: "Submission failed, please try again".to_owned(),
            like_failed: "Couldn't update the like count, please try again".to_owned(),
            delete_failed: "Couldn't delete the comment".to_owned(),
            reply_detached: "Your reply was saved and will appear after reloading the page"
                .to_owned(),
            comment_detached: "Your comment was saved and will appear after reloading the page"
                .to_owned(),
            reply_too_deep: "This conversation is nested too deeply to reply here".to_owned(),
        }
    }
}
