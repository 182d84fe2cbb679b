//! Comment records and endpoint response shapes.
//!
//! Everything here is display state received from the server. The client
//! never persists these values; a `Comment` lives exactly as long as the
//! card rendered from it.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use smol_str::{SmolStr, ToSmolStr};

/// Opaque comment identifier.
///
/// The server may send ids as JSON integers or strings. Both are kept as
/// text since the client only ever formats them into DOM ids and URLs.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CommentId(SmolStr);

/// Opaque article identifier, used to build reply form targets.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ArticleId(SmolStr);

macro_rules! opaque_id {
    ($ty:ident) => {
        impl $ty {
            pub fn new(id: impl AsRef<str>) -> Self {
                Self(SmolStr::new(id.as_ref()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $ty {
            fn from(id: &str) -> Self {
                Self::new(id)
            }
        }

        impl From<u64> for $ty {
            fn from(id: u64) -> Self {
                Self(id.to_smolstr())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                #[derive(Deserialize)]
                #[serde(untagged)]
                enum RawId {
                    Num(serde_json::Number),
                    Str(SmolStr),
                }

                Ok(match RawId::deserialize(deserializer)? {
                    RawId::Num(n) => Self(n.to_smolstr()),
                    RawId::Str(s) => Self(s),
                })
            }
        }
    };
}

opaque_id!(CommentId);
opaque_id!(ArticleId);

impl CommentId {
    /// DOM id of the card rendered for this comment.
    pub fn card_dom_id(&self) -> String {
        format!("comment-{}", self.0)
    }

    /// DOM id of the reply-editor nested in this comment's card.
    pub fn reply_editor_dom_id(&self) -> String {
        format!("reply-form-{}", self.0)
    }

    /// Parse a card DOM id (`comment-{id}`) back into the comment id.
    pub fn from_card_dom_id(dom_id: &str) -> Option<Self> {
        dom_id
            .strip_prefix("comment-")
            .filter(|id| !id.is_empty())
            .map(Self::new)
    }

    /// Parse a reply-editor DOM id (`reply-form-{id}`) back into the comment id.
    pub fn from_reply_editor_dom_id(dom_id: &str) -> Option<Self> {
        dom_id
            .strip_prefix("reply-form-")
            .filter(|id| !id.is_empty())
            .map(Self::new)
    }
}

/// A comment as returned by the create endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub article_id: ArticleId,
    #[serde(default)]
    pub parent_id: Option<CommentId>,
    pub author: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub avatar: String,
    pub created_at: String,
    pub content: String,
    /// Attachment URL. The server sends `""` for "no image".
    #[serde(default, deserialize_with = "empty_as_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub likes_count: u64,
    #[serde(default)]
    pub is_author: bool,
    #[serde(default)]
    pub is_staff: bool,
    /// Anti-forgery token to embed in this card's reply form.
    #[serde(default, deserialize_with = "null_as_default")]
    pub csrf: String,
    #[serde(default)]
    pub is_reply: bool,
}

impl Comment {
    /// Whether the current viewer gets a delete control on this card.
    pub fn can_delete(&self) -> bool {
        self.is_author || self.is_staff
    }
}

/// Interpreted body of a create-comment response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CreateOutcome {
    /// The server stored the comment.
    Created(Comment),
    /// The server rejected the submission with a user-facing message.
    Rejected(String),
}

impl CreateOutcome {
    /// Decode a create response body.
    ///
    /// A non-empty `error` member wins over everything else in the body.
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        use serde_json::Value;

        let value: Value = serde_json::from_slice(body)?;

        let rejection = match value.get("error") {
            None | Some(Value::Null) | Some(Value::Bool(false)) => None,
            Some(Value::String(msg)) if msg.is_empty() => None,
            Some(Value::String(msg)) => Some(msg.clone()),
            Some(other) => Some(other.to_string()),
        };
        match rejection {
            Some(msg) => Ok(Self::Rejected(msg)),
            None => serde_json::from_value(value).map(Self::Created),
        }
    }
}

/// Body of a like response.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeResponse {
    #[serde(alias = "likes")]
    pub likes_count: u64,
}

/// Body of a delete response.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

fn empty_as_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
