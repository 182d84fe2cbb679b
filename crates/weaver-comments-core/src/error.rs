//! Error types for the comment widget.

use miette::Diagnostic;

use crate::dom::FormKey;
use crate::types::CommentId;

/// Failure talking to one of the comment endpoints.
#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum ApiError {
    #[error("invalid endpoint url: {0}")]
    #[diagnostic(code(comments::api::url), help("set `endpoints.base_url` for relative paths"))]
    Url(#[from] url::ParseError),

    #[error("request failed: {0}")]
    #[diagnostic(code(comments::api::transport))]
    Transport(#[from] reqwest::Error),

    #[error("server answered {status} without a readable body")]
    #[diagnostic(code(comments::api::status))]
    Status { status: u16 },

    #[error("malformed response body: {0}")]
    #[diagnostic(code(comments::api::decode))]
    Decode(#[from] serde_json::Error),
}

/// Error reported by a DOM implementation.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
#[error("dom operation failed: {0}")]
#[diagnostic(code(comments::dom))]
pub struct DomError(pub String);

impl From<&str> for DomError {
    fn from(s: &str) -> Self {
        DomError(s.to_string())
    }
}

impl From<String> for DomError {
    fn from(s: String) -> Self {
        DomError(s)
    }
}

/// A rendered comment could not be attached to the thread.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum PlacementError {
    #[error("comment list container is not on the page")]
    #[diagnostic(code(comments::placement::missing_list))]
    MissingList,

    #[error("parent comment {parent} is not on the page")]
    #[diagnostic(code(comments::placement::missing_parent))]
    MissingParent { parent: CommentId },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Dom(#[from] DomError),
}

/// A form submission ended without a comment on the page.
#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum SubmitError {
    #[error("form {0} is not on the page")]
    #[diagnostic(code(comments::submit::missing_form))]
    MissingForm(FormKey),

    #[error("server rejected the comment: {0}")]
    #[diagnostic(code(comments::submit::rejected))]
    Rejected(String),

    #[error("comment {parent} at depth {depth} cannot take replies")]
    #[diagnostic(
        code(comments::submit::too_deep),
        help("raise `thread.max_depth` or reply higher up the thread")
    )]
    TooDeep { parent: CommentId, depth: usize },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Api(#[from] ApiError),
}

/// Like or delete request that did not update the page.
#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum ActionError {
    #[error("delete of comment {id} refused: {message}")]
    #[diagnostic(code(comments::action::refused))]
    Refused { id: CommentId, message: String },

    #[error("comment {0} is not on the page")]
    #[diagnostic(code(comments::action::missing_card))]
    MissingCard(CommentId),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Api(#[from] ApiError),
}

#[derive(thiserror::Error, Debug, Diagnostic)]
#[error("invalid comments config: {0}")]
#[diagnostic(code(comments::config))]
pub struct ConfigError(#[from] serde_json::Error);
