//! Browser DOM layer for weaver comment threads.
//!
//! This crate implements the page seams of `weaver-comments-core` on top of
//! `web-sys`. It assumes a `wasm32-unknown-unknown` target environment.
//!
//! # Architecture
//!
//! - `dom`: `BrowserDom`, the `ThreadDom` implementation over the document
//! - `events`: click decoding and delegated listener mounting
//! - `notify`: `window.alert` / `window.confirm` notifier
//!
//! # Re-exports
//!
//! This crate re-exports `weaver-comments-core` for convenience, so consumers
//! only need to depend on `weaver-comments-browser`.

pub use weaver_comments_core;
pub use weaver_comments_core::*;

pub mod dom;
pub mod events;
pub mod notify;

pub use dom::{BrowserDom, COMMENT_LIST_SELECTOR, MAIN_FORM_SELECTOR};
pub use events::{CommentsHandle, decode_click, form_key_of, mount};
pub use notify::WindowNotifier;
