//! HTML rendering for comment cards.
//!
//! Rendering is a pure function of the comment, its nesting depth and the
//! config: the same inputs always produce byte-identical markup. Text fields
//! are escaped as text and URLs as attribute values; sanitizing rich content
//! is the server's job.
//!
//! Interactive controls carry a `data-role` attribute (see
//! [`crate::controls::ControlRole`]) so event dispatch never depends on
//! styling classes.

use std::fmt::{self, Write};

use markdown_weaver_escape::{FmtWriter, escape_href, escape_html};

use crate::config::{CommentsConfig, EmojiPalette, Labels};
use crate::types::Comment;

/// Glyph shown on the emoji toggle button.
pub const EMOJI_TOGGLE_GLYPH: &str = "😊";

/// Render the card for `comment` at nesting `depth` (top-level is 0).
pub fn render_comment(comment: &Comment, depth: usize, config: &CommentsConfig) -> String {
    let mut html = String::with_capacity(2048);
    // Writing into a String can't fail.
    let _ = write_comment(&mut html, comment, depth, config);
    html
}

/// Markup that replaces a deleted card's content.
pub fn render_deleted_notice(labels: &Labels) -> String {
    let mut html = String::new();
    let _ = write_deleted_notice(&mut html, labels);
    html
}

/// The hidden emoji panel for one form.
pub fn render_emoji_panel(palette: &EmojiPalette) -> String {
    let mut html = String::new();
    let _ = write_emoji_panel(&mut html, palette);
    html
}

fn esc(out: &mut String, s: &str) -> fmt::Result {
    escape_html(FmtWriter(&mut *out), s)
}

fn url(out: &mut String, s: &str) -> fmt::Result {
    escape_href(FmtWriter(&mut *out), s)
}

fn write_comment(
    out: &mut String,
    comment: &Comment,
    depth: usize,
    config: &CommentsConfig,
) -> fmt::Result {
    let labels = &config.labels;
    let id = comment.id.as_str();

    out.push_str(r#"<div class="card mt-2" id="comment-"#);
    esc(out, id)?;
    out.push_str(r#"" data-comment-id=""#);
    esc(out, id)?;
    write!(out, r#"" data-depth="{depth}">"#)?;
    out.push_str(r#"<div class="card-body">"#);

    // Header: author block and like/delete controls.
    out.push_str(r#"<div class="d-flex justify-content-between"><div>"#);
    out.push_str(r#"<img src=""#);
    let avatar = if comment.avatar.trim().is_empty() {
        config.thread.default_avatar.as_str()
    } else {
        comment.avatar.as_str()
    };
    url(out, avatar)?;
    out.push_str(r#"" alt=""#);
    esc(out, &labels.avatar_alt)?;
    out.push_str(r#"" class="rounded-circle me-1" width="25">"#);
    out.push_str("<strong>");
    esc(out, &comment.author)?;
    out.push_str(r#"</strong> <small class="text-muted">"#);
    esc(out, &comment.created_at)?;
    out.push_str("</small></div><div>");

    out.push_str(
        r#"<button type="button" class="btn btn-sm btn-outline-danger like-btn" data-role="like" data-comment-id=""#,
    );
    esc(out, id)?;
    write!(
        out,
        r#""><i class="far fa-heart"></i> (<span class="like-count">{}</span>)</button>"#,
        comment.likes_count
    )?;
    if comment.can_delete() {
        out.push_str(
            r#"<button type="button" class="btn btn-sm btn-outline-danger delete-btn" data-role="delete" data-comment-id=""#,
        );
        esc(out, id)?;
        out.push_str(r#"">"#);
        esc(out, &labels.delete)?;
        out.push_str("</button>");
    }
    out.push_str("</div></div>");

    // Body.
    out.push_str(r#"<p class="mt-2">"#);
    esc(out, &comment.content)?;
    if let Some(image) = &comment.image {
        out.push_str(r#"<br><img src=""#);
        url(out, image)?;
        out.push_str(r#"" class="img-fluid mt-2" style="max-height:200px;">"#);
    }
    out.push_str("</p>");

    if config.thread.allows_replies_at(depth) {
        write_reply_editor(out, comment, config)?;
    }

    out.push_str(r#"<div class="replies mt-3"></div>"#);
    out.push_str("</div></div>");
    Ok(())
}

fn write_reply_editor(out: &mut String, comment: &Comment, config: &CommentsConfig) -> fmt::Result {
    let id = comment.id.as_str();

    out.push_str(
        r#"<button type="button" class="btn btn-sm btn-link reply-btn" data-role="reply" data-comment-id=""#,
    );
    esc(out, id)?;
    out.push_str(r#"">"#);
    esc(out, &config.labels.reply)?;
    out.push_str("</button>");

    out.push_str(r#"<div class="reply-form mt-2" id="reply-form-"#);
    esc(out, id)?;
    out.push_str(r#"" style="display:none;">"#);

    out.push_str(r#"<form method="post" enctype="multipart/form-data" action=""#);
    url(out, &config.endpoints.add_path(&comment.article_id))?;
    out.push_str(r#"" data-comment-id=""#);
    esc(out, id)?;
    out.push_str(r#"">"#);

    out.push_str(r#"<input type="hidden" name=""#);
    esc(out, &config.csrf.form_field)?;
    out.push_str(r#"" value=""#);
    esc(out, &comment.csrf)?;
    out.push_str(r#"">"#);
    out.push_str(r#"<input type="hidden" name="parent_id" value=""#);
    esc(out, id)?;
    out.push_str(r#"">"#);

    out.push_str(r#"<div class="position-relative mb-2">"#);
    out.push_str(
        r#"<textarea name="content" class="form-control comment-textarea" rows="2" required></textarea>"#,
    );
    write!(
        out,
        r#"<button type="button" class="btn btn-sm btn-light emoji-btn" data-role="emoji-toggle" style="position:absolute; right:5px; bottom:5px;">{EMOJI_TOGGLE_GLYPH}</button>"#
    )?;
    write_emoji_panel(out, &config.emoji)?;
    out.push_str("</div>");

    out.push_str(r#"<input type="file" name="image" accept="image/*" class="form-control mb-2">"#);
    out.push_str(r#"<button type="submit" class="btn btn-sm btn-primary">"#);
    esc(out, &config.labels.reply)?;
    out.push_str("</button>");

    out.push_str("</form></div>");
    Ok(())
}

fn write_emoji_panel(out: &mut String, palette: &EmojiPalette) -> fmt::Result {
    out.push_str(r#"<div class="emoji-panel d-none">"#);
    for glyph in palette.iter() {
        out.push_str(r#"<span data-role="emoji">"#);
        esc(out, glyph)?;
        out.push_str("</span>");
    }
    out.push_str("</div>");
    Ok(())
}

fn write_deleted_notice(out: &mut String, labels: &Labels) -> fmt::Result {
    out.push_str(r#"<div class="alert alert-warning">"#);
    esc(out, &labels.deleted_notice)?;
    out.push_str("</div>");
    Ok(())
}
