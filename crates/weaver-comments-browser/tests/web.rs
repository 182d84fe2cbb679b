//! WASM browser tests for weaver-comments-browser.
//!
//! Run with: `wasm-pack test --headless --firefox` or `--chrome`

#![cfg(target_arch = "wasm32")]

use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

use weaver_comments_browser::{
    BrowserDom, Comment, CommentId, CommentsConfig, Control, FormKey, TextInputState, ThreadDom,
    decode_click, render_and_place, render_comment,
};

const PAGE: &str = r#"
<form class="main-comment-form" method="post" action="/comments/add/1/">
  <input type="hidden" name="csrfmiddlewaretoken" value="form-token">
  <div class="position-relative">
    <textarea name="content" class="comment-textarea"></textarea>
    <button type="button" class="emoji-btn">😊</button>
    <div class="emoji-panel d-none"><span>😄</span><span>🔥</span></div>
  </div>
  <input type="file" name="image">
  <button type="submit">Send</button>
</form>
<div class="comment-list"></div>
<p id="elsewhere">nothing here</p>
"#;

fn fresh_page() -> BrowserDom {
    let dom = BrowserDom::from_global().unwrap();
    dom.document().body().unwrap().set_inner_html(PAGE);
    dom
}

fn comment(id: &str, parent: Option<&str>) -> Comment {
    Comment {
        id: CommentId::new(id),
        article_id: "1".into(),
        parent_id: parent.map(CommentId::new),
        author: "ada".into(),
        avatar: String::new(),
        created_at: "2024-05-01 10:00".into(),
        content: format!("comment {id}"),
        image: None,
        likes_count: 0,
        is_author: true,
        is_staff: false,
        csrf: "reply-token".into(),
        is_reply: parent.is_some(),
    }
}

fn element(dom: &BrowserDom, selector: &str) -> web_sys::Element {
    dom.document().query_selector(selector).unwrap().unwrap()
}

// === Placement ===

#[wasm_bindgen_test]
fn test_cards_nest_under_their_parent() {
    let dom = fresh_page();
    let config = CommentsConfig::default();
    render_and_place(&dom, &comment("5", None), &config).unwrap();
    render_and_place(&dom, &comment("6", Some("5")), &config).unwrap();
    render_and_place(&dom, &comment("7", None), &config).unwrap();

    let list = element(&dom, ".comment-list");
    assert_eq!(list.first_element_child().unwrap().id(), "comment-7");
    assert!(dom
        .document()
        .query_selector("#comment-5 .replies > #comment-6")
        .unwrap()
        .is_some());
    assert_eq!(dom.card_depth(&CommentId::new("6")), Some(1));
}

#[wasm_bindgen_test]
fn test_depth_without_data_attribute() {
    let dom = fresh_page();
    let config = CommentsConfig::default();
    render_and_place(&dom, &comment("5", None), &config).unwrap();
    let child = render_comment(&comment("6", Some("5")), 1, &config).replace(r#" data-depth="1""#, "");
    element(&dom, "#comment-5 .replies")
        .insert_adjacent_html("beforeend", &child)
        .unwrap();

    assert_eq!(dom.card_depth(&CommentId::new("6")), Some(1));
}

#[wasm_bindgen_test]
fn test_deleted_card_is_not_a_parent() {
    let dom = fresh_page();
    render_and_place(&dom, &comment("5", None), &CommentsConfig::default()).unwrap();
    assert!(dom.replace_card_content(&CommentId::new("5"), "<div class=\"alert\">gone</div>"));
    assert_eq!(dom.card_depth(&CommentId::new("5")), None);
}

// === Controls ===

#[wasm_bindgen_test]
fn test_like_count_updates_in_place() {
    let dom = fresh_page();
    render_and_place(&dom, &comment("5", None), &CommentsConfig::default()).unwrap();
    assert!(dom.set_like_count(&CommentId::new("5"), 3));
    assert_eq!(
        element(&dom, "#comment-5 .like-count").text_content().as_deref(),
        Some("3")
    );
}

#[wasm_bindgen_test]
fn test_reply_editor_visibility() {
    let dom = fresh_page();
    render_and_place(&dom, &comment("5", None), &CommentsConfig::default()).unwrap();
    let id = CommentId::new("5");

    assert!(dom.set_reply_editor_visible(&id, true));
    let editor = element(&dom, "#reply-form-5");
    assert_eq!(editor.get_attribute("style").as_deref(), Some("display: block;"));

    dom.hide_reply_editors();
    assert_eq!(editor.get_attribute("style").as_deref(), Some("display: none;"));
}

#[wasm_bindgen_test]
fn test_decode_rendered_and_legacy_controls() {
    let dom = fresh_page();
    render_and_place(&dom, &comment("5", None), &CommentsConfig::default()).unwrap();

    assert_eq!(
        decode_click(&element(&dom, "#comment-5 [data-role=like] .like-count")),
        Control::Like(CommentId::new("5"))
    );
    assert_eq!(
        decode_click(&element(&dom, "#reply-form-5 [data-role=emoji-toggle]")),
        Control::EmojiToggle(FormKey::Reply(CommentId::new("5")))
    );
    // Server template without data-role attributes.
    assert_eq!(
        decode_click(&element(&dom, ".main-comment-form .emoji-btn")),
        Control::EmojiToggle(FormKey::Main)
    );
    assert_eq!(
        decode_click(&element(&dom, ".main-comment-form .emoji-panel span")),
        Control::Emoji {
            panel: FormKey::Main,
            glyph: "😄".into()
        }
    );
    assert_eq!(decode_click(&element(&dom, "#elsewhere")), Control::Outside);
}

// === Forms ===

#[wasm_bindgen_test]
fn test_emoji_panel_toggles_class() {
    let dom = fresh_page();
    assert!(!dom.emoji_panel_visible(&FormKey::Main));
    assert!(dom.set_emoji_panel_visible(&FormKey::Main, true));
    assert!(dom.emoji_panel_visible(&FormKey::Main));
    dom.hide_emoji_panels();
    assert!(!dom.emoji_panel_visible(&FormKey::Main));
}

#[wasm_bindgen_test]
fn test_text_input_offsets_are_chars() {
    let dom = fresh_page();
    let state = TextInputState::with_caret("a😊b", 2);
    assert!(dom.set_text_input(&FormKey::Main, &state));

    let textarea = element(&dom, ".main-comment-form textarea")
        .dyn_into::<web_sys::HtmlTextAreaElement>()
        .unwrap();
    // The browser counts UTF-16 code units.
    assert_eq!(textarea.selection_start().unwrap(), Some(3));
    assert_eq!(dom.text_input(&FormKey::Main), Some(state));
}

#[wasm_bindgen_test]
async fn test_read_and_reset_form() {
    let dom = fresh_page();
    dom.set_text_input(&FormKey::Main, &TextInputState::with_caret("hello", 5));

    let form = dom.read_form(&FormKey::Main).await.unwrap();
    assert!(form.action.ends_with("/comments/add/1/"));
    assert_eq!(form.field("csrfmiddlewaretoken"), Some("form-token"));
    assert_eq!(form.field("content"), Some("hello"));
    assert_eq!(form.image, None);

    dom.reset_form(&FormKey::Main);
    assert_eq!(dom.text_input(&FormKey::Main).unwrap().value, "");
    let form = dom.read_form(&FormKey::Main).await.unwrap();
    assert_eq!(form.field("csrfmiddlewaretoken"), Some("form-token"));
}
