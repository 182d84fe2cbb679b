//! `ThreadDom` over the live document.
//!
//! Cards are found by their `comment-{id}` element id and reply-editors by
//! `reply-form-{id}`. Everything else is located relative to those with
//! class selectors, so server-rendered cards work the same as ones this
//! crate inserted.

use js_sys::Uint8Array;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    Document, Element, HtmlDocument, HtmlElement, HtmlFormElement, HtmlInputElement,
    HtmlTextAreaElement,
};

use weaver_comments_core::{
    Anchor, Attachment, Comment, CommentForm, CommentId, DomError, FormKey, TextInputState,
    ThreadDom, char_to_utf16, utf16_to_char,
};

/// Root container of top-level cards.
pub const COMMENT_LIST_SELECTOR: &str = ".comment-list";

/// The top-level "write a comment" form.
pub const MAIN_FORM_SELECTOR: &str = ".main-comment-form";

const REPLY_EDITOR_SELECTOR: &str = ".reply-form";
const REPLIES_SELECTOR: &str = ".replies";
const LIKE_COUNT_SELECTOR: &str = ".like-count";
const EMOJI_PANEL_SELECTOR: &str = ".emoji-panel";
const TEXT_INPUT_SELECTOR: &str = "textarea[name=content]";
const HIDDEN_CLASS: &str = "d-none";

/// Browser implementation of [`ThreadDom`].
#[derive(Clone, Debug)]
pub struct BrowserDom {
    document: Document,
}

impl BrowserDom {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    /// DOM for the current global document, if there is one.
    pub fn from_global() -> Option<Self> {
        let document = web_sys::window()?.document()?;
        Some(Self::new(document))
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    fn select(&self, selector: &str) -> Option<Element> {
        self.document.query_selector(selector).ok().flatten()
    }

    fn select_all(&self, selector: &str) -> Vec<Element> {
        let Ok(nodes) = self.document.query_selector_all(selector) else {
            return Vec::new();
        };
        (0..nodes.length())
            .filter_map(|i| nodes.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn card(&self, id: &CommentId) -> Option<Element> {
        self.document.get_element_by_id(&id.card_dom_id())
    }

    /// The card's own reply container. Deleted cards have none.
    fn replies_of(&self, id: &CommentId) -> Option<Element> {
        // The card's container precedes any nested one in document order.
        self.card(id)?.query_selector(REPLIES_SELECTOR).ok().flatten()
    }

    fn form_element(&self, key: &FormKey) -> Option<HtmlFormElement> {
        let form = match key {
            FormKey::Main => self.select(MAIN_FORM_SELECTOR)?,
            FormKey::Reply(id) => self
                .document
                .get_element_by_id(&id.reply_editor_dom_id())?
                .query_selector("form")
                .ok()
                .flatten()?,
        };
        form.dyn_into::<HtmlFormElement>().ok()
    }

    fn textarea(&self, key: &FormKey) -> Option<HtmlTextAreaElement> {
        self.form_element(key)?
            .query_selector(TEXT_INPUT_SELECTOR)
            .ok()
            .flatten()?
            .dyn_into::<HtmlTextAreaElement>()
            .ok()
    }

    fn emoji_panel(&self, key: &FormKey) -> Option<Element> {
        self.form_element(key)?
            .query_selector(EMOJI_PANEL_SELECTOR)
            .ok()
            .flatten()
    }
}

fn set_display(element: &Element, visible: bool) -> bool {
    let Some(element) = element.dyn_ref::<HtmlElement>() else {
        return false;
    };
    let value = if visible { "block" } else { "none" };
    match element.style().set_property("display", value) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("failed to set display: {:?}", e);
            false
        }
    }
}

fn set_hidden_class(element: &Element, hidden: bool) {
    let class_list = element.class_list();
    let result = if hidden {
        class_list.add_1(HIDDEN_CLASS)
    } else {
        class_list.remove_1(HIDDEN_CLASS)
    };
    if let Err(e) = result {
        tracing::warn!("failed to toggle {}: {:?}", HIDDEN_CLASS, e);
    }
}

/// Count enclosing reply containers. Used when a server-rendered card has
/// no `data-depth` attribute.
fn depth_from_ancestors(card: &Element) -> usize {
    let mut depth = 0;
    let mut node = card.parent_element();
    while let Some(element) = node {
        if element.class_list().contains("replies") {
            depth += 1;
        }
        if element.matches(COMMENT_LIST_SELECTOR).unwrap_or(false) {
            break;
        }
        node = element.parent_element();
    }
    depth
}

async fn read_attachment(input: &HtmlInputElement) -> Option<Attachment> {
    let file = input.files()?.get(0)?;
    let buffer = match JsFuture::from(file.array_buffer()).await {
        Ok(buffer) => buffer,
        Err(e) => {
            tracing::warn!("failed to read attachment: {:?}", e);
            return None;
        }
    };
    let mime = file.type_();
    Some(Attachment {
        file_name: file.name(),
        mime: (!mime.is_empty()).then_some(mime),
        bytes: Uint8Array::new(&buffer).to_vec(),
    })
}

impl ThreadDom for BrowserDom {
    fn card_depth(&self, id: &CommentId) -> Option<usize> {
        let card = self.card(id)?;
        self.replies_of(id)?;
        let depth = card
            .get_attribute("data-depth")
            .and_then(|d| d.parse().ok())
            .unwrap_or_else(|| depth_from_ancestors(&card));
        Some(depth)
    }

    fn has_comment_list(&self) -> bool {
        self.select(COMMENT_LIST_SELECTOR).is_some()
    }

    fn insert_card(&self, anchor: &Anchor, comment: &Comment, html: &str) -> Result<(), DomError> {
        if self.card(&comment.id).is_some() {
            return Err(DomError(format!(
                "duplicate card {}",
                comment.id.card_dom_id()
            )));
        }
        let (container, position) = match anchor {
            Anchor::ListStart => (
                self.select(COMMENT_LIST_SELECTOR)
                    .ok_or_else(|| DomError::from("no comment list"))?,
                "afterbegin",
            ),
            Anchor::RepliesOf(parent) => (
                self.replies_of(parent)
                    .ok_or_else(|| DomError(format!("no reply container for {parent}")))?,
                "beforeend",
            ),
        };
        container
            .insert_adjacent_html(position, html)
            .map_err(|e| DomError(format!("{e:?}")))
    }

    async fn read_form(&self, form: &FormKey) -> Option<CommentForm> {
        let element = self.form_element(form)?;
        let mut out = CommentForm::new(element.action());

        let controls = element.elements();
        for i in 0..controls.length() {
            let Some(control) = controls.item(i) else {
                continue;
            };
            if let Some(textarea) = control.dyn_ref::<HtmlTextAreaElement>() {
                if !textarea.disabled() && !textarea.name().is_empty() {
                    out.fields.push((textarea.name(), textarea.value()));
                }
                continue;
            }
            let Some(input) = control.dyn_ref::<HtmlInputElement>() else {
                continue;
            };
            let name = input.name();
            if input.disabled() || name.is_empty() {
                continue;
            }
            match input.type_().as_str() {
                "file" => {
                    if out.image.is_none() {
                        out.image = read_attachment(input).await;
                    }
                }
                "checkbox" | "radio" if !input.checked() => {}
                "submit" | "button" | "reset" | "image" => {}
                _ => out.fields.push((name, input.value())),
            }
        }
        Some(out)
    }

    fn reset_form(&self, form: &FormKey) {
        if let Some(form) = self.form_element(form) {
            form.reset();
        }
    }

    fn set_reply_editor_visible(&self, id: &CommentId, visible: bool) -> bool {
        self.document
            .get_element_by_id(&id.reply_editor_dom_id())
            .is_some_and(|editor| set_display(&editor, visible))
    }

    fn hide_reply_editors(&self) {
        for editor in self.select_all(REPLY_EDITOR_SELECTOR) {
            set_display(&editor, false);
        }
    }

    fn set_like_count(&self, id: &CommentId, count: u64) -> bool {
        let Some(counter) = self
            .card(id)
            .and_then(|card| card.query_selector(LIKE_COUNT_SELECTOR).ok().flatten())
        else {
            return false;
        };
        counter.set_text_content(Some(&count.to_string()));
        true
    }

    fn replace_card_content(&self, id: &CommentId, html: &str) -> bool {
        match self.card(id) {
            Some(card) => {
                card.set_inner_html(html);
                true
            }
            None => false,
        }
    }

    fn emoji_panel_visible(&self, form: &FormKey) -> bool {
        self.emoji_panel(form)
            .is_some_and(|panel| !panel.class_list().contains(HIDDEN_CLASS))
    }

    fn set_emoji_panel_visible(&self, form: &FormKey, visible: bool) -> bool {
        match self.emoji_panel(form) {
            Some(panel) => {
                set_hidden_class(&panel, !visible);
                true
            }
            None => false,
        }
    }

    fn hide_emoji_panels(&self) {
        for panel in self.select_all(EMOJI_PANEL_SELECTOR) {
            set_hidden_class(&panel, true);
        }
    }

    fn text_input(&self, form: &FormKey) -> Option<TextInputState> {
        let textarea = self.textarea(form)?;
        let value = textarea.value();
        let end_of_text = value.encode_utf16().count() as u32;
        let start = textarea.selection_start().ok().flatten().unwrap_or(end_of_text);
        let end = textarea.selection_end().ok().flatten().unwrap_or(start);
        let selection = utf16_to_char(&value, start as usize)..utf16_to_char(&value, end as usize);
        Some(TextInputState { value, selection })
    }

    fn set_text_input(&self, form: &FormKey, state: &TextInputState) -> bool {
        let Some(textarea) = self.textarea(form) else {
            return false;
        };
        textarea.set_value(&state.value);
        let start = char_to_utf16(&state.value, state.selection.start) as u32;
        let end = char_to_utf16(&state.value, state.selection.end) as u32;
        if let Err(e) = textarea.set_selection_range(start, end) {
            tracing::debug!("failed to restore selection: {:?}", e);
        }
        if let Err(e) = textarea.focus() {
            tracing::debug!("failed to focus text input: {:?}", e);
        }
        true
    }

    fn cookies(&self) -> String {
        self.document
            .dyn_ref::<HtmlDocument>()
            .and_then(|doc| doc.cookie().ok())
            .unwrap_or_default()
    }
}
