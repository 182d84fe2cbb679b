//! In-memory page model implementing [`ThreadDom`].
//!
//! Holds the comment list as a tree of cards, each with its reply-editor
//! form, like counter and emoji panel. Structural rules match the browser:
//! card ids are unique and a deleted card loses its subtree.

use std::cell::RefCell;
use std::fmt::Write;

use crate::config::CommentsConfig;
use crate::dom::{Anchor, Attachment, CommentForm, FormKey, TextInputState, ThreadDom};
use crate::error::DomError;
use crate::placement::render_and_place;
use crate::types::{Comment, CommentId};

#[derive(Clone, Debug, PartialEq, Eq)]
struct Form {
    action: String,
    hidden: Vec<(String, String)>,
    input: TextInputState,
    image: Option<Attachment>,
    emoji_open: bool,
}

impl Form {
    fn new(action: String, hidden: Vec<(String, String)>) -> Self {
        Self {
            action,
            hidden,
            input: TextInputState::default(),
            image: None,
            emoji_open: false,
        }
    }

    fn serialize(&self) -> CommentForm {
        let mut form = CommentForm::new(self.action.clone());
        form.fields.extend(self.hidden.iter().cloned());
        form.fields
            .push(("content".to_owned(), self.input.value.clone()));
        form.image = self.image.clone();
        form
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct ReplyEditor {
    visible: bool,
    form: Form,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Card {
    id: CommentId,
    html: String,
    likes: u64,
    /// Set once the card's content was replaced by a deletion notice.
    notice: Option<String>,
    editor: Option<ReplyEditor>,
    replies: Vec<Card>,
}

impl Card {
    fn find(&self, id: &CommentId) -> Option<&Card> {
        if &self.id == id {
            return Some(self);
        }
        self.replies.iter().find_map(|c| c.find(id))
    }

    fn find_mut(&mut self, id: &CommentId) -> Option<&mut Card> {
        if &self.id == id {
            return Some(self);
        }
        self.replies.iter_mut().find_map(|c| c.find_mut(id))
    }

    fn depth_of(&self, id: &CommentId, depth: usize) -> Option<usize> {
        if &self.id == id {
            return Some(depth);
        }
        self.replies
            .iter()
            .find_map(|c| c.depth_of(id, depth + 1))
    }

    fn walk<'a>(&'a self, out: &mut Vec<&'a Card>) {
        out.push(self);
        for reply in &self.replies {
            reply.walk(out);
        }
    }

    fn walk_mut(&mut self, f: &mut impl FnMut(&mut Card)) {
        f(self);
        for reply in &mut self.replies {
            reply.walk_mut(f);
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Page {
    has_list: bool,
    cards: Vec<Card>,
    main_form: Option<Form>,
    focused: Option<FormKey>,
    cookies: String,
}

impl Page {
    fn find(&self, id: &CommentId) -> Option<&Card> {
        self.cards.iter().find_map(|c| c.find(id))
    }

    fn find_mut(&mut self, id: &CommentId) -> Option<&mut Card> {
        self.cards.iter_mut().find_map(|c| c.find_mut(id))
    }

    fn all_cards(&self) -> Vec<&Card> {
        let mut out = Vec::new();
        for card in &self.cards {
            card.walk(&mut out);
        }
        out
    }

    fn for_each_card(&mut self, mut f: impl FnMut(&mut Card)) {
        for card in &mut self.cards {
            card.walk_mut(&mut f);
        }
    }

    fn form(&self, key: &FormKey) -> Option<&Form> {
        match key {
            FormKey::Main => self.main_form.as_ref(),
            FormKey::Reply(id) => self
                .find(id)
                .and_then(|c| c.editor.as_ref())
                .map(|e| &e.form),
        }
    }

    fn form_mut(&mut self, key: &FormKey) -> Option<&mut Form> {
        match key {
            FormKey::Main => self.main_form.as_mut(),
            FormKey::Reply(id) => self
                .find_mut(id)
                .and_then(|c| c.editor.as_mut())
                .map(|e| &mut e.form),
        }
    }
}

/// Opaque copy of the whole page state, for before/after comparisons.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageSnapshot(Page);

/// In-memory comment page.
#[derive(Debug)]
pub struct MemoryDom {
    config: CommentsConfig,
    page: RefCell<Page>,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDom {
    /// An empty comment list with the default config and no main form.
    pub fn new() -> Self {
        Self::with_config(CommentsConfig::default())
    }

    pub fn with_config(config: CommentsConfig) -> Self {
        Self {
            config,
            page: RefCell::new(Page {
                has_list: true,
                cards: Vec::new(),
                main_form: None,
                focused: None,
                cookies: String::new(),
            }),
        }
    }

    /// A page that has no comment list container at all.
    pub fn without_comment_list() -> Self {
        let dom = Self::new();
        dom.page.borrow_mut().has_list = false;
        dom
    }

    /// Add the top-level comment form, posting to `action` with `token`.
    pub fn with_main_form(self, action: impl Into<String>, token: impl Into<String>) -> Self {
        let hidden = vec![(self.config.csrf.form_field.clone(), token.into())];
        self.page.borrow_mut().main_form = Some(Form::new(action.into(), hidden));
        self
    }

    pub fn with_cookies(self, cookies: impl Into<String>) -> Self {
        self.page.borrow_mut().cookies = cookies.into();
        self
    }

    /// Put an existing comment on the page, as if server-rendered.
    pub fn seed(&self, comment: &Comment) -> Result<(), crate::error::PlacementError> {
        render_and_place(self, comment, &self.config).map(|_| ())
    }

    pub fn snapshot(&self) -> PageSnapshot {
        PageSnapshot(self.page.borrow().clone())
    }

    // === Inspection ===

    pub fn contains(&self, id: &CommentId) -> bool {
        self.page.borrow().find(id).is_some()
    }

    /// Ids of top-level cards, in document order.
    pub fn top_level_ids(&self) -> Vec<String> {
        self.page
            .borrow()
            .cards
            .iter()
            .map(|c| c.id.to_string())
            .collect()
    }

    /// Ids of a card's direct replies, in document order.
    pub fn reply_ids(&self, id: &CommentId) -> Option<Vec<String>> {
        let page = self.page.borrow();
        let card = page.find(id)?;
        Some(card.replies.iter().map(|c| c.id.to_string()).collect())
    }

    pub fn card_html(&self, id: &CommentId) -> Option<String> {
        self.page.borrow().find(id).map(|c| c.html.clone())
    }

    /// Like counter text, `None` if the card or its counter is gone.
    pub fn like_count(&self, id: &CommentId) -> Option<u64> {
        let page = self.page.borrow();
        let card = page.find(id)?;
        card.notice.is_none().then_some(card.likes)
    }

    /// Deletion notice markup if the card was replaced.
    pub fn notice(&self, id: &CommentId) -> Option<String> {
        self.page.borrow().find(id).and_then(|c| c.notice.clone())
    }

    pub fn visible_reply_editors(&self) -> Vec<CommentId> {
        self.page
            .borrow()
            .all_cards()
            .into_iter()
            .filter(|c| c.editor.as_ref().is_some_and(|e| e.visible))
            .map(|c| c.id.clone())
            .collect()
    }

    pub fn visible_emoji_panels(&self) -> Vec<FormKey> {
        let page = self.page.borrow();
        let mut open = Vec::new();
        if page.main_form.as_ref().is_some_and(|f| f.emoji_open) {
            open.push(FormKey::Main);
        }
        for card in page.all_cards() {
            if card.editor.as_ref().is_some_and(|e| e.form.emoji_open) {
                open.push(FormKey::Reply(card.id.clone()));
            }
        }
        open
    }

    pub fn has_reply_editor(&self, id: &CommentId) -> bool {
        self.page
            .borrow()
            .find(id)
            .is_some_and(|c| c.editor.is_some())
    }

    /// The text input that last received focus.
    pub fn focused_input(&self) -> Option<FormKey> {
        self.page.borrow().focused.clone()
    }

    // === Simulated user input ===

    /// Replace a form's text and put the caret at the end.
    pub fn type_text(&self, key: &FormKey, text: &str) -> bool {
        let mut page = self.page.borrow_mut();
        let Some(form) = page.form_mut(key) else {
            return false;
        };
        let end = text.chars().count();
        form.input = TextInputState::with_caret(text, end);
        true
    }

    /// Move the selection of a form's text input.
    pub fn select(&self, key: &FormKey, selection: std::ops::Range<usize>) -> bool {
        let mut page = self.page.borrow_mut();
        let Some(form) = page.form_mut(key) else {
            return false;
        };
        form.input.selection = selection;
        true
    }

    pub fn attach_image(&self, key: &FormKey, image: Attachment) -> bool {
        let mut page = self.page.borrow_mut();
        let Some(form) = page.form_mut(key) else {
            return false;
        };
        form.image = Some(image);
        true
    }

    /// Indented list of card ids, one per line. Open reply-editors are
    /// marked `[editing]`, deleted cards `[deleted]`.
    pub fn outline(&self) -> String {
        fn line(out: &mut String, card: &Card, depth: usize) {
            if !out.is_empty() {
                out.push('\n');
            }
            let _ = write!(out, "{:indent$}{}", "", card.id.card_dom_id(), indent = depth * 2);
            if card.notice.is_some() {
                out.push_str(" [deleted]");
            }
            if card.editor.as_ref().is_some_and(|e| e.visible) {
                out.push_str(" [editing]");
            }
            for reply in &card.replies {
                line(out, reply, depth + 1);
            }
        }

        let page = self.page.borrow();
        let mut out = String::new();
        for card in &page.cards {
            line(&mut out, card, 0);
        }
        out
    }
}

impl ThreadDom for MemoryDom {
    fn card_depth(&self, id: &CommentId) -> Option<usize> {
        let page = self.page.borrow();
        let depth = page.cards.iter().find_map(|c| c.depth_of(id, 0))?;
        page.find(id)
            .filter(|c| c.notice.is_none())
            .map(|_| depth)
    }

    fn has_comment_list(&self) -> bool {
        self.page.borrow().has_list
    }

    fn insert_card(&self, anchor: &Anchor, comment: &Comment, html: &str) -> Result<(), DomError> {
        let has_editor = html.contains(&format!(r#"id="{}""#, comment.id.reply_editor_dom_id()));
        let editor = has_editor.then(|| ReplyEditor {
            visible: false,
            form: Form::new(
                self.config.endpoints.add_path(&comment.article_id),
                vec![
                    (self.config.csrf.form_field.clone(), comment.csrf.clone()),
                    ("parent_id".to_owned(), comment.id.to_string()),
                ],
            ),
        });
        let card = Card {
            id: comment.id.clone(),
            html: html.to_owned(),
            likes: comment.likes_count,
            notice: None,
            editor,
            replies: Vec::new(),
        };

        let mut page = self.page.borrow_mut();
        if page.find(&comment.id).is_some() {
            return Err(DomError(format!("duplicate card {}", comment.id.card_dom_id())));
        }
        match anchor {
            Anchor::ListStart => {
                if !page.has_list {
                    return Err("no comment list".into());
                }
                page.cards.insert(0, card);
            }
            Anchor::RepliesOf(parent) => {
                let parent = page
                    .find_mut(parent)
                    .filter(|p| p.notice.is_none())
                    .ok_or_else(|| DomError(format!("no reply container for {parent}")))?;
                parent.replies.push(card);
            }
        }
        Ok(())
    }

    async fn read_form(&self, form: &FormKey) -> Option<CommentForm> {
        self.page.borrow().form(form).map(Form::serialize)
    }

    fn reset_form(&self, form: &FormKey) {
        if let Some(form) = self.page.borrow_mut().form_mut(form) {
            form.input = TextInputState::default();
            form.image = None;
        }
    }

    fn set_reply_editor_visible(&self, id: &CommentId, visible: bool) -> bool {
        let mut page = self.page.borrow_mut();
        match page.find_mut(id).and_then(|c| c.editor.as_mut()) {
            Some(editor) => {
                editor.visible = visible;
                true
            }
            None => false,
        }
    }

    fn hide_reply_editors(&self) {
        self.page.borrow_mut().for_each_card(|card| {
            if let Some(editor) = card.editor.as_mut() {
                editor.visible = false;
            }
        });
    }

    fn set_like_count(&self, id: &CommentId, count: u64) -> bool {
        let mut page = self.page.borrow_mut();
        match page.find_mut(id).filter(|c| c.notice.is_none()) {
            Some(card) => {
                card.likes = count;
                true
            }
            None => false,
        }
    }

    fn replace_card_content(&self, id: &CommentId, html: &str) -> bool {
        let mut page = self.page.borrow_mut();
        let Some(card) = page.find_mut(id) else {
            return false;
        };
        card.notice = Some(html.to_owned());
        card.editor = None;
        card.replies.clear();
        if matches!(&page.focused, Some(FormKey::Reply(focused)) if page.find(focused).is_none()) {
            page.focused = None;
        }
        true
    }

    fn emoji_panel_visible(&self, form: &FormKey) -> bool {
        self.page
            .borrow()
            .form(form)
            .is_some_and(|f| f.emoji_open)
    }

    fn set_emoji_panel_visible(&self, form: &FormKey, visible: bool) -> bool {
        match self.page.borrow_mut().form_mut(form) {
            Some(form) => {
                form.emoji_open = visible;
                true
            }
            None => false,
        }
    }

    fn hide_emoji_panels(&self) {
        let mut page = self.page.borrow_mut();
        if let Some(form) = page.main_form.as_mut() {
            form.emoji_open = false;
        }
        page.for_each_card(|card| {
            if let Some(editor) = card.editor.as_mut() {
                editor.form.emoji_open = false;
            }
        });
    }

    fn text_input(&self, form: &FormKey) -> Option<TextInputState> {
        self.page.borrow().form(form).map(|f| f.input.clone())
    }

    fn set_text_input(&self, key: &FormKey, state: &TextInputState) -> bool {
        let mut page = self.page.borrow_mut();
        let Some(form) = page.form_mut(key) else {
            return false;
        };
        form.input = state.clone();
        page.focused = Some(key.clone());
        true
    }

    fn cookies(&self) -> String {
        self.page.borrow().cookies.clone()
    }
}

/// Comment fixture for unit tests.
#[cfg(test)]
pub(crate) fn test_comment(id: &str, parent: Option<&str>) -> Comment {
    Comment {
        id: CommentId::new(id),
        article_id: crate::types::ArticleId::new("1"),
        parent_id: parent.map(CommentId::new),
        author: "ada".into(),
        avatar: String::new(),
        created_at: "2024-05-01 10:00".into(),
        content: format!("comment {id}"),
        image: None,
        likes_count: 0,
        is_author: true,
        is_staff: false,
        csrf: "tok".into(),
        is_reply: parent.is_some(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_cards_get_reply_forms() {
        let dom = MemoryDom::new();
        dom.seed(&test_comment("1", None)).unwrap();
        assert!(dom.has_reply_editor(&CommentId::new("1")));

        let form = read_now(&dom, &FormKey::Reply(CommentId::new("1")));
        assert_eq!(form.action, "/comments/add/1/");
        assert_eq!(form.field("csrfmiddlewaretoken"), Some("tok"));
        assert_eq!(form.field("parent_id"), Some("1"));
        assert_eq!(form.field("content"), Some(""));
    }

    #[test]
    fn test_duplicate_ids_are_refused() {
        let dom = MemoryDom::new();
        dom.seed(&test_comment("1", None)).unwrap();
        assert!(dom.seed(&test_comment("1", None)).is_err());
        assert_eq!(dom.top_level_ids(), vec!["1"]);
    }

    #[test]
    fn test_replace_discards_subtree() {
        let dom = MemoryDom::new();
        dom.seed(&test_comment("1", None)).unwrap();
        dom.seed(&test_comment("2", Some("1"))).unwrap();
        assert!(dom.replace_card_content(&CommentId::new("1"), "<p>gone</p>"));
        assert!(!dom.contains(&CommentId::new("2")));
        assert_eq!(dom.card_depth(&CommentId::new("1")), None);
        assert_eq!(dom.like_count(&CommentId::new("1")), None);
        assert_eq!(dom.outline(), "comment-1 [deleted]");
    }

    #[test]
    fn test_reset_keeps_hidden_fields() {
        let dom = MemoryDom::new().with_main_form("/comments/add/1/", "tok");
        dom.type_text(&FormKey::Main, "draft");
        dom.reset_form(&FormKey::Main);
        let form = read_now(&dom, &FormKey::Main);
        assert_eq!(form.field("content"), Some(""));
        assert_eq!(form.field("csrfmiddlewaretoken"), Some("tok"));
    }

    /// Same serialization `read_form` performs, without the future.
    fn read_now(dom: &MemoryDom, key: &FormKey) -> CommentForm {
        dom.page.borrow().form(key).map(Form::serialize).unwrap()
    }
}
