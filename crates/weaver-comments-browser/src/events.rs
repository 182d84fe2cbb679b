//! Event delegation for the comment widget.
//!
//! One click listener and one submit listener are attached to the document.
//! Controls are recognised by their `data-role` attribute, or by the legacy
//! class names server templates use, so cards inserted after mounting need
//! no wiring of their own.

use std::rc::Rc;

use gloo_events::{EventListener, EventListenerOptions};
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, HtmlFormElement};

use weaver_comments_core::{
    COMMENT_ID_ATTRIBUTE, CommentApi, CommentId, CommentWidget, Control, ControlRole, FormKey,
    Notifier, ROLE_ATTRIBUTE, SubmitOutcome,
};

use crate::dom::{BrowserDom, MAIN_FORM_SELECTOR};

/// Anything that can be a control: role-tagged elements plus the class
/// names used by server-rendered markup.
const CONTROL_SELECTOR: &str =
    "[data-role], .reply-btn, .like-btn, .delete-btn, .emoji-btn, .emoji-panel span";

const LEGACY_CLASSES: [(&str, ControlRole); 4] = [
    ("reply-btn", ControlRole::Reply),
    ("like-btn", ControlRole::Like),
    ("delete-btn", ControlRole::Delete),
    ("emoji-btn", ControlRole::EmojiToggle),
];

fn role_of(control: &Element) -> Option<String> {
    if let Some(role) = control.get_attribute(ROLE_ATTRIBUTE) {
        return Some(role);
    }
    let class_list = control.class_list();
    LEGACY_CLASSES
        .iter()
        .find(|(class, _)| class_list.contains(class))
        .map(|(_, role)| role)
        .or_else(|| {
            control
                .closest(".emoji-panel")
                .ok()
                .flatten()
                .map(|_| &ControlRole::Emoji)
        })
        .map(|role| role.as_str().to_owned())
}

/// The comment form enclosing `element`, if any.
pub fn form_key_of(element: &Element) -> Option<FormKey> {
    if let Some(editor) = element.closest(".reply-form").ok().flatten() {
        return CommentId::from_reply_editor_dom_id(&editor.id()).map(FormKey::Reply);
    }
    element
        .closest(MAIN_FORM_SELECTOR)
        .ok()
        .flatten()
        .map(|_| FormKey::Main)
}

/// Decode a click on `target` into a [`Control`].
pub fn decode_click(target: &Element) -> Control {
    let Some(control) = target.closest(CONTROL_SELECTOR).ok().flatten() else {
        return Control::Outside;
    };
    let role = role_of(&control);
    let comment_id = control.get_attribute(COMMENT_ID_ATTRIBUTE);
    let glyph = control.text_content();
    Control::decode(
        role.as_deref(),
        comment_id.as_deref(),
        form_key_of(&control),
        glyph.as_deref(),
    )
}

/// Keeps the widget's listeners attached. Dropping it unmounts the widget.
pub struct CommentsHandle {
    _listeners: Vec<EventListener>,
}

impl CommentsHandle {
    /// Detach all listeners now.
    pub fn unmount(self) {
        tracing::debug!("comments widget unmounted");
    }
}

/// Attach the widget's listeners to its document.
pub fn mount<A, N>(widget: CommentWidget<BrowserDom, A, N>) -> CommentsHandle
where
    A: CommentApi + 'static,
    N: Notifier + 'static,
{
    let document = widget.dom().document().clone();
    let widget = Rc::new(widget);

    let click = {
        let widget = widget.clone();
        EventListener::new(&document, "click", move |evt| {
            let control = event_element(evt)
                .map(|target| decode_click(&target))
                .unwrap_or(Control::Outside);
            if let Some(pending) = widget.dispatch(control) {
                let widget = widget.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    widget.run(pending).await;
                });
            }
        })
    };

    let submit = {
        let widget = widget.clone();
        EventListener::new_with_options(
            &document,
            "submit",
            EventListenerOptions::enable_prevent_default(),
            move |evt| {
                let Some(form) = evt
                    .target()
                    .and_then(|t| t.dyn_into::<HtmlFormElement>().ok())
                else {
                    return;
                };
                let Some(key) = form_key_of(&form) else {
                    return;
                };
                evt.prevent_default();

                let widget = widget.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    match widget.submit(&key).await {
                        Ok(SubmitOutcome::Placed(id)) => {
                            tracing::debug!(form = %key, comment_id = %id, "comment placed");
                        }
                        Ok(SubmitOutcome::Detached { .. }) => {}
                        Err(e) => tracing::debug!(form = %key, "submission ended: {}", e),
                    }
                });
            },
        )
    };

    tracing::debug!("comments widget mounted");
    CommentsHandle {
        _listeners: vec![click, submit],
    }
}

fn event_element(evt: &Event) -> Option<Element> {
    let target = evt.target()?;
    match target.dyn_into::<Element>() {
        Ok(element) => Some(element),
        // Clicks on text nodes report the text node as target.
        Err(target) => target
            .dyn_into::<web_sys::Node>()
            .ok()?
            .parent_element(),
    }
}
