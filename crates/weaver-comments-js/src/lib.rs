//! WASM bindings for the weaver comment widget.
//!
//! ```js
//! import init, { mountComments } from "weaver-comments-js";
//!
//! await init();
//! const comments = mountComments({ thread: { max_depth: 4 } });
//! // ...
//! comments.unmount();
//! ```
//!
//! The config object mirrors `CommentsConfig`; every field is optional.

use wasm_bindgen::prelude::*;
use weaver_comments_browser::{BrowserDom, CommentsHandle, WindowNotifier, mount};
use weaver_comments_core::{Comment, CommentWidget, CommentsConfig, HttpCommentApi};

/// Initialize panic hook and console logging.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();

    use tracing::Level;
    use tracing::subscriber::set_global_default;
    use tracing_subscriber::Registry;
    use tracing_subscriber::layer::SubscriberExt;

    let console_level = if cfg!(debug_assertions) {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let wasm_layer = tracing_wasm::WASMLayer::new(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(console_level)
            .build(),
    );

    // A host page may already have installed a subscriber.
    let _ = set_global_default(Registry::default().with(wasm_layer));
}

fn config_from_js(config: JsValue) -> Result<CommentsConfig, JsError> {
    if config.is_undefined() || config.is_null() {
        return Ok(CommentsConfig::default());
    }
    serde_wasm_bindgen::from_value(config)
        .map_err(|e| JsError::new(&format!("Invalid comments config: {}", e)))
}

/// A mounted comment widget.
#[wasm_bindgen]
pub struct JsComments {
    handle: Option<CommentsHandle>,
}

#[wasm_bindgen]
impl JsComments {
    /// Detach the widget's listeners. Safe to call more than once.
    pub fn unmount(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.unmount();
        }
    }

    #[wasm_bindgen(getter)]
    pub fn mounted(&self) -> bool {
        self.handle.is_some()
    }
}

/// Mount the comment widget on the current page.
///
/// Relative endpoint paths resolve against the page origin unless
/// `endpoints.base_url` is set.
#[wasm_bindgen(js_name = mountComments)]
pub fn mount_comments(config: JsValue) -> Result<JsComments, JsError> {
    let mut config = config_from_js(config)?;
    let window = web_sys::window().ok_or_else(|| JsError::new("No window"))?;
    if config.endpoints.base_url.is_none() {
        config.endpoints.base_url = window.location().origin().ok();
    }

    let dom = BrowserDom::from_global().ok_or_else(|| JsError::new("No document"))?;
    let api = HttpCommentApi::new(&config);
    let widget = CommentWidget::new(dom, api, WindowNotifier::new(window), config);

    Ok(JsComments {
        handle: Some(mount(widget)),
    })
}

/// Render a comment card as HTML.
///
/// # Arguments
/// * `comment` - Comment object as returned by the create endpoint
/// * `depth` - Nesting depth (top-level is 0)
/// * `config` - Optional widget config
#[wasm_bindgen(js_name = renderComment)]
pub fn render_comment(comment: JsValue, depth: usize, config: JsValue) -> Result<String, JsError> {
    let comment: Comment = serde_wasm_bindgen::from_value(comment)
        .map_err(|e| JsError::new(&format!("Invalid comment: {}", e)))?;
    let config = config_from_js(config)?;
    Ok(weaver_comments_core::render_comment(&comment, depth, &config))
}
