// Favicon swap: replaces whatever icon links the page has with the product's
// SVG favicon, falling back to the stock PNG if the SVG fails to load.

use crate::branding;
use gloo::events::EventListener;
use std::cell::RefCell;
use thiserror::Error;
use tracing::{debug, warn};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlHeadElement, HtmlLinkElement};

pub const FALLBACK_FAVICON: &str = "/favicon-32x32.png";
const ICON_LINKS: &str = r#"link[rel*="icon"]"#;

thread_local! {
    // Error listener of the link added by the latest call; replacing it detaches the old one
    static FALLBACK_LISTENER: RefCell<Option<EventListener>> = RefCell::new(None);
}

#[derive(Debug, Error)]
pub enum FaviconError {
    #[error("no window or document available")]
    NoDocument,
    #[error("document has no <head>")]
    NoHead,
    #[error("DOM operation failed: {0}")]
    Dom(String),
}

impl From<JsValue> for FaviconError {
    fn from(err: JsValue) -> Self {
        FaviconError::Dom(format!("{:?}", err))
    }
}

impl From<FaviconError> for JsValue {
    fn from(err: FaviconError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// `product_id` is used verbatim in the icon path, an unknown id simply ends
/// up on the PNG fallback.
pub fn set_favicon(product_id: &str) -> Result<(), FaviconError> {
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or(FaviconError::NoDocument)?;
    let head = document.head().ok_or(FaviconError::NoHead)?;

    remove_icon_links(&document)?;

    let href = branding::favicon_path(product_id);
    let link = icon_link(&document, "image/svg+xml", &href)?;

    let fallback_document = document.clone();
    let fallback_head = head.clone();
    let listener = EventListener::once(&link, "error", move |_event| {
        warn!(%href, "failed to load favicon, using fallback");
        if let Err(err) = append_fallback(&fallback_document, &fallback_head) {
            warn!(%err, "failed to add fallback favicon");
        }
    });
    FALLBACK_LISTENER.with(|slot| *slot.borrow_mut() = Some(listener));

    head.append_child(&link)?;
    debug!(product_id, "favicon set");
    Ok(())
}

fn remove_icon_links(document: &Document) -> Result<(), FaviconError> {
    // querySelectorAll is a static list, removing while walking it is fine
    let existing = document.query_selector_all(ICON_LINKS)?;
    for idx in 0..existing.length() {
        let element = existing
            .item(idx)
            .and_then(|node| node.dyn_into::<Element>().ok());
        if let Some(element) = element {
            element.remove();
        }
    }
    Ok(())
}

fn icon_link(document: &Document, mime: &str, href: &str) -> Result<HtmlLinkElement, FaviconError> {
    let link = document
        .create_element("link")?
        .dyn_into::<HtmlLinkElement>()
        .map_err(|_| FaviconError::Dom("created element is not a <link>".to_owned()))?;
    link.set_rel("icon");
    link.set_type(mime);
    link.set_href(href);
    Ok(link)
}

fn append_fallback(document: &Document, head: &HtmlHeadElement) -> Result<(), FaviconError> {
    let fallback = icon_link(document, "image/png", FALLBACK_FAVICON)?;
    head.append_child(&fallback)?;
    Ok(())
}
