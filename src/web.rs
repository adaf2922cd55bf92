// JavaScript-facing exports: mounting the particle background on a canvas,
// the theme color helpers, branding, and the favicon swap.

use crate::background::ParticleBackground;
use crate::branding::{self, Product};
use crate::favicon;
use crate::scheduler::BrowserScheduler;
use crate::surface::Canvas2dSurface;
use crate::theme::{self, ThemeSettings, PRODUCT_ID_PROPERTY};
use gloo::events::EventListener;
use js_sys::{Object, Reflect};
use rand::rngs::ThreadRng;
use tracing::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, MouseEvent};

type BrowserBackground = ParticleBackground<Canvas2dSurface, BrowserScheduler, ThreadRng>;

const CANVAS_STYLE: [(&str, &str); 7] = [
    ("position", "fixed"),
    ("top", "0"),
    ("left", "0"),
    ("width", "100%"),
    ("height", "100%"),
    ("z-index", "0"),
    ("pointer-events", "auto"),
];

/// A mounted background. Call `unmount` (or `free`) when the page goes away.
#[wasm_bindgen]
pub struct BackgroundHandle {
    background: Option<BrowserBackground>,
    listeners: Vec<EventListener>,
}

#[wasm_bindgen]
impl BackgroundHandle {
    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.background
            .as_ref()
            .map(|background| background.is_running())
            .unwrap_or(false)
    }

    #[wasm_bindgen(js_name = particleCount)]
    pub fn particle_count(&self) -> usize {
        self.background
            .as_ref()
            .map(|background| background.particle_count())
            .unwrap_or(0)
    }

    pub fn unmount(&mut self) {
        // Listeners detach on drop
        self.listeners.clear();
        if let Some(background) = self.background.take() {
            background.unmount();
        }
    }
}

impl Drop for BackgroundHandle {
    fn drop(&mut self) {
        self.unmount();
    }
}

/// Mounts the particle background on `canvas`. Without a 2d context the
/// handle is inert and nothing is drawn.
#[wasm_bindgen(js_name = mountParticleBackground)]
pub fn mount_particle_background(canvas: HtmlCanvasElement) -> BackgroundHandle {
    style_canvas(&canvas);

    let surface = match Canvas2dSurface::attach(canvas.clone()) {
        Some(surface) => surface,
        None => {
            warn!("2d canvas context unavailable, particle background disabled");
            return BackgroundHandle {
                background: None,
                listeners: Vec::new(),
            };
        }
    };

    let background = ParticleBackground::mount(surface, BrowserScheduler, rand::thread_rng());
    let listeners = attach_listeners(&canvas, &background);

    BackgroundHandle {
        background: Some(background),
        listeners,
    }
}

fn style_canvas(canvas: &HtmlCanvasElement) {
    let style = canvas.style();
    for (property, value) in CANVAS_STYLE.iter() {
        if let Err(err) = style.set_property(property, value) {
            warn!(property, ?err, "failed to style background canvas");
        }
    }
}

fn attach_listeners(
    canvas: &HtmlCanvasElement,
    background: &BrowserBackground,
) -> Vec<EventListener> {
    let mut listeners = Vec::with_capacity(3);

    if let Some(window) = web_sys::window() {
        let background = background.clone();
        listeners.push(EventListener::new(&window, "resize", move |_event| {
            background.resized();
        }));
    }

    let target = canvas.clone();
    let on_move = background.clone();
    listeners.push(EventListener::new(canvas, "mousemove", move |event| {
        if let Some(event) = event.dyn_ref::<MouseEvent>() {
            let rect = target.get_bounding_client_rect();
            on_move.pointer_moved(
                event.client_x() as f64 - rect.left(),
                event.client_y() as f64 - rect.top(),
            );
        }
    }));

    let on_leave = background.clone();
    listeners.push(EventListener::new(canvas, "mouseleave", move |_event| {
        on_leave.pointer_left();
    }));

    listeners
}

/// Reads `window.kcContext.properties[name]` as a string.
pub fn kc_property(name: &str) -> Option<String> {
    let window = web_sys::window()?;
    let context = Reflect::get(&window, &JsValue::from_str("kcContext")).ok()?;
    if context.is_undefined() || context.is_null() {
        return None;
    }
    let properties = Reflect::get(&context, &JsValue::from_str("properties")).ok()?;
    if properties.is_undefined() || properties.is_null() {
        return None;
    }
    Reflect::get(&properties, &JsValue::from_str(name))
        .ok()?
        .as_string()
}

/// The page's `ZS_PRODUCT_ID` exactly as configured, or the default product's id.
pub fn page_product_id() -> String {
    kc_property(PRODUCT_ID_PROPERTY)
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| Product::default().as_id().to_owned())
}

pub fn product_from_page() -> Product {
    Product::from_id(&page_product_id())
}

#[wasm_bindgen(js_name = productId)]
pub fn product_id() -> String {
    page_product_id()
}

#[wasm_bindgen(js_name = secondaryColor)]
pub fn secondary_color(background: &str, is_light: bool) -> Result<String, JsValue> {
    theme::secondary_color(background, is_light).map_err(|err| JsValue::from_str(&err.to_string()))
}

#[wasm_bindgen(js_name = textColor)]
pub fn text_color(background: &str) -> String {
    theme::text_color(background).to_owned()
}

/// `{ primary, background, secondary, text }` as hex strings, resolved from
/// the page's theme properties.
#[wasm_bindgen(js_name = themePalette)]
pub fn theme_palette() -> Result<JsValue, JsValue> {
    let palette = ThemeSettings::from_properties(kc_property).palette();
    let object = Object::new();
    for (key, color) in [
        ("primary", palette.primary),
        ("background", palette.background),
        ("secondary", palette.secondary),
        ("text", palette.text),
    ]
    .iter()
    {
        Reflect::set(&object, &JsValue::from_str(key), &JsValue::from_str(&color.to_hex()))?;
    }
    Ok(object.into())
}

#[wasm_bindgen(js_name = brandLogoSrc)]
pub fn brand_logo_src(custom_logo: Option<String>, resource_url: &str) -> String {
    branding::brand_logo_src(custom_logo.as_deref(), resource_url, product_from_page())
}

#[wasm_bindgen(js_name = brandHref)]
pub fn brand_href(logo_url: Option<String>, base_path: &str) -> String {
    branding::brand_href(logo_url.as_deref(), base_path)
}

#[wasm_bindgen(js_name = referrerHref)]
pub fn referrer_href(referrer_url: &str) -> String {
    branding::referrer_href(referrer_url)
}

#[wasm_bindgen(js_name = brandName)]
pub fn brand_name() -> String {
    product_from_page().display_name().to_owned()
}

/// Swaps the page favicon; without an explicit id the page's product id is used.
#[wasm_bindgen(js_name = setFavicon)]
pub fn set_favicon(product_id: Option<String>) -> Result<(), JsValue> {
    let product_id = product_id.unwrap_or_else(page_product_id);
    favicon::set_favicon(&product_id)?;
    Ok(())
}
