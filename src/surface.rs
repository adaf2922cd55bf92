// Drawing surface abstraction. The particle field only ever clears, strokes
// lines and fills circles, in logical units; `Canvas2dSurface` maps that onto a
// 2d canvas context scaled for the device pixel ratio.

use crate::color::Color;
use std::f64::consts::PI;
use tracing::{debug, warn};
use vecmath::Vector2;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub pixel_ratio: f64,
}

pub trait Surface {
    /// Visible size in logical units, plus the device pixel ratio.
    fn measure(&self) -> Viewport;

    /// Sizes the backing store to `size * pixel_ratio` and scales drawing so
    /// callers keep working in logical units.
    fn resize_backing(&mut self, viewport: Viewport);

    fn clear(&mut self, width: f64, height: f64);

    fn stroke_line(&mut self, from: Vector2<f64>, to: Vector2<f64>, color: Color, line_width: f64);

    fn fill_circle(&mut self, center: Vector2<f64>, radius: f64, color: Color);
}

pub struct Canvas2dSurface {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
}

impl Canvas2dSurface {
    // None when the canvas cannot hand out a 2d context
    pub fn attach(canvas: HtmlCanvasElement) -> Option<Self> {
        let context = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Canvas2dSurface { canvas, context })
    }
}

impl Surface for Canvas2dSurface {
    fn measure(&self) -> Viewport {
        let rect = self.canvas.get_bounding_client_rect();
        let pixel_ratio = web_sys::window()
            .map(|window| window.device_pixel_ratio())
            .filter(|ratio| *ratio > 0.0)
            .unwrap_or(1.0);
        Viewport {
            width: rect.width(),
            height: rect.height(),
            pixel_ratio,
        }
    }

    fn resize_backing(&mut self, viewport: Viewport) {
        self.canvas.set_width((viewport.width * viewport.pixel_ratio) as u32);
        self.canvas.set_height((viewport.height * viewport.pixel_ratio) as u32);
        // Resizing resets the context state, so the transform is set, not accumulated
        let ratio = viewport.pixel_ratio;
        if let Err(err) = self.context.set_transform(ratio, 0.0, 0.0, ratio, 0.0, 0.0) {
            warn!(?err, "failed to scale canvas context");
        }
        debug!(
            width = viewport.width,
            height = viewport.height,
            pixel_ratio = ratio,
            "canvas backing store resized"
        );
    }

    fn clear(&mut self, width: f64, height: f64) {
        self.context.clear_rect(0.0, 0.0, width, height);
    }

    fn stroke_line(&mut self, from: Vector2<f64>, to: Vector2<f64>, color: Color, line_width: f64) {
        self.context.begin_path();
        self.context.move_to(from[0], from[1]);
        self.context.line_to(to[0], to[1]);
        self.context.set_stroke_style(&JsValue::from_str(&color.to_css()));
        self.context.set_line_width(line_width);
        self.context.stroke();
    }

    fn fill_circle(&mut self, center: Vector2<f64>, radius: f64, color: Color) {
        self.context.begin_path();
        if self.context.arc(center[0], center[1], radius, 0.0, 2.0 * PI).is_err() {
            return;
        }
        self.context.set_fill_style(&JsValue::from_str(&color.to_css()));
        self.context.fill();
    }
}
