mod utils;

pub mod background;
pub mod branding;
pub mod color;
pub mod favicon;
pub mod field;
pub mod particle;
pub mod scheduler;
pub mod surface;
pub mod theme;
pub mod web;

#[cfg(test)]
mod testing;

use wasm_bindgen::prelude::*;

pub use background::ParticleBackground;
pub use branding::Product;
pub use color::{Color, ColorError};
pub use field::ParticleField;
pub use particle::Particle;
pub use theme::{ThemePalette, ThemeSettings};

// When the `wee_alloc` feature is enabled, use `wee_alloc` as the global
// allocator.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen]
pub fn initialize() {
    utils::set_panic_hook();
    utils::init_tracing();
}
