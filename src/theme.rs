// Theme color derivation and the settings the login page receives through
// `kcContext.properties`.

use crate::branding::Product;
use crate::color::{Color, ColorError};
use tracing::warn;

pub const PRODUCT_ID_PROPERTY: &str = "ZS_PRODUCT_ID";
pub const PRIMARY_COLOR_PROPERTY: &str = "THEME_PRIMARY_COLOR";
pub const BACKGROUND_COLOR_PROPERTY: &str = "THEME_BACKGROUND_COLOR";
pub const LIGHT_MODE_PROPERTY: &str = "THEME_LIGHT_MODE";

const DARK_SECONDARY_OFFSET: u8 = 25;
const LIGHT_SECONDARY_OFFSET: u8 = 35;
const TEXT_LUMINANCE_THRESHOLD: f64 = 127.0;

const DARK_TEXT: &str = "#000000";
const LIGHT_TEXT: &str = "#ffffff";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ProductDefaults {
    pub primary: &'static str,
    pub background: &'static str,
}

pub fn product_defaults(product: Product, light_mode: bool) -> ProductDefaults {
    match (product, light_mode) {
        (Product::HyprEdge, false) => ProductDefaults {
            primary: "#7371fc",
            background: "#0a0f24",
        },
        (Product::Trellix, false) => ProductDefaults {
            primary: "#87bfff",
            background: "#111111",
        },
        (Product::HyprEdge, true) => ProductDefaults {
            primary: "#665dfd",
            background: "#fefefe",
        },
        (Product::Trellix, true) => ProductDefaults {
            primary: "#0263d1",
            background: "#ffffff",
        },
    }
}

/// Secondary surface color: the background lifted by a fixed per-channel
/// offset (25 in dark mode, 35 in light mode).
pub fn secondary_color(background: &str, is_light: bool) -> Result<String, ColorError> {
    Ok(derive_secondary(Color::from_hex(background)?, is_light).to_hex())
}

/// Black or white, whichever reads better on `background`. Unparseable input
/// gets white.
pub fn text_color(background: &str) -> &'static str {
    match Color::from_hex(background) {
        Ok(color) => text_on(color),
        Err(_) => LIGHT_TEXT,
    }
}

fn derive_secondary(background: Color, is_light: bool) -> Color {
    let offset = if is_light {
        LIGHT_SECONDARY_OFFSET
    } else {
        DARK_SECONDARY_OFFSET
    };
    background.lighten(offset)
}

fn text_on(background: Color) -> &'static str {
    text_for_luminance(background.luminance())
}

fn text_for_luminance(luminance: f64) -> &'static str {
    if luminance > TEXT_LUMINANCE_THRESHOLD {
        DARK_TEXT
    } else {
        LIGHT_TEXT
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ThemeSettings {
    pub product: Product,
    pub primary: Option<String>,
    pub background: Option<String>,
    pub light_mode: bool,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ThemePalette {
    pub primary: Color,
    pub background: Color,
    pub secondary: Color,
    pub text: Color,
}

impl ThemeSettings {
    /// Builds settings from a property lookup. Empty values count as unset.
    pub fn from_properties<F>(lookup: F) -> ThemeSettings
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let light_mode = get(LIGHT_MODE_PROPERTY)
            .map(|value| matches!(value.trim().to_ascii_lowercase().as_str(), "true" | "1"))
            .unwrap_or(false);

        ThemeSettings {
            product: get(PRODUCT_ID_PROPERTY)
                .map(|id| Product::from_id(&id))
                .unwrap_or_default(),
            primary: get(PRIMARY_COLOR_PROPERTY),
            background: get(BACKGROUND_COLOR_PROPERTY),
            light_mode,
        }
    }

    /// Explicit colors win over product defaults; a malformed explicit color
    /// is logged and replaced by the default.
    pub fn palette(&self) -> ThemePalette {
        let defaults = product_defaults(self.product, self.light_mode);
        let primary = resolve(PRIMARY_COLOR_PROPERTY, self.primary.as_deref(), defaults.primary);
        let background = resolve(
            BACKGROUND_COLOR_PROPERTY,
            self.background.as_deref(),
            defaults.background,
        );
        let text = match text_on(background) {
            DARK_TEXT => Color::BLACK,
            _ => Color::WHITE,
        };

        ThemePalette {
            primary,
            background,
            secondary: derive_secondary(background, self.light_mode),
            text,
        }
    }
}

fn resolve(property: &str, explicit: Option<&str>, default: &'static str) -> Color {
    if let Some(value) = explicit {
        match Color::from_hex(value) {
            Ok(color) => return color,
            Err(err) => warn!(property, %err, "ignoring malformed theme color"),
        }
    }
    // Defaults are compile-time literals; black only if one is ever mistyped.
    Color::from_hex(default).unwrap_or(Color::BLACK)
}
