// Simple color struct: 8-bit RGB channels plus a CSS opacity in [0, 1].
// Parsed from and formatted to the `#rrggbb` strings the theme properties use.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ColorError {
    #[error("expected six hex digits, got {0:?}")]
    Length(String),
    #[error("invalid hex digit in {0:?}")]
    Digit(String),
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

// Particle colors, one is picked per particle when the field is populated
pub const PARTICLE_PALETTE: [Color; 4] = [
    Color::rgba(59, 232, 176, 0.7),  // teal
    Color::rgba(26, 175, 208, 0.7),  // cyan
    Color::rgba(106, 103, 206, 0.7), // purple
    Color::rgba(255, 185, 0, 0.6),   // amber
];

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Color {
        Color { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Color {
        Color { r, g, b, a }
    }

    /// Parses `#rrggbb` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> Result<Color, ColorError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 {
            return Err(ColorError::Length(hex.to_owned()));
        }
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorError::Digit(hex.to_owned()));
        }
        let channel = |idx: usize| {
            u8::from_str_radix(&digits[idx..idx + 2], 16)
                .map_err(|_| ColorError::Digit(hex.to_owned()))
        };

        Ok(Color::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn to_css(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }

    pub fn with_alpha(self, a: f64) -> Color {
        Color { a, ..self }
    }

    // Offsets every channel, saturating at 255. Opacity is kept.
    pub fn lighten(self, offset: u8) -> Color {
        Color {
            r: self.r.saturating_add(offset),
            g: self.g.saturating_add(offset),
            b: self.b.saturating_add(offset),
            a: self.a,
        }
    }

    pub fn luminance(&self) -> f64 {
        0.299 * self.r as f64 + 0.587 * self.g as f64 + 0.114 * self.b as f64
    }
}
