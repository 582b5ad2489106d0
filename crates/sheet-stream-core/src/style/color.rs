//! Color representation

use std::fmt;

/// Font color as stored in the styles part
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    /// Automatic/default color
    #[default]
    Auto,

    /// ARGB color
    Argb { a: u8, r: u8, g: u8, b: u8 },

    /// Theme color index
    Theme(u8),

    /// Indexed color (legacy Excel palette)
    Indexed(u8),
}

impl Color {
    /// Opaque RGB color
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color::Argb { a: 0xFF, r, g, b }
    }

    /// Parse an `rgb` attribute value, either `RRGGBB` or `AARRGGBB`
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();

        match hex.len() {
            6 => Some(Color::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Color::Argb {
                a: byte(0)?,
                r: byte(2)?,
                g: byte(4)?,
                b: byte(6)?,
            }),
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Auto => write!(f, "auto"),
            Color::Argb { a, r, g, b } => write!(f, "{:02X}{:02X}{:02X}{:02X}", a, r, g, b),
            Color::Theme(idx) => write!(f, "theme:{}", idx),
            Color::Indexed(idx) => write!(f, "indexed:{}", idx),
        }
    }
}
