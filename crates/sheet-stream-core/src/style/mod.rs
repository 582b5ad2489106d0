//! Cell formatting types
//!
//! A worksheet cell refers to its formatting by style index. The style reader
//! resolves that index to a [`CellFormat`]: the number format used to
//! interpret the raw value plus the font it is displayed with.

mod color;
mod font;
mod number_format;

pub use color::Color;
pub use font::{FontStyle, Underline};
pub use number_format::NumberFormat;

/// Formatting resolved for one style index
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CellFormat {
    /// Number format
    pub number_format: NumberFormat,
    /// Font settings
    pub font: FontStyle,
}

impl CellFormat {
    /// The format reported when no style information applies
    pub fn general() -> Self {
        Self::default()
    }

    /// Set the number format
    pub fn with_number_format(mut self, number_format: NumberFormat) -> Self {
        self.number_format = number_format;
        self
    }

    /// Set the font
    pub fn with_font(mut self, font: FontStyle) -> Self {
        self.font = font;
        self
    }

    /// True when this is the "General, default font" format
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// True when values with this format are serial dates/times
    pub fn is_date(&self) -> bool {
        self.number_format.is_date_format()
    }
}
