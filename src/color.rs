//! Bilevel color type for the framebuffer canvas
//!
//! The canvas stores one bit per pixel, matching the black/white RAM of common
//! e-paper controllers: a cleared bit is black, a set bit is white.
//!
//! | Color | Bit | Fill byte |
//! |-------|-----|-----------|
//! | Black | 0   | 0x00      |
//! | White | 1   | 0xFF      |
//!
//! ## Example
//!
//! ```
//! use inkclock::Color;
//!
//! assert_eq!(Color::Black.fill_byte(), 0x00);
//! assert_eq!(Color::White.fill_byte(), 0xFF);
//! assert_eq!(Color::from_bit(false), Color::Black);
//! ```

/// Pixel color of a bilevel panel
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Color {
    /// Ink
    Black,
    /// Paper
    #[default]
    White,
}

impl embedded_graphics_core::prelude::PixelColor for Color {
    type Raw = embedded_graphics_core::pixelcolor::raw::RawU1;
}

impl From<embedded_graphics_core::pixelcolor::BinaryColor> for Color {
    /// `On` is ink
    fn from(color: embedded_graphics_core::pixelcolor::BinaryColor) -> Self {
        match color {
            embedded_graphics_core::pixelcolor::BinaryColor::On => Self::Black,
            embedded_graphics_core::pixelcolor::BinaryColor::Off => Self::White,
        }
    }
}

impl Color {
    /// Byte value filling eight pixels with this color
    pub fn fill_byte(self) -> u8 {
        match self {
            Self::Black => 0x00,
            Self::White => 0xFF,
        }
    }

    /// Color stored by a framebuffer bit
    pub fn from_bit(bit: bool) -> Self {
        if bit { Self::White } else { Self::Black }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics_core::pixelcolor::BinaryColor;

    #[test]
    fn test_binary_color_on_is_black() {
        assert_eq!(Color::from(BinaryColor::On), Color::Black);
        assert_eq!(Color::from(BinaryColor::Off), Color::White);
    }

    #[test]
    fn test_default_is_paper() {
        assert_eq!(Color::default(), Color::White);
        assert_eq!(Color::from_bit(true), Color::White);
    }
}
