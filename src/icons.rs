//! Weather condition icons
//!
//! Five 32x32 bilevel icons, packed 1 bit per pixel, MSB first, 4 bytes per row.
//! A set bit is a black pixel. Conditions are reported as WMO weather codes and
//! collapsed onto an [`IconClass`] with [`IconClass::from_wmo_code`].
//!
//! ## Example
//!
//! ```
//! use inkclock::IconClass;
//!
//! assert_eq!(IconClass::from_wmo_code(0), IconClass::Sun);
//! assert_eq!(IconClass::from_wmo_code(61), IconClass::Rain);
//! assert_eq!(IconClass::from_wmo_code(13), IconClass::Cloud);
//! assert_eq!(IconClass::Storm.bitmap().len(), inkclock::icons::ICON_BYTES);
//! ```

/// Icon side length in pixels
pub const ICON_SIZE: u16 = 32;
/// Packed icon size in bytes
pub const ICON_BYTES: usize = (ICON_SIZE as usize / 8) * ICON_SIZE as usize;

/// Icon shown next to the temperature
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IconClass {
    /// Clear sky
    Sun,
    /// Clouds, fog, and anything unrecognised
    #[default]
    Cloud,
    /// Drizzle, rain, freezing rain, showers
    Rain,
    /// Snow fall, snow grains, snow showers
    Snow,
    /// Thunderstorm, with or without hail
    Storm,
}

impl IconClass {
    /// Map a WMO weather interpretation code to an icon
    pub fn from_wmo_code(code: u16) -> Self {
        match code {
            0 => Self::Sun,
            1..=3 | 45 | 48 => Self::Cloud,
            51..=67 | 80..=82 => Self::Rain,
            71..=77 | 85 | 86 => Self::Snow,
            95 | 96 | 99 => Self::Storm,
            _ => Self::Cloud,
        }
    }

    /// Packed bitmap for this icon
    pub fn bitmap(self) -> &'static [u8; ICON_BYTES] {
        match self {
            Self::Sun => &SUN,
            Self::Cloud => &CLOUD,
            Self::Rain => &RAIN,
            Self::Snow => &SNOW,
            Self::Storm => &STORM,
        }
    }

    /// Short text label
    pub fn label(self) -> &'static str {
        match self {
            Self::Sun => "sun",
            Self::Cloud => "cloud",
            Self::Rain => "rain",
            Self::Snow => "snow",
            Self::Storm => "storm",
        }
    }
}

/// Sun icon
pub static SUN: [u8; ICON_BYTES] = [
    0x00, 0x00, 0x00, 0x00,
    0x00, 0x01, 0x80, 0x00,
    0x00, 0x01, 0x80, 0x00,
    0x00, 0x01, 0x80, 0x00,
    0x00, 0x01, 0x80, 0x00,
    0x06, 0x01, 0x80, 0x60,
    0x07, 0x01, 0x80, 0xE0,
    0x03, 0x80, 0x01, 0xC0,
    0x01, 0xC0, 0x03, 0x80,
    0x00, 0xC7, 0xE3, 0x00,
    0x00, 0x0F, 0xF0, 0x00,
    0x00, 0x1F, 0xF8, 0x00,
    0x00, 0x3F, 0xFC, 0x00,
    0x00, 0x7F, 0xFE, 0x00,
    0x00, 0x7F, 0xFE, 0x00,
    0x7E, 0x7F, 0xFE, 0x7E,
    0x7E, 0x7F, 0xFE, 0x7E,
    0x00, 0x7F, 0xFE, 0x00,
    0x00, 0x7F, 0xFE, 0x00,
    0x00, 0x3F, 0xFC, 0x00,
    0x00, 0x1F, 0xF8, 0x00,
    0x00, 0x0F, 0xF0, 0x00,
    0x00, 0xC7, 0xE3, 0x00,
    0x01, 0xC0, 0x03, 0x80,
    0x03, 0x80, 0x01, 0xC0,
    0x07, 0x01, 0x80, 0xE0,
    0x06, 0x01, 0x80, 0x60,
    0x00, 0x01, 0x80, 0x00,
    0x00, 0x01, 0x80, 0x00,
    0x00, 0x01, 0x80, 0x00,
    0x00, 0x01, 0x80, 0x00,
    0x00, 0x00, 0x00, 0x00,
];

/// Cloud icon
pub static CLOUD: [u8; ICON_BYTES] = [
    0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0xFC, 0x00,
    0x00, 0x03, 0xFF, 0x00,
    0x00, 0x07, 0xFF, 0x80,
    0x00, 0x0F, 0xFF, 0xC0,
    0x00, 0x0F, 0xFF, 0xC0,
    0x00, 0x7F, 0xFF, 0xE0,
    0x01, 0xFF, 0xFF, 0xE0,
    0x03, 0xFF, 0xFF, 0xE0,
    0x03, 0xFF, 0xFF, 0xE0,
    0x07, 0xFF, 0xFF, 0xF8,
    0x07, 0xFF, 0xFF, 0xF8,
    0x07, 0xFF, 0xFF, 0xFC,
    0x07, 0xFF, 0xFF, 0xFC,
    0x03, 0xFF, 0xFF, 0xFC,
    0x03, 0xFF, 0xFF, 0xFC,
    0x03, 0xFF, 0xFF, 0xFC,
    0x03, 0xFF, 0xFF, 0xFC,
    0x03, 0xFF, 0xFF, 0xFC,
    0x03, 0xFF, 0xFF, 0xFC,
    0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00,
];

/// Rain icon
pub static RAIN: [u8; ICON_BYTES] = [
    0x00, 0x00, 0xFC, 0x00,
    0x00, 0x03, 0xFF, 0x00,
    0x00, 0x07, 0xFF, 0x80,
    0x00, 0x0F, 0xFF, 0xC0,
    0x00, 0x0F, 0xFF, 0xC0,
    0x00, 0x7F, 0xFF, 0xE0,
    0x01, 0xFF, 0xFF, 0xE0,
    0x03, 0xFF, 0xFF, 0xE0,
    0x03, 0xFF, 0xFF, 0xE0,
    0x07, 0xFF, 0xFF, 0xF8,
    0x07, 0xFF, 0xFF, 0xF8,
    0x07, 0xFF, 0xFF, 0xFC,
    0x07, 0xFF, 0xFF, 0xFC,
    0x03, 0xFF, 0xFF, 0xFC,
    0x03, 0xFF, 0xFF, 0xFC,
    0x03, 0xFF, 0xFF, 0xFC,
    0x03, 0xFF, 0xFF, 0xFC,
    0x03, 0xFF, 0xFF, 0xFC,
    0x03, 0xFF, 0xFF, 0xFC,
    0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00,
    0x00, 0x60, 0xC1, 0x80,
    0x00, 0x60, 0xC1, 0x80,
    0x00, 0xE1, 0xC3, 0x80,
    0x00, 0xC1, 0x83, 0x00,
    0x00, 0xC1, 0x83, 0x00,
    0x01, 0x83, 0x06, 0x00,
    0x01, 0x83, 0x06, 0x00,
    0x03, 0x87, 0x0E, 0x00,
    0x03, 0x06, 0x0C, 0x00,
    0x03, 0x06, 0x0C, 0x00,
    0x00, 0x00, 0x00, 0x00,
];

/// Snow icon
pub static SNOW: [u8; ICON_BYTES] = [
    0x00, 0x00, 0xFC, 0x00,
    0x00, 0x03, 0xFF, 0x00,
    0x00, 0x07, 0xFF, 0x80,
    0x00, 0x0F, 0xFF, 0xC0,
    0x00, 0x0F, 0xFF, 0xC0,
    0x00, 0x7F, 0xFF, 0xE0,
    0x01, 0xFF, 0xFF, 0xE0,
    0x03, 0xFF, 0xFF, 0xE0,
    0x03, 0xFF, 0xFF, 0xE0,
    0x07, 0xFF, 0xFF, 0xF8,
    0x07, 0xFF, 0xFF, 0xF8,
    0x07, 0xFF, 0xFF, 0xFC,
    0x07, 0xFF, 0xFF, 0xFC,
    0x03, 0xFF, 0xFF, 0xFC,
    0x03, 0xFF, 0xFF, 0xFC,
    0x03, 0xFF, 0xFF, 0xFC,
    0x03, 0xFF, 0xFF, 0xFC,
    0x03, 0xFF, 0xFF, 0xFC,
    0x03, 0xFF, 0xFF, 0xFC,
    0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00,
    0x00, 0xC0, 0x03, 0x00,
    0x00, 0xC0, 0x03, 0x00,
    0x03, 0xF0, 0x0F, 0xC0,
    0x03, 0xF1, 0x8F, 0xC0,
    0x00, 0xC1, 0x83, 0x00,
    0x00, 0xC7, 0xE3, 0x00,
    0x00, 0x07, 0xE0, 0x00,
    0x00, 0x01, 0x80, 0x00,
    0x00, 0x01, 0x80, 0x00,
];

/// Storm icon
pub static STORM: [u8; ICON_BYTES] = [
    0x00, 0x00, 0xFC, 0x00,
    0x00, 0x03, 0xFF, 0x00,
    0x00, 0x07, 0xFF, 0x80,
    0x00, 0x0F, 0xFF, 0xC0,
    0x00, 0x0F, 0xFF, 0xC0,
    0x00, 0x7F, 0xFF, 0xE0,
    0x01, 0xFF, 0xFF, 0xE0,
    0x03, 0xFF, 0xFF, 0xE0,
    0x03, 0xFF, 0xFF, 0xE0,
    0x07, 0xFF, 0xFF, 0xF8,
    0x07, 0xFF, 0xFF, 0xF8,
    0x07, 0xFF, 0xFF, 0xFC,
    0x07, 0xFF, 0xFF, 0xFC,
    0x03, 0xFF, 0xFF, 0xFC,
    0x03, 0xFF, 0xFF, 0xFC,
    0x03, 0xFF, 0xFF, 0xFC,
    0x03, 0xFF, 0xFF, 0xFC,
    0x03, 0xFF, 0xFF, 0xFC,
    0x03, 0xFF, 0xFF, 0xFC,
    0x00, 0x00, 0xE0, 0x00,
    0x00, 0x01, 0xC0, 0x00,
    0x00, 0x03, 0x80, 0x00,
    0x00, 0x03, 0x80, 0x00,
    0x00, 0x07, 0x00, 0x00,
    0x00, 0x0F, 0xF0, 0x00,
    0x00, 0x0F, 0xF0, 0x00,
    0x00, 0x00, 0xE0, 0x00,
    0x00, 0x01, 0xC0, 0x00,
    0x00, 0x01, 0xC0, 0x00,
    0x00, 0x03, 0x80, 0x00,
    0x00, 0x07, 0x00, 0x00,
    0x00, 0x06, 0x00, 0x00,
];
