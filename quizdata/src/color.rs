//! Packed color keys used to identify regions on the reference bitmap.

use image::Rgba;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A pixel color packed as `0xRRGGBBAA`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ColorKey(pub u32);

impl ColorKey {
    pub const fn from_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(((r as u32) << 24) | ((g as u32) << 16) | ((b as u32) << 8) | a as u32)
    }

    /// Opaque color from individual channels.
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self::from_rgba(r, g, b, 0xff)
    }

    /// Opaque color from a 24-bit `0xRRGGBB` literal.
    pub const fn from_rgb_hex(hex: u32) -> Self {
        Self(((hex & 0x00ff_ffff) << 8) | 0xff)
    }

    pub const fn rgba(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }

    pub fn to_pixel(self) -> Rgba<u8> {
        Rgba(self.rgba())
    }

    pub fn from_pixel(pixel: &Rgba<u8>) -> Self {
        Self(u32::from_be_bytes(pixel.0))
    }
}

impl fmt::Display for ColorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:08x}", self.0)
    }
}

impl From<ColorKey> for String {
    fn from(key: ColorKey) -> Self {
        key.to_string()
    }
}

impl TryFrom<String> for ColorKey {
    type Error = ParseColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid color '{0}', expected #rrggbb or #rrggbbaa")]
pub struct ParseColorError(pub String);

impl FromStr for ColorKey {
    type Err = ParseColorError;

    /// Accepts `#rrggbb`, `#rrggbbaa`, or the same without the leading `#`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        let err = || ParseColorError(s.to_string());
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(err());
        }
        let value = u32::from_str_radix(hex, 16).map_err(|_| err())?;
        match hex.len() {
            6 => Ok(Self::from_rgb_hex(value)),
            8 => Ok(Self(value)),
            _ => Err(err()),
        }
    }
}

/// How a dataset packs its colors.
///
/// Early datasets were keyed on RGB only. Later ones key on the full RGBA
/// value so that anti-aliased edge pixels (partial alpha) never collide with
/// the RGB triplet of a real region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyFormat {
    Rgb24,
    Rgba32,
}

impl KeyFormat {
    /// Packs a sampled reference pixel into the key this format looks up.
    pub fn key_for(self, pixel: &Rgba<u8>) -> ColorKey {
        let [r, g, b, a] = pixel.0;
        match self {
            KeyFormat::Rgb24 => ColorKey::from_rgb(r, g, b),
            KeyFormat::Rgba32 => ColorKey::from_rgba(r, g, b, a),
        }
    }

    /// Converts a raw dataset literal into a key.
    pub fn key_from_literal(self, literal: u32) -> ColorKey {
        match self {
            KeyFormat::Rgb24 => ColorKey::from_rgb_hex(literal),
            KeyFormat::Rgba32 => ColorKey(literal),
        }
    }
}
