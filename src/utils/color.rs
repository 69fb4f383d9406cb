//! RGBA colors: hex parsing for UI-provided values and HSL conversion for
//! the animated effect.

use crate::utils::safe_cast::unit_to_u8;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 8-bit RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const CYAN: Self = Self::rgb(0, 255, 255);
    pub const MAGENTA: Self = Self::rgb(255, 0, 255);

    /// Opaque color from channels
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with an explicit 8-bit alpha
    #[must_use]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Same color with a unit-interval alpha
    #[must_use]
    pub fn with_opacity(self, opacity: f32) -> Self {
        self.with_alpha(unit_to_u8(opacity))
    }

    /// Alpha as a unit-interval value
    #[must_use]
    pub fn opacity(self) -> f32 {
        f32::from(self.a) / 255.0
    }

    /// Convert from HSL
    ///
    /// `hue` is in degrees (wrapped into 0..360), `saturation` and
    /// `lightness` in percent (clamped into 0..=100).
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_hsl(hue: f64, saturation: f64, lightness: f64) -> Self {
        let h = if hue.is_finite() { hue.rem_euclid(360.0) } else { 0.0 };
        let s = (if saturation.is_finite() { saturation } else { 0.0 }).clamp(0.0, 100.0) / 100.0;
        let l = (if lightness.is_finite() { lightness } else { 0.0 }).clamp(0.0, 100.0) / 100.0;

        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let h_prime = h / 60.0;
        let x = c * (1.0 - (h_prime % 2.0 - 1.0).abs());
        let (r1, g1, b1) = match h_prime as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = l - c / 2.0;

        Self::rgb(
            unit_to_u8((r1 + m) as f32),
            unit_to_u8((g1 + m) as f32),
            unit_to_u8((b1 + m) as f32),
        )
    }
}

fn parse_channel(hex: &str, input: &str) -> Result<u8> {
    u8::from_str_radix(hex, 16).map_err(|_| Error::InvalidInput(format!("Invalid color: {input}")))
}

impl FromStr for Color {
    type Err = Error;

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let hex = trimmed
            .strip_prefix('#')
            .ok_or_else(|| Error::InvalidInput(format!("Color must start with '#': {s}")))?;

        if !hex.is_ascii() {
            return Err(Error::InvalidInput(format!("Invalid color: {s}")));
        }

        match hex.len() {
            3 => {
                let expand = |i: usize| parse_channel(&hex[i..=i].repeat(2), s);
                Ok(Self::rgb(expand(0)?, expand(1)?, expand(2)?))
            }
            6 | 8 => {
                let r = parse_channel(&hex[0..2], s)?;
                let g = parse_channel(&hex[2..4], s)?;
                let b = parse_channel(&hex[4..6], s)?;
                let a = if hex.len() == 8 { parse_channel(&hex[6..8], s)? } else { 255 };
                Ok(Self::rgba(r, g, b, a))
            }
            _ => Err(Error::InvalidInput(format!("Invalid color length: {s}"))),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl From<Color> for image::Rgba<u8> {
    fn from(color: Color) -> Self {
        image::Rgba([color.r, color.g, color.b, color.a])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_forms() {
        assert_eq!("#00ff00".parse::<Color>().unwrap(), Color::rgb(0, 255, 0));
        assert_eq!("#0f0".parse::<Color>().unwrap(), Color::rgb(0, 255, 0));
        assert_eq!("#ff000020".parse::<Color>().unwrap(), Color::rgba(255, 0, 0, 0x20));
        assert_eq!(" #FFFFFF ".parse::<Color>().unwrap(), Color::WHITE);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("00ff00".parse::<Color>().is_err());
        assert!("#00ff0".parse::<Color>().is_err());
        assert!("#gg0000".parse::<Color>().is_err());
        assert!("#".parse::<Color>().is_err());
        assert!("#ééé".parse::<Color>().is_err());
    }

    #[test]
    fn test_display_matches_input() {
        assert_eq!(Color::rgb(0, 255, 0).to_string(), "#00ff00");
        assert_eq!(Color::rgb(0, 255, 0).with_alpha(0x20).to_string(), "#00ff0020");
    }

    #[test]
    fn test_hsl_primaries() {
        assert_eq!(Color::from_hsl(0.0, 100.0, 50.0), Color::rgb(255, 0, 0));
        assert_eq!(Color::from_hsl(120.0, 100.0, 50.0), Color::rgb(0, 255, 0));
        assert_eq!(Color::from_hsl(240.0, 100.0, 50.0), Color::rgb(0, 0, 255));
        assert_eq!(Color::from_hsl(480.0, 100.0, 50.0), Color::rgb(0, 255, 0));
        assert_eq!(Color::from_hsl(33.0, 0.0, 100.0), Color::WHITE);
        assert_eq!(Color::from_hsl(200.0, 80.0, 0.0), Color::BLACK);
    }

    #[test]
    fn test_opacity_round_trip() {
        let c = Color::WHITE.with_opacity(0.8);
        assert_eq!(c.a, 204);
        assert!((c.opacity() - 0.8).abs() < 0.01);
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&Color::rgb(1, 2, 3)).unwrap();
        assert_eq!(json, "\"#010203\"");
        let back: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Color::rgb(1, 2, 3));
        assert!(serde_json::from_str::<Color>("\"red\"").is_err());
    }
}
