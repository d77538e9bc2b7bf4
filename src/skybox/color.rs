//! Colors and linear interpolation for skybox parameters.
//!
//! Preset files store colors as HTML hex strings without the leading `#`
//! (`RRGGBB` or `RRGGBBAA`, shorthand `RGB`/`RGBA` is accepted too).
//! [`Lerp`] is shared by the transition engine for scalars and colors.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Lerp trait
// ---------------------------------------------------------------------------

/// Trait for types that can be linearly interpolated.
pub trait Lerp: Clone {
    fn lerp(&self, other: &Self, t: f32) -> Self;
}

impl Lerp for f32 {
    #[inline]
    fn lerp(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl Lerp for Color {
    #[inline]
    fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            r: self.r.lerp(&other.r, t),
            g: self.g.lerp(&other.g, t),
            b: self.b.lerp(&other.b, t),
            a: self.a.lerp(&other.a, t),
        }
    }
}

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// RGBA color with components in `[0.0, 1.0]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);

    /// Opaque color from RGB components.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Color from RGBA components.
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Parse an HTML hex color, with or without the leading `#`.
    ///
    /// Returns `None` for anything that is not 3, 4, 6 or 8 hex digits.
    pub fn from_hex(text: &str) -> Option<Self> {
        let hex = text.trim().trim_start_matches('#');
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }

        let channel = |s: &str| u8::from_str_radix(s, 16).ok().map(|v| v as f32 / 255.0);
        let short = |i: usize| channel(&hex[i..i + 1].repeat(2));

        match hex.len() {
            3 => Some(Self::rgb(short(0)?, short(1)?, short(2)?)),
            4 => Some(Self::rgba(short(0)?, short(1)?, short(2)?, short(3)?)),
            6 => Some(Self::rgb(channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
            8 => Some(Self::rgba(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
                channel(&hex[6..8])?,
            )),
            _ => None,
        }
    }

    /// Format as `RRGGBBAA` without a leading `#`.
    pub fn to_hex(&self) -> String {
        let byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "{:02X}{:02X}{:02X}{:02X}",
            byte(self.r),
            byte(self.g),
            byte(self.b),
            byte(self.a)
        )
    }

    /// Components as an array.
    #[inline]
    pub fn to_array(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Color, b: Color) -> bool {
        a.to_array().iter().zip(b.to_array()).all(|(x, y)| (x - y).abs() < 1e-3)
    }

    #[test]
    fn test_parse_rgb_and_rgba() {
        let c = Color::from_hex("FF8000").unwrap();
        assert!(approx(c, Color::rgb(1.0, 128.0 / 255.0, 0.0)), "{c:?}");

        let c = Color::from_hex("#00000080").unwrap();
        assert!((c.a - 128.0 / 255.0).abs() < 1e-4);
    }

    #[test]
    fn test_parse_shorthand() {
        let c = Color::from_hex("F0F").unwrap();
        assert!(approx(c, Color::rgb(1.0, 0.0, 1.0)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Color::from_hex("").is_none());
        assert!(Color::from_hex("GG0000").is_none());
        assert!(Color::from_hex("12345").is_none());
    }

    #[test]
    fn test_hex_roundtrip() {
        let c = Color::rgba(0.2, 0.4, 0.6, 1.0);
        let back = Color::from_hex(&c.to_hex()).unwrap();
        assert!(approx(c, back));
    }

    #[test]
    fn test_lerp_midpoint() {
        let mid = Color::BLACK.lerp(&Color::WHITE, 0.5);
        assert!(approx(mid, Color::rgb(0.5, 0.5, 0.5)));
        assert!((0.0_f32.lerp(&10.0, 0.25) - 2.5).abs() < 1e-6);
    }
}
