//! Packed ARGB colors and gamma-correct blending.
//!
//! Blending happens in linear light: each color channel is decoded from sRGB,
//! interpolated, and encoded again. Alpha is interpolated as-is.

use crate::error::{LottieError, Result};
use std::str::FromStr;

/// A packed `0xAARRGGBB` color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color(pub u32);

impl Color {
    pub const TRANSPARENT: Color = Color(0x0000_0000);
    pub const BLACK: Color = Color(0xFF00_0000);
    pub const WHITE: Color = Color(0xFFFF_FFFF);

    pub const fn from_argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Color((a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32)
    }

    pub const fn a(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub const fn r(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn g(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn b(self) -> u8 {
        self.0 as u8
    }

    /// Converts an `[r, g, b, a]` record. Channels are in `[0, 1]`, unless any
    /// of them exceeds 1, in which case the record is read as `[0, 255]`.
    /// Missing alpha means opaque.
    pub fn from_rgba_f32(rgba: &[f32]) -> Self {
        let channel = |i: usize, default: f32| rgba.get(i).copied().unwrap_or(default);
        let (r, g, b) = (channel(0, 0.0), channel(1, 0.0), channel(2, 0.0));
        let scale = if r > 1.0 || g > 1.0 || b > 1.0 { 1.0 } else { 255.0 };
        let a = channel(3, 1.0).clamp(0.0, 1.0) * 255.0;
        let to_u8 = |v: f32| (v * scale).round().clamp(0.0, 255.0) as u8;
        Color::from_argb(a.round() as u8, to_u8(r), to_u8(g), to_u8(b))
    }
}

impl FromStr for Color {
    type Err = LottieError;

    /// Parses `#RRGGBB` or `#AARRGGBB`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || LottieError::InvalidColorLiteral(s.to_string());

        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let value = u32::from_str_radix(hex, 16).map_err(|_| invalid())?;
        match hex.len() {
            6 => Ok(Color(0xFF00_0000 | value)),
            8 => Ok(Color(value)),
            _ => Err(invalid()),
        }
    }
}

/// sRGB electro-optical transfer: encoded channel to linear light.
pub fn eocf_srgb(srgb: f32) -> f32 {
    if srgb <= 0.04045 {
        srgb / 12.92
    } else {
        ((srgb + 0.055) / 1.055).powf(2.4)
    }
}

/// sRGB opto-electronic transfer: linear light to encoded channel.
pub fn oecf_srgb(linear: f32) -> f32 {
    if linear <= 0.003_130_8 {
        linear * 12.92
    } else {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    }
}

/// Blends `start` towards `end` by `fraction` in linear light.
pub fn evaluate(fraction: f32, start: Color, end: Color) -> Color {
    if start == end {
        return start;
    }

    let unpack = |c: Color| {
        [
            c.a() as f32 / 255.0,
            eocf_srgb(c.r() as f32 / 255.0),
            eocf_srgb(c.g() as f32 / 255.0),
            eocf_srgb(c.b() as f32 / 255.0),
        ]
    };
    let from = unpack(start);
    let to = unpack(end);

    let lerp = |i: usize| from[i] + fraction * (to[i] - from[i]);
    let a = lerp(0) * 255.0;
    let r = oecf_srgb(lerp(1)) * 255.0;
    let g = oecf_srgb(lerp(2)) * 255.0;
    let b = oecf_srgb(lerp(3)) * 255.0;

    let pack = |v: f32| v.round().clamp(0.0, 255.0) as u8;
    Color::from_argb(pack(a), pack(r), pack(g), pack(b))
}
