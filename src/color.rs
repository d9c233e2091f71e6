//! Hex color handling and two-stop linear scales for choropleth gradients.
//!
//! Gradients are expanded in RGB space and written as lowercase `#rrggbb`,
//! so a configured pair of colors always yields the same swatches.

use crate::error::{MapError, MapResult};
use regex::Regex;
use std::sync::OnceLock;

/// Number of swatches in every candidate gradient.
pub const GRADIENT_COLORS: usize = 5;

/// Flat fill used when a candidate has no gradient.
pub const NEUTRAL_GRAY: &str = "#616161";

/// End points of the tie/other gradient.
pub const TIE_SCALE: (&str, &str) = ("#EEEEEE", "#212121");

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

fn hex_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^#([0-9a-fA-F]{6})$").expect("static hex regex"))
}

/// True if `s` is a `#RRGGBB` color.
pub fn is_hex_color(s: &str) -> bool {
    hex_regex().is_match(s)
}

impl Rgb8 {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` (either case). Surrounding whitespace is rejected, as in [`is_hex_color`].
    pub fn parse_hex(s: &str) -> MapResult<Self> {
        let caps = hex_regex()
            .captures(s)
            .ok_or_else(|| MapError::InvalidColor(s.to_string()))?;
        let digits = &caps[1];
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| MapError::InvalidColor(s.to_string()))
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Linear interpolation in RGB space, `t` clamped to 0..1.
    pub fn lerp(self, other: Rgb8, t: f64) -> Rgb8 {
        let t = clamp01(t);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgb8 {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
        }
    }
}

fn clamp01(x: f64) -> f64 {
    x.clamp(0.0, 1.0)
}

/// `n` evenly spaced colors from `from` to `to`, both ends included.
pub fn scale_colors(from: &str, to: &str, n: usize) -> MapResult<Vec<String>> {
    let a = Rgb8::parse_hex(from)?;
    let b = Rgb8::parse_hex(to)?;
    Ok(match n {
        0 => Vec::new(),
        1 => vec![a.to_hex()],
        _ => (0..n)
            .map(|i| a.lerp(b, i as f64 / (n - 1) as f64).to_hex())
            .collect(),
    })
}

/// Gradient used for districts without a tracked winner.
pub fn tie_gradient() -> Vec<String> {
    // Both end points are constants, so expansion cannot fail.
    scale_colors(TIE_SCALE.0, TIE_SCALE.1, GRADIENT_COLORS).unwrap_or_default()
}
