//! HSL colors used for light tints and shadow hues.

use std::{fmt, str::FromStr};

use crate::{error::LightingError, formula::format_number};

/// A color in the HSL color space.
///
/// Hue is in degrees `[0, 360)`, saturation and lightness are percentages in
/// `[0, 100]`. Values outside these ranges are kept as-is.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HslColor {
    /// Hue in degrees.
    pub h: f64,
    /// Saturation in percent.
    pub s: f64,
    /// Lightness in percent.
    pub l: f64,
}

impl HslColor {
    // --- Common Colors ---
    /// Pure white.
    pub const WHITE: HslColor = HslColor::new(0.0, 0.0, 100.0);
    /// Pure black.
    pub const BLACK: HslColor = HslColor::new(0.0, 0.0, 0.0);
    /// Mid gray, used when an element has no color of its own.
    pub const NEUTRAL: HslColor = HslColor::new(0.0, 0.0, 50.0);

    /// Creates a new `HslColor` from hue, saturation and lightness.
    #[inline]
    pub const fn new(h: f64, s: f64, l: f64) -> Self {
        Self { h, s, l }
    }

    /// Returns the color on the opposite side of the hue wheel.
    #[inline]
    pub fn complement(self) -> Self {
        Self {
            h: (self.h + 180.0).rem_euclid(360.0),
            ..self
        }
    }

    /// Returns a copy with the given lightness.
    #[inline]
    pub fn with_lightness(self, l: f64) -> Self {
        Self { l, ..self }
    }

    /// Returns a copy with the given saturation.
    #[inline]
    pub fn with_saturation(self, s: f64) -> Self {
        Self { s, ..self }
    }
}

/// The default color is the neutral gray.
impl Default for HslColor {
    #[inline]
    fn default() -> Self {
        Self::NEUTRAL
    }
}

impl fmt::Display for HslColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hsl({}, {}%, {}%)",
            format_number(self.h, 1),
            format_number(self.s, 1),
            format_number(self.l, 1)
        )
    }
}

/// Parses `hsl(h, s%, l%)`, `hsl(h s% l%)` or a bare `h s l` / `h, s, l` triple.
impl FromStr for HslColor {
    type Err = LightingError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let invalid = || LightingError::InvalidColor(input.to_string());

        let trimmed = input.trim();
        let body = match trimmed
            .strip_prefix("hsla(")
            .or_else(|| trimmed.strip_prefix("hsl("))
        {
            Some(rest) => rest.strip_suffix(')').ok_or_else(invalid)?,
            None => trimmed,
        };

        let mut components = body
            .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.trim_end_matches('%')
                    .trim_end_matches("deg")
                    .parse::<f64>()
                    .map_err(|_| invalid())
            });

        let h = components.next().ok_or_else(invalid)??;
        let s = components.next().ok_or_else(invalid)??;
        let l = components.next().ok_or_else(invalid)??;
        if !(h.is_finite() && s.is_finite() && l.is_finite()) {
            return Err(invalid());
        }
        Ok(Self { h, s, l })
    }
}

// --- From Conversions ---

impl From<[f64; 3]> for HslColor {
    #[inline]
    fn from([h, s, l]: [f64; 3]) -> Self {
        Self { h, s, l }
    }
}

impl From<HslColor> for [f64; 3] {
    #[inline]
    fn from(color: HslColor) -> Self {
        [color.h, color.s, color.l]
    }
}
