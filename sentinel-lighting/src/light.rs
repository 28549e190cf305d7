//! The light source configuration and the canonical elevation levels.

use smallvec::SmallVec;

use crate::{color::HslColor, error::LightingError};

/// The single light that every shadow in a tree is derived from.
///
/// Angles are in degrees. `azimuth` is the horizontal direction the light
/// comes from (0 = right, 90 = top, 180 = left, 270 = bottom) and `altitude`
/// is the angle above the surface (0 = grazing, 90 = straight overhead).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LightSource {
    /// Horizontal direction in `[0, 360)`.
    pub azimuth: f64,
    /// Vertical angle in `[0, 90]`.
    pub altitude: f64,
    /// Strength in `[0, 1]`, scales shadow opacity.
    pub intensity: f64,
    /// Color temperature in Kelvin. Stored and exported, not used by the formulas.
    pub temperature: f64,
    /// Tint applied to highlights and, through its complement, to shadows.
    pub color: HslColor,
}

impl LightSource {
    /// A warm light from the upper left, 45 degrees above the surface.
    pub const DEFAULT: LightSource = LightSource {
        azimuth: 135.0,
        altitude: 45.0,
        intensity: 1.0,
        temperature: 5500.0,
        color: HslColor::new(45.0, 20.0, 95.0),
    };

    /// Names of the fields whose values lie outside their documented range.
    ///
    /// Out-of-range values are never rejected; this exists so callers can
    /// report them.
    pub fn out_of_range_fields(&self) -> SmallVec<[&'static str; 4]> {
        let mut fields = SmallVec::new();
        if !(0.0..360.0).contains(&self.azimuth) {
            fields.push("azimuth");
        }
        if !(0.0..=90.0).contains(&self.altitude) {
            fields.push("altitude");
        }
        if !(0.0..=1.0).contains(&self.intensity) {
            fields.push("intensity");
        }
        let color = self.color;
        if !(0.0..=100.0).contains(&color.s) || !(0.0..=100.0).contains(&color.l) {
            fields.push("color");
        }
        fields
    }
}

impl Default for LightSource {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A partial [`LightSource`]. Fields left as `None` keep their current value.
///
/// # Example
///
/// ```
/// use sentinel_lighting::{LightSource, LightUpdate};
///
/// let mut light = LightSource::default();
/// LightUpdate::new().azimuth(0.0).intensity(0.5).apply_to(&mut light);
/// assert_eq!(light.azimuth, 0.0);
/// assert_eq!(light.altitude, LightSource::DEFAULT.altitude);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LightUpdate {
    /// New azimuth, if any.
    pub azimuth: Option<f64>,
    /// New altitude, if any.
    pub altitude: Option<f64>,
    /// New intensity, if any.
    pub intensity: Option<f64>,
    /// New temperature, if any.
    pub temperature: Option<f64>,
    /// New color, if any.
    pub color: Option<HslColor>,
}

impl LightUpdate {
    /// An update that changes nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the azimuth.
    pub fn azimuth(mut self, azimuth: f64) -> Self {
        self.azimuth = Some(azimuth);
        self
    }

    /// Sets the altitude.
    pub fn altitude(mut self, altitude: f64) -> Self {
        self.altitude = Some(altitude);
        self
    }

    /// Sets the intensity.
    pub fn intensity(mut self, intensity: f64) -> Self {
        self.intensity = Some(intensity);
        self
    }

    /// Sets the temperature.
    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Sets the color.
    pub fn color(mut self, color: HslColor) -> Self {
        self.color = Some(color);
        self
    }

    /// Returns `true` when no field is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Layers `other` on top of `self`; fields set in `other` win.
    pub fn merge(self, other: LightUpdate) -> Self {
        Self {
            azimuth: other.azimuth.or(self.azimuth),
            altitude: other.altitude.or(self.altitude),
            intensity: other.intensity.or(self.intensity),
            temperature: other.temperature.or(self.temperature),
            color: other.color.or(self.color),
        }
    }

    /// Shallow-merges this update into `light`.
    pub fn apply_to(&self, light: &mut LightSource) {
        if let Some(azimuth) = self.azimuth {
            light.azimuth = azimuth;
        }
        if let Some(altitude) = self.altitude {
            light.altitude = altitude;
        }
        if let Some(intensity) = self.intensity {
            light.intensity = intensity;
        }
        if let Some(temperature) = self.temperature {
            light.temperature = temperature;
        }
        if let Some(color) = self.color {
            light.color = color;
        }
    }
}

impl From<LightSource> for LightUpdate {
    fn from(light: LightSource) -> Self {
        Self {
            azimuth: Some(light.azimuth),
            altitude: Some(light.altitude),
            intensity: Some(light.intensity),
            temperature: Some(light.temperature),
            color: Some(light.color),
        }
    }
}

/// A conceptual height above the surface, from a fixed set of levels.
///
/// Formulas accept any `f64` elevation; this type names the levels that
/// stylesheets and CSS variables are generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Elevation {
    /// Flat, casts no shadow.
    Level0,
    /// Elevation 1.
    Level1,
    /// Elevation 2.
    Level2,
    /// Elevation 4.
    Level4,
    /// Elevation 8.
    Level8,
    /// Elevation 16.
    Level16,
    /// Elevation 32.
    Level32,
}

impl Elevation {
    /// Every level, flat included.
    pub const ALL: [Elevation; 7] = [
        Elevation::Level0,
        Elevation::Level1,
        Elevation::Level2,
        Elevation::Level4,
        Elevation::Level8,
        Elevation::Level16,
        Elevation::Level32,
    ];

    /// The six levels that cast a shadow.
    pub const RAISED: [Elevation; 6] = [
        Elevation::Level1,
        Elevation::Level2,
        Elevation::Level4,
        Elevation::Level8,
        Elevation::Level16,
        Elevation::Level32,
    ];

    /// The level as an integer.
    pub const fn as_u32(self) -> u32 {
        match self {
            Elevation::Level0 => 0,
            Elevation::Level1 => 1,
            Elevation::Level2 => 2,
            Elevation::Level4 => 4,
            Elevation::Level8 => 8,
            Elevation::Level16 => 16,
            Elevation::Level32 => 32,
        }
    }

    /// The level as the `f64` the formulas consume.
    pub fn value(self) -> f64 {
        f64::from(self.as_u32())
    }
}

impl TryFrom<u32> for Elevation {
    type Error = LightingError;

    fn try_from(level: u32) -> Result<Self, Self::Error> {
        Elevation::ALL
            .into_iter()
            .find(|elevation| elevation.as_u32() == level)
            .ok_or(LightingError::InvalidElevation(level))
    }
}

impl From<Elevation> for f64 {
    fn from(elevation: Elevation) -> Self {
        elevation.value()
    }
}
