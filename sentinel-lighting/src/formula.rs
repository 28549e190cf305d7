//! Pure lighting formulas.
//!
//! Every function here depends only on its arguments. Angles are in degrees,
//! lengths in CSS pixels, opacities in `[0, 1]`. None of them validate their
//! input; out-of-range values produce a number, not a panic.

use crate::{
    color::HslColor,
    shadow::{NeumorphicPair, ShadowLayer},
};

/// Pixels of shadow offset per unit of elevation.
pub const BASE_OFFSET: f64 = 1.5;
/// Pixels of blur per unit of elevation, before the logarithmic growth term.
pub const BASE_BLUR: f64 = 6.0;
/// Shadow opacity at elevation 1 under full intensity.
pub const BASE_OPACITY: f64 = 0.12;
/// Opacity factor applied per doubling of elevation.
pub const OPACITY_DECAY: f64 = 0.92;
/// Elevation multipliers of the stacked soft-shadow technique.
pub const LAYER_MULTIPLIERS: [f64; 5] = [1.0, 2.0, 4.0, 8.0, 16.0];

/// Lightness of every cast shadow, whatever the element color.
const SHADOW_LIGHTNESS: f64 = 35.0;
const SHADOW_SATURATION_FACTOR: f64 = 0.25;
const SHADOW_SATURATION_CAP: f64 = 15.0;
/// Light saturation below which shadows ignore the light color.
const TINT_SATURATION_THRESHOLD: f64 = 15.0;
const TINT_STRENGTH_CAP: f64 = 0.15;
const TINT_SATURATION_CAP: f64 = 12.0;
const NEUMORPHIC_LIGHT_RATIO: f64 = 0.9;
const NEUMORPHIC_DARK_SATURATION_CAP: f64 = 8.0;

/// A 2D vector, in pixels for offsets or percent for positions.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Offset {
    /// Horizontal component.
    pub x: f64,
    /// Vertical component.
    pub y: f64,
}

impl Offset {
    /// Creates a new `Offset`.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl std::ops::Neg for Offset {
    type Output = Offset;

    fn neg(self) -> Self::Output {
        Offset::new(-self.x, -self.y)
    }
}

/// Shadow offset for an element at `elevation`, pointing away from the light.
///
/// A higher altitude shortens the offset through the `cos(altitude)` factor.
pub fn calculate_shadow_offset(azimuth: f64, altitude: f64, elevation: f64) -> Offset {
    let azimuth = azimuth.to_radians();
    let reach = altitude.to_radians().cos() * elevation * BASE_OFFSET;
    Offset::new(-azimuth.cos() * reach, -azimuth.sin() * reach)
}

/// Blur radius for an element at `elevation`.
///
/// Grows faster than linearly, with a logarithmic term bounding the growth.
pub fn calculate_shadow_blur(elevation: f64, blur_multiplier: f64) -> f64 {
    if elevation == 0.0 {
        return 0.0;
    }
    elevation * BASE_BLUR * (1.0 + (elevation + 1.0).log2() * 0.5) * blur_multiplier
}

/// Shadow opacity for an element at `elevation`. Higher elements cast
/// fainter shadows.
pub fn calculate_shadow_opacity(elevation: f64, intensity: f64) -> f64 {
    if elevation == 0.0 {
        return 0.0;
    }
    BASE_OPACITY * intensity * OPACITY_DECAY.powf(elevation.log2())
}

/// Interpolates between two colors, taking the short way around the hue
/// wheel.
///
/// `ratio` is not clamped; values outside `[0, 1]` extrapolate.
pub fn blend_hsl(from: HslColor, to: HslColor, ratio: f64) -> HslColor {
    let (mut h1, mut h2) = (from.h, to.h);
    if (h2 - h1).abs() > 180.0 {
        if h1 < h2 {
            h1 += 360.0;
        } else {
            h2 += 360.0;
        }
    }
    HslColor {
        h: (h1 + (h2 - h1) * ratio).rem_euclid(360.0),
        s: from.s + (to.s - from.s) * ratio,
        l: from.l + (to.l - from.l) * ratio,
    }
}

/// Color of a shadow cast by an element of color `element`.
///
/// Shadows are a desaturated dark version of the element hue. A saturated
/// light pulls the hue slightly toward its complement.
pub fn calculate_shadow_color(element: HslColor, opacity: f64, light: Option<HslColor>) -> String {
    let mut shadow = HslColor::new(
        element.h,
        (element.s * SHADOW_SATURATION_FACTOR).min(SHADOW_SATURATION_CAP),
        SHADOW_LIGHTNESS,
    );

    if let Some(light) = light.filter(|light| light.s > TINT_SATURATION_THRESHOLD) {
        let strength = (0.2 * light.s / 100.0).min(TINT_STRENGTH_CAP);
        shadow.h = blend_hsl(shadow, light.complement(), strength).h;
        shadow.s = shadow
            .s
            .max((shadow.s + light.s * 0.1).min(TINT_SATURATION_CAP));
    }

    hsla(shadow, opacity)
}

/// The light color as a CSS value, optionally brightened.
pub fn get_light_color_css(light: HslColor, opacity: f64, lightness_boost: f64) -> String {
    hsla(light.with_lightness((light.l + lightness_boost).min(100.0)), opacity)
}

/// A translucent tint of `color`, optionally brightened.
pub fn get_tint_color(color: HslColor, opacity: f64, lightness_boost: f64) -> String {
    hsla(color.with_lightness((color.l + lightness_boost).min(100.0)), opacity)
}

/// Where a glass highlight sits on an element, in percent of its box.
///
/// The highlight moves toward the lit edge and rises as the light climbs.
pub fn calculate_highlight_position(azimuth: f64, altitude: f64) -> Offset {
    let azimuth = azimuth.to_radians();
    let altitude = altitude.to_radians();
    let horizontal_spread = altitude.cos() * 40.0;
    Offset::new(
        50.0 + azimuth.cos() * horizontal_spread,
        10.0 + (1.0 - altitude.sin()) * 30.0,
    )
}

/// Opacity of a glass highlight: brighter when the light is high and strong.
pub fn calculate_highlight_opacity(altitude: f64, intensity: f64) -> f64 {
    intensity * (0.25 + 0.35 * altitude.to_radians().sin())
}

/// The paired light and dark shadows of a neumorphic surface.
pub fn calculate_neumorphic_shadows(
    azimuth: f64,
    altitude: f64,
    elevation: f64,
    intensity: f64,
    light_color: Option<HslColor>,
) -> NeumorphicPair {
    let offset = calculate_shadow_offset(azimuth, altitude, elevation);
    let blur = calculate_shadow_blur(elevation, 1.0);
    let dark_opacity = calculate_shadow_opacity(elevation, intensity);
    let light_opacity = dark_opacity * NEUMORPHIC_LIGHT_RATIO;

    let (highlight, shade) = match light_color {
        Some(light) => (
            hsla(
                HslColor::new(light.h, light.s * 0.2, (light.l + 4.0).clamp(95.0, 99.0)),
                light_opacity,
            ),
            hsla(
                HslColor::new(
                    light.complement().h,
                    (light.s * 0.3).min(NEUMORPHIC_DARK_SATURATION_CAP),
                    SHADOW_LIGHTNESS,
                ),
                dark_opacity,
            ),
        ),
        None => (
            hsla(HslColor::WHITE, light_opacity),
            hsla(HslColor::BLACK.with_lightness(SHADOW_LIGHTNESS), dark_opacity),
        ),
    };

    NeumorphicPair {
        light: ShadowLayer {
            offset_x: -offset.x,
            offset_y: -offset.y,
            blur,
            spread: 0.0,
            color: highlight,
            inset: false,
        },
        dark: ShadowLayer {
            offset_x: offset.x,
            offset_y: offset.y,
            blur,
            spread: 0.0,
            color: shade,
            inset: false,
        },
    }
}

/// Five stacked shadows of growing reach and fading opacity.
///
/// Layer `i` uses `elevation * LAYER_MULTIPLIERS[i]` for offset and blur, and
/// the opacity of `elevation` divided by the multiplier.
pub fn generate_layered_shadows(
    azimuth: f64,
    altitude: f64,
    elevation: f64,
    intensity: f64,
    element_color: Option<HslColor>,
) -> Vec<ShadowLayer> {
    let element_color = element_color.unwrap_or(HslColor::NEUTRAL);
    let base_opacity = calculate_shadow_opacity(elevation, intensity);

    LAYER_MULTIPLIERS
        .iter()
        .map(|&multiplier| {
            let layer_elevation = elevation * multiplier;
            let offset = calculate_shadow_offset(azimuth, altitude, layer_elevation);
            ShadowLayer {
                offset_x: offset.x,
                offset_y: offset.y,
                blur: calculate_shadow_blur(layer_elevation, 1.0),
                spread: 0.0,
                color: calculate_shadow_color(element_color, base_opacity / multiplier, None),
                inset: false,
            }
        })
        .collect()
}

/// Joins layers into a CSS `box-shadow` value.
///
/// ```
/// use sentinel_lighting::{ShadowLayer, layers_to_css};
///
/// let layers = [ShadowLayer {
///     offset_x: 1.25,
///     offset_y: -2.0,
///     blur: 3.0,
///     spread: 0.0,
///     color: "red".to_string(),
///     inset: false,
/// }];
/// assert_eq!(layers_to_css(&layers), "1.3px -2.0px 3.0px 0 red");
/// ```
pub fn layers_to_css(layers: &[ShadowLayer]) -> String {
    layers
        .iter()
        .map(ShadowLayer::to_css)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Color of the top edge highlight of a glass surface.
///
/// Uses, in order of preference: a blend of element and light color, the
/// light color, a lightened element color, plain white.
pub fn glass_highlight_color(
    element: Option<HslColor>,
    light: Option<HslColor>,
    opacity: f64,
) -> String {
    match (element, light) {
        (Some(element), Some(light)) => get_tint_color(blend_hsl(element, light, 0.6), opacity, 25.0),
        (None, Some(light)) => get_light_color_css(light, opacity, 5.0),
        (Some(element), None) => get_tint_color(element, opacity, 30.0),
        (None, None) => white(opacity),
    }
}

/// Color of the bottom inner glow of a glass surface.
///
/// Uses a tint of the element color, else the light color, else white.
pub fn glass_inner_glow_color(
    element: Option<HslColor>,
    light: Option<HslColor>,
    opacity: f64,
) -> String {
    match (element, light) {
        (Some(element), _) => get_tint_color(element, opacity, 20.0),
        (None, Some(light)) => get_light_color_css(light, opacity, 0.0),
        (None, None) => white(opacity),
    }
}

/// Formats `value` with at most `max_decimals` decimals, trailing zeros
/// trimmed. Never yields `-0`.
pub fn format_number(value: f64, max_decimals: usize) -> String {
    let mut text = format!("{:.*}", max_decimals, value);
    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').trim_end_matches('.').len();
        text.truncate(trimmed);
    }
    if text == "-0" {
        text.remove(0);
    }
    text
}

/// One decimal place, halves rounded away from zero (`1.25 -> "1.3"`).
///
/// Rounds the exact stored value, so `1.45` (stored just below) gives `"1.4"`.
/// Only multiples of `0.25` can sit exactly on a tie.
pub(crate) fn fixed_one_decimal(value: f64) -> String {
    let quarters = value * 4.0;
    let mut text = if quarters.fract() == 0.0 && quarters % 2.0 != 0.0 {
        format!("{:.1}", (value * 10.0).round() / 10.0)
    } else {
        format!("{value:.1}")
    };
    if text == "-0.0" {
        text.remove(0);
    }
    text
}

fn hsla(color: HslColor, opacity: f64) -> String {
    format!(
        "hsla({}, {}%, {}%, {})",
        format_number(color.h, 1),
        format_number(color.s, 1),
        format_number(color.l, 1),
        format_number(opacity, 3)
    )
}

fn white(opacity: f64) -> String {
    format!("rgba(255, 255, 255, {})", format_number(opacity, 3))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < EPSILON,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_offset_points_away_from_light() {
        let offset = calculate_shadow_offset(0.0, 0.0, 2.0);
        assert_close(offset.x, -3.0);
        assert_close(offset.y, 0.0);

        let offset = calculate_shadow_offset(90.0, 60.0, 4.0);
        assert_close(offset.x, 0.0);
        assert_close(offset.y, -3.0);
    }

    #[test]
    fn test_offset_symmetry() {
        for azimuth in [0.0, 30.0, 135.0, 200.0, 315.0] {
            for altitude in [0.0, 45.0, 80.0] {
                let offset = calculate_shadow_offset(azimuth, altitude, 8.0);
                let opposite = calculate_shadow_offset(azimuth + 180.0, altitude, 8.0);
                assert_close(offset.x, -opposite.x);
                assert_close(offset.y, -opposite.y);
            }
        }
    }

    #[test]
    fn test_overhead_light_casts_no_offset() {
        let offset = calculate_shadow_offset(135.0, 90.0, 32.0);
        assert!(offset.x.abs() < 1e-6 && offset.y.abs() < 1e-6);
    }

    #[test]
    fn test_blur() {
        assert_eq!(calculate_shadow_blur(0.0, 1.0), 0.0);
        assert_close(calculate_shadow_blur(1.0, 1.0), 9.0);
        assert_close(calculate_shadow_blur(1.0, 2.0), 18.0);
        assert_close(calculate_shadow_blur(3.0, 1.0), 36.0);
    }

    #[test]
    fn test_blur_grows_with_elevation() {
        let levels = [1.0, 2.0, 4.0, 8.0, 16.0, 32.0];
        for pair in levels.windows(2) {
            assert!(calculate_shadow_blur(pair[0], 1.0) < calculate_shadow_blur(pair[1], 1.0));
        }
    }

    #[test]
    fn test_opacity() {
        assert_eq!(calculate_shadow_opacity(0.0, 1.0), 0.0);
        assert_close(calculate_shadow_opacity(1.0, 1.0), 0.12);
        assert_close(calculate_shadow_opacity(4.0, 0.5), 0.06 * 0.92 * 0.92);
    }

    #[test]
    fn test_opacity_decays_with_elevation() {
        let levels = [0.5, 1.0, 2.0, 4.0, 8.0, 16.0, 32.0];
        for pair in levels.windows(2) {
            assert!(
                calculate_shadow_opacity(pair[0], 0.7) > calculate_shadow_opacity(pair[1], 0.7)
            );
        }
    }

    #[test]
    fn test_blend_takes_short_way_around() {
        let a = HslColor::new(350.0, 40.0, 20.0);
        let b = HslColor::new(10.0, 60.0, 40.0);
        let mid = blend_hsl(a, b, 0.5);
        assert!(mid.h < 1e-9 || (360.0 - mid.h) < 1e-9, "hue was {}", mid.h);
        assert_close(mid.s, 50.0);
        assert_close(mid.l, 30.0);

        let reverse = blend_hsl(b, a, 0.5);
        assert!(reverse.h < 1e-9 || (360.0 - reverse.h) < 1e-9);
    }

    #[test]
    fn test_blend_endpoints_and_extrapolation() {
        let a = HslColor::new(100.0, 10.0, 10.0);
        let b = HslColor::new(200.0, 30.0, 50.0);
        assert_eq!(blend_hsl(a, b, 0.0), a);
        assert_eq!(blend_hsl(a, b, 1.0), b);
        let beyond = blend_hsl(a, b, 1.5);
        assert_close(beyond.h, 250.0);
        assert_close(beyond.l, 70.0);
    }

    #[test]
    fn test_shadow_color_is_desaturated_dark() {
        let color = calculate_shadow_color(HslColor::new(210.0, 80.0, 60.0), 0.12, None);
        assert_eq!(color, "hsla(210, 15%, 35%, 0.12)");

        let color = calculate_shadow_color(HslColor::new(30.0, 20.0, 90.0), 0.5, None);
        assert_eq!(color, "hsla(30, 5%, 35%, 0.5)");
    }

    #[test]
    fn test_shadow_color_ignores_dull_light() {
        let element = HslColor::new(210.0, 80.0, 60.0);
        let dull = HslColor::new(45.0, 10.0, 95.0);
        assert_eq!(
            calculate_shadow_color(element, 0.1, Some(dull)),
            calculate_shadow_color(element, 0.1, None)
        );
    }

    #[test]
    fn test_shadow_color_leans_toward_light_complement() {
        let element = HslColor::new(0.0, 0.0, 50.0);
        let light = HslColor::new(0.0, 100.0, 50.0);
        // Complement is 180, strength is capped at 0.15.
        assert_eq!(
            calculate_shadow_color(element, 0.2, Some(light)),
            "hsla(27, 10%, 35%, 0.2)"
        );
    }

    #[test]
    fn test_light_and_tint_css() {
        let light = HslColor::new(45.0, 20.0, 95.0);
        assert_eq!(get_light_color_css(light, 0.5, 0.0), "hsla(45, 20%, 95%, 0.5)");
        assert_eq!(get_light_color_css(light, 0.5, 10.0), "hsla(45, 20%, 100%, 0.5)");
        assert_eq!(
            get_tint_color(HslColor::new(200.0, 60.0, 40.0), 0.25, 12.5),
            "hsla(200, 60%, 52.5%, 0.25)"
        );
    }

    #[test]
    fn test_highlight_position() {
        let overhead = calculate_highlight_position(0.0, 90.0);
        assert_close(overhead.x, 50.0);
        assert_close(overhead.y, 10.0);

        let grazing_right = calculate_highlight_position(0.0, 0.0);
        assert_close(grazing_right.x, 90.0);
        assert_close(grazing_right.y, 40.0);

        let grazing_left = calculate_highlight_position(180.0, 0.0);
        assert_close(grazing_left.x, 10.0);
    }

    #[test]
    fn test_neumorphic_pair() {
        let pair = calculate_neumorphic_shadows(135.0, 45.0, 4.0, 1.0, None);
        assert_close(pair.light.offset_x, -pair.dark.offset_x);
        assert_close(pair.light.offset_y, -pair.dark.offset_y);
        assert_eq!(pair.light.blur, pair.dark.blur);
        assert!(!pair.light.inset && !pair.dark.inset);
        assert!(pair.light.color.starts_with("hsla(0, 0%, 100%, "));
        assert!(pair.dark.color.starts_with("hsla(0, 0%, 35%, "));
        assert_eq!(pair.into_layers().len(), 2);
    }

    #[test]
    fn test_neumorphic_pair_tinted_by_light() {
        let light = HslColor::new(45.0, 20.0, 95.0);
        let pair = calculate_neumorphic_shadows(135.0, 45.0, 1.0, 1.0, Some(light));
        // Light opacity is 0.9 of dark opacity 0.12.
        assert_eq!(pair.light.color, "hsla(45, 4%, 99%, 0.108)");
        assert_eq!(pair.dark.color, "hsla(225, 6%, 35%, 0.12)");
    }

    #[test]
    fn test_layered_shadows() {
        let layers = generate_layered_shadows(135.0, 45.0, 2.0, 1.0, None);
        assert_eq!(layers.len(), 5);
        for pair in layers.windows(2) {
            assert!(pair[0].blur < pair[1].blur);
            assert!(pair[0].offset_x.abs() < pair[1].offset_x.abs());
        }
        assert_eq!(layers[0].color, "hsla(0, 0%, 35%, 0.11)");
        assert_eq!(layers[4].color, "hsla(0, 0%, 35%, 0.007)");
        assert!(layers.iter().all(|layer| !layer.inset && layer.spread == 0.0));
    }

    #[test]
    fn test_layered_shadows_at_zero_elevation_still_has_five_layers() {
        let layers = generate_layered_shadows(0.0, 0.0, 0.0, 1.0, None);
        assert_eq!(layers.len(), 5);
        assert!(layers.iter().all(|layer| layer.blur == 0.0));
    }

    #[test]
    fn test_glass_color_priority() {
        let element = HslColor::new(200.0, 60.0, 40.0);
        let light = HslColor::new(45.0, 20.0, 95.0);

        assert!(glass_highlight_color(Some(element), Some(light), 0.4).starts_with("hsla("));
        assert_eq!(
            glass_highlight_color(None, Some(light), 0.4),
            "hsla(45, 20%, 100%, 0.4)"
        );
        assert_eq!(
            glass_highlight_color(Some(element), None, 0.4),
            "hsla(200, 60%, 70%, 0.4)"
        );
        assert_eq!(
            glass_highlight_color(None, None, 0.4),
            "rgba(255, 255, 255, 0.4)"
        );

        assert_eq!(
            glass_inner_glow_color(Some(element), Some(light), 0.2),
            "hsla(200, 60%, 60%, 0.2)"
        );
        assert_eq!(
            glass_inner_glow_color(None, Some(light), 0.2),
            "hsla(45, 20%, 95%, 0.2)"
        );
        assert_eq!(
            glass_inner_glow_color(None, None, 0.2),
            "rgba(255, 255, 255, 0.2)"
        );
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(135.0, 2), "135");
        assert_eq!(format_number(0.101568, 3), "0.102");
        assert_eq!(format_number(52.5, 1), "52.5");
        assert_eq!(format_number(-0.0001, 2), "0");
        assert_eq!(format_number(-12.25, 0), "-12");
    }

    #[test]
    fn test_fixed_one_decimal() {
        assert_eq!(fixed_one_decimal(1.25), "1.3");
        assert_eq!(fixed_one_decimal(-1.25), "-1.3");
        assert_eq!(fixed_one_decimal(-2.0), "-2.0");
        assert_eq!(fixed_one_decimal(-0.01), "0.0");
        assert_eq!(fixed_one_decimal(0.0), "0.0");
        assert_eq!(fixed_one_decimal(0.75), "0.8");
        assert_eq!(fixed_one_decimal(-0.25), "-0.3");
    }

    #[test]
    fn test_fixed_one_decimal_rounds_stored_value() {
        assert_eq!(fixed_one_decimal(1.45), "1.4");
        assert_eq!(fixed_one_decimal(0.35), "0.3");
        assert_eq!(fixed_one_decimal(-1.45), "-1.4");
        assert_eq!(fixed_one_decimal(2.675), "2.7");
        assert_eq!(fixed_one_decimal(12.345), "12.3");
    }
}
