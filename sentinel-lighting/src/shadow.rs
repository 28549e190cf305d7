//! Shadow layer definitions and the shadow request/result types.
//!
//! ## Usage
//!
//! Describe an element with [`ElementLighting`], hand it to the engine and
//! apply the returned [`ComputedShadow::box_shadow`] as a `box-shadow` value.

use crate::{
    color::HslColor,
    formula::{fixed_one_decimal, layers_to_css},
};

/// A single CSS shadow primitive.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShadowLayer {
    /// Horizontal offset in pixels.
    pub offset_x: f64,
    /// Vertical offset in pixels.
    pub offset_y: f64,
    /// Blur radius in pixels.
    pub blur: f64,
    /// Spread radius in pixels, rendered as an integer.
    pub spread: f64,
    /// Any CSS color, usually an `hsla(...)` string.
    pub color: String,
    /// Whether the shadow is drawn inside the element.
    pub inset: bool,
}

impl ShadowLayer {
    /// Renders this layer as one entry of a `box-shadow` list.
    ///
    /// Offsets and blur use one decimal place, spread is an integer.
    ///
    /// ```
    /// use sentinel_lighting::ShadowLayer;
    ///
    /// let layer = ShadowLayer {
    ///     offset_x: 1.25,
    ///     offset_y: -2.0,
    ///     blur: 3.0,
    ///     spread: 0.0,
    ///     color: "red".to_string(),
    ///     inset: false,
    /// };
    /// assert_eq!(layer.to_css(), "1.3px -2.0px 3.0px 0 red");
    /// ```
    pub fn to_css(&self) -> String {
        format!(
            "{}{}px {}px {}px {} {}",
            if self.inset { "inset " } else { "" },
            fixed_one_decimal(self.offset_x),
            fixed_one_decimal(self.offset_y),
            fixed_one_decimal(self.blur),
            spread_css(self.spread),
            self.color
        )
    }
}

fn spread_css(spread: f64) -> String {
    let spread = spread.round() as i64;
    if spread == 0 {
        "0".to_string()
    } else {
        format!("{spread}px")
    }
}

/// The light and dark halves of a neumorphic shadow.
#[derive(Debug, Clone, PartialEq)]
pub struct NeumorphicPair {
    /// Highlight layer, offset toward the light.
    pub light: ShadowLayer,
    /// Shadow layer, offset away from the light.
    pub dark: ShadowLayer,
}

impl NeumorphicPair {
    /// Both layers, highlight first.
    pub fn into_layers(self) -> [ShadowLayer; 2] {
        [self.light, self.dark]
    }
}

/// The result of any shadow computation: the ready-to-use CSS value plus the
/// layers it was built from.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComputedShadow {
    /// Value for the CSS `box-shadow` property.
    pub box_shadow: String,
    /// Layers in paint order.
    pub layers: Vec<ShadowLayer>,
}

impl ComputedShadow {
    /// The result for flat elements: `box-shadow: none` and no layers.
    pub fn none() -> Self {
        Self {
            box_shadow: "none".to_string(),
            layers: Vec::new(),
        }
    }

    /// Builds the CSS value from `layers`.
    pub fn from_layers(layers: Vec<ShadowLayer>) -> Self {
        if layers.is_empty() {
            return Self::none();
        }
        Self {
            box_shadow: layers_to_css(&layers),
            layers,
        }
    }

    /// Returns `true` for the flat result.
    pub fn is_none(&self) -> bool {
        self.layers.is_empty()
    }
}

/// A shadow request for one element.
///
/// # Example
///
/// ```
/// use sentinel_lighting::{ElementLighting, HslColor};
///
/// let pressed = ElementLighting::new(2.0)
///     .color(HslColor::new(210.0, 60.0, 50.0))
///     .inset(true);
/// assert!(pressed.inset);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ElementLighting {
    /// Height above the surface. `0.0` casts no shadow.
    pub elevation: f64,
    /// Surface color of the element, used to pick the shadow hue.
    pub color: Option<HslColor>,
    /// Draw a pressed (inset) shadow instead of a raised one.
    pub inset: bool,
    /// Scales every blur radius, `1.0` when unset.
    pub blur_multiplier: Option<f64>,
}

impl ElementLighting {
    /// A raised, uncolored element at `elevation`.
    pub fn new(elevation: impl Into<f64>) -> Self {
        Self {
            elevation: elevation.into(),
            ..Self::default()
        }
    }

    /// Sets the element color.
    pub fn color(mut self, color: HslColor) -> Self {
        self.color = Some(color);
        self
    }

    /// Sets whether the shadow is inset.
    pub fn inset(mut self, inset: bool) -> Self {
        self.inset = inset;
        self
    }

    /// Sets the blur multiplier.
    pub fn blur_multiplier(mut self, blur_multiplier: f64) -> Self {
        self.blur_multiplier = Some(blur_multiplier);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer(offset_x: f64, offset_y: f64, blur: f64, spread: f64, inset: bool) -> ShadowLayer {
        ShadowLayer {
            offset_x,
            offset_y,
            blur,
            spread,
            color: "red".to_string(),
            inset,
        }
    }

    #[test]
    fn test_layer_css_format() {
        assert_eq!(
            layer(1.25, -2.0, 3.0, 0.0, false).to_css(),
            "1.3px -2.0px 3.0px 0 red"
        );
        assert_eq!(
            layer(-0.04, 0.0, 12.345, 2.4, true).to_css(),
            "inset 0.0px 0.0px 12.3px 2px red"
        );
    }

    #[test]
    fn test_from_layers_joins_with_commas() {
        let shadow = ComputedShadow::from_layers(vec![
            layer(1.0, 1.0, 2.0, 0.0, false),
            layer(-1.0, -1.0, 2.0, 0.0, false),
        ]);
        assert_eq!(
            shadow.box_shadow,
            "1.0px 1.0px 2.0px 0 red, -1.0px -1.0px 2.0px 0 red"
        );
        assert_eq!(shadow.layers.len(), 2);
    }

    #[test]
    fn test_empty_layers_are_none() {
        let shadow = ComputedShadow::from_layers(Vec::new());
        assert_eq!(shadow, ComputedShadow::none());
        assert!(shadow.is_none());
        assert_eq!(shadow.box_shadow, "none");
    }

    #[test]
    fn test_element_builder() {
        let element = ElementLighting::new(4.0).blur_multiplier(2.0);
        assert_eq!(element.elevation, 4.0);
        assert_eq!(element.blur_multiplier, Some(2.0));
        assert!(!element.inset);
        assert!(element.color.is_none());
    }
}
