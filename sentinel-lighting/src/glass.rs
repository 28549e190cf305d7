//! Glass surface lighting: edge highlights, inner glow and the layered glass
//! recipe.
//!
//! ## Usage
//!
//! Ask a [`LightingHandle`](crate::LightingHandle) for
//! [`GlassLayers`](crate::LightingHandle::glass_layers) and render each part
//! as a stacked element inside the glass container.

use smallvec::SmallVec;

use crate::{
    color::HslColor,
    formula::{Offset, format_number, get_tint_color},
};

/// Backdrop filter applied by the glass container.
const GLASS_BACKDROP_FILTER: &str = "blur(16px) saturate(160%)";
/// Fine noise used as the texture overlay.
const GLASS_TEXTURE: &str = "repeating-radial-gradient(circle at 50% 50%, rgba(255, 255, 255, 0.6) 0px, transparent 1px, transparent 2px)";

/// An ordered list of CSS declarations, e.g. the inline style of one element.
///
/// # Example
///
/// ```
/// use sentinel_lighting::StyleDeclarations;
///
/// let style = StyleDeclarations::new()
///     .with("position", "absolute")
///     .with("height", "1px");
/// assert_eq!(style.to_css(), "position: absolute; height: 1px");
/// assert_eq!(style.get("height"), Some("1px"));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StyleDeclarations {
    declarations: SmallVec<[(&'static str, String); 8]>,
}

impl StyleDeclarations {
    /// An empty declaration list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a declaration, replacing an earlier one for the same property.
    pub fn with(mut self, property: &'static str, value: impl Into<String>) -> Self {
        self.set(property, value);
        self
    }

    /// Sets a declaration in place.
    pub fn set(&mut self, property: &'static str, value: impl Into<String>) {
        let value = value.into();
        match self
            .declarations
            .iter_mut()
            .find(|(existing, _)| *existing == property)
        {
            Some((_, existing_value)) => *existing_value = value,
            None => self.declarations.push((property, value)),
        }
    }

    /// The value of `property`, if declared.
    pub fn get(&self, property: &str) -> Option<&str> {
        self.declarations
            .iter()
            .find(|(existing, _)| *existing == property)
            .map(|(_, value)| value.as_str())
    }

    /// Declarations in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.declarations
            .iter()
            .map(|(property, value)| (*property, value.as_str()))
    }

    /// Number of declarations.
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    /// Returns `true` when nothing is declared.
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Renders `prop: value` pairs separated by `; `.
    pub fn to_css(&self) -> String {
        self.iter()
            .map(|(property, value)| format!("{property}: {value}"))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Light-derived values for one glass surface.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedGlass {
    /// Highlight center, percent of the element width.
    pub highlight_x: f64,
    /// Highlight center, percent of the element height.
    pub highlight_y: f64,
    /// Opacity of the highlight.
    pub highlight_opacity: f64,
    /// Horizontal refraction shift in pixels.
    pub refraction_x: f64,
    /// Vertical refraction shift in pixels.
    pub refraction_y: f64,
    /// CSS color of the top edge highlight.
    pub highlight_color: String,
    /// CSS color of the bottom inner glow.
    pub inner_glow_color: String,
    /// A 1px line along the top edge, brightest under the highlight.
    pub top_highlight: StyleDeclarations,
    /// A 1px line along the bottom edge.
    pub bottom_glow: StyleDeclarations,
}

impl ComputedGlass {
    pub(crate) fn new(
        highlight: Offset,
        highlight_opacity: f64,
        refraction: Offset,
        highlight_color: String,
        inner_glow_color: String,
    ) -> Self {
        let top_highlight = edge_line("top").with(
            "background",
            format!(
                "linear-gradient(90deg, transparent 0%, {highlight_color} {}%, transparent 100%)",
                format_number(highlight.x, 1)
            ),
        );
        let bottom_glow = edge_line("bottom").with(
            "background",
            format!("linear-gradient(90deg, transparent 0%, {inner_glow_color} 50%, transparent 100%)"),
        );

        Self {
            highlight_x: highlight.x,
            highlight_y: highlight.y,
            highlight_opacity,
            refraction_x: refraction.x,
            refraction_y: refraction.y,
            highlight_color,
            inner_glow_color,
            top_highlight,
            bottom_glow,
        }
    }

    /// The highlight center as an [`Offset`] in percent.
    pub fn highlight_position(&self) -> Offset {
        Offset::new(self.highlight_x, self.highlight_y)
    }

    /// The refraction shift as an [`Offset`] in pixels.
    pub fn refraction(&self) -> Offset {
        Offset::new(self.refraction_x, self.refraction_y)
    }
}

fn edge_line(edge: &'static str) -> StyleDeclarations {
    StyleDeclarations::new()
        .with("position", "absolute")
        .with(edge, "0")
        .with("left", "0")
        .with("right", "0")
        .with("height", "1px")
        .with("pointer-events", "none")
}

fn overlay() -> StyleDeclarations {
    StyleDeclarations::new()
        .with("position", "absolute")
        .with("inset", "0")
        .with("border-radius", "inherit")
        .with("pointer-events", "none")
}

/// The six styles of the layered glass recipe.
///
/// The container holds five stacked overlays, painted in field order.
#[derive(Debug, Clone, PartialEq)]
pub struct GlassLayers {
    /// Outer element: backdrop blur and the colored glass shadow.
    pub container: StyleDeclarations,
    /// Flat translucent tint of the glass color.
    pub base_tint: StyleDeclarations,
    /// Gradient running away from the light.
    pub gradient: StyleDeclarations,
    /// Faint noise that breaks up banding.
    pub texture: StyleDeclarations,
    /// Top edge highlight.
    pub highlight: StyleDeclarations,
    /// Bottom inner glow.
    pub inner_glow: StyleDeclarations,
}

impl GlassLayers {
    /// Assembles the recipe for `color` from already computed glass values.
    pub fn compose(glass: &ComputedGlass, box_shadow: String, color: HslColor, azimuth: f64) -> Self {
        let container = StyleDeclarations::new()
            .with("position", "relative")
            .with("overflow", "hidden")
            .with("isolation", "isolate")
            .with("backdrop-filter", GLASS_BACKDROP_FILTER)
            .with("-webkit-backdrop-filter", GLASS_BACKDROP_FILTER)
            .with("box-shadow", box_shadow);

        let base_tint = overlay().with("background", get_tint_color(color, 0.18, 0.0));

        let gradient = overlay().with(
            "background",
            format!(
                "linear-gradient({}deg, {} 0%, {} 100%)",
                format_number(gradient_angle(azimuth), 1),
                get_tint_color(color, 0.22, 25.0),
                get_tint_color(color, 0.06, 10.0)
            ),
        );

        let texture = overlay()
            .with("opacity", "0.035")
            .with("mix-blend-mode", "overlay")
            .with("background-image", GLASS_TEXTURE);

        Self {
            container,
            base_tint,
            gradient,
            texture,
            highlight: glass.top_highlight.clone(),
            inner_glow: glass.bottom_glow.clone(),
        }
    }

    /// All six parts in paint order, container first.
    pub fn parts(&self) -> [(&'static str, &StyleDeclarations); 6] {
        [
            ("container", &self.container),
            ("base-tint", &self.base_tint),
            ("gradient", &self.gradient),
            ("texture", &self.texture),
            ("highlight", &self.highlight),
            ("inner-glow", &self.inner_glow),
        ]
    }
}

/// CSS gradient angle (0deg = toward the top, clockwise) pointing away from a
/// light at `azimuth` (0 = right, counter-clockwise).
fn gradient_angle(azimuth: f64) -> f64 {
    (270.0 - azimuth).rem_euclid(360.0)
}
