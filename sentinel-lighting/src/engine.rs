//! The lighting engine: one light source and the computations built on it.

use std::{collections::BTreeMap, fmt, sync::Arc};

use slotmap::{SlotMap, new_key_type};
use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use crate::{
    color::HslColor,
    formula::{
        self, Offset, calculate_highlight_opacity, calculate_highlight_position,
        calculate_shadow_blur, calculate_shadow_color, calculate_shadow_offset,
        calculate_shadow_opacity, format_number, get_light_color_css, layers_to_css,
    },
    glass::ComputedGlass,
    light::{Elevation, LightSource, LightUpdate},
    shadow::{ComputedShadow, ElementLighting, ShadowLayer},
};

/// Prefix of every generated CSS custom property.
pub const CSS_VARIABLE_PREFIX: &str = "--sentinel";
/// Elevation used by [`LightingEngine::compute_colored_glass_shadow`] callers
/// that have no better value.
pub const DEFAULT_GLASS_ELEVATION: f64 = 4.0;

/// Brightness added to the light color for the highlight of inset shadows.
const INSET_HIGHLIGHT_BOOST: f64 = 10.0;
/// Blur of the second inset layer relative to the first.
const INSET_HIGHLIGHT_BLUR: f64 = 0.9;
/// Vertical drop of the ambient glass shadow per unit of elevation.
const AMBIENT_DROP: f64 = 0.5;

new_key_type! {
    /// Identifies a listener registered with [`LightingEngine::subscribe`].
    pub struct ListenerKey;
}

pub(crate) type Listener = Arc<dyn Fn() + Send + Sync>;

/// CSS custom property names mapped to their values, sorted by name.
pub type CssVariables = BTreeMap<String, String>;

/// Holds the current light source and derives shadows from it.
///
/// Every computation reads the same light, so all elements shaded by one
/// engine agree on the light direction.
///
/// # Example
///
/// ```
/// use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
/// use sentinel_lighting::{LightUpdate, LightingEngine};
///
/// let mut engine = LightingEngine::default();
/// let calls = Arc::new(AtomicUsize::new(0));
/// let counter = calls.clone();
/// engine.subscribe(move || {
///     counter.fetch_add(1, Ordering::SeqCst);
/// });
///
/// engine.set_light(LightUpdate::new().azimuth(0.0));
/// assert_eq!(calls.load(Ordering::SeqCst), 1);
/// assert_eq!(engine.light().azimuth, 0.0);
/// assert_eq!(engine.light().altitude, 45.0);
/// ```
pub struct LightingEngine {
    light: LightSource,
    listeners: SlotMap<ListenerKey, Listener>,
}

impl LightingEngine {
    /// Creates an engine whose light is the default light with `overrides`
    /// applied.
    pub fn new(overrides: LightUpdate) -> Self {
        let mut light = LightSource::default();
        overrides.apply_to(&mut light);
        report_out_of_range(&light);
        Self {
            light,
            listeners: SlotMap::with_key(),
        }
    }

    /// A copy of the current light.
    pub fn light(&self) -> LightSource {
        self.light
    }

    /// Merges `update` into the light and notifies every listener once.
    ///
    /// Values are stored as given, even outside their documented ranges.
    pub fn set_light(&mut self, update: LightUpdate) {
        self.apply_update(update);
        for listener in self.listener_snapshot() {
            listener();
        }
    }

    /// Registers a listener invoked after every [`set_light`](Self::set_light).
    ///
    /// Listeners are not called in any particular order.
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerKey
    where
        F: Fn() + Send + Sync + 'static,
    {
        let key = self.listeners.insert(Arc::new(listener));
        debug!(?key, listeners = self.listeners.len(), "lighting listener subscribed");
        key
    }

    /// Removes a listener. Returns `false` if it was already removed.
    pub fn unsubscribe(&mut self, key: ListenerKey) -> bool {
        let removed = self.listeners.remove(key).is_some();
        if removed {
            debug!(?key, listeners = self.listeners.len(), "lighting listener removed");
        }
        removed
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub(crate) fn apply_update(&mut self, update: LightUpdate) {
        update.apply_to(&mut self.light);
        report_out_of_range(&self.light);
        debug!(
            light = ?self.light,
            listeners = self.listeners.len(),
            "light source updated"
        );
    }

    pub(crate) fn listener_snapshot(&self) -> SmallVec<[Listener; 4]> {
        self.listeners.values().cloned().collect()
    }

    /// Shadow for one element. Flat elements get `none`, inset elements a
    /// pressed pair, everything else five stacked layers.
    pub fn compute_shadow(&self, element: &ElementLighting) -> ComputedShadow {
        trace!(?element, "computing element shadow");
        if element.elevation == 0.0 {
            return ComputedShadow::none();
        }
        if element.inset {
            return self.compute_inset_shadow(element);
        }

        let LightSource {
            azimuth,
            altitude,
            intensity,
            ..
        } = self.light;
        let mut layers = formula::generate_layered_shadows(
            azimuth,
            altitude,
            element.elevation,
            intensity,
            element.color,
        );
        if let Some(blur_multiplier) = element.blur_multiplier {
            for layer in &mut layers {
                layer.blur *= blur_multiplier;
            }
        }
        ComputedShadow::from_layers(layers)
    }

    /// A pressed look: the dark layer sits on the lit side, the highlight on
    /// the far side.
    fn compute_inset_shadow(&self, element: &ElementLighting) -> ComputedShadow {
        let light = self.light;
        let elevation = element.elevation;
        let offset = calculate_shadow_offset(light.azimuth, light.altitude, elevation);
        let blur = calculate_shadow_blur(elevation, element.blur_multiplier.unwrap_or(1.0));
        let opacity = calculate_shadow_opacity(elevation, light.intensity);
        let element_color = element.color.unwrap_or(HslColor::NEUTRAL);

        ComputedShadow::from_layers(vec![
            ShadowLayer {
                offset_x: -offset.x,
                offset_y: -offset.y,
                blur,
                spread: 0.0,
                color: calculate_shadow_color(element_color, opacity, Some(light.color)),
                inset: true,
            },
            ShadowLayer {
                offset_x: offset.x,
                offset_y: offset.y,
                blur: blur * INSET_HIGHLIGHT_BLUR,
                spread: 0.0,
                color: get_light_color_css(
                    light.color,
                    opacity * INSET_HIGHLIGHT_BLUR,
                    INSET_HIGHLIGHT_BOOST,
                ),
                inset: true,
            },
        ])
    }

    /// The two-layer neumorphic shadow at `elevation`.
    pub fn compute_neumorphic_shadow(&self, elevation: f64) -> ComputedShadow {
        trace!(elevation, "computing neumorphic shadow");
        if elevation == 0.0 {
            return ComputedShadow::none();
        }
        let light = self.light;
        let pair = formula::calculate_neumorphic_shadows(
            light.azimuth,
            light.altitude,
            elevation,
            light.intensity,
            Some(light.color),
        );
        ComputedShadow::from_layers(pair.into_layers().into())
    }

    /// Highlight, refraction and edge styles for a glass surface tinted with
    /// `element_color`.
    pub fn compute_glass_effects(&self, element_color: Option<HslColor>) -> ComputedGlass {
        trace!(?element_color, "computing glass effects");
        let light = self.light;
        let highlight = calculate_highlight_position(light.azimuth, light.altitude);
        let highlight_opacity = calculate_highlight_opacity(light.altitude, light.intensity);
        let azimuth = light.azimuth.to_radians();
        let refraction = Offset::new(azimuth.cos() * 2.0, azimuth.sin() * 2.0);

        ComputedGlass::new(
            highlight,
            highlight_opacity,
            refraction,
            formula::glass_highlight_color(element_color, Some(light.color), highlight_opacity),
            formula::glass_inner_glow_color(
                element_color,
                Some(light.color),
                highlight_opacity * 0.5,
            ),
        )
    }

    /// A `box-shadow` value for colored glass: a tinted directional shadow
    /// plus a fainter ambient shadow straight below.
    ///
    /// Returns `none` at elevation 0.
    pub fn compute_colored_glass_shadow(&self, color: HslColor, elevation: f64) -> String {
        trace!(?color, elevation, "computing colored glass shadow");
        if elevation == 0.0 {
            return ComputedShadow::none().box_shadow;
        }
        let light = self.light;
        let offset = calculate_shadow_offset(light.azimuth, light.altitude, elevation);
        let blur = calculate_shadow_blur(elevation, 1.0);
        let opacity = calculate_shadow_opacity(elevation, light.intensity);

        layers_to_css(&[
            ShadowLayer {
                offset_x: offset.x,
                offset_y: offset.y,
                blur,
                spread: 0.0,
                color: calculate_shadow_color(color, opacity, Some(light.color)),
                inset: false,
            },
            ShadowLayer {
                offset_x: 0.0,
                offset_y: elevation * AMBIENT_DROP,
                blur: blur * 0.5,
                spread: 0.0,
                color: calculate_shadow_color(color, opacity * 0.5, None),
                inset: false,
            },
        ])
    }

    /// Renders the light and the shadows of every raised elevation as CSS
    /// custom properties.
    ///
    /// ```
    /// use sentinel_lighting::LightingEngine;
    ///
    /// let variables = LightingEngine::default().generate_css_variables();
    /// assert_eq!(variables["--sentinel-light-azimuth"], "135");
    /// assert!(variables.contains_key("--sentinel-shadow-inset-32"));
    /// ```
    pub fn generate_css_variables(&self) -> CssVariables {
        let light = self.light;
        let mut variables = CssVariables::new();
        let mut set = |name: &str, value: String| {
            variables.insert(format!("{CSS_VARIABLE_PREFIX}-{name}"), value);
        };

        set("light-azimuth", format_number(light.azimuth, 2));
        set("light-altitude", format_number(light.altitude, 2));
        set("light-intensity", format_number(light.intensity, 3));
        set("light-temperature", format_number(light.temperature, 0));

        for elevation in Elevation::RAISED {
            let level = elevation.as_u32();
            set(
                &format!("shadow-{level}"),
                self.compute_neumorphic_shadow(elevation.value()).box_shadow,
            );
            set(
                &format!("shadow-inset-{level}"),
                self.compute_shadow(&ElementLighting::new(elevation).inset(true))
                    .box_shadow,
            );
        }

        let glass = self.compute_glass_effects(None);
        set(
            "highlight-x",
            format!("{}%", format_number(glass.highlight_x, 2)),
        );
        set(
            "highlight-y",
            format!("{}%", format_number(glass.highlight_y, 2)),
        );
        set(
            "highlight-opacity",
            format_number(glass.highlight_opacity, 3),
        );

        debug!(count = variables.len(), "generated lighting css variables");
        variables
    }
}

impl Default for LightingEngine {
    fn default() -> Self {
        Self::new(LightUpdate::default())
    }
}

impl fmt::Debug for LightingEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LightingEngine")
            .field("light", &self.light)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

fn report_out_of_range(light: &LightSource) {
    let fields = light.out_of_range_fields();
    if !fields.is_empty() {
        warn!(
            ?fields,
            "light source has values outside their documented ranges, shadows may look implausible"
        );
    }
}
