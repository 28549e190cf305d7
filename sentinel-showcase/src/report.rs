use std::{collections::BTreeMap, fmt::Write, sync::Arc};

use anyhow::Result;
use parking_lot::Mutex;
use sentinel_lighting::{
    ComputedShadow, CssVariableInjection, CssVariables, ElementLighting, GlassLayers,
    LightSource, LightingHandle, RootStyle, StyleDeclarations,
};
use serde::Serialize;

use crate::config::Settings;

/// Renders the `:root` variables followed by example rules for every
/// requested elevation and the glass recipe.
pub fn render_css(handle: &LightingHandle, settings: &Settings) -> String {
    let root = Arc::new(Mutex::new(RootStyle::new()));
    let injection = CssVariableInjection::attach(handle, root.clone());
    let mut css = root.lock().to_css();
    drop(injection);

    for elevation in &settings.elevations {
        let level = elevation.as_u32();
        let element = ElementLighting::new(*elevation).color(settings.element_color);
        let rules = [
            ("raised", handle.compute_shadow(&element)),
            ("pressed", handle.compute_shadow(&element.inset(true))),
            ("neumorphic", handle.compute_neumorphic_shadow(elevation.value())),
        ];
        for (kind, shadow) in rules {
            let _ = write!(
                css,
                "\n.sentinel-{kind}-{level} {{\n  box-shadow: {};\n}}\n",
                shadow.box_shadow
            );
        }
    }

    let glass = handle.glass_layers(settings.element_color);
    for (part, style) in glass.parts() {
        let selector = if part == "container" {
            ".sentinel-glass".to_string()
        } else {
            format!(".sentinel-glass > .sentinel-glass__{part}")
        };
        let _ = write!(css, "\n{selector} {{\n{}}}\n", declarations_block(style));
    }
    css
}

fn declarations_block(style: &StyleDeclarations) -> String {
    style
        .iter()
        .map(|(property, value)| format!("  {property}: {value};\n"))
        .collect()
}

#[derive(Debug, Serialize)]
struct Report {
    light: LightSource,
    variables: CssVariables,
    elevations: Vec<ElevationReport>,
    glass: GlassReport,
}

#[derive(Debug, Serialize)]
struct ElevationReport {
    level: u32,
    raised: ComputedShadow,
    pressed: ComputedShadow,
    neumorphic: ComputedShadow,
}

#[derive(Debug, Serialize)]
struct GlassReport {
    highlight_x: f64,
    highlight_y: f64,
    highlight_opacity: f64,
    refraction_x: f64,
    refraction_y: f64,
    layers: BTreeMap<&'static str, String>,
}

impl GlassReport {
    fn new(handle: &LightingHandle, settings: &Settings) -> Self {
        let effects = handle.compute_glass_effects(Some(settings.element_color));
        let layers: GlassLayers = handle.glass_layers(settings.element_color);
        Self {
            highlight_x: effects.highlight_x,
            highlight_y: effects.highlight_y,
            highlight_opacity: effects.highlight_opacity,
            refraction_x: effects.refraction_x,
            refraction_y: effects.refraction_y,
            layers: layers
                .parts()
                .into_iter()
                .map(|(part, style)| (part, style.to_css()))
                .collect(),
        }
    }
}

/// Renders every computed value as pretty-printed JSON.
pub fn render_json(handle: &LightingHandle, settings: &Settings) -> Result<String> {
    let elevations = settings
        .elevations
        .iter()
        .map(|elevation| {
            let element = ElementLighting::new(*elevation).color(settings.element_color);
            ElevationReport {
                level: elevation.as_u32(),
                raised: handle.compute_shadow(&element),
                pressed: handle.compute_shadow(&element.inset(true)),
                neumorphic: handle.compute_neumorphic_shadow(elevation.value()),
            }
        })
        .collect();

    let report = Report {
        light: handle.light(),
        variables: handle.generate_css_variables(),
        elevations,
        glass: GlassReport::new(handle, settings),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}
