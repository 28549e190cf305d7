//! sentinel-lighting derives every shadow in a UI from one light source.
//!
//! # Light Model
//!
//! A [`LightSource`] describes where the light comes from (azimuth and
//! altitude in degrees), how strong it is and what color it has. All shadow,
//! neumorphic and glass values are computed from that single value, so every
//! element in a tree agrees on where its shadows fall.
//!
//! ```
//! use sentinel_lighting::{ElementLighting, LightUpdate, LightingEngine};
//!
//! let engine = LightingEngine::new(LightUpdate::new().azimuth(90.0));
//! let card = engine.compute_shadow(&ElementLighting::new(4.0));
//! assert_eq!(card.layers.len(), 5);
//!
//! let flat = engine.compute_neumorphic_shadow(0.0);
//! assert_eq!(flat.box_shadow, "none");
//! ```
//!
//! # Formulas
//!
//! The [`formula`] module holds the pure functions the engine is built from.
//! They can be called directly when a caller wants to supply its own light
//! parameters.
//!
//! # Sharing a Light
//!
//! [`LightingHandle`] wraps an engine for use across a component tree. It
//! memoizes shadow results, notifies subscribers when the light changes, and
//! can be made available to nested builders with [`provide_lighting`].
//!
//! ```
//! use sentinel_lighting::{LightUpdate, LightingHandle, provide_lighting, use_lighting};
//!
//! let handle = LightingHandle::new(LightUpdate::default());
//! provide_lighting(handle, || {
//!     let lighting = use_lighting().expect("provided above");
//!     lighting.set_light(LightUpdate::new().altitude(60.0));
//!     assert_eq!(lighting.light().altitude, 60.0);
//! });
//! ```
//!
//! # CSS Variables
//!
//! [`LightingEngine::generate_css_variables`] renders the light and every
//! canonical elevation as `--sentinel-*` custom properties. A
//! [`CssVariableInjection`] keeps a [`StyleScope`] in sync with a handle and
//! restores the scope when dropped.
#![deny(missing_docs, clippy::unwrap_used)]

pub mod color;
pub mod context;
pub mod css_vars;
pub mod engine;
pub mod error;
pub mod formula;
pub mod glass;
pub mod light;
mod memo;
pub mod shadow;

pub use crate::{
    color::HslColor,
    context::{LightingHandle, Subscription, WeakLightingHandle, provide_lighting, use_lighting},
    css_vars::{CssVariableInjection, RootStyle, StyleScope},
    engine::{
        CSS_VARIABLE_PREFIX, CssVariables, DEFAULT_GLASS_ELEVATION, ListenerKey, LightingEngine,
    },
    error::LightingError,
    formula::{Offset, layers_to_css},
    glass::{ComputedGlass, GlassLayers, StyleDeclarations},
    light::{Elevation, LightSource, LightUpdate},
    shadow::{ComputedShadow, ElementLighting, NeumorphicPair, ShadowLayer},
};
