//! Mirroring generated CSS variables into a shared style scope.
//!
//! The document root style is a global, shared resource. A
//! [`CssVariableInjection`] records what it overwrites and puts it back when
//! dropped, so mounting and unmounting a lighting scope leaves no trace.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use parking_lot::Mutex;
use rustc_hash::FxHashMap as HashMap;
use tracing::debug;

use crate::{
    context::{LightingHandle, Subscription},
    engine::CssVariables,
};

/// A place CSS custom properties can be read from and written to, such as
/// the root element style of a document.
pub trait StyleScope {
    /// The current value of `name`, if set.
    fn property(&self, name: &str) -> Option<String>;
    /// Sets `name` to `value`.
    fn set_property(&mut self, name: &str, value: &str);
    /// Removes `name`.
    fn remove_property(&mut self, name: &str);
}

/// An in-memory [`StyleScope`] that renders as a `:root` rule.
///
/// # Example
///
/// ```
/// use sentinel_lighting::{RootStyle, StyleScope};
///
/// let mut root = RootStyle::new();
/// root.set_property("--accent", "hsl(200, 60%, 50%)");
/// assert_eq!(root.to_css(), ":root {\n  --accent: hsl(200, 60%, 50%);\n}\n");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RootStyle {
    properties: HashMap<String, String>,
}

impl RootStyle {
    /// An empty scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of properties set.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Returns `true` if no property is set.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Properties sorted by name.
    pub fn sorted(&self) -> Vec<(&str, &str)> {
        let mut properties: Vec<(&str, &str)> = self
            .properties
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
            .collect();
        properties.sort_unstable_by_key(|(name, _)| *name);
        properties
    }

    /// Renders a `:root { ... }` rule with one declaration per line.
    pub fn to_css(&self) -> String {
        let mut css = String::from(":root {\n");
        for (name, value) in self.sorted() {
            css.push_str(&format!("  {name}: {value};\n"));
        }
        css.push_str("}\n");
        css
    }
}

impl StyleScope for RootStyle {
    fn property(&self, name: &str) -> Option<String> {
        self.properties.get(name).cloned()
    }

    fn set_property(&mut self, name: &str, value: &str) {
        self.properties.insert(name.to_string(), value.to_string());
    }

    fn remove_property(&mut self, name: &str) {
        self.properties.remove(name);
    }
}

fn apply_variables<S: StyleScope + ?Sized>(scope: &mut S, variables: &CssVariables) {
    for (name, value) in variables {
        scope.set_property(name, value);
    }
}

/// Keeps a [`StyleScope`] in sync with a [`LightingHandle`]'s CSS variables.
///
/// On attach, the values about to be overwritten are recorded and the
/// current variables applied. Every light change re-applies them. On drop,
/// recorded values are restored and properties that did not exist before are
/// removed.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use parking_lot::Mutex;
/// use sentinel_lighting::{CssVariableInjection, LightUpdate, LightingHandle, RootStyle, StyleScope};
///
/// let handle = LightingHandle::default();
/// let root = Arc::new(Mutex::new(RootStyle::new()));
/// root.lock().set_property("--sentinel-light-azimuth", "0");
///
/// let injection = CssVariableInjection::attach(&handle, root.clone());
/// handle.set_light(LightUpdate::new().azimuth(90.0));
/// assert_eq!(root.lock().property("--sentinel-light-azimuth").as_deref(), Some("90"));
///
/// drop(injection);
/// assert_eq!(root.lock().property("--sentinel-light-azimuth").as_deref(), Some("0"));
/// assert_eq!(root.lock().len(), 1);
/// ```
pub struct CssVariableInjection<S>
where
    S: StyleScope + Send + 'static,
{
    scope: Arc<Mutex<S>>,
    previous: Vec<(String, Option<String>)>,
    /// Read and written only while `scope` is locked.
    active: Arc<AtomicBool>,
    subscription: Option<Subscription>,
}

impl<S> CssVariableInjection<S>
where
    S: StyleScope + Send + 'static,
{
    /// Applies `handle`'s variables to `scope` and keeps them current until
    /// the returned guard is dropped.
    pub fn attach(handle: &LightingHandle, scope: Arc<Mutex<S>>) -> Self {
        let active = Arc::new(AtomicBool::new(false));

        // Subscribed before the first apply so no light change is missed.
        let weak = handle.downgrade();
        let target = scope.clone();
        let listening = active.clone();
        let subscription = handle.subscribe(move || {
            let mut scope = target.lock();
            if !listening.load(Ordering::Acquire) {
                return;
            }
            if let Some(handle) = weak.upgrade() {
                apply_variables(&mut *scope, &handle.generate_css_variables());
            }
        });

        let previous: Vec<(String, Option<String>)> = {
            let mut scope = scope.lock();
            let variables = handle.generate_css_variables();
            let previous = variables
                .keys()
                .map(|name| (name.clone(), scope.property(name)))
                .collect();
            apply_variables(&mut *scope, &variables);
            active.store(true, Ordering::Release);
            previous
        };
        debug!(count = previous.len(), "lighting css variables injected");

        Self {
            scope,
            previous,
            active,
            subscription: Some(subscription),
        }
    }

    /// The scope being kept in sync.
    pub fn scope(&self) -> &Arc<Mutex<S>> {
        &self.scope
    }

    /// Names of the properties this injection manages.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.previous.iter().map(|(name, _)| name.as_str())
    }
}

impl<S> Drop for CssVariableInjection<S>
where
    S: StyleScope + Send + 'static,
{
    fn drop(&mut self) {
        drop(self.subscription.take());

        // A light change already in flight may still call the listener from
        // its snapshot; the cleared flag turns that call into a no-op.
        let mut scope = self.scope.lock();
        self.active.store(false, Ordering::Release);
        for (name, previous) in self.previous.drain(..) {
            match previous {
                Some(value) => scope.set_property(&name, &value),
                None => scope.remove_property(&name),
            }
        }
        debug!("lighting css variables restored");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::light::LightUpdate;

    #[test]
    fn test_root_style_renders_sorted() {
        let mut root = RootStyle::new();
        root.set_property("--b", "2");
        root.set_property("--a", "1");
        assert_eq!(root.to_css(), ":root {\n  --a: 1;\n  --b: 2;\n}\n");

        root.remove_property("--a");
        assert_eq!(root.property("--a"), None);
        assert_eq!(root.len(), 1);
        assert_eq!(RootStyle::new().to_css(), ":root {\n}\n");
    }

    #[test]
    fn test_attach_applies_all_variables() {
        let handle = LightingHandle::default();
        let root = Arc::new(Mutex::new(RootStyle::new()));
        let injection = CssVariableInjection::attach(&handle, root.clone());

        let variables = handle.generate_css_variables();
        assert_eq!(injection.names().count(), variables.len());
        let scope = root.lock();
        for (name, value) in &variables {
            assert_eq!(scope.property(name).as_deref(), Some(value.as_str()));
        }
    }

    #[test]
    fn test_light_change_reapplies() {
        let handle = LightingHandle::default();
        let root = Arc::new(Mutex::new(RootStyle::new()));
        let _injection = CssVariableInjection::attach(&handle, root.clone());

        handle.set_light(LightUpdate::new().azimuth(10.0).altitude(20.0));
        let expected = handle.generate_css_variables();
        let scope = root.lock();
        assert_eq!(
            scope.property("--sentinel-shadow-8"),
            expected.get("--sentinel-shadow-8").cloned()
        );
        assert_eq!(
            scope.property("--sentinel-light-altitude").as_deref(),
            Some("20")
        );
    }

    #[test]
    fn test_drop_restores_prior_values() {
        let handle = LightingHandle::default();
        let root = Arc::new(Mutex::new(RootStyle::new()));
        {
            let mut scope = root.lock();
            scope.set_property("--unrelated", "keep");
            scope.set_property("--sentinel-shadow-4", "0 0 1px black");
        }
        let before = root.lock().clone();

        let injection = CssVariableInjection::attach(&handle, root.clone());
        assert_eq!(root.lock().len(), 20);
        handle.set_light(LightUpdate::new().azimuth(200.0));
        drop(injection);

        assert_eq!(*root.lock(), before);

        // No longer subscribed: later changes leave the scope alone.
        handle.set_light(LightUpdate::new().azimuth(300.0));
        assert_eq!(*root.lock(), before);
    }

    #[test]
    fn test_drop_from_listener_during_light_change() {
        let handle = LightingHandle::default();
        let root = Arc::new(Mutex::new(RootStyle::new()));
        root.lock().set_property("--sentinel-light-azimuth", "0");
        let before = root.lock().clone();

        let slot: Arc<Mutex<Option<CssVariableInjection<RootStyle>>>> =
            Arc::new(Mutex::new(None));
        let unmount = slot.clone();
        // Registered first, so it runs before the injection's own listener.
        let _unmount = handle.subscribe(move || {
            drop(unmount.lock().take());
        });
        *slot.lock() = Some(CssVariableInjection::attach(&handle, root.clone()));
        assert_eq!(root.lock().len(), 19);

        handle.set_light(LightUpdate::new().azimuth(10.0));

        assert!(slot.lock().is_none());
        assert_eq!(*root.lock(), before);
    }

    #[test]
    fn test_attach_sees_latest_light() {
        let handle = LightingHandle::new(LightUpdate::new().azimuth(30.0));
        let root = Arc::new(Mutex::new(RootStyle::new()));
        let _injection = CssVariableInjection::attach(&handle, root.clone());
        assert_eq!(
            root.lock().property("--sentinel-light-azimuth").as_deref(),
            Some("30")
        );
        handle.set_light(LightUpdate::new().azimuth(45.5));
        assert_eq!(
            root.lock().property("--sentinel-light-azimuth").as_deref(),
            Some("45.5")
        );
    }

    #[test]
    fn test_nested_injections_unwind_in_order() {
        let handle = LightingHandle::default();
        let other = LightingHandle::new(LightUpdate::new().azimuth(0.0));
        let root = Arc::new(Mutex::new(RootStyle::new()));

        let outer = CssVariableInjection::attach(&handle, root.clone());
        let outer_state = root.lock().clone();
        let inner = CssVariableInjection::attach(&other, root.clone());
        assert_eq!(
            root.lock().property("--sentinel-light-azimuth").as_deref(),
            Some("0")
        );

        drop(inner);
        assert_eq!(*root.lock(), outer_state);
        drop(outer);
        assert!(root.lock().is_empty());
    }
}
