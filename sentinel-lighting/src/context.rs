//! Sharing one lighting engine across a component tree.
//!
//! A [`LightingHandle`] is an explicitly owned, cheaply clonable handle to an
//! engine. Builders either receive it as an argument or read it from the
//! scoped context set up by [`provide_lighting`].

use std::{
    cell::RefCell,
    sync::{Arc, Weak},
};

use parking_lot::{Mutex, RwLock};
use tracing::{debug, trace};

use crate::{
    color::HslColor,
    engine::{CssVariables, DEFAULT_GLASS_ELEVATION, ListenerKey, LightingEngine},
    glass::{ComputedGlass, GlassLayers},
    light::{LightSource, LightUpdate},
    memo::{ShadowKey, ShadowMemo},
    shadow::{ComputedShadow, ElementLighting},
};

struct LightingShared {
    engine: RwLock<LightingEngine>,
    memo: Mutex<ShadowMemo>,
}

/// A shared handle to a [`LightingEngine`].
///
/// Clones refer to the same engine. Shadow results are memoized until the
/// light changes.
///
/// # Examples
///
/// ```
/// use sentinel_lighting::{ElementLighting, LightUpdate, LightingHandle};
///
/// let handle = LightingHandle::new(LightUpdate::new().azimuth(45.0));
/// let card = handle.compute_shadow(&ElementLighting::new(2.0));
/// assert_eq!(card, handle.compute_shadow(&ElementLighting::new(2.0)));
///
/// handle.set_light(LightUpdate::new().azimuth(225.0));
/// assert_ne!(card, handle.compute_shadow(&ElementLighting::new(2.0)));
/// ```
#[derive(Clone)]
pub struct LightingHandle {
    shared: Arc<LightingShared>,
}

impl LightingHandle {
    /// Creates a handle to a new engine built from `overrides`.
    pub fn new(overrides: LightUpdate) -> Self {
        Self::from_engine(LightingEngine::new(overrides))
    }

    /// Wraps an existing engine.
    pub fn from_engine(engine: LightingEngine) -> Self {
        Self {
            shared: Arc::new(LightingShared {
                engine: RwLock::new(engine),
                memo: Mutex::new(ShadowMemo::new()),
            }),
        }
    }

    /// A weak handle that does not keep the engine alive.
    pub fn downgrade(&self) -> WeakLightingHandle {
        WeakLightingHandle {
            shared: Arc::downgrade(&self.shared),
        }
    }

    /// Returns `true` if both handles refer to the same engine.
    pub fn ptr_eq(&self, other: &LightingHandle) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }

    /// A copy of the current light.
    pub fn light(&self) -> LightSource {
        self.shared.engine.read().light()
    }

    /// Updates the light, drops memoized results and notifies subscribers.
    ///
    /// Subscribers run after the engine lock is released, so they may read
    /// from this handle.
    pub fn set_light(&self, update: LightUpdate) {
        let listeners = {
            let mut engine = self.shared.engine.write();
            engine.apply_update(update);
            self.shared.memo.lock().clear();
            engine.listener_snapshot()
        };
        for listener in listeners {
            listener();
        }
    }

    /// Registers `listener` to run after every light change, until the
    /// returned [`Subscription`] is dropped.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        let key = self.shared.engine.write().subscribe(listener);
        Subscription {
            key,
            shared: Arc::downgrade(&self.shared),
        }
    }

    /// Memoized [`LightingEngine::compute_shadow`].
    pub fn compute_shadow(&self, element: &ElementLighting) -> ComputedShadow {
        self.memoized(ShadowKey::element(element), |engine| {
            engine.compute_shadow(element)
        })
    }

    /// Memoized [`LightingEngine::compute_neumorphic_shadow`].
    pub fn compute_neumorphic_shadow(&self, elevation: f64) -> ComputedShadow {
        self.memoized(ShadowKey::neumorphic(elevation), |engine| {
            engine.compute_neumorphic_shadow(elevation)
        })
    }

    /// See [`LightingEngine::compute_glass_effects`].
    pub fn compute_glass_effects(&self, element_color: Option<HslColor>) -> ComputedGlass {
        self.shared.engine.read().compute_glass_effects(element_color)
    }

    /// See [`LightingEngine::compute_colored_glass_shadow`].
    pub fn compute_colored_glass_shadow(&self, color: HslColor, elevation: f64) -> String {
        self.shared
            .engine
            .read()
            .compute_colored_glass_shadow(color, elevation)
    }

    /// See [`LightingEngine::generate_css_variables`].
    pub fn generate_css_variables(&self) -> CssVariables {
        self.shared.engine.read().generate_css_variables()
    }

    /// The six-part glass recipe for a surface of `color`, read under a
    /// single light.
    pub fn glass_layers(&self, color: HslColor) -> GlassLayers {
        let engine = self.shared.engine.read();
        let glass = engine.compute_glass_effects(Some(color));
        let shadow = engine.compute_colored_glass_shadow(color, DEFAULT_GLASS_ELEVATION);
        GlassLayers::compose(&glass, shadow, color, engine.light().azimuth)
    }

    fn memoized(
        &self,
        key: ShadowKey,
        compute: impl FnOnce(&LightingEngine) -> ComputedShadow,
    ) -> ComputedShadow {
        // Holding the engine read lock keeps `set_light` from clearing the
        // memo between lookup and insert.
        let engine = self.shared.engine.read();
        let mut memo = self.shared.memo.lock();
        if let Some(shadow) = memo.get(&key) {
            trace!(?key, "shadow memo hit");
            return shadow;
        }
        let shadow = compute(&*engine);
        memo.insert(key, shadow.clone());
        trace!(?key, entries = memo.len(), "shadow memo miss");
        shadow
    }
}

impl Default for LightingHandle {
    fn default() -> Self {
        Self::new(LightUpdate::default())
    }
}

impl std::fmt::Debug for LightingHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LightingHandle")
            .field("engine", &*self.shared.engine.read())
            .finish()
    }
}

/// A [`LightingHandle`] that does not keep its engine alive.
#[derive(Clone, Debug, Default)]
pub struct WeakLightingHandle {
    shared: Weak<LightingShared>,
}

impl WeakLightingHandle {
    /// The strong handle, if the engine still exists.
    pub fn upgrade(&self) -> Option<LightingHandle> {
        self.shared.upgrade().map(|shared| LightingHandle { shared })
    }
}

/// Keeps a listener registered. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes its listener"]
#[derive(Debug)]
pub struct Subscription {
    key: ListenerKey,
    shared: Weak<LightingShared>,
}

impl Subscription {
    /// The key of the registered listener.
    pub fn key(&self) -> ListenerKey {
        self.key
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(shared) = self.shared.upgrade() {
            shared.engine.write().unsubscribe(self.key);
        }
    }
}

thread_local! {
    static LIGHTING_STACK: RefCell<Vec<LightingHandle>> = const { RefCell::new(Vec::new()) };
}

/// Makes `handle` the current lighting for the duration of `f`.
///
/// Calls nest; the innermost handle wins. The handle is popped on every exit
/// path, unwinding included.
pub fn provide_lighting<F, R>(handle: LightingHandle, f: F) -> R
where
    F: FnOnce() -> R,
{
    LIGHTING_STACK.with(|stack| stack.borrow_mut().push(handle));
    debug!("lighting provided to scope");
    struct LightingScopeGuard;
    impl Drop for LightingScopeGuard {
        fn drop(&mut self) {
            LIGHTING_STACK.with(|stack| {
                let popped = stack.borrow_mut().pop();
                debug_assert!(popped.is_some(), "Lighting stack underflow");
            });
        }
    }
    let guard = LightingScopeGuard;
    let result = f();
    drop(guard);
    result
}

/// The innermost handle set by [`provide_lighting`] on this thread, if any.
///
/// There is no implicit global engine; outside a provided scope this
/// returns `None`.
pub fn use_lighting() -> Option<LightingHandle> {
    LIGHTING_STACK.with(|stack| stack.borrow().last().cloned())
}
