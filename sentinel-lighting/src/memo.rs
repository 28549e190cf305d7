//! Memoized shadow results for a [`LightingHandle`](crate::LightingHandle).

use std::num::NonZeroUsize;

use lru::LruCache;

use crate::shadow::{ComputedShadow, ElementLighting};

const SHADOW_MEMO_CAPACITY: usize = 128;

/// Float fields are keyed by their bit patterns, so `0.0` and `-0.0` are
/// distinct entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum ShadowKey {
    Element {
        elevation: u64,
        color: Option<[u64; 3]>,
        inset: bool,
        blur_multiplier: Option<u64>,
    },
    Neumorphic {
        elevation: u64,
    },
}

impl ShadowKey {
    pub(crate) fn element(element: &ElementLighting) -> Self {
        ShadowKey::Element {
            elevation: element.elevation.to_bits(),
            color: element
                .color
                .map(|color| [color.h.to_bits(), color.s.to_bits(), color.l.to_bits()]),
            inset: element.inset,
            blur_multiplier: element.blur_multiplier.map(f64::to_bits),
        }
    }

    pub(crate) fn neumorphic(elevation: f64) -> Self {
        ShadowKey::Neumorphic {
            elevation: elevation.to_bits(),
        }
    }
}

/// Results computed under the current light. Cleared whenever the light
/// changes.
pub(crate) struct ShadowMemo {
    entries: LruCache<ShadowKey, ComputedShadow>,
}

impl ShadowMemo {
    pub(crate) fn new() -> Self {
        Self {
            entries: LruCache::new(
                NonZeroUsize::new(SHADOW_MEMO_CAPACITY)
                    .expect("shadow memo capacity must be greater than zero"),
            ),
        }
    }

    pub(crate) fn get(&mut self, key: &ShadowKey) -> Option<ComputedShadow> {
        self.entries.get(key).cloned()
    }

    pub(crate) fn insert(&mut self, key: ShadowKey, shadow: ComputedShadow) {
        self.entries.put(key, shadow);
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
