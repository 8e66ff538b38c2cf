use std::collections::{BTreeMap, BTreeSet};

use crate::layer::{LayerDescriptor, LayerKey};

/// Per-layer minimum zoom. Layers below their threshold are force-removed;
/// zooming back in never restores them (the user re-toggles the layer).
#[derive(Debug, Clone, Default)]
pub struct ZoomGate {
    thresholds: BTreeMap<LayerKey, f64>,
}

impl ZoomGate {
    pub fn new(layers: &[LayerDescriptor]) -> Self {
        Self { thresholds: layers.iter().map(|l| (l.key, l.min_zoom)).collect() }
    }

    /// Minimum zoom of a layer; unknown layers are never gated.
    #[inline]
    pub fn threshold(&self, layer: LayerKey) -> f64 {
        self.thresholds.get(&layer).copied().unwrap_or(0.0)
    }

    /// Layers to force-hide at the given zoom.
    pub fn apply(&self, zoom: f64) -> BTreeSet<LayerKey> {
        self.thresholds.iter()
            .filter(|&(_, &min)| min > zoom)
            .map(|(&key, _)| key)
            .collect()
    }
}
