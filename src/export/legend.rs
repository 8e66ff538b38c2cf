use serde::Serialize;

use crate::{layer::LayerDescriptor, materialize::MapRenderer};

/// One legend line: layer label and swatch colour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: String,
}

/// Legend entries for the layers currently on the map, in descriptor order.
pub fn legend(layers: &[LayerDescriptor], renderer: &impl MapRenderer) -> Vec<LegendEntry> {
    layers.iter()
        .filter(|l| renderer.has_layer(l.key))
        .map(|l| LegendEntry { label: l.label.clone(), color: l.style.swatch().to_string() })
        .collect()
}
