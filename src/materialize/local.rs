use log::debug;

use crate::{
    feature::{Feature, FeatureCollection},
    filter::passes,
    geom::Viewport,
    layer::{LayerDescriptor, LayerKey, LayerStyle},
    selection::FilterSelection,
};

/// The external map collaborator. It owns the render lifecycle; the core only decides what is visible.
pub trait MapRenderer {
    /// Remove every rendered feature of a layer.
    fn clear(&mut self, layer: LayerKey);

    /// Render features for a layer with the given style.
    fn add_features(&mut self, layer: LayerKey, features: &[&Feature], style: &LayerStyle);

    /// Whether the layer is currently on the map.
    fn has_layer(&self, layer: LayerKey) -> bool;

    /// Take the whole layer off the map (as the layer control does).
    fn remove_layer(&mut self, layer: LayerKey);

    /// Current visible extent.
    fn bounds(&self) -> Viewport;

    /// Current zoom level.
    fn zoom(&self) -> f64;
}

/// Positions of the features passing the selection, in original order.
pub fn materialize_indices(layer: &LayerDescriptor, source: &FeatureCollection, selection: &FilterSelection) -> Vec<usize> {
    source.iter().enumerate()
        .filter(|(_, f)| passes(f.properties(), layer, selection))
        .map(|(i, _)| i)
        .collect()
}

/// The ordered subsequence of `source` passing the selection.
pub fn materialize<'a>(layer: &LayerDescriptor, source: &'a FeatureCollection, selection: &FilterSelection) -> Vec<&'a Feature> {
    let features: Vec<&Feature> = source.iter()
        .filter(|f| passes(f.properties(), layer, selection))
        .collect();
    debug!("[materialize] {}: {} of {} features pass", layer.key, features.len(), source.len());
    features
}

/// Replace the rendered set of a layer: clear everything, then add the filtered features.
pub fn apply_to(renderer: &mut impl MapRenderer, layer: &LayerDescriptor, features: &[&Feature]) {
    renderer.clear(layer.key);
    renderer.add_features(layer.key, features, &layer.style);
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::region::Region;

    fn source(states: &[&str]) -> FeatureCollection {
        let features: Vec<_> = states.iter().enumerate()
            .map(|(i, uf)| json!({
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [i as f64, 0.0] },
                "properties": { "cd_mun": i, "sigla_uf": uf },
            }))
            .collect();
        FeatureCollection::from_geojson(&json!({ "type": "FeatureCollection", "features": features }))
    }

    #[test]
    fn empty_selection_keeps_everything_in_order() {
        let layer = LayerDescriptor::builtin(LayerKey::Municipalities);
        let source = source(&["SP", "PR", "CE", "RS"]);
        let out = materialize(&layer, &source, &FilterSelection::empty());
        assert_eq!(out.len(), source.len());
        for (kept, original) in out.iter().zip(source.iter()) {
            assert_eq!(*kept, original);
        }
    }

    #[test]
    fn indices_match_features() {
        let layer = LayerDescriptor::builtin(LayerKey::Municipalities);
        let source = source(&["PR", "SP", "RS"]);
        let selection = FilterSelection::empty().with_region(Some(Region::Sul));
        assert_eq!(materialize_indices(&layer, &source, &selection), vec![0, 2]);
        let states: Vec<_> = materialize(&layer, &source, &selection).iter()
            .map(|f| f.property("sigla_uf").unwrap().as_str().unwrap().to_string())
            .collect();
        assert_eq!(states, vec!["PR", "RS"]);
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl MapRenderer for Recorder {
        fn clear(&mut self, layer: LayerKey) { self.calls.push(format!("clear {layer}")); }
        fn add_features(&mut self, layer: LayerKey, features: &[&Feature], _: &LayerStyle) {
            self.calls.push(format!("add {layer} {}", features.len()));
        }
        fn has_layer(&self, _: LayerKey) -> bool { true }
        fn remove_layer(&mut self, _: LayerKey) {}
        fn bounds(&self) -> Viewport { Viewport::new(-180.0, -90.0, 180.0, 90.0).unwrap() }
        fn zoom(&self) -> f64 { 4.0 }
    }

    #[test]
    fn apply_clears_before_adding() {
        let layer = LayerDescriptor::builtin(LayerKey::Strata);
        let source = source(&["SP", "MG"]);
        let mut renderer = Recorder::default();
        let features = materialize(&layer, &source, &FilterSelection::empty().with_state(Some("MG")));
        apply_to(&mut renderer, &layer, &features);
        assert_eq!(renderer.calls, vec!["clear strata", "add strata 1"]);
    }
}
