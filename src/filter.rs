use serde_json::{Map, Value};

use crate::{common::{normalize, normalize_value}, layer::LayerDescriptor, selection::FilterSelection};

/// Decide whether a feature's attributes pass the selection for its layer.
///
/// Two axes, AND-combined:
/// - hierarchy: a set code must normalize-equal the feature's hierarchy attribute
///   on every layer; features without that attribute are never excluded by it.
/// - geography: a set state overrides the region entirely; a missing or unknown
///   state attribute fails closed under either.
pub fn passes(attributes: &Map<String, Value>, layer: &LayerDescriptor, selection: &FilterSelection) -> bool {
    passes_hierarchy(attributes, layer, selection) && passes_geography(attributes, layer, selection)
}

fn passes_hierarchy(attributes: &Map<String, Value>, layer: &LayerDescriptor, selection: &FilterSelection) -> bool {
    let Some(code) = selection.hierarchy_code.as_deref() else { return true };
    let Some(field) = layer.hierarchy_field.as_deref() else { return true };

    match attributes.get(field) {
        None | Some(Value::Null) => true,
        value => normalize_value(value) == normalize(code),
    }
}

fn passes_geography(attributes: &Map<String, Value>, layer: &LayerDescriptor, selection: &FilterSelection) -> bool {
    let feature_state = || normalize_value(attributes.get(&layer.state_field)).to_uppercase();

    if let Some(state) = selection.state.as_deref() {
        let feature_state = feature_state();
        !feature_state.is_empty() && feature_state == state.trim().to_uppercase()
    } else if let Some(region) = selection.region {
        region.contains(&feature_state())
    } else {
        true
    }
}
