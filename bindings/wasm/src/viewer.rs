use serde_json::json;
use wasm_bindgen::{JsValue, prelude::wasm_bindgen};
use webgis_core::{
    allowed_states, compile_predicate, FeatureCollection, FilterSelection, Region, ViewState, Viewer,
    ViewerConfig, Viewport,
};

use crate::common::*;

#[wasm_bindgen]
pub struct WasmViewer {
    inner: Viewer,
    view: ViewState,
}

#[wasm_bindgen]
impl WasmViewer {
    /// Construct a viewer from an optional JSON configuration; the built-in layers otherwise.
    /// Only the first configured layer starts on the map.
    #[wasm_bindgen(constructor)]
    pub fn new(config: Option<String>) -> Result<WasmViewer, JsValue> {
        let config = match config.as_deref() {
            Some(text) => ViewerConfig::from_json(text).map_err(js_err)?,
            None => ViewerConfig::default(),
        };
        let (lat, lon) = config.center;
        let bounds = Viewport::new(lon, lat, lon, lat).map_err(js_err)?;
        let view = ViewState::new(bounds, config.zoom, config.layers.first().map(|l| l.key));
        let inner = Viewer::new(config).map_err(js_err)?;
        Ok(WasmViewer { inner, view })
    }

    /// Install a layer's GeoJSON (FeatureCollection, Feature or bare geometry).
    /// A parse failure rejects the whole layer.
    pub fn load_layer(&mut self, layer: &str, geojson: &[u8]) -> Result<usize, JsValue> {
        let key = parse_layer(layer).map_err(js_err)?;
        self.inner.load_layer_json(key, geojson).map_err(js_err)?;
        Ok(self.inner.source(key).map_or(0, FeatureCollection::len))
    }

    /// Replace the selection from raw dropdown values ("" means all) and re-filter every layer.
    /// Returns `{ layer: renderedCount }`.
    pub fn set_selection(&mut self, region: &str, state: &str, hierarchy: &str) -> Result<JsValue, JsValue> {
        let selection = FilterSelection::from_controls(region, state, hierarchy).map_err(js_err)?;
        self.inner.set_selection(selection, &mut self.view);
        to_js_json(&self.view.rendered)
    }

    /// Filtered features of a layer as a GeoJSON FeatureCollection object.
    pub fn filtered_geojson(&self, layer: &str) -> Result<JsValue, JsValue> {
        let key = parse_layer(layer).map_err(js_err)?;
        let geojson = FeatureCollection::to_geojson(self.inner.visible(key));
        to_js_json(&geojson)
    }

    /// Toggle a layer from the layer control.
    pub fn set_layer_active(&mut self, layer: &str, active: bool) -> Result<(), JsValue> {
        let key = parse_layer(layer).map_err(js_err)?;
        if active {
            self.view.active.insert(key);
        } else {
            self.view.active.remove(&key);
        }
        Ok(())
    }

    /// Layers currently on the map.
    pub fn active_layers(&self) -> Vec<String> {
        self.view.active.iter().map(|k| k.to_str().to_string()).collect()
    }

    /// Record the map's bounds `[west, south, east, north]` and zoom, then apply the zoom gate.
    /// Returns the layers taken off the map.
    pub fn set_view(&mut self, bbox: Vec<f64>, zoom: f64) -> Result<Vec<String>, JsValue> {
        self.view.bounds = parse_bbox(&bbox).map_err(js_err)?;
        self.view.zoom = zoom;

        let before = self.view.active.clone();
        self.inner.on_zoom(&mut self.view);
        Ok(before.difference(&self.view.active).map(|k| k.to_str().to_string()).collect())
    }

    /// Bounds `[west, south, east, north]` to frame after loading, or `undefined` when
    /// the data has no valid extent (the map should keep its default view).
    pub fn initial_frame(&self) -> Option<Vec<f64>> {
        self.inner.initial_frame().ok().map(|v| v.to_bbox().to_vec())
    }

    /// Info panel for the current view.
    pub fn info_panel(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.info_panel(&self.view))
    }

    /// `{ filename, contents }` for the CSV export of the current view, or `null` when no layer is active.
    pub fn export_csv(&self) -> Result<JsValue, JsValue> {
        let date = today().map_err(js_err)?;
        match self.inner.export_csv(&self.view, date).map_err(js_err)? {
            Some(export) => to_js_json(&json!({ "filename": export.filename, "contents": export.contents })),
            None => Ok(JsValue::NULL),
        }
    }

    /// Legend entries `{ label, color }` for the active layers.
    pub fn legend(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.legend(&self.view))
    }

    /// States offered by the state dropdown for a region ("" for all regions).
    pub fn allowed_states(region: &str) -> Result<Vec<String>, JsValue> {
        let region = match region.trim() {
            "" => None,
            name => Some(Region::parse(name).ok_or_else(|| js_err(format!("Unknown region {name:?}")))?),
        };
        Ok(allowed_states(region).into_iter().map(str::to_string).collect())
    }

    /// CQL predicate of the current selection for a layer, for WMS/WFS-backed deployments.
    pub fn predicate(&self, layer: &str) -> Result<Option<String>, JsValue> {
        let key = parse_layer(layer).map_err(js_err)?;
        let descriptor = self.inner.config().layer(key)
            .ok_or_else(|| js_err(format!("Layer {:?} is not configured", key.to_str())))?;
        compile_predicate(descriptor, self.inner.selection()).map_err(js_err)
    }
}
