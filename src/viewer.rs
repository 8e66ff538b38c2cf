use std::collections::{BTreeMap, BTreeSet};

use anyhow::Result;
use log::{debug, warn};
use time::Date;

use crate::{
    config::ViewerConfig,
    error::ViewerError,
    export::{export_filename, legend, to_csv, CsvExport, LayerSamples, LegendEntry, PanelSummary},
    feature::{Feature, FeatureCollection},
    geom::{collection_bounds, FeatureIndex, GeoBounds, Viewport},
    layer::{LayerDescriptor, LayerKey, LayerStyle},
    materialize::{apply_to, materialize, materialize_indices, MapRenderer},
    sample::sample_indexed,
    selection::FilterSelection,
    zoom::ZoomGate,
};

/// In-memory source of one layer plus its spatial index and current visible subset.
#[derive(Debug, Clone)]
struct LayerSource {
    collection: FeatureCollection,
    index: FeatureIndex,
    visible: Vec<usize>, // Positions passing the current selection
}

/// A viewer session: feature sources, the current selection and the zoom gate.
///
/// The selection is replaced wholesale on each change and every filter pass reads it
/// immutably; layers never read or mutate each other's state.
#[derive(Debug, Clone)]
pub struct Viewer {
    config: ViewerConfig,
    sources: BTreeMap<LayerKey, LayerSource>,
    selection: FilterSelection,
    gate: ZoomGate,
}

impl Viewer {
    pub fn new(config: ViewerConfig) -> Result<Self, ViewerError> {
        config.validate()?;
        Ok(Self {
            gate: ZoomGate::new(&config.layers),
            config,
            sources: BTreeMap::new(),
            selection: FilterSelection::empty(),
        })
    }

    #[inline] pub fn config(&self) -> &ViewerConfig { &self.config }

    #[inline] pub fn selection(&self) -> &FilterSelection { &self.selection }

    fn descriptor(&self, key: LayerKey) -> Result<&LayerDescriptor, ViewerError> {
        self.config.layer(key).ok_or_else(|| ViewerError::UnknownLayer(key.to_string()))
    }

    /// Install the feature source of a configured layer.
    pub fn load_layer(&mut self, key: LayerKey, collection: FeatureCollection) -> Result<(), ViewerError> {
        let layer = self.descriptor(key)?;
        let visible = materialize_indices(layer, &collection, &self.selection);
        let index = FeatureIndex::new(&collection, &GeoBounds);
        debug!("[viewer] loaded {key}: {} features, {} indexed", collection.len(), index.len());
        self.sources.insert(key, LayerSource { collection, index, visible });
        Ok(())
    }

    /// Parse GeoJSON bytes and install them as a layer source.
    pub fn load_layer_json(&mut self, key: LayerKey, bytes: &[u8]) -> Result<(), ViewerError> {
        let collection = FeatureCollection::from_slice(bytes, key.to_str())?;
        self.load_layer(key, collection)
    }

    #[inline] pub fn is_loaded(&self, key: LayerKey) -> bool { self.sources.contains_key(&key) }

    /// Full source of a loaded layer.
    pub fn source(&self, key: LayerKey) -> Option<&FeatureCollection> {
        self.sources.get(&key).map(|s| &s.collection)
    }

    /// Features of a layer passing the current selection, in source order.
    pub fn visible(&self, key: LayerKey) -> Vec<&Feature> {
        self.sources.get(&key)
            .map(|s| s.visible.iter().filter_map(|&i| s.collection.get(i)).collect())
            .unwrap_or_default()
    }

    /// Replace the selection and re-materialize every loaded layer on the renderer.
    pub fn set_selection(&mut self, selection: FilterSelection, renderer: &mut impl MapRenderer) {
        self.selection = selection;
        self.apply_filters(renderer);
    }

    /// Re-derive each layer's visible set and replace what the renderer shows.
    pub fn apply_filters(&mut self, renderer: &mut impl MapRenderer) {
        for layer in &self.config.layers {
            let Some(source) = self.sources.get_mut(&layer.key) else { continue };
            source.visible = materialize_indices(layer, &source.collection, &self.selection);
            let features: Vec<&Feature> = source.visible.iter()
                .filter_map(|&i| source.collection.get(i))
                .collect();
            apply_to(renderer, layer, &features);
        }
    }

    /// Force-remove layers whose minimum zoom exceeds the renderer's zoom.
    /// Zooming back in never re-adds them.
    pub fn on_zoom(&self, renderer: &mut impl MapRenderer) -> BTreeSet<LayerKey> {
        let hidden = self.gate.apply(renderer.zoom());
        for &key in &hidden {
            if renderer.has_layer(key) {
                debug!("[viewer] zoom {} below {} for {key}, removing layer", renderer.zoom(), self.gate.threshold(key));
                renderer.remove_layer(key);
            }
        }
        hidden
    }

    /// Legend entries for the layers on the map.
    pub fn legend(&self, renderer: &impl MapRenderer) -> Vec<LegendEntry> {
        legend(&self.config.layers, renderer)
    }

    /// Viewport samples of every layer currently on the map.
    /// A layer whose data is not loaded yet is listed with no rows.
    pub fn active_samples(&self, renderer: &impl MapRenderer, max: usize) -> Vec<LayerSamples> {
        let viewport = renderer.bounds();
        self.config.layers.iter()
            .filter(|l| renderer.has_layer(l.key))
            .map(|l| {
                let rows = self.sources.get(&l.key)
                    .map(|s| sample_indexed(l, &s.collection, &s.index, &self.selection, &viewport, max))
                    .unwrap_or_default();
                LayerSamples::new(l, rows)
            })
            .collect()
    }

    /// Info panel contents for the current view.
    pub fn info_panel(&self, renderer: &impl MapRenderer) -> PanelSummary {
        let samples = self.active_samples(renderer, self.config.panel_sample_size);
        PanelSummary::new(renderer.zoom(), renderer.bounds().center(), &samples)
    }

    /// CSV export of the current view, or `None` when no layer is active.
    pub fn export_csv(&self, renderer: &impl MapRenderer, date: Date) -> Result<Option<CsvExport>> {
        let samples = self.active_samples(renderer, self.config.export_sample_size);
        if samples.is_empty() {
            return Ok(None);
        }
        Ok(Some(CsvExport {
            filename: export_filename(&self.config.export_prefix, date)?,
            contents: to_csv(&samples)?,
        }))
    }

    /// Extent to frame initially: bounds of the first configured, loaded layer.
    /// On failure the map should stay at its default view.
    pub fn initial_frame(&self) -> Result<Viewport, ViewerError> {
        let source = self.config.layers.iter()
            .find_map(|l| self.sources.get(&l.key))
            .ok_or(ViewerError::InvalidBounds)?;
        collection_bounds(source.collection.iter(), &GeoBounds)
            .map(Viewport::from)
            .inspect_err(|_| warn!("[viewer] invalid bounds; possibly GeoJSON in the wrong CRS (expected EPSG:4326)"))
    }

    /// Filter features of a layer against an arbitrary selection without touching the session.
    pub fn preview<'a>(&'a self, key: LayerKey, selection: &FilterSelection) -> Result<Vec<&'a Feature>, ViewerError> {
        let layer = self.descriptor(key)?;
        Ok(self.sources.get(&key).map(|s| materialize(layer, &s.collection, selection)).unwrap_or_default())
    }
}

/// A fixed view of the map: bounds, zoom and the set of layers on it.
/// Records what the viewer renders, for embeddings without a live map.
#[derive(Debug, Clone)]
pub struct ViewState {
    pub bounds: Viewport,
    pub zoom: f64,
    pub active: BTreeSet<LayerKey>,
    /// Feature count currently rendered per layer.
    pub rendered: BTreeMap<LayerKey, usize>,
}

impl ViewState {
    pub fn new(bounds: Viewport, zoom: f64, active: impl IntoIterator<Item = LayerKey>) -> Self {
        Self { bounds, zoom, active: active.into_iter().collect(), rendered: BTreeMap::new() }
    }
}

impl MapRenderer for ViewState {
    fn clear(&mut self, layer: LayerKey) { self.rendered.insert(layer, 0); }

    fn add_features(&mut self, layer: LayerKey, features: &[&Feature], _style: &LayerStyle) {
        *self.rendered.entry(layer).or_default() += features.len();
    }

    fn has_layer(&self, layer: LayerKey) -> bool { self.active.contains(&layer) }

    fn remove_layer(&mut self, layer: LayerKey) { self.active.remove(&layer); }

    fn bounds(&self) -> Viewport { self.bounds }

    fn zoom(&self) -> f64 { self.zoom }
}
