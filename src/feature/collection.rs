use std::path::Path;

use anyhow::{Context, Result};
use geo::Geometry;
use log::{debug, warn};
use serde_json::{json, Map, Value};

use super::io::{geometry_from_json, geometry_to_json};
use crate::error::ViewerError;

/// One geographic entity: an optional geometry plus its attributes.
/// Immutable once loaded; identity is its position in the owning collection.
///
/// The GeoJSON object it was loaded from is kept verbatim and is what gets written
/// back out; the parsed geometry only serves bounds and viewport tests.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    geometry: Option<Geometry<f64>>, // None for null or unparseable geometry
    properties: Map<String, Value>,
    source: Value,
}

impl Feature {
    pub fn new(geometry: Option<Geometry<f64>>, properties: Map<String, Value>) -> Self {
        let geometry_json = geometry.as_ref()
            .and_then(|g| geometry_to_json(g).map_err(|e| debug!("[feature] {e:#}")).ok())
            .unwrap_or(Value::Null);
        let source = json!({
            "type": "Feature",
            "geometry": geometry_json,
            "properties": properties,
        });
        Self { geometry, properties, source }
    }

    #[inline] pub fn geometry(&self) -> Option<&Geometry<f64>> { self.geometry.as_ref() }

    #[inline] pub fn properties(&self) -> &Map<String, Value> { &self.properties }

    /// Attribute by name; `None` when the attribute is absent.
    #[inline] pub fn property(&self, name: &str) -> Option<&Value> { self.properties.get(name) }

    /// Parse a GeoJSON Feature object. A malformed geometry is kept as `None`
    /// so the feature still takes part in filtering.
    fn from_json(value: Value) -> Self {
        let properties = value["properties"].as_object().cloned().unwrap_or_default();
        let geometry = match &value["geometry"] {
            Value::Null => None,
            geometry => match geometry_from_json(geometry) {
                Ok(g) => Some(g),
                Err(e) => {
                    debug!("[feature] unusable geometry: {e:#}");
                    None
                }
            },
        };
        Self { geometry, properties, source: value }
    }

    /// The GeoJSON Feature as loaded: `id`, foreign members and every ordinate included.
    #[inline] pub fn to_geojson(&self) -> &Value { &self.source }
}

/// The in-memory feature source of one layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureCollection {
    features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self { Self { features } }

    /// Normalize any GeoJSON shape into a feature list:
    /// a FeatureCollection is taken as is, a single Feature becomes a one-element list,
    /// a bare geometry becomes one feature with no attributes, anything else is empty.
    pub fn from_geojson(value: &Value) -> Self {
        let features: Vec<Feature> = match value["type"].as_str() {
            Some("FeatureCollection") => value["features"].as_array()
                .map(|fs| fs.iter().cloned().map(Feature::from_json).collect())
                .unwrap_or_default(),
            Some("Feature") => vec![Feature::from_json(value.clone())],
            Some(_) => vec![Feature::from_json(json!({ "type": "Feature", "geometry": value, "properties": {} }))],
            None => Vec::new(),
        };

        let without_geometry = features.iter().filter(|f| f.geometry.is_none()).count();
        if without_geometry > 0 {
            warn!("[feature] {without_geometry} of {} features have no usable geometry", features.len());
        }
        Self { features }
    }

    /// Parse GeoJSON text. Malformed JSON is a source-load failure.
    pub fn from_slice(bytes: &[u8], source_name: &str) -> Result<Self, ViewerError> {
        let value: Value = serde_json::from_slice(bytes).map_err(|e| ViewerError::SourceLoad {
            source_name: source_name.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self::from_geojson(&value))
    }

    /// Read and parse a GeoJSON file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("[feature] Failed to read GeoJSON file: {}", path.display()))?;
        Ok(Self::from_slice(&bytes, &path.display().to_string())?)
    }

    #[inline] pub fn len(&self) -> usize { self.features.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.features.is_empty() }

    #[inline] pub fn features(&self) -> &[Feature] { &self.features }

    #[inline] pub fn get(&self, idx: usize) -> Option<&Feature> { self.features.get(idx) }

    #[inline] pub fn iter(&self) -> impl Iterator<Item = &Feature> { self.features.iter() }

    /// Write a list of features as a GeoJSON FeatureCollection, each exactly as loaded.
    pub fn to_geojson<'a>(features: impl IntoIterator<Item = &'a Feature>) -> Value {
        let features: Vec<Value> = features.into_iter().map(|f| f.to_geojson().clone()).collect();
        json!({
            "type": "FeatureCollection",
            "features": features,
        })
    }
}
