use std::{collections::HashSet, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{
    error::ViewerError,
    layer::{LayerDescriptor, LayerKey, MAX_DISPLAY_FIELDS},
    sample::{EXPORT_SAMPLE_SIZE, PANEL_SAMPLE_SIZE},
};

/// Remote map server settings for the WMS/WFS variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// OWS endpoint, e.g. `https://host/geoserver/ows`.
    pub base_url: String,
    /// Geometry attribute used in `BBOX` clauses.
    #[serde(default = "default_geometry_field")]
    pub geometry_field: String,
}

fn default_geometry_field() -> String { "geom".to_string() }

/// Viewer configuration. `Default` reproduces the built-in four-layer viewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub layers: Vec<LayerDescriptor>,
    pub panel_sample_size: usize,
    pub export_sample_size: usize,
    pub export_prefix: String,
    /// Initial `(lat, lon)` centre before auto-framing.
    pub center: (f64, f64),
    pub zoom: f64,
    pub remote: Option<RemoteConfig>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            layers: LayerDescriptor::builtins(),
            panel_sample_size: PANEL_SAMPLE_SIZE,
            export_sample_size: EXPORT_SAMPLE_SIZE,
            export_prefix: "amostra_camadas".to_string(),
            center: (-15.0, -55.0),
            zoom: 4.0,
            remote: None,
        }
    }
}

impl ViewerConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json(text: &str) -> Result<Self, ViewerError> {
        let config: Self = serde_json::from_str(text)
            .map_err(|e| ViewerError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON configuration file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("[config] Failed to read config file: {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("[config] Invalid config file: {}", path.display()))
    }

    pub fn validate(&self) -> Result<(), ViewerError> {
        let mut seen = HashSet::new();
        for layer in &self.layers {
            if !seen.insert(layer.key) {
                return Err(ViewerError::InvalidConfig(format!("layer {} is configured twice", layer.key)));
            }
            if layer.fields.len() > MAX_DISPLAY_FIELDS {
                return Err(ViewerError::InvalidConfig(format!("layer {} has more than 4 display fields", layer.key)));
            }
        }
        if self.panel_sample_size > self.export_sample_size {
            return Err(ViewerError::InvalidConfig("panel sample size exceeds export sample size".into()));
        }
        Ok(())
    }

    /// Descriptor of a configured layer.
    pub fn layer(&self, key: LayerKey) -> Option<&LayerDescriptor> {
        self.layers.iter().find(|l| l.key == key)
    }
}
