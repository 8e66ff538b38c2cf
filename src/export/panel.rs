use serde::Serialize;

use crate::{layer::{LayerDescriptor, LayerKey}, sample::SampleRow};

/// Samples of one active layer, with the column labels they were projected onto.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerSamples {
    pub key: LayerKey,
    pub label: String,
    pub columns: Vec<String>,
    pub rows: Vec<SampleRow>,
}

impl LayerSamples {
    pub fn new(layer: &LayerDescriptor, rows: Vec<SampleRow>) -> Self {
        Self {
            key: layer.key,
            label: layer.label.clone(),
            columns: layer.display_fields().iter().map(|f| layer.label_of(f).to_string()).collect(),
            rows,
        }
    }
}

/// A display table for one layer. An empty `rows` means no features are on screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelTable {
    pub label: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl PanelTable {
    #[inline] pub fn is_empty(&self) -> bool { self.rows.is_empty() }
}

/// Everything the info panel shows for the current view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelSummary {
    pub zoom: f64,
    /// `(lat, lon)` rounded to four decimals.
    pub center: (f64, f64),
    pub active_layers: Vec<String>,
    pub tables: Vec<PanelTable>,
}

impl PanelSummary {
    pub fn new(zoom: f64, center: (f64, f64), samples: &[LayerSamples]) -> Self {
        let round = |v: f64| (v * 10_000.0).round() / 10_000.0;
        Self {
            zoom,
            center: (round(center.0), round(center.1)),
            active_layers: samples.iter().map(|s| s.label.clone()).collect(),
            tables: format(samples),
        }
    }
}

/// Turn grouped samples into display tables, one per layer, in the given order.
pub fn format(samples: &[LayerSamples]) -> Vec<PanelTable> {
    samples.iter()
        .map(|s| PanelTable {
            label: s.label.clone(),
            columns: s.columns.clone(),
            rows: s.rows.iter()
                .map(|r| (0..s.columns.len()).map(|i| r.values.get(i).cloned().unwrap_or_default()).collect())
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(values: &[&str]) -> SampleRow {
        SampleRow { values: values.iter().map(|v| v.to_string()).collect() }
    }

    #[test]
    fn tables_use_field_labels() {
        let layer = LayerDescriptor::builtin(LayerKey::Strata);
        let samples = [LayerSamples::new(&layer, vec![row(&["1", "Litoral", "SC"])])];
        let tables = format(&samples);
        assert_eq!(tables[0].label, "Estratos geográficos");
        assert_eq!(tables[0].columns, vec!["Código do Estrato", "Estrato", "UF"]);
        assert_eq!(tables[0].rows, vec![vec!["1", "Litoral", "SC"]]);
    }

    #[test]
    fn empty_layers_have_empty_tables() {
        let layer = LayerDescriptor::builtin(LayerKey::HousingProgramPoints);
        let tables = format(&[LayerSamples::new(&layer, Vec::new())]);
        assert!(tables[0].is_empty());
    }

    #[test]
    fn summary_rounds_center() {
        let layer = LayerDescriptor::builtin(LayerKey::Municipalities);
        let summary = PanelSummary::new(4.0, (-15.123456, -55.987654), &[LayerSamples::new(&layer, Vec::new())]);
        assert_eq!(summary.center, (-15.1235, -55.9877));
        assert_eq!(summary.active_layers, vec!["Municípios"]);
    }
}
