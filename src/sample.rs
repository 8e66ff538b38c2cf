use serde::Serialize;

use crate::{
    common::value_text,
    feature::{Feature, FeatureCollection},
    filter::passes,
    geom::{BoundsOf, FeatureIndex, GeoBounds, Viewport},
    layer::LayerDescriptor,
    selection::FilterSelection,
};

/// Sample cap for the on-screen info panel.
pub const PANEL_SAMPLE_SIZE: usize = 5;

/// Sample cap for CSV export.
pub const EXPORT_SAMPLE_SIZE: usize = 300;

/// One sampled feature projected onto its layer's display fields.
/// `values[i]` belongs to `layer.display_fields()[i]`; missing values are empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SampleRow {
    pub values: Vec<String>,
}

impl SampleRow {
    fn project(layer: &LayerDescriptor, feature: &Feature) -> Self {
        Self {
            values: layer.display_fields().iter()
                .map(|field| value_text(feature.property(field)))
                .collect(),
        }
    }
}

/// Bounded, order-dependent sample of already-filtered features intersecting the viewport.
///
/// Features are visited in order; the first `max` whose bounds touch the viewport are kept.
/// Features without computable bounds are skipped.
pub fn sample_with<'a>(
    layer: &LayerDescriptor,
    features: impl IntoIterator<Item = &'a Feature>,
    viewport: &Viewport,
    max: usize,
    bounds: &impl BoundsOf,
) -> Vec<SampleRow> {
    if max == 0 {
        return Vec::new();
    }
    features.into_iter()
        .filter(|f| {
            f.geometry()
                .and_then(|g| bounds.bounds_of(g))
                .is_some_and(|rect| viewport.intersects(&rect))
        })
        .take(max)
        .map(|f| SampleRow::project(layer, f))
        .collect()
}

/// [`sample_with`] using `geo` bounding rectangles.
#[inline]
pub fn sample<'a>(
    layer: &LayerDescriptor,
    features: impl IntoIterator<Item = &'a Feature>,
    viewport: &Viewport,
    max: usize,
) -> Vec<SampleRow> {
    sample_with(layer, features, viewport, max, &GeoBounds)
}

/// Same rows as filtering then [`sample`], using the R-tree to find viewport candidates.
pub fn sample_indexed(
    layer: &LayerDescriptor,
    source: &FeatureCollection,
    index: &FeatureIndex,
    selection: &FilterSelection,
    viewport: &Viewport,
    max: usize,
) -> Vec<SampleRow> {
    index.query(viewport).into_iter()
        .filter_map(|i| source.get(i))
        .filter(|f| passes(f.properties(), layer, selection))
        .take(max)
        .map(|f| SampleRow::project(layer, f))
        .collect()
}
