use rstar::{RTree, RTreeObject, AABB};

use super::{viewport::feature_bounds, BoundsOf, Viewport};
use crate::feature::FeatureCollection;

/// R-tree entry: a feature's position in its collection and its bounds.
#[derive(Debug, Clone)]
struct Entry {
    position: usize,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for Entry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope { self.envelope }
}

/// R-tree of feature bounds for one collection. Features without bounds are not indexed.
#[derive(Debug, Clone)]
pub struct FeatureIndex {
    rtree: RTree<Entry>,
}

impl FeatureIndex {
    /// Bulk-load the index over every feature with computable bounds.
    pub fn new(collection: &FeatureCollection, bounds: &impl BoundsOf) -> Self {
        Self {
            rtree: RTree::bulk_load(
                collection.iter().enumerate()
                    .filter_map(|(position, f)| {
                        let rect = feature_bounds(f, bounds)?;
                        Some(Entry { position, envelope: AABB::from_corners(rect.min().into(), rect.max().into()) })
                    })
                    .collect()
            ),
        }
    }

    /// Number of indexed features.
    #[inline] pub fn len(&self) -> usize { self.rtree.size() }

    #[inline] pub fn is_empty(&self) -> bool { self.rtree.size() == 0 }

    /// Positions of features whose bounds intersect the viewport (touching counts), ascending.
    pub fn query(&self, viewport: &Viewport) -> Vec<usize> {
        let envelope = AABB::from_corners([viewport.west, viewport.south], [viewport.east, viewport.north]);
        let mut indices: Vec<usize> = self.rtree.locate_in_envelope_intersecting(&envelope)
            .map(|entry| entry.position)
            .collect();
        indices.sort_unstable();
        indices
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::geom::GeoBounds;

    #[test]
    fn query_returns_ordered_positions() {
        let collection = FeatureCollection::from_geojson(&json!({
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "geometry": { "type": "Point", "coordinates": [5.0, 5.0] }, "properties": {} },
                { "type": "Feature", "geometry": null, "properties": {} },
                { "type": "Feature", "geometry": { "type": "Point", "coordinates": [50.0, 50.0] }, "properties": {} },
                { "type": "Feature", "geometry": { "type": "Point", "coordinates": [10.0, 0.0] }, "properties": {} }
            ]
        }));
        let index = FeatureIndex::new(&collection, &GeoBounds);
        assert_eq!(index.len(), 3);

        let viewport = Viewport::new(0.0, 0.0, 10.0, 10.0).unwrap();
        assert_eq!(index.query(&viewport), vec![0, 3]);
    }
}
