use geo::{BoundingRect, Coord, Geometry, Rect};
use serde::{Deserialize, Serialize};

use crate::{error::ViewerError, feature::Feature};

/// The map's currently visible lon/lat extent. Re-read on every view change, never cached.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl Viewport {
    /// Build a viewport from its edges; corners are reordered if swapped.
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Result<Self, ViewerError> {
        if ![west, south, east, north].iter().all(|v| v.is_finite()) {
            return Err(ViewerError::InvalidBounds);
        }
        Ok(Self {
            west: west.min(east),
            south: south.min(north),
            east: west.max(east),
            north: south.max(north),
        })
    }

    /// Build from `[min_lon, min_lat, max_lon, max_lat]`.
    pub fn from_bbox(bbox: &[f64]) -> Result<Self, ViewerError> {
        match bbox {
            [w, s, e, n] => Self::new(*w, *s, *e, *n),
            _ => Err(ViewerError::InvalidBounds),
        }
    }

    #[inline]
    pub fn to_bbox(&self) -> [f64; 4] { [self.west, self.south, self.east, self.north] }

    #[inline]
    pub fn rect(&self) -> Rect<f64> {
        Rect::new(Coord { x: self.west, y: self.south }, Coord { x: self.east, y: self.north })
    }

    /// `(lat, lon)` of the viewport centre.
    pub fn center(&self) -> (f64, f64) {
        ((self.south + self.north) / 2.0, (self.west + self.east) / 2.0)
    }

    /// True when `rect` overlaps this viewport; touching edges count.
    #[inline]
    pub fn intersects(&self, rect: &Rect<f64>) -> bool {
        rect_intersects(&self.rect(), rect)
    }
}

impl From<Rect<f64>> for Viewport {
    fn from(rect: Rect<f64>) -> Self {
        Self { west: rect.min().x, south: rect.min().y, east: rect.max().x, north: rect.max().y }
    }
}

/// Closed-interval rectangle overlap test.
#[inline]
pub fn rect_intersects(a: &Rect<f64>, b: &Rect<f64>) -> bool {
    a.min().x <= b.max().x && b.min().x <= a.max().x
        && a.min().y <= b.max().y && b.min().y <= a.max().y
}

/// Geometry bounds capability. Returns `None` when bounds cannot be computed.
pub trait BoundsOf {
    fn bounds_of(&self, geometry: &Geometry<f64>) -> Option<Rect<f64>>;
}

impl<F> BoundsOf for F
where
    F: Fn(&Geometry<f64>) -> Option<Rect<f64>>,
{
    fn bounds_of(&self, geometry: &Geometry<f64>) -> Option<Rect<f64>> { self(geometry) }
}

/// Bounds from `geo::BoundingRect`; empty or non-finite geometries yield `None`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeoBounds;

impl BoundsOf for GeoBounds {
    fn bounds_of(&self, geometry: &Geometry<f64>) -> Option<Rect<f64>> {
        let rect = geometry.bounding_rect()?;
        let finite = [rect.min().x, rect.min().y, rect.max().x, rect.max().y].iter().all(|v| v.is_finite());
        finite.then_some(rect)
    }
}

/// Bounds of a feature, failing closed on missing or degenerate geometry.
#[inline]
pub(crate) fn feature_bounds(feature: &Feature, bounds: &impl BoundsOf) -> Option<Rect<f64>> {
    feature.geometry().and_then(|g| bounds.bounds_of(g))
}

/// Union of all computable feature bounds, used to frame the map initially.
pub fn collection_bounds<'a>(
    features: impl IntoIterator<Item = &'a Feature>,
    bounds: &impl BoundsOf,
) -> Result<Rect<f64>, ViewerError> {
    features.into_iter()
        .filter_map(|f| feature_bounds(f, bounds))
        .reduce(|a, b| Rect::new(
            Coord {
                x: a.min().x.min(b.min().x),
                y: a.min().y.min(b.min().y),
            },
            Coord {
                x: a.max().x.max(b.max().x),
                y: a.max().y.max(b.max().y),
            }
        ))
        .filter(|r| r.min().x >= -180.0 && r.max().x <= 180.0 && r.min().y >= -90.0 && r.max().y <= 90.0)
        .ok_or(ViewerError::InvalidBounds)
}
