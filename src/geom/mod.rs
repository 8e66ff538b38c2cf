mod index;
mod viewport;

pub use index::FeatureIndex;
pub use viewport::{collection_bounds, BoundsOf, GeoBounds, Viewport};
