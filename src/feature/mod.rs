mod collection;
mod io;

pub use collection::{Feature, FeatureCollection};
