mod fs;
mod normalize;

pub(crate) use fs::*;
pub use normalize::{normalize, normalize_value};
pub(crate) use normalize::value_text;
