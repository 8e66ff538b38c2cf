mod descriptor;
mod key;
mod style;

pub use descriptor::LayerDescriptor;
pub(crate) use descriptor::MAX_DISPLAY_FIELDS;
pub use key::LayerKey;
pub use style::LayerStyle;
