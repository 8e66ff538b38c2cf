//! Remote map server variant: the filter is compiled into WFS/WMS request parameters.

#[cfg(feature = "remote")]
mod fetch;
mod wfs;

#[cfg(feature = "remote")]
pub use fetch::{fetch_features, fetch_sample};
pub use wfs::{sample_request, wms_params, WfsQuery};
