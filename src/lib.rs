#![doc = "Feature filtering and viewport sampling core for a thematic web map viewer"]
mod common;
mod config;
mod error;
mod export;
mod feature;
mod filter;
mod geom;
mod layer;
mod materialize;
mod region;
mod remote;
mod sample;
mod selection;
mod viewer;
mod zoom;

#[doc(inline)]
pub use common::{normalize, normalize_value};

#[doc(inline)]
pub use config::{RemoteConfig, ViewerConfig};

#[doc(inline)]
pub use error::ViewerError;

#[doc(inline)]
pub use export::{export_filename, format, legend, to_csv, CsvExport, LayerSamples, LegendEntry, PanelSummary, PanelTable};

#[doc(inline)]
pub use feature::{Feature, FeatureCollection};

#[doc(inline)]
pub use filter::passes;

#[doc(inline)]
pub use geom::{collection_bounds, BoundsOf, FeatureIndex, GeoBounds, Viewport};

#[doc(inline)]
pub use layer::{LayerDescriptor, LayerKey, LayerStyle};

#[doc(inline)]
pub use materialize::{apply_to, compile_predicate, materialize, materialize_indices, MapRenderer};

#[doc(inline)]
pub use region::{allowed_states, members_of, members_of_name, region_of, Region, ALL_STATES};

#[doc(inline)]
pub use remote::{sample_request, wms_params, WfsQuery};

#[cfg(feature = "remote")]
#[doc(inline)]
pub use remote::{fetch_features, fetch_sample};

#[doc(inline)]
pub use sample::{sample, sample_indexed, sample_with, SampleRow, EXPORT_SAMPLE_SIZE, PANEL_SAMPLE_SIZE};

#[doc(inline)]
pub use selection::FilterSelection;

#[doc(inline)]
pub use viewer::{ViewState, Viewer};

#[doc(inline)]
pub use zoom::ZoomGate;
