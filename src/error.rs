use thiserror::Error;

/// Typed failures surfaced to the embedding viewer.
#[derive(Debug, Error)]
pub enum ViewerError {
    /// A dataset could not be fetched or parsed; no partial rendering is attempted.
    #[error("failed to load layer source {source_name}: {reason}")]
    SourceLoad { source_name: String, reason: String },

    /// The loaded collection has no computable bounds (e.g. projected coordinates instead of EPSG:4326).
    #[error("layer bounds are invalid; the GeoJSON is probably not in EPSG:4326")]
    InvalidBounds,

    #[error("unknown layer {0:?}")]
    UnknownLayer(String),

    #[error("unknown region {0:?}")]
    UnknownRegion(String),

    #[error("invalid selection: {0}")]
    InvalidSelection(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
