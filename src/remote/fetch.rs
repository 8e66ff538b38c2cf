use log::{debug, info};
use reqwest::blocking::Client;

use super::wfs::{sample_request, WfsQuery};
use crate::{
    error::ViewerError,
    feature::FeatureCollection,
    geom::Viewport,
    layer::LayerDescriptor,
    sample::{sample, SampleRow},
    selection::FilterSelection,
};

fn load_error(source_name: &str, reason: impl ToString) -> ViewerError {
    ViewerError::SourceLoad { source_name: source_name.to_string(), reason: reason.to_string() }
}

/// Run a WFS GetFeature request and parse the GeoJSON response.
/// One attempt, no retry; any transport, status or parse failure is a source-load error.
pub fn fetch_features(base_url: &str, query: &WfsQuery) -> Result<FeatureCollection, ViewerError> {
    let client = Client::builder()
        .user_agent(concat!("webgis/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| load_error(&query.type_name, e))?;

    debug!("[remote] GET {base_url} typeNames={} CQL_FILTER={}", query.type_name, query.cql_filter);
    let bytes = client.get(base_url)
        .query(&query.params())
        .send()
        .and_then(|resp| resp.error_for_status())
        .and_then(|resp| resp.bytes())
        .map_err(|e| load_error(&query.type_name, e))?;

    let collection = FeatureCollection::from_slice(&bytes, &query.type_name)?;
    info!("[remote] {} returned {} features", query.type_name, collection.len());
    Ok(collection)
}

/// Fetch and project a viewport sample from the remote server.
pub fn fetch_sample(
    base_url: &str,
    geometry_field: &str,
    layer: &LayerDescriptor,
    selection: &FilterSelection,
    viewport: &Viewport,
    max: usize,
) -> Result<Vec<SampleRow>, ViewerError> {
    if max == 0 {
        return Ok(Vec::new());
    }
    let query = sample_request(layer, selection, viewport, max, geometry_field)?;
    let collection = fetch_features(base_url, &query)?;
    Ok(sample(layer, collection.iter(), viewport, max))
}
