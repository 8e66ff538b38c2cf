use crate::{
    error::ViewerError,
    geom::Viewport,
    layer::LayerDescriptor,
    materialize::{bbox_clause, compile_predicate},
    selection::FilterSelection,
};

/// A WFS GetFeature request for one layer, scoped by viewport and selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WfsQuery {
    pub type_name: String,
    pub cql_filter: String,
    pub count: usize,
}

impl WfsQuery {
    /// Query-string parameters, unencoded.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("service", "WFS".to_string()),
            ("version", "2.0.0".to_string()),
            ("request", "GetFeature".to_string()),
            ("typeNames", self.type_name.clone()),
            ("outputFormat", "application/json".to_string()),
            ("srsName", "EPSG:4326".to_string()),
            ("count", self.count.to_string()),
            ("CQL_FILTER", self.cql_filter.clone()),
        ]
    }
}

/// Build the viewport sample request: `BBOX(...)` AND the compiled selection predicate.
pub fn sample_request(
    layer: &LayerDescriptor,
    selection: &FilterSelection,
    viewport: &Viewport,
    max: usize,
    geometry_field: &str,
) -> Result<WfsQuery, ViewerError> {
    let bbox = bbox_clause(geometry_field, viewport)?;
    let cql_filter = match compile_predicate(layer, selection)? {
        Some(predicate) => format!("{bbox} AND {predicate}"),
        None => bbox,
    };
    Ok(WfsQuery { type_name: layer.type_name.clone(), cql_filter, count: max })
}

/// WMS layer parameters. `CQL_FILTER` is only present when the selection constrains the layer,
/// so an empty selection clears any previously applied filter.
pub fn wms_params(layer: &LayerDescriptor, selection: &FilterSelection) -> Result<Vec<(&'static str, String)>, ViewerError> {
    let mut params = vec![
        ("layers", layer.type_name.clone()),
        ("format", "image/png".to_string()),
        ("transparent", "true".to_string()),
    ];
    if let Some(predicate) = compile_predicate(layer, selection)? {
        params.push(("CQL_FILTER", predicate));
    }
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{layer::LayerKey, region::Region};

    #[test]
    fn sample_request_combines_bbox_and_predicate() {
        let layer = LayerDescriptor::builtin(LayerKey::InformalSettlements);
        let viewport = Viewport::new(-44.0, -23.0, -43.0, -22.0).unwrap();
        let selection = FilterSelection::empty().with_region(Some(Region::Sudeste));

        let query = sample_request(&layer, &selection, &viewport, 300, "geom").unwrap();
        assert_eq!(query.type_name, "webgis:favelas");
        assert_eq!(
            query.cql_filter,
            "BBOX(geom, -44, -23, -43, -22, 'EPSG:4326') AND strToUpperCase(strTrim(sigla_uf)) IN ('ES', 'MG', 'RJ', 'SP')"
        );
        let params = query.params();
        assert!(params.contains(&("count", "300".to_string())));
        assert!(params.contains(&("request", "GetFeature".to_string())));
    }

    #[test]
    fn empty_selection_is_bbox_only() {
        let layer = LayerDescriptor::builtin(LayerKey::Strata);
        let viewport = Viewport::new(0.0, 0.0, 1.0, 1.0).unwrap();
        let query = sample_request(&layer, &FilterSelection::empty(), &viewport, 5, "the_geom").unwrap();
        assert_eq!(query.cql_filter, "BBOX(the_geom, 0, 0, 1, 1, 'EPSG:4326')");
    }

    #[test]
    fn wms_filter_is_cleared_for_empty_selection() {
        let layer = LayerDescriptor::builtin(LayerKey::Municipalities);
        let cleared = wms_params(&layer, &FilterSelection::empty()).unwrap();
        assert!(cleared.iter().all(|(k, _)| *k != "CQL_FILTER"));

        let filtered = wms_params(&layer, &FilterSelection::empty().with_state(Some("BA"))).unwrap();
        assert!(filtered.contains(&("CQL_FILTER", "strToUpperCase(strTrim(sigla_uf)) = 'BA'".to_string())));
    }
}
