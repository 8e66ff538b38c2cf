// End-to-end viewer scenarios through the public API:
//   selection -> materialized layers -> zoom gate -> info panel and CSV export,
//   plus the predicate strategy for server-side filtering.

use std::collections::BTreeSet;

use serde_json::{json, Value};
use time::macros::date;
use webgis::{
    compile_predicate, materialize, normalize, passes, sample, sample_request, FeatureCollection, FilterSelection,
    LayerDescriptor, LayerKey, Region, ViewState, Viewer, ViewerConfig, Viewport,
};

fn municipality(cd: &str, name: &str, uf: Option<&str>, hierarchy: Option<&str>, lon: f64, lat: f64) -> Value {
    let mut properties = json!({ "cd_mun": cd, "nm_mun": name });
    if let Some(uf) = uf { properties["sigla_uf"] = json!(uf); }
    if let Some(h) = hierarchy { properties["hierarquia"] = json!(h); }
    json!({
        "type": "Feature",
        "geometry": { "type": "Point", "coordinates": [lon, lat] },
        "properties": properties,
    })
}

fn municipalities() -> FeatureCollection {
    FeatureCollection::from_geojson(&json!({
        "type": "FeatureCollection",
        "features": [
            municipality("4106902", "Curitiba", Some("PR"), Some("Metrópole"), -49.27, -25.43),
            municipality("3550308", "São Paulo", Some("SP"), Some("Grande Metrópole Nacional"), -46.63, -23.55),
            municipality("4314902", "Porto Alegre", Some("RS"), Some("Metrópole"), -51.23, -30.03),
            municipality("2304400", "Fortaleza", Some("CE"), None, -38.54, -3.72),
            municipality("0000000", "Sem UF", None, Some("Centro Local"), -50.0, -27.0),
        ],
    }))
}

fn names(features: &[&webgis::Feature]) -> Vec<String> {
    features.iter()
        .map(|f| f.property("nm_mun").and_then(Value::as_str).unwrap_or_default().to_string())
        .collect()
}

fn brazil() -> Viewport { Viewport::new(-74.0, -34.0, -34.0, 6.0).unwrap() }

#[test]
fn south_region_keeps_pr_and_rs_in_order() {
    let layer = LayerDescriptor::builtin(LayerKey::Municipalities);
    let source = municipalities();
    let selection = FilterSelection::from_controls("Sul", "", "").unwrap();

    assert_eq!(names(&materialize(&layer, &source, &selection)), ["Curitiba", "Porto Alegre"]);
}

#[test]
fn state_overrides_region() {
    let layer = LayerDescriptor::builtin(LayerKey::Municipalities);
    let source = municipalities();
    let selection = FilterSelection { region: Some(Region::Nordeste), state: Some("SP".into()), hierarchy_code: None };

    assert_eq!(names(&materialize(&layer, &source, &selection)), ["São Paulo"]);
}

#[test]
fn hierarchy_code_is_accent_and_case_insensitive() {
    let layer = LayerDescriptor::builtin(LayerKey::Municipalities);
    let source = municipalities();
    let selection = FilterSelection::from_controls("", "", "METROPOLE").unwrap();

    // Fortaleza has no hierarchy attribute and is never excluded by this axis.
    assert_eq!(names(&materialize(&layer, &source, &selection)), ["Curitiba", "Porto Alegre", "Fortaleza"]);
    assert_eq!(normalize("São Paulo"), normalize("sao   paulo"));
}

#[test]
fn missing_state_fails_closed_only_under_a_geographic_filter() {
    let layer = LayerDescriptor::builtin(LayerKey::Municipalities);
    let source = municipalities();
    let orphan = source.get(4).unwrap();

    assert!(!passes(orphan.properties(), &layer, &FilterSelection::empty().with_region(Some(Region::Sul))));
    assert!(passes(orphan.properties(), &layer, &FilterSelection::empty()));
    assert_eq!(materialize(&layer, &source, &FilterSelection::empty()).len(), source.len());
}

#[test]
fn sampling_is_bounded_and_viewport_scoped() {
    let layer = LayerDescriptor::builtin(LayerKey::Municipalities);
    let source = municipalities();
    let south = Viewport::new(-54.0, -34.0, -48.0, -24.0).unwrap();

    let rows = sample(&layer, source.iter(), &south, 10);
    let sampled: Vec<&str> = rows.iter().map(|r| r.values[1].as_str()).collect();
    assert_eq!(sampled, ["Curitiba", "Porto Alegre", "Sem UF"]);
    assert_eq!(rows[2].values[2], "");

    assert_eq!(sample(&layer, source.iter(), &south, 1).len(), 1);
    assert!(sample(&layer, source.iter(), &south, 0).is_empty());
}

#[test]
fn session_panel_zoom_and_export() {
    let mut viewer = Viewer::new(ViewerConfig::default()).unwrap();
    viewer.load_layer(LayerKey::Municipalities, municipalities()).unwrap();
    viewer.load_layer_json(LayerKey::Strata, br#"{
        "type": "Feature",
        "geometry": { "type": "Polygon", "coordinates": [[[-52, -28], [-50, -28], [-50, -26], [-52, -26], [-52, -28]]] },
        "properties": { "codigo_es": "E1", "nome_es": "Planalto", "sigla_uf": "SC" }
    }"#).unwrap();

    let mut view = ViewState::new(brazil(), 5.0, [LayerKey::Municipalities, LayerKey::Strata]);
    viewer.set_selection(FilterSelection::from_controls("Sul", "", "").unwrap(), &mut view);
    assert_eq!(view.rendered[&LayerKey::Municipalities], 2);
    assert_eq!(view.rendered[&LayerKey::Strata], 1);

    let panel = viewer.info_panel(&view);
    assert_eq!(panel.active_layers, ["Municípios", "Estratos geográficos"]);
    assert_eq!(panel.tables[0].rows[1], ["4314902", "Porto Alegre", "RS", "Metrópole"]);
    assert_eq!(panel.tables[1].columns.len(), 3);

    let export = viewer.export_csv(&view, date!(2026 - 10 - 18)).unwrap().unwrap();
    assert_eq!(export.filename, "amostra_camadas_2026-10-18.csv");
    assert_eq!(
        export.contents,
        concat!(
            "layer,c1,c2,c3,c4\n",
            "\"municipalities\",\"4106902\",\"Curitiba\",\"PR\",\"Metrópole\"\n",
            "\"municipalities\",\"4314902\",\"Porto Alegre\",\"RS\",\"Metrópole\"\n",
            "\"strata\",\"E1\",\"Planalto\",\"SC\",\"\"\n",
        )
    );

    view.zoom = 2.0;
    viewer.on_zoom(&mut view);
    assert_eq!(view.active, BTreeSet::from([LayerKey::Municipalities]));
    view.zoom = 10.0;
    viewer.on_zoom(&mut view);
    assert_eq!(view.active, BTreeSet::from([LayerKey::Municipalities]));

    view.active.clear();
    assert!(viewer.export_csv(&view, date!(2026 - 10 - 18)).unwrap().is_none());
}

#[test]
fn initial_frame_rejects_projected_data() {
    let mut viewer = Viewer::new(ViewerConfig::default()).unwrap();
    viewer.load_layer_json(LayerKey::Municipalities, br#"{
        "type": "FeatureCollection",
        "features": [{ "type": "Feature", "geometry": { "type": "Point", "coordinates": [5500000, 7400000] }, "properties": {} }]
    }"#).unwrap();
    assert!(matches!(viewer.initial_frame(), Err(webgis::ViewerError::InvalidBounds)));
}

#[test]
fn malformed_geojson_is_a_source_load_error() {
    let mut viewer = Viewer::new(ViewerConfig::default()).unwrap();
    let err = viewer.load_layer_json(LayerKey::Strata, b"{ not json").unwrap_err();
    assert!(matches!(err, webgis::ViewerError::SourceLoad { .. }));
    assert!(!viewer.is_loaded(LayerKey::Strata));
}

#[test]
fn predicate_strategy_matches_local_rules() {
    let layer = LayerDescriptor::builtin(LayerKey::Municipalities);
    let selection = FilterSelection::from_controls("Sul", "", "Metrópole").unwrap();
    assert_eq!(
        compile_predicate(&layer, &selection).unwrap().unwrap(),
        "(hierarquia IS NULL OR hierarquia = 'Metrópole') AND strToUpperCase(strTrim(sigla_uf)) IN ('PR', 'RS', 'SC')"
    );

    let hostile = FilterSelection::empty().with_hierarchy_code(Some("x' OR '1'='1"));
    let predicate = compile_predicate(&layer, &hostile).unwrap().unwrap();
    assert_eq!(predicate, "(hierarquia IS NULL OR hierarquia = 'x'' OR ''1''=''1')");

    let state_wins = FilterSelection { region: Some(Region::Norte), state: Some("SP".into()), hierarchy_code: None };
    let query = sample_request(&layer, &state_wins, &brazil(), 300, "geom").unwrap();
    assert_eq!(query.cql_filter, "BBOX(geom, -74, -34, -34, 6, 'EPSG:4326') AND strToUpperCase(strTrim(sigla_uf)) = 'SP'");
}
