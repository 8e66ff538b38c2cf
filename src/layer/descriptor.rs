use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{LayerKey, LayerStyle};

/// Maximum number of display fields a layer may configure (table/CSV columns).
pub(crate) const MAX_DISPLAY_FIELDS: usize = 4;

/// Static description of one overlay: schema, labels, zoom threshold and style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerDescriptor {
    pub key: LayerKey,
    pub label: String,
    /// Ordered display fields; the order defines table and CSV column order.
    pub fields: Vec<String>,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    /// Below this zoom level the layer is force-hidden.
    #[serde(default)]
    pub min_zoom: f64,
    #[serde(default = "default_state_field")]
    pub state_field: String,
    /// Hierarchy attribute, `hierarquia` unless configured otherwise. Features lacking it
    /// are never excluded by a hierarchy filter; `null` turns the axis off for the layer.
    #[serde(default = "default_hierarchy_field")]
    pub hierarchy_field: Option<String>,
    /// Feature type name on the remote map server.
    pub type_name: String,
    pub style: LayerStyle,
}

fn default_state_field() -> String { "sigla_uf".to_string() }

fn default_hierarchy_field() -> Option<String> { Some("hierarquia".to_string()) }

impl LayerDescriptor {
    fn new(key: LayerKey, label: &str, fields: &[(&str, &str)], type_name: &str, style: LayerStyle) -> Self {
        Self {
            key,
            label: label.to_string(),
            fields: fields.iter().map(|(f, _)| f.to_string()).collect(),
            labels: fields.iter().map(|(f, l)| (f.to_string(), l.to_string())).collect(),
            min_zoom: 0.0,
            state_field: default_state_field(),
            hierarchy_field: default_hierarchy_field(),
            type_name: type_name.to_string(),
            style,
        }
    }

    fn with_min_zoom(mut self, min_zoom: f64) -> Self {
        self.min_zoom = min_zoom;
        self
    }

    /// Built-in descriptor for each overlay of the viewer.
    pub fn builtin(key: LayerKey) -> Self {
        match key {
            LayerKey::Municipalities => Self::new(
                key,
                "Municípios",
                &[("cd_mun", "Código"), ("nm_mun", "Município"), ("sigla_uf", "UF"), ("hierarquia", "REGIC")],
                "webgis:municipios",
                LayerStyle::polygon("#222222", 1.2, "#000000", 0.0),
            ),
            LayerKey::Strata => Self::new(
                key,
                "Estratos geográficos",
                &[("codigo_es", "Código do Estrato"), ("nome_es", "Estrato"), ("sigla_uf", "UF")],
                "webgis:estratos",
                LayerStyle::polygon("#2E86C1", 1.0, "#5DADE2", 0.25),
            )
            .with_min_zoom(3.0),
            LayerKey::InformalSettlements => Self::new(
                key,
                "Favelas / comunidades",
                &[("cd_fcu", "Código"), ("nm_fcu", "Favela/Comunidade"), ("sigla_uf", "UF"), ("regiao", "Região")],
                "webgis:favelas",
                LayerStyle::polygon("#B03A2E", 1.0, "#E74C3C", 0.35),
            )
            .with_min_zoom(3.0),
            LayerKey::HousingProgramPoints => Self::new(
                key,
                "MCMV (pontos)",
                &[("txt_nome_m", "Município"), ("txt_modali", "Modalidade"), ("sigla_uf", "UF"), ("regiao", "Região")],
                "webgis:mcmv",
                LayerStyle::point(5.0, "#7D3C98", "#AF7AC5"),
            )
            .with_min_zoom(3.0),
        }
    }

    /// Built-in descriptors in draw order.
    pub fn builtins() -> Vec<Self> {
        LayerKey::ALL.into_iter().map(Self::builtin).collect()
    }

    /// Display fields, capped at four.
    #[inline]
    pub fn display_fields(&self) -> &[String] {
        &self.fields[..self.fields.len().min(MAX_DISPLAY_FIELDS)]
    }

    /// Display label of a field, falling back to the field name.
    pub fn label_of<'a>(&'a self, field: &'a str) -> &'a str {
        self.labels.get(field).map(String::as_str).unwrap_or(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_respect_field_cap() {
        for descriptor in LayerDescriptor::builtins() {
            assert!(descriptor.fields.len() <= MAX_DISPLAY_FIELDS, "{}", descriptor.key);
            for field in &descriptor.fields {
                assert!(descriptor.labels.contains_key(field));
            }
        }
    }

    #[test]
    fn every_layer_has_a_hierarchy_attribute() {
        for descriptor in LayerDescriptor::builtins() {
            assert_eq!(descriptor.hierarchy_field.as_deref(), Some("hierarquia"), "{}", descriptor.key);
        }
    }

    #[test]
    fn hierarchy_field_defaults_unless_nulled() {
        let mut json = serde_json::to_value(LayerDescriptor::builtin(LayerKey::Strata)).unwrap();
        json.as_object_mut().unwrap().remove("hierarchy_field");
        let defaulted: LayerDescriptor = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(defaulted.hierarchy_field.as_deref(), Some("hierarquia"));

        json["hierarchy_field"] = serde_json::Value::Null;
        let disabled: LayerDescriptor = serde_json::from_value(json).unwrap();
        assert_eq!(disabled.hierarchy_field, None);
    }

    #[test]
    fn label_falls_back_to_field_name() {
        let municipalities = LayerDescriptor::builtin(LayerKey::Municipalities);
        assert_eq!(municipalities.label_of("hierarquia"), "REGIC");
        assert_eq!(municipalities.label_of("area_km2"), "area_km2");
    }

    #[test]
    fn display_fields_are_capped() {
        let mut descriptor = LayerDescriptor::builtin(LayerKey::Strata);
        descriptor.fields = (0..6).map(|i| format!("f{i}")).collect();
        assert_eq!(descriptor.display_fields().len(), 4);
    }
}
