use serde::{Deserialize, Serialize};

/// Path/marker style handed to the renderer. Field names follow the mapping library's option names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerStyle {
    pub color: String,
    pub weight: f64,
    pub opacity: f64,
    pub fill_color: String,
    pub fill_opacity: f64,
    /// Circle marker radius, for point layers only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
}

impl LayerStyle {
    pub fn polygon(color: &str, weight: f64, fill_color: &str, fill_opacity: f64) -> Self {
        Self {
            color: color.to_string(),
            weight,
            opacity: 1.0,
            fill_color: fill_color.to_string(),
            fill_opacity,
            radius: None,
        }
    }

    pub fn point(radius: f64, color: &str, fill_color: &str) -> Self {
        Self {
            color: color.to_string(),
            weight: 1.0,
            opacity: 1.0,
            fill_color: fill_color.to_string(),
            fill_opacity: 0.9,
            radius: Some(radius),
        }
    }

    /// Hover variant: heavier outline, denser fill, same fill colour.
    pub fn hover(&self) -> Self {
        Self {
            color: "#111111".to_string(),
            weight: 2.0,
            opacity: 1.0,
            fill_opacity: 0.55,
            ..self.clone()
        }
    }

    /// Colour shown in the legend swatch. Outline-only layers use the stroke colour.
    pub fn swatch(&self) -> &str {
        if self.fill_opacity > 0.0 { &self.fill_color } else { &self.color }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outline_only_swatch_uses_stroke() {
        let outline = LayerStyle::polygon("#222222", 1.2, "#000000", 0.0);
        assert_eq!(outline.swatch(), "#222222");
        let filled = LayerStyle::polygon("#2E86C1", 1.0, "#5DADE2", 0.25);
        assert_eq!(filled.swatch(), "#5DADE2");
    }

    #[test]
    fn hover_keeps_fill_colour() {
        let base = LayerStyle::polygon("#B03A2E", 1.0, "#E74C3C", 0.35);
        let hover = base.hover();
        assert_eq!(hover.fill_color, "#E74C3C");
        assert_eq!(hover.weight, 2.0);
    }

    #[test]
    fn serializes_with_renderer_option_names() {
        let json = serde_json::to_value(LayerStyle::point(5.0, "#7D3C98", "#AF7AC5")).unwrap();
        assert_eq!(json["fillColor"], "#AF7AC5");
        assert_eq!(json["radius"], 5.0);
    }
}
