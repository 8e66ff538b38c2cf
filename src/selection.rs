use serde::{Deserialize, Serialize};

use crate::{error::ViewerError, region::Region};

/// The user's current filter choice. Read-only to every filter pass.
///
/// When both `state` and `region` are set, `state` wins for geographic scoping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    pub region: Option<Region>,
    pub state: Option<String>,
    pub hierarchy_code: Option<String>,
}

impl FilterSelection {
    /// Selection that passes every feature.
    pub fn empty() -> Self { Self::default() }

    /// Build a selection from raw dropdown values, where an empty string means "unset".
    pub fn from_controls(region: &str, state: &str, hierarchy_code: &str) -> Result<Self, ViewerError> {
        let region = match region.trim() {
            "" => None,
            name => Some(Region::parse(name).ok_or_else(|| ViewerError::UnknownRegion(name.to_string()))?),
        };

        let state = match state.trim() {
            "" => None,
            code if code.len() == 2 && code.chars().all(|c| c.is_ascii_alphabetic()) => {
                Some(code.to_ascii_uppercase())
            }
            code => return Err(ViewerError::InvalidSelection(format!("state code {code:?} is not two letters"))),
        };

        let hierarchy_code = Some(hierarchy_code.trim())
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        Ok(Self { region, state, hierarchy_code })
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.region.is_none() && self.state.is_none() && self.hierarchy_code.is_none()
    }

    /// Change the region, clearing a selected state that does not belong to it.
    pub fn with_region(&self, region: Option<Region>) -> Self {
        let state = match (region, &self.state) {
            (Some(r), Some(s)) if !r.contains(s) => None,
            (_, s) => s.clone(),
        };
        Self { region, state, hierarchy_code: self.hierarchy_code.clone() }
    }

    pub fn with_state(&self, state: Option<&str>) -> Self {
        let state = state.map(str::trim).filter(|s| !s.is_empty()).map(str::to_ascii_uppercase);
        Self { state, ..self.clone() }
    }

    pub fn with_hierarchy_code(&self, code: Option<&str>) -> Self {
        let hierarchy_code = code.map(str::trim).filter(|c| !c.is_empty()).map(str::to_string);
        Self { hierarchy_code, ..self.clone() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_controls_mean_unset() {
        let selection = FilterSelection::from_controls("", " ", "").unwrap();
        assert!(selection.is_empty());
    }

    #[test]
    fn controls_are_parsed() {
        let selection = FilterSelection::from_controls("Nordeste", "ce", "Capital Regional A").unwrap();
        assert_eq!(selection.region, Some(Region::Nordeste));
        assert_eq!(selection.state.as_deref(), Some("CE"));
        assert_eq!(selection.hierarchy_code.as_deref(), Some("Capital Regional A"));
    }

    #[test]
    fn bad_controls_are_rejected() {
        assert!(matches!(FilterSelection::from_controls("Oeste", "", ""), Err(ViewerError::UnknownRegion(_))));
        assert!(matches!(FilterSelection::from_controls("", "S'P", ""), Err(ViewerError::InvalidSelection(_))));
    }

    #[test]
    fn changing_region_drops_foreign_state() {
        let selection = FilterSelection::empty().with_state(Some("sp"));
        assert_eq!(selection.with_region(Some(Region::Sudeste)).state.as_deref(), Some("SP"));
        assert_eq!(selection.with_region(Some(Region::Sul)).state, None);
        assert_eq!(selection.with_region(None).state.as_deref(), Some("SP"));
    }

    #[test]
    fn blank_values_clear_the_axis() {
        for blank in ["", "  "] {
            let selection = FilterSelection::empty().with_state(Some("sp")).with_state(Some(blank));
            assert_eq!(selection.state, None);
            assert_eq!(FilterSelection::empty().with_hierarchy_code(Some(blank)).hierarchy_code, None);
        }
        assert_eq!(FilterSelection::empty().with_state(Some(" rj ")).state.as_deref(), Some("RJ"));

        let layer = crate::LayerDescriptor::builtin(crate::LayerKey::Municipalities);
        let attributes = serde_json::json!({ "sigla_uf": "SP" });
        let selection = FilterSelection::empty().with_state(Some(""));
        assert!(crate::passes(attributes.as_object().unwrap(), &layer, &selection));
    }
}
