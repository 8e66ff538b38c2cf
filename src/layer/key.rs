use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identity of one logical overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKey {
    Municipalities,       // Polygons, carries the hierarchy attribute
    Strata,               // Geographic strata polygons
    InformalSettlements,  // Favelas / communities polygons
    HousingProgramPoints, // Housing program points
}

impl LayerKey {
    /// Layers in draw and panel order.
    pub const ALL: [LayerKey; 4] = [
        LayerKey::Municipalities,
        LayerKey::Strata,
        LayerKey::InformalSettlements,
        LayerKey::HousingProgramPoints,
    ];

    pub fn to_str(&self) -> &'static str {
        match self {
            LayerKey::Municipalities => "municipalities",
            LayerKey::Strata => "strata",
            LayerKey::InformalSettlements => "informal_settlements",
            LayerKey::HousingProgramPoints => "housing_program_points",
        }
    }

    pub fn from_str(key: &str) -> Option<LayerKey> {
        LayerKey::ALL.into_iter().find(|k| k.to_str() == key.trim())
    }
}

impl fmt::Display for LayerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}
