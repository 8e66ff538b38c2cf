use std::fmt;

use serde::{Deserialize, Serialize};

use crate::common::normalize;

/// The five macro-regions, each owning a fixed, disjoint set of federative units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Region {
    Norte,
    Nordeste,
    #[serde(rename = "Centro-Oeste")]
    CentroOeste,
    Sudeste,
    Sul,
}

const NORTE: &[&str] = &["AC", "AP", "AM", "PA", "RO", "RR", "TO"];
const NORDESTE: &[&str] = &["AL", "BA", "CE", "MA", "PB", "PE", "PI", "RN", "SE"];
const CENTRO_OESTE: &[&str] = &["DF", "GO", "MS", "MT"];
const SUDESTE: &[&str] = &["ES", "MG", "RJ", "SP"];
const SUL: &[&str] = &["PR", "RS", "SC"];

/// All 27 federative unit codes, alphabetical.
pub const ALL_STATES: [&str; 27] = [
    "AC", "AL", "AM", "AP", "BA", "CE", "DF", "ES", "GO", "MA", "MG", "MS", "MT", "PA",
    "PB", "PE", "PI", "PR", "RJ", "RN", "RO", "RR", "RS", "SC", "SE", "SP", "TO",
];

impl Region {
    pub const ALL: [Region; 5] = [
        Region::Norte,
        Region::Nordeste,
        Region::CentroOeste,
        Region::Sudeste,
        Region::Sul,
    ];

    /// Display name as shown in the region dropdown.
    pub fn name(self) -> &'static str {
        match self {
            Region::Norte => "Norte",
            Region::Nordeste => "Nordeste",
            Region::CentroOeste => "Centro-Oeste",
            Region::Sudeste => "Sudeste",
            Region::Sul => "Sul",
        }
    }

    /// Parse a region name, ignoring case, accents and the hyphen in "Centro-Oeste".
    pub fn parse(name: &str) -> Option<Region> {
        let key = normalize(&name.replace('-', " "));
        Region::ALL.into_iter().find(|r| normalize(&r.name().replace('-', " ")) == key)
    }

    /// Member state codes, in table order.
    pub fn members(self) -> &'static [&'static str] {
        match self {
            Region::Norte => NORTE,
            Region::Nordeste => NORDESTE,
            Region::CentroOeste => CENTRO_OESTE,
            Region::Sudeste => SUDESTE,
            Region::Sul => SUL,
        }
    }

    #[inline]
    pub fn contains(self, state: &str) -> bool {
        self.members().iter().any(|s| s.eq_ignore_ascii_case(state))
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Member state codes of a region.
#[inline]
pub fn members_of(region: Region) -> &'static [&'static str] {
    region.members()
}

/// Member state codes of a region given by name; unknown names yield an empty set.
pub fn members_of_name(name: &str) -> &'static [&'static str] {
    Region::parse(name).map(Region::members).unwrap_or(&[])
}

/// The region a state code belongs to.
pub fn region_of(state: &str) -> Option<Region> {
    Region::ALL.into_iter().find(|r| r.contains(state.trim()))
}

/// State codes selectable under the given region (all of them when no region is set).
pub fn allowed_states(region: Option<Region>) -> Vec<&'static str> {
    match region {
        Some(r) => r.members().to_vec(),
        None => ALL_STATES.to_vec(),
    }
}
