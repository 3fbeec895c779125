//! Timber Stock Profiles
//!
//! The frame catalogue: for each timber species, the stock profiles the
//! factory buys (nominal thickness x width x length in millimetres).
//!
//! The catalogue is reference data. A built-in standard catalogue is
//! provided, and deployments can load their own from TOML or JSON via
//! [`crate::file_io::load_catalog`].
//!
//! ## TOML Example
//!
//! ```toml
//! [[rubberwood]]
//! code = "RW-32070-2040"
//! description = "Rubberwood finger-joint 32x70"
//! thickness_mm = 32.0
//! width_mm = 70.0
//! length_mm = 2040.0
//! ```

use std::collections::{BTreeMap, HashSet};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::{DoorError, DoorResult};

/// Timber species used for door frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimberSpecies {
    /// Rubberwood (finger-jointed)
    Rubberwood,
    /// Sadao (neem)
    Sadao,
    /// Laminated Veneer Lumber
    Lvl,
}

impl TimberSpecies {
    /// All species for UI selection
    pub const ALL: [TimberSpecies; 3] = [
        TimberSpecies::Rubberwood,
        TimberSpecies::Sadao,
        TimberSpecies::Lvl,
    ];

    /// Catalogue key (e.g., "rubberwood")
    pub fn code(&self) -> &'static str {
        match self {
            TimberSpecies::Rubberwood => "rubberwood",
            TimberSpecies::Sadao => "sadao",
            TimberSpecies::Lvl => "lvl",
        }
    }

    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> DoorResult<Self> {
        match s.trim().to_lowercase().replace([' ', '_', '-'], "").as_str() {
            "rubberwood" | "rw" | "para" => Ok(TimberSpecies::Rubberwood),
            "sadao" | "sd" | "neem" => Ok(TimberSpecies::Sadao),
            "lvl" | "laminatedveneerlumber" => Ok(TimberSpecies::Lvl),
            _ => Err(DoorError::unknown_species(s)),
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            TimberSpecies::Rubberwood => "Rubberwood",
            TimberSpecies::Sadao => "Sadao",
            TimberSpecies::Lvl => "LVL",
        }
    }
}

impl std::fmt::Display for TimberSpecies {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// One purchasable timber stock profile. Immutable catalogue entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockProfile {
    /// Catalogue code (e.g., "RW-32070-2040")
    pub code: String,
    /// Human-readable description
    pub description: String,
    /// Nominal thickness in mm
    pub thickness_mm: f64,
    /// Nominal width in mm
    pub width_mm: f64,
    /// Stock length in mm
    pub length_mm: f64,
}

impl StockProfile {
    /// Create a new profile
    pub fn new(
        code: impl Into<String>,
        description: impl Into<String>,
        thickness_mm: f64,
        width_mm: f64,
        length_mm: f64,
    ) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
            thickness_mm,
            width_mm,
            length_mm,
        }
    }

    /// Nominal size label (e.g., "32x70x2040")
    pub fn size_label(&self) -> String {
        format!(
            "{}x{}x{}",
            fmt_mm(self.thickness_mm),
            fmt_mm(self.width_mm),
            fmt_mm(self.length_mm)
        )
    }
}

/// Format a millimetre value without a trailing ".0"
pub(crate) fn fmt_mm(value: f64) -> String {
    if (value - value.round()).abs() < 1e-9 {
        format!("{}", value.round() as i64)
    } else {
        format!("{:.1}", value)
    }
}

/// Stock profiles keyed by species
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrameCatalog {
    profiles: BTreeMap<TimberSpecies, Vec<StockProfile>>,
}

impl FrameCatalog {
    /// Build a catalogue from explicit entries
    pub fn new(profiles: BTreeMap<TimberSpecies, Vec<StockProfile>>) -> Self {
        Self { profiles }
    }

    /// The built-in factory catalogue
    pub fn standard() -> &'static FrameCatalog {
        &STANDARD_CATALOG
    }

    /// Profiles for one species (empty when the species is not stocked)
    pub fn profiles(&self, species: TimberSpecies) -> &[StockProfile] {
        self.profiles
            .get(&species)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Replace or add the profiles of one species
    pub fn with_species(mut self, species: TimberSpecies, profiles: Vec<StockProfile>) -> Self {
        self.profiles.insert(species, profiles);
        self
    }

    /// Species present in the catalogue
    pub fn species(&self) -> impl Iterator<Item = TimberSpecies> + '_ {
        self.profiles.keys().copied()
    }

    /// Check every profile has positive finite dimensions and a unique code.
    pub fn validate(&self) -> DoorResult<()> {
        let mut seen = HashSet::new();
        for profile in self.profiles.values().flatten() {
            for (field, value) in [
                ("thickness_mm", profile.thickness_mm),
                ("width_mm", profile.width_mm),
                ("length_mm", profile.length_mm),
            ] {
                if !value.is_finite() || value <= 0.0 {
                    return Err(DoorError::invalid_input(
                        format!("{}.{}", profile.code, field),
                        value.to_string(),
                        "Profile dimensions must be positive",
                    ));
                }
            }
            if !seen.insert(profile.code.as_str()) {
                return Err(DoorError::invalid_input(
                    "code",
                    profile.code.clone(),
                    "Duplicate profile code",
                ));
            }
        }
        Ok(())
    }
}

static STANDARD_CATALOG: Lazy<FrameCatalog> = Lazy::new(|| {
    let mut profiles = BTreeMap::new();
    profiles.insert(
        TimberSpecies::Rubberwood,
        vec![
            StockProfile::new("RW-26070-2040", "Rubberwood finger-joint 26x70", 26.0, 70.0, 2040.0),
            StockProfile::new("RW-28070-2040", "Rubberwood finger-joint 28x70", 28.0, 70.0, 2040.0),
            StockProfile::new("RW-32070-2040", "Rubberwood finger-joint 32x70", 32.0, 70.0, 2040.0),
            StockProfile::new("RW-32100-2500", "Rubberwood finger-joint 32x100", 32.0, 100.0, 2500.0),
        ],
    );
    profiles.insert(
        TimberSpecies::Sadao,
        vec![
            StockProfile::new("SD-30070-2000", "Sadao 30x70", 30.0, 70.0, 2000.0),
            StockProfile::new("SD-30070-2500", "Sadao 30x70 long", 30.0, 70.0, 2500.0),
            StockProfile::new("SD-35080-2500", "Sadao 35x80", 35.0, 80.0, 2500.0),
            StockProfile::new("SD-45090-3000", "Sadao 45x90", 45.0, 90.0, 3000.0),
        ],
    );
    profiles.insert(
        TimberSpecies::Lvl,
        vec![
            StockProfile::new("LVL-28034-2440", "LVL 28x34", 28.0, 34.0, 2440.0),
            StockProfile::new("LVL-32034-2440", "LVL 32x34", 32.0, 34.0, 2440.0),
            StockProfile::new("LVL-34045-3050", "LVL 34x45", 34.0, 45.0, 3050.0),
        ],
    );
    FrameCatalog { profiles }
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_species_parsing() {
        assert_eq!(
            TimberSpecies::from_str_flexible("Rubber Wood").unwrap(),
            TimberSpecies::Rubberwood
        );
        assert_eq!(TimberSpecies::from_str_flexible("LVL").unwrap(), TimberSpecies::Lvl);
        assert!(TimberSpecies::from_str_flexible("oak").is_err());
    }

    #[test]
    fn test_species_serialization() {
        let json = serde_json::to_string(&TimberSpecies::Sadao).unwrap();
        assert_eq!(json, "\"sadao\"");
    }

    #[test]
    fn test_standard_catalog_is_valid() {
        let catalog = FrameCatalog::standard();
        catalog.validate().unwrap();
        for species in TimberSpecies::ALL {
            assert!(!catalog.profiles(species).is_empty());
        }
    }

    #[test]
    fn test_rubberwood_has_no_30mm_stock() {
        let catalog = FrameCatalog::standard();
        let thicknesses: Vec<f64> = catalog
            .profiles(TimberSpecies::Rubberwood)
            .iter()
            .map(|p| p.thickness_mm)
            .collect();
        assert!(thicknesses.contains(&26.0));
        assert!(thicknesses.contains(&28.0));
        assert!(thicknesses.contains(&32.0));
        assert!(!thicknesses.contains(&30.0));
    }

    #[test]
    fn test_duplicate_code_rejected() {
        let p = StockProfile::new("X-1", "dup", 30.0, 70.0, 2000.0);
        let catalog = FrameCatalog::default()
            .with_species(TimberSpecies::Sadao, vec![p.clone(), p]);
        assert!(catalog.validate().is_err());
    }

    #[test]
    fn test_non_positive_dimension_rejected() {
        let catalog = FrameCatalog::default().with_species(
            TimberSpecies::Lvl,
            vec![StockProfile::new("L-0", "bad", 0.0, 45.0, 2440.0)],
        );
        let err = catalog.validate().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_size_label() {
        let p = StockProfile::new("RW", "", 32.0, 70.0, 2040.0);
        assert_eq!(p.size_label(), "32x70x2040");
        assert_eq!(fmt_mm(12.5), "12.5");
    }

    #[test]
    fn test_catalog_json_roundtrip() {
        let catalog = FrameCatalog::standard().clone();
        let json = serde_json::to_string(&catalog).unwrap();
        assert!(json.contains("\"rubberwood\""));
        let roundtrip: FrameCatalog = serde_json::from_str(&json).unwrap();
        assert_eq!(catalog, roundtrip);
    }
}
