//! # Engine Configuration
//!
//! Every shop-floor constant the engine uses, gathered in one serialisable
//! struct so a deployment can tune them without a rebuild. Every field has a
//! serde default, so a config file only needs the values it overrides.
//!
//! ## TOML Example
//!
//! ```toml
//! saw_kerf_mm = 4.0
//! cut_allowance_mm = 8.0
//!
//! [core_types.plywood_strips]
//! kind = "strips"
//! thickness_mm = 6.0
//! spacing_mm = 50.0
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::{DoorError, DoorResult};
use crate::materials::{CoreKind, CoreSpec, CoreType};

/// Tunable constants for all four engine stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Glue layer between frame and each surface skin (mm)
    pub glue_thickness_mm: f64,

    /// Lock-block centre height above the door bottom (mm)
    pub lock_block_center_mm: f64,

    /// Lock-block height; also the fixed blank length (mm)
    pub lock_block_height_mm: f64,

    /// Clearance kept between rails and the lock-block zone (mm)
    pub lock_block_buffer_mm: f64,

    /// Extra length added to every cut piece except lock blocks (mm)
    pub cut_allowance_mm: f64,

    /// Material lost per saw cut (mm)
    pub saw_kerf_mm: f64,

    /// Overlap of two spliced stock lengths (mm)
    pub splice_overlap_mm: f64,

    /// Strip remainders shorter than this are dropped (mm)
    pub min_strip_remainder_mm: f64,

    /// Doors at least this tall get four rail sections instead of three (mm)
    pub tall_door_threshold_mm: f64,

    /// Core type catalogue
    pub core_types: BTreeMap<CoreType, CoreSpec>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            glue_thickness_mm: 1.0,
            lock_block_center_mm: 1000.0,
            lock_block_height_mm: 400.0,
            lock_block_buffer_mm: 50.0,
            cut_allowance_mm: 10.0,
            saw_kerf_mm: 5.0,
            splice_overlap_mm: 100.0,
            min_strip_remainder_mm: 5.0,
            tall_door_threshold_mm: 2400.0,
            core_types: default_core_types(),
        }
    }
}

fn default_core_types() -> BTreeMap<CoreType, CoreSpec> {
    CoreType::ALL
        .iter()
        .map(|core| (*core, core.default_spec()))
        .collect()
}

impl EngineConfig {
    /// Catalogue entry for a core type, falling back to the factory default
    /// when a config file omits it.
    pub fn core_spec(&self, core: CoreType) -> CoreSpec {
        self.core_types
            .get(&core)
            .copied()
            .unwrap_or_else(|| core.default_spec())
    }

    /// Number of rail sections for a door of the given height
    pub fn rail_sections(&self, height_mm: f64) -> usize {
        if height_mm >= self.tall_door_threshold_mm {
            4
        } else {
            3
        }
    }

    /// Validate all constants are finite and in range.
    pub fn validate(&self) -> DoorResult<()> {
        let non_negative = [
            ("glue_thickness_mm", self.glue_thickness_mm),
            ("lock_block_center_mm", self.lock_block_center_mm),
            ("lock_block_buffer_mm", self.lock_block_buffer_mm),
            ("cut_allowance_mm", self.cut_allowance_mm),
            ("saw_kerf_mm", self.saw_kerf_mm),
            ("splice_overlap_mm", self.splice_overlap_mm),
            ("min_strip_remainder_mm", self.min_strip_remainder_mm),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(DoorError::invalid_input(
                    field,
                    value.to_string(),
                    "Must be a finite, non-negative length",
                ));
            }
        }

        for (field, value) in [
            ("lock_block_height_mm", self.lock_block_height_mm),
            ("tall_door_threshold_mm", self.tall_door_threshold_mm),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(DoorError::invalid_input(
                    field,
                    value.to_string(),
                    "Must be a finite, positive length",
                ));
            }
        }

        for (core, spec) in &self.core_types {
            let field = format!("core_types.{}", core.code());
            if spec.kind != core.kind() {
                return Err(DoorError::invalid_input(
                    field,
                    spec.kind.code(),
                    format!("{} is always laid as {}", core.display_name(), core.kind().code()),
                ));
            }
            if core.kind() == CoreKind::Strips && !spec.has_usable_strips() {
                return Err(DoorError::invalid_input(
                    field,
                    format!("{}/{}", spec.thickness_mm, spec.spacing_mm),
                    format!(
                        "Strip cores need a thickness of at least {} mm and non-negative spacing",
                        CoreSpec::MIN_STRIP_THICKNESS_MM
                    ),
                ));
            }
        }
        Ok(())
    }

    /// Parse from a TOML document
    pub fn from_toml_str(s: &str) -> DoorResult<Self> {
        let config: EngineConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse from a JSON document
    pub fn from_json_str(s: &str) -> DoorResult<Self> {
        let config: EngineConfig = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.glue_thickness_mm, 1.0);
        assert_eq!(config.lock_block_center_mm, 1000.0);
        assert_eq!(config.lock_block_height_mm, 400.0);
        assert_eq!(config.cut_allowance_mm, 10.0);
        assert_eq!(config.saw_kerf_mm, 5.0);
        assert_eq!(config.splice_overlap_mm, 100.0);
        assert_eq!(config.min_strip_remainder_mm, 5.0);
        assert_eq!(config.core_types.len(), 6);
        config.validate().unwrap();
    }

    #[test]
    fn test_rail_sections_threshold() {
        let config = EngineConfig::default();
        assert_eq!(config.rail_sections(2399.0), 3);
        assert_eq!(config.rail_sections(2400.0), 4);
        assert_eq!(config.rail_sections(0.0), 3);
    }

    #[test]
    fn test_partial_toml_override() {
        let config = EngineConfig::from_toml_str(
            r#"
            saw_kerf_mm = 3.0

            [core_types.plywood_strips]
            kind = "strips"
            thickness_mm = 6.0
            spacing_mm = 50.0
            "#,
        )
        .unwrap();
        assert_eq!(config.saw_kerf_mm, 3.0);
        assert_eq!(config.cut_allowance_mm, 10.0);
        assert_eq!(config.core_spec(CoreType::PlywoodStrips).thickness_mm, 6.0);
        // Omitted entries fall back to factory defaults
        assert_eq!(config.core_spec(CoreType::ParticleStrips).thickness_mm, 12.0);
    }

    #[test]
    fn test_negative_kerf_rejected() {
        let err = EngineConfig::from_json_str(r#"{ "saw_kerf_mm": -1.0 }"#).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_zero_thickness_strip_rejected() {
        let mut config = EngineConfig::default();
        config
            .core_types
            .insert(CoreType::PlywoodStrips, CoreSpec::strips(0.0, 40.0));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_strip_sizes_checked_even_when_kind_says_solid() {
        let err = EngineConfig::from_toml_str(
            r#"
            [core_types.plywood_strips]
            kind = "solid"
            thickness_mm = 0.0
            spacing_mm = 40.0
            "#,
        )
        .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
        assert!(err.to_string().contains("core_types.plywood_strips"));
    }

    #[test]
    fn test_hairline_strip_thickness_rejected() {
        let mut config = EngineConfig::default();
        config
            .core_types
            .insert(CoreType::ParticleStrips, CoreSpec::strips(1e-9, 60.0));
        assert!(config.validate().is_err());

        config
            .core_types
            .insert(CoreType::ParticleStrips, CoreSpec::strips(1.0, 60.0));
        config.validate().unwrap();
    }

    #[test]
    fn test_strip_kind_on_sheet_core_rejected() {
        let mut config = EngineConfig::default();
        config
            .core_types
            .insert(CoreType::Foam, CoreSpec::strips(4.0, 40.0));
        let err = config.validate().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_malformed_toml_is_serialization_error() {
        let err = EngineConfig::from_toml_str("saw_kerf_mm = \"five\"").unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }
}
