//! Core (Infill) Materials
//!
//! Six fixed core types fill the door between frame and skins. Solid types
//! are laid as whole sheets; strip types are laid as vertical strips of a
//! nominal thickness at a nominal spacing.
//!
//! | Key               | Kind   | Layout                  | Dam rails |
//! |-------------------|--------|-------------------------|-----------|
//! | `foam`            | solid  | full panel              | no        |
//! | `particle_solid`  | solid  | full panel              | no        |
//! | `honeycomb`       | solid  | full panel              | no        |
//! | `rockwool`        | solid  | rows between rails      | yes       |
//! | `plywood_strips`  | strips | fitted strips in rows   | yes       |
//! | `particle_strips` | strips | fixed-pitch strips+dams | no        |

use serde::{Deserialize, Serialize};

use crate::errors::{DoorError, DoorResult};

/// Core type catalogue key
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CoreType {
    /// Solid foam sheet
    #[default]
    Foam,
    /// Solid particle board sheet
    ParticleSolid,
    /// Rockwool slabs
    Rockwool,
    /// Paper honeycomb
    Honeycomb,
    /// Plywood strips on edge
    PlywoodStrips,
    /// Particle board strips with horizontal dam strips
    ParticleStrips,
}

/// Whether a core is laid as sheets or strips
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoreKind {
    Solid,
    Strips,
}

impl CoreKind {
    pub fn code(&self) -> &'static str {
        match self {
            CoreKind::Solid => "solid",
            CoreKind::Strips => "strips",
        }
    }
}

/// How the core layout engine subdivides the panel interior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoreLayoutStyle {
    /// One sheet over the whole inner area, cut only around the lock blocks
    FullPanel,
    /// One sheet per row between rail bands
    RowSegmented,
    /// Vertical strips with the column count fitted to the inner width
    FittedStrips,
    /// Vertical strips at a fixed pitch plus horizontal dam strips at each rail
    FixedPitchStrips,
}

impl CoreType {
    /// All core types for UI selection
    pub const ALL: [CoreType; 6] = [
        CoreType::Foam,
        CoreType::ParticleSolid,
        CoreType::Rockwool,
        CoreType::Honeycomb,
        CoreType::PlywoodStrips,
        CoreType::ParticleStrips,
    ];

    /// Catalogue key (e.g., "plywood_strips")
    pub fn code(&self) -> &'static str {
        match self {
            CoreType::Foam => "foam",
            CoreType::ParticleSolid => "particle_solid",
            CoreType::Rockwool => "rockwool",
            CoreType::Honeycomb => "honeycomb",
            CoreType::PlywoodStrips => "plywood_strips",
            CoreType::ParticleStrips => "particle_strips",
        }
    }

    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> DoorResult<Self> {
        match s.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "foam" | "eps" => Ok(CoreType::Foam),
            "particle_solid" | "particle_board" | "particleboard" => Ok(CoreType::ParticleSolid),
            "rockwool" | "rock_wool" => Ok(CoreType::Rockwool),
            "honeycomb" | "paper_honeycomb" => Ok(CoreType::Honeycomb),
            "plywood_strips" | "plywood_strip" => Ok(CoreType::PlywoodStrips),
            "particle_strips" | "particle_strip" => Ok(CoreType::ParticleStrips),
            _ => Err(DoorError::unknown_core_type(s)),
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            CoreType::Foam => "Foam",
            CoreType::ParticleSolid => "Particle Board (solid)",
            CoreType::Rockwool => "Rockwool",
            CoreType::Honeycomb => "Honeycomb",
            CoreType::PlywoodStrips => "Plywood Strips",
            CoreType::ParticleStrips => "Particle Board Strips",
        }
    }

    /// Layout style used by the core layout engine
    pub fn layout_style(&self) -> CoreLayoutStyle {
        match self {
            CoreType::Foam | CoreType::ParticleSolid | CoreType::Honeycomb => {
                CoreLayoutStyle::FullPanel
            }
            CoreType::Rockwool => CoreLayoutStyle::RowSegmented,
            CoreType::PlywoodStrips => CoreLayoutStyle::FittedStrips,
            CoreType::ParticleStrips => CoreLayoutStyle::FixedPitchStrips,
        }
    }

    /// Sheet or strips, fixed by the layout style
    pub fn kind(&self) -> CoreKind {
        match self.layout_style() {
            CoreLayoutStyle::FullPanel | CoreLayoutStyle::RowSegmented => CoreKind::Solid,
            CoreLayoutStyle::FittedStrips | CoreLayoutStyle::FixedPitchStrips => CoreKind::Strips,
        }
    }

    /// Core types that carry no interior dam rails in the frame.
    pub fn is_no_rail(&self) -> bool {
        matches!(
            self,
            CoreType::Foam | CoreType::ParticleSolid | CoreType::Honeycomb | CoreType::ParticleStrips
        )
    }

    /// Factory-default catalogue entry
    pub fn default_spec(&self) -> CoreSpec {
        match self {
            CoreType::Foam | CoreType::ParticleSolid | CoreType::Rockwool | CoreType::Honeycomb => {
                CoreSpec::solid()
            }
            CoreType::PlywoodStrips => CoreSpec::strips(4.0, 40.0),
            CoreType::ParticleStrips => CoreSpec::strips(12.0, 60.0),
        }
    }
}

impl std::fmt::Display for CoreType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Catalogue entry for one core type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoreSpec {
    /// Sheet or strips
    pub kind: CoreKind,
    /// Nominal strip thickness in mm (0 for solid)
    pub thickness_mm: f64,
    /// Nominal clear spacing between strips in mm (0 for solid)
    pub spacing_mm: f64,
}

impl CoreSpec {
    /// Thinnest strip the layout engine will lay (mm)
    pub const MIN_STRIP_THICKNESS_MM: f64 = 1.0;

    /// A solid sheet core
    pub fn solid() -> Self {
        Self {
            kind: CoreKind::Solid,
            thickness_mm: 0.0,
            spacing_mm: 0.0,
        }
    }

    /// A strip core with nominal strip thickness and spacing
    pub fn strips(thickness_mm: f64, spacing_mm: f64) -> Self {
        Self {
            kind: CoreKind::Strips,
            thickness_mm,
            spacing_mm,
        }
    }

    /// Whether the strips can be laid: finite sizes, at least
    /// [`Self::MIN_STRIP_THICKNESS_MM`] thick with non-negative spacing.
    pub fn has_usable_strips(&self) -> bool {
        self.thickness_mm.is_finite()
            && self.thickness_mm >= Self::MIN_STRIP_THICKNESS_MM
            && self.spacing_mm.is_finite()
            && self.spacing_mm >= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_rail_tagging() {
        assert!(CoreType::Foam.is_no_rail());
        assert!(CoreType::ParticleSolid.is_no_rail());
        assert!(CoreType::Honeycomb.is_no_rail());
        assert!(CoreType::ParticleStrips.is_no_rail());
        assert!(!CoreType::Rockwool.is_no_rail());
        assert!(!CoreType::PlywoodStrips.is_no_rail());
    }

    #[test]
    fn test_default_specs_match_kind() {
        for core in CoreType::ALL {
            let spec = core.default_spec();
            match core.layout_style() {
                CoreLayoutStyle::FullPanel | CoreLayoutStyle::RowSegmented => {
                    assert_eq!(spec.kind, CoreKind::Solid)
                }
                _ => {
                    assert_eq!(spec.kind, CoreKind::Strips);
                    assert!(spec.thickness_mm > 0.0);
                }
            }
        }
    }

    #[test]
    fn test_kind_follows_layout_style() {
        for core in CoreType::ALL {
            assert_eq!(core.default_spec().kind, core.kind());
        }
        assert_eq!(CoreType::Rockwool.kind(), CoreKind::Solid);
        assert_eq!(CoreType::ParticleStrips.kind(), CoreKind::Strips);
    }

    #[test]
    fn test_usable_strip_sizes() {
        assert!(CoreSpec::strips(4.0, 40.0).has_usable_strips());
        assert!(CoreSpec::strips(1.0, 0.0).has_usable_strips());
        assert!(!CoreSpec::strips(0.0, 40.0).has_usable_strips());
        assert!(!CoreSpec::strips(1e-9, 40.0).has_usable_strips());
        assert!(!CoreSpec::strips(4.0, -1.0).has_usable_strips());
        assert!(!CoreSpec::strips(f64::NAN, 40.0).has_usable_strips());
        assert!(!CoreSpec::solid().has_usable_strips());
    }

    #[test]
    fn test_core_type_parsing() {
        assert_eq!(
            CoreType::from_str_flexible("Plywood Strips").unwrap(),
            CoreType::PlywoodStrips
        );
        assert_eq!(
            CoreType::from_str_flexible("particle-solid").unwrap(),
            CoreType::ParticleSolid
        );
        assert!(CoreType::from_str_flexible("cork").is_err());
    }

    #[test]
    fn test_core_type_serialization() {
        let json = serde_json::to_string(&CoreType::ParticleStrips).unwrap();
        assert_eq!(json, "\"particle_strips\"");
    }
}
