//! # Frame Selection
//!
//! Chooses the timber stock profile for a door frame. The frame has to fill
//! the gap between the two surface skins exactly, so the required frame
//! thickness is
//!
//! ```text
//! required_thickness = T - 2 * (S + glue)
//! required_length    = H
//! ```
//!
//! Strategies are tried in a fixed order and the first one that yields any
//! candidate wins. There is no backtracking:
//!
//! 1. exact thickness, shortest sufficient length
//! 2. exact via flip (profile width == required), shortest sufficient length
//! 3. thicker stock planed down, thinnest then shortest
//! 4. thicker stock flipped and planed, thinnest then shortest
//! 5-8. the same four conditions with two lengths spliced end to end
//!
//! When nothing fits the result is [`FrameSelection::NoMatch`], which is a
//! normal outcome carrying guidance for the user, not an error.
//!
//! ## Example
//!
//! ```rust
//! use door_core::calculations::frame_selection::{select_frame, FrameSelectionInput};
//! use door_core::config::EngineConfig;
//! use door_core::materials::{FrameCatalog, TimberSpecies};
//!
//! let input = FrameSelectionInput {
//!     species: TimberSpecies::Rubberwood,
//!     door_thickness_mm: 40.0,
//!     surface_thickness_mm: 4.0,
//!     door_height_mm: 2000.0,
//! };
//! let selection = select_frame(&input, FrameCatalog::standard(), &EngineConfig::default());
//!
//! let frame = selection.selected().unwrap();
//! assert_eq!(frame.profile.thickness_mm, 32.0);
//! assert_eq!(frame.plane_amount_mm, 2.0);
//! ```

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EngineConfig;
use crate::door::{DoorSpec, MaterialSelection};
use crate::materials::timber::fmt_mm;
use crate::materials::{FrameCatalog, StockProfile, TimberSpecies};

/// Tolerance for comparing catalogue dimensions
const DIM_EPSILON_MM: f64 = 1e-6;

/// Inputs for frame selection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameSelectionInput {
    /// Catalogue key
    pub species: TimberSpecies,
    /// Door thickness T (mm)
    pub door_thickness_mm: f64,
    /// Surface skin thickness S (mm)
    pub surface_thickness_mm: f64,
    /// Door height H (mm)
    pub door_height_mm: f64,
}

impl FrameSelectionInput {
    /// Build from the door-level input structs
    pub fn from_door(species: TimberSpecies, door: &DoorSpec, material: &MaterialSelection) -> Self {
        Self {
            species,
            door_thickness_mm: door.thickness_mm,
            surface_thickness_mm: material.surface_thickness_mm,
            door_height_mm: door.height_mm,
        }
    }

    /// `T - 2 * (S + glue)`
    pub fn required_thickness_mm(&self, config: &EngineConfig) -> f64 {
        self.door_thickness_mm - 2.0 * (self.surface_thickness_mm + config.glue_thickness_mm)
    }

    /// The stiles run the full door height
    pub fn required_length_mm(&self) -> f64 {
        self.door_height_mm
    }
}

/// The strategy that produced a selection, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionStrategy {
    ExactThickness,
    ExactFlipped,
    Planed,
    PlanedFlipped,
    SplicedExactThickness,
    SplicedExactFlipped,
    SplicedPlaned,
    SplicedPlanedFlipped,
}

impl SelectionStrategy {
    /// All strategies in trial order
    pub const ORDER: [SelectionStrategy; 8] = [
        SelectionStrategy::ExactThickness,
        SelectionStrategy::ExactFlipped,
        SelectionStrategy::Planed,
        SelectionStrategy::PlanedFlipped,
        SelectionStrategy::SplicedExactThickness,
        SelectionStrategy::SplicedExactFlipped,
        SelectionStrategy::SplicedPlaned,
        SelectionStrategy::SplicedPlanedFlipped,
    ];

    /// Stock is used rotated 90 degrees
    pub fn is_flipped(&self) -> bool {
        matches!(
            self,
            SelectionStrategy::ExactFlipped
                | SelectionStrategy::PlanedFlipped
                | SelectionStrategy::SplicedExactFlipped
                | SelectionStrategy::SplicedPlanedFlipped
        )
    }

    /// Stock is thicker than required and gets planed
    pub fn is_planed(&self) -> bool {
        matches!(
            self,
            SelectionStrategy::Planed
                | SelectionStrategy::PlanedFlipped
                | SelectionStrategy::SplicedPlaned
                | SelectionStrategy::SplicedPlanedFlipped
        )
    }

    /// Two stock lengths are spliced
    pub fn is_spliced(&self) -> bool {
        matches!(
            self,
            SelectionStrategy::SplicedExactThickness
                | SelectionStrategy::SplicedExactFlipped
                | SelectionStrategy::SplicedPlaned
                | SelectionStrategy::SplicedPlanedFlipped
        )
    }

    /// Profile dimension that becomes the frame thickness
    fn face_mm(&self, profile: &StockProfile) -> f64 {
        if self.is_flipped() {
            profile.width_mm
        } else {
            profile.thickness_mm
        }
    }

    /// Profile dimension that becomes the frame width
    fn side_mm(&self, profile: &StockProfile) -> f64 {
        if self.is_flipped() {
            profile.thickness_mm
        } else {
            profile.width_mm
        }
    }

    fn fits_thickness(&self, profile: &StockProfile, required_mm: f64) -> bool {
        let face = self.face_mm(profile);
        if self.is_planed() {
            face > required_mm + DIM_EPSILON_MM
        } else {
            (face - required_mm).abs() <= DIM_EPSILON_MM
        }
    }

    /// Candidate order: shortest first for single lengths, longest first
    /// for splices; planed candidates prefer the least planing.
    fn compare(&self, a: &StockProfile, b: &StockProfile) -> Ordering {
        let by_face = || self.face_mm(a).total_cmp(&self.face_mm(b));
        if self.is_spliced() {
            b.length_mm.total_cmp(&a.length_mm).then_with(by_face)
        } else if self.is_planed() {
            by_face().then(a.length_mm.total_cmp(&b.length_mm))
        } else {
            a.length_mm.total_cmp(&b.length_mm)
        }
    }

    /// Run this strategy over the catalogue. Returns the chosen profile and
    /// the remaining viable candidates in preference order.
    fn candidates<'a>(
        &self,
        profiles: &'a [StockProfile],
        required_thickness_mm: f64,
        required_length_mm: f64,
        splice_overlap_mm: f64,
    ) -> Vec<&'a StockProfile> {
        let mut candidates: Vec<&StockProfile> = profiles
            .iter()
            .filter(|p| self.fits_thickness(p, required_thickness_mm))
            .filter(|p| {
                let usable = if self.is_spliced() {
                    spliced_length(p.length_mm, splice_overlap_mm)
                } else {
                    p.length_mm
                };
                usable + DIM_EPSILON_MM >= required_length_mm
            })
            .collect();
        candidates.sort_by(|a, b| self.compare(a, b));
        candidates
    }
}

/// Effective length of two spliced stock lengths
pub fn spliced_length(length_mm: f64, overlap_mm: f64) -> f64 {
    2.0 * length_mm - overlap_mm
}

/// Splice metadata for a spliced frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpliceInfo {
    /// Stock lengths joined per member
    pub count: u32,
    /// Overlap at the joint (mm)
    pub overlap_mm: f64,
    /// `2 * length - overlap` (mm)
    pub effective_length_mm: f64,
    /// Joint position from the member end (mm)
    pub position_mm: f64,
}

/// A successful frame selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedFrame {
    /// Strategy that produced this selection
    pub strategy: SelectionStrategy,
    /// Chosen catalogue profile
    pub profile: StockProfile,
    /// `T - 2 * (S + glue)` (mm)
    pub required_thickness_mm: f64,
    /// Door height (mm)
    pub required_length_mm: f64,
    /// Stock rotated 90 degrees
    pub is_flipped: bool,
    /// Material planed off the facing dimension (mm)
    pub plane_amount_mm: f64,
    /// Two lengths spliced to reach the required length
    pub need_splice: bool,
    /// Splice details when `need_splice`
    pub splice: Option<SpliceInfo>,
    /// Frame thickness after flip/plane (mm)
    pub use_thickness_mm: f64,
    /// Frame face width after flip (mm)
    pub use_width_mm: f64,
    /// Label such as "30x70x2040 (plane 2mm)"
    pub display_size: String,
    /// Other profiles the winning strategy would also accept
    pub alternatives: Vec<String>,
}

/// An unsuccessful frame search with guidance for the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoMatch {
    /// `T - 2 * (S + glue)` (mm)
    pub required_thickness_mm: f64,
    /// Door height (mm)
    pub required_length_mm: f64,
    /// Longest single stock thick enough in either orientation (mm)
    pub max_single_length_mm: f64,
    /// Longest spliced length from that stock (mm)
    pub max_spliced_length_mm: f64,
    /// Why nothing matched
    pub reason: String,
}

/// Outcome of frame selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FrameSelection {
    Selected(SelectedFrame),
    NoMatch(NoMatch),
}

impl FrameSelection {
    /// The selected frame, if any
    pub fn selected(&self) -> Option<&SelectedFrame> {
        match self {
            FrameSelection::Selected(frame) => Some(frame),
            FrameSelection::NoMatch(_) => None,
        }
    }

    /// True when a profile was found
    pub fn is_match(&self) -> bool {
        self.selected().is_some()
    }

    /// Frame thickness R in use (0 without a match)
    pub fn use_thickness_mm(&self) -> f64 {
        self.selected().map_or(0.0, |f| f.use_thickness_mm)
    }

    /// Frame face width F in use (0 without a match)
    pub fn use_width_mm(&self) -> f64 {
        self.selected().map_or(0.0, |f| f.use_width_mm)
    }

    /// Length of one stock bar (0 without a match)
    pub fn stock_length_mm(&self) -> f64 {
        self.selected().map_or(0.0, |f| f.profile.length_mm)
    }

    /// Whether members longer than a stock bar are spliced
    pub fn need_splice(&self) -> bool {
        self.selected().is_some_and(|f| f.need_splice)
    }
}

/// Select a frame profile for the door.
///
/// Never fails: degenerate input or an exhausted catalogue produce
/// [`FrameSelection::NoMatch`].
pub fn select_frame(
    input: &FrameSelectionInput,
    catalog: &FrameCatalog,
    config: &EngineConfig,
) -> FrameSelection {
    let required_thickness = input.required_thickness_mm(config);
    let required_length = input.required_length_mm();
    let profiles = catalog.profiles(input.species);

    if required_thickness <= 0.0 || required_length <= 0.0 {
        return no_match(
            required_thickness,
            required_length,
            0.0,
            0.0,
            "Door dimensions are incomplete; enter thickness, height and surface material",
        );
    }
    if profiles.is_empty() {
        return no_match(
            required_thickness,
            required_length,
            0.0,
            0.0,
            format!("No stock profiles are catalogued for {}", input.species),
        );
    }

    let overlap = config.splice_overlap_mm;
    let found = SelectionStrategy::ORDER.iter().find_map(|strategy| {
        let candidates = strategy.candidates(profiles, required_thickness, required_length, overlap);
        let (chosen, rest) = candidates.split_first()?;
        Some(build_selection(
            *strategy,
            chosen,
            rest,
            required_thickness,
            required_length,
            overlap,
        ))
    });

    match found {
        Some(frame) => {
            debug!(
                strategy = ?frame.strategy,
                code = %frame.profile.code,
                plane_mm = frame.plane_amount_mm,
                splice = frame.need_splice,
                "frame profile selected"
            );
            FrameSelection::Selected(frame)
        }
        None => exhausted(input.species, profiles, required_thickness, required_length, overlap),
    }
}

fn build_selection(
    strategy: SelectionStrategy,
    profile: &StockProfile,
    rest: &[&StockProfile],
    required_thickness: f64,
    required_length: f64,
    overlap: f64,
) -> SelectedFrame {
    let plane_amount = if strategy.is_planed() {
        strategy.face_mm(profile) - required_thickness
    } else {
        0.0
    };
    let use_thickness = strategy.face_mm(profile) - plane_amount;
    let use_width = strategy.side_mm(profile);

    let splice = strategy.is_spliced().then(|| SpliceInfo {
        count: 2,
        overlap_mm: overlap,
        effective_length_mm: spliced_length(profile.length_mm, overlap),
        position_mm: (required_length / 2.0).round(),
    });

    let mut notes = Vec::new();
    if strategy.is_flipped() {
        notes.push("flipped".to_string());
    }
    if plane_amount > 0.0 {
        notes.push(format!("plane {}mm", fmt_mm(plane_amount)));
    }
    if splice.is_some() {
        notes.push(format!("splice 2x{}", fmt_mm(profile.length_mm)));
    }
    let base = format!(
        "{}x{}x{}",
        fmt_mm(use_thickness),
        fmt_mm(use_width),
        fmt_mm(profile.length_mm)
    );
    let display_size = if notes.is_empty() {
        base
    } else {
        format!("{} ({})", base, notes.join(", "))
    };

    SelectedFrame {
        strategy,
        profile: profile.clone(),
        required_thickness_mm: required_thickness,
        required_length_mm: required_length,
        is_flipped: strategy.is_flipped(),
        plane_amount_mm: plane_amount,
        need_splice: splice.is_some(),
        splice,
        use_thickness_mm: use_thickness,
        use_width_mm: use_width,
        display_size,
        alternatives: rest.iter().map(|p| p.code.clone()).collect(),
    }
}

fn exhausted(
    species: TimberSpecies,
    profiles: &[StockProfile],
    required_thickness: f64,
    required_length: f64,
    overlap: f64,
) -> FrameSelection {
    let max_single = profiles
        .iter()
        .filter(|p| {
            p.thickness_mm + DIM_EPSILON_MM >= required_thickness
                || p.width_mm + DIM_EPSILON_MM >= required_thickness
        })
        .map(|p| p.length_mm)
        .fold(0.0_f64, f64::max);

    if max_single <= 0.0 {
        let thickest = profiles
            .iter()
            .map(|p| p.thickness_mm.max(p.width_mm))
            .fold(0.0_f64, f64::max);
        return no_match(
            required_thickness,
            required_length,
            0.0,
            0.0,
            format!(
                "No {} stock reaches the required {}mm frame thickness (largest dimension {}mm)",
                species,
                fmt_mm(required_thickness),
                fmt_mm(thickest)
            ),
        );
    }

    let max_spliced = spliced_length(max_single, overlap);
    no_match(
        required_thickness,
        required_length,
        max_single,
        max_spliced,
        format!(
            "Door height {}mm exceeds the longest {} stock ({}mm single, {}mm spliced)",
            fmt_mm(required_length),
            species,
            fmt_mm(max_single),
            fmt_mm(max_spliced)
        ),
    )
}

fn no_match(
    required_thickness: f64,
    required_length: f64,
    max_single: f64,
    max_spliced: f64,
    reason: impl Into<String>,
) -> FrameSelection {
    let reason = reason.into();
    debug!(%reason, "no frame profile matched");
    FrameSelection::NoMatch(NoMatch {
        required_thickness_mm: required_thickness,
        required_length_mm: required_length,
        max_single_length_mm: max_single,
        max_spliced_length_mm: max_spliced,
        reason,
    })
}
