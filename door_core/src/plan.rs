//! # Door BOM Plan
//!
//! Runs the whole engine for one door:
//!
//! ```text
//! DoorBomInput ──► select_frame ──► calculate_layout ──┬──► plan_cutting
//!                                                      └──► calculate_core_layout
//! ```
//!
//! Everything is recomputed from the input tuple; nothing is mutated in
//! place. Because a UI recomputes on every keystroke, [`PlanCache`]
//! memoises plans per unique input.
//!
//! ## Example
//!
//! ```rust
//! use door_core::config::EngineConfig;
//! use door_core::door::{DoorSpec, MaterialSelection};
//! use door_core::materials::{FrameCatalog, TimberSpecies};
//! use door_core::plan::{compute_plan, DoorBomInput};
//!
//! let input = DoorBomInput::new(
//!     TimberSpecies::Rubberwood,
//!     DoorSpec::new(40.0, 800.0, 2000.0),
//!     MaterialSelection::new(4.0),
//! );
//! let plan = compute_plan(&input, FrameCatalog::standard(), &EngineConfig::default());
//!
//! assert!(plan.selection.is_match());
//! assert_eq!(plan.layout.rail_count(), 2);
//! assert!(plan.cutting.total_bars > 0);
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::core_layout::{calculate_core_layout, CoreLayout};
use crate::calculations::cutting::{plan_cutting, CuttingPlan};
use crate::calculations::frame_selection::{select_frame, FrameSelection, FrameSelectionInput};
use crate::calculations::structure::{calculate_layout, StructuralLayout};
use crate::config::EngineConfig;
use crate::door::{DoorSpec, DoubleFrameConfig, LockBlockConfig, MaterialSelection};
use crate::materials::{CoreType, FrameCatalog, TimberSpecies};

/// The complete input tuple for one door.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DoorBomInput {
    /// Frame timber species (catalogue key)
    pub species: TimberSpecies,
    pub door: DoorSpec,
    pub material: MaterialSelection,
    #[serde(default)]
    pub lock_block: LockBlockConfig,
    #[serde(default)]
    pub double_frame: DoubleFrameConfig,
    #[serde(default)]
    pub core: CoreType,
}

impl DoorBomInput {
    /// Input with default lock block (one piece each side), no double frame
    /// and a foam core.
    pub fn new(species: TimberSpecies, door: DoorSpec, material: MaterialSelection) -> Self {
        Self {
            species,
            door,
            material,
            lock_block: LockBlockConfig::default(),
            double_frame: DoubleFrameConfig::default(),
            core: CoreType::default(),
        }
    }

    pub fn with_lock_block(mut self, lock_block: LockBlockConfig) -> Self {
        self.lock_block = lock_block;
        self
    }

    pub fn with_double_frame(mut self, double_frame: DoubleFrameConfig) -> Self {
        self.double_frame = double_frame;
        self
    }

    pub fn with_core(mut self, core: CoreType) -> Self {
        self.core = core;
        self
    }

    /// Copy with door and material dimensions normalised
    pub fn normalized(&self) -> Self {
        Self {
            door: self.door.normalized(),
            material: MaterialSelection::new(self.material.surface_thickness_mm),
            ..*self
        }
    }

    fn key(&self) -> PlanKey {
        let n = self.normalized();
        PlanKey {
            species: n.species,
            door_bits: [
                n.door.thickness_mm.to_bits(),
                n.door.width_mm.to_bits(),
                n.door.height_mm.to_bits(),
            ],
            surface_bits: n.material.surface_thickness_mm.to_bits(),
            lock_block: n.lock_block,
            double_frame: n.double_frame,
            core: n.core,
        }
    }
}

/// Hashable identity of a normalised input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct PlanKey {
    species: TimberSpecies,
    door_bits: [u64; 3],
    surface_bits: u64,
    lock_block: LockBlockConfig,
    double_frame: DoubleFrameConfig,
    core: CoreType,
}

/// Everything the door BOM view shows for one door.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoorBomPlan {
    /// Normalised input the plan was computed from
    pub input: DoorBomInput,
    pub selection: FrameSelection,
    pub layout: StructuralLayout,
    pub cutting: CuttingPlan,
    pub core_layout: CoreLayout,
}

/// Run the full engine for one door.
pub fn compute_plan(
    input: &DoorBomInput,
    catalog: &FrameCatalog,
    config: &EngineConfig,
) -> DoorBomPlan {
    let input = input.normalized();
    let selection = select_frame(
        &FrameSelectionInput::from_door(input.species, &input.door, &input.material),
        catalog,
        config,
    );
    let layout = calculate_layout(
        &input.door,
        &selection,
        &input.lock_block,
        &input.double_frame,
        config,
    );
    let cutting = plan_cutting(&layout, &selection, input.core, config);
    let core_layout = calculate_core_layout(&layout, input.core, config);

    DoorBomPlan {
        input,
        selection,
        layout,
        cutting,
        core_layout,
    }
}

/// Memoises plans per unique input for one catalogue and config.
///
/// When the cache reaches capacity it is cleared; recomputation is cheap.
#[derive(Debug)]
pub struct PlanCache {
    catalog: FrameCatalog,
    config: EngineConfig,
    entries: HashMap<PlanKey, Arc<DoorBomPlan>>,
    capacity: usize,
    hits: u64,
    misses: u64,
}

impl PlanCache {
    /// Default number of cached plans
    pub const DEFAULT_CAPACITY: usize = 256;

    pub fn new(catalog: FrameCatalog, config: EngineConfig) -> Self {
        Self::with_capacity(catalog, config, Self::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(catalog: FrameCatalog, config: EngineConfig, capacity: usize) -> Self {
        Self {
            catalog,
            config,
            entries: HashMap::new(),
            capacity: capacity.max(1),
            hits: 0,
            misses: 0,
        }
    }

    /// Cached plan for the input, computing it on first request.
    pub fn get_or_compute(&mut self, input: &DoorBomInput) -> Arc<DoorBomPlan> {
        let key = input.key();
        if let Some(plan) = self.entries.get(&key) {
            self.hits += 1;
            return Arc::clone(plan);
        }

        self.misses += 1;
        if self.entries.len() >= self.capacity {
            debug!(capacity = self.capacity, "plan cache full, clearing");
            self.entries.clear();
        }
        let plan = Arc::new(compute_plan(input, &self.catalog, &self.config));
        self.entries.insert(key, Arc::clone(&plan));
        plan
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// (hits, misses)
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
