//! # door_core - Door Panel Manufacturing Optimization Engine
//!
//! `door_core` computes the bill of materials for a flush door panel: which
//! timber stock to frame it with, where the rails and lock blocks go, how to
//! cut the frame members from stock bars, and how to fill the interior with
//! core material. All inputs and outputs are JSON-serializable so a web or
//! desktop front end can drive it directly.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions from an input tuple to a plan
//! - **Total**: Degenerate input gives an empty plan, never a panic or error
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Tunable**: Shop constants live in [`EngineConfig`], not in code
//!
//! ## Quick Start
//!
//! ```rust
//! use door_core::{compute_plan, DoorBomInput, EngineConfig, FrameCatalog};
//! use door_core::door::{DoorSpec, MaterialSelection};
//! use door_core::materials::{CoreType, TimberSpecies};
//!
//! let input = DoorBomInput::new(
//!     TimberSpecies::Rubberwood,
//!     DoorSpec::new(40.0, 800.0, 2000.0),
//!     MaterialSelection::new(4.0),
//! )
//! .with_core(CoreType::Rockwool);
//!
//! let plan = compute_plan(&input, FrameCatalog::standard(), &EngineConfig::default());
//! let frame = plan.selection.selected().unwrap();
//! assert_eq!(frame.use_thickness_mm, 30.0);
//! assert_eq!(plan.cutting.total_bars, 4);
//!
//! let json = serde_json::to_string_pretty(&plan).unwrap();
//! assert!(json.contains("\"status\": \"selected\""));
//! ```
//!
//! ## Modules
//!
//! - [`door`] - Door dimensions, skin material, lock-block and double-frame options
//! - [`materials`] - Timber species, stock catalogue and core types
//! - [`calculations`] - The four engine stages
//! - [`plan`] - Whole-door pipeline and plan cache
//! - [`config`] - Tunable shop constants
//! - [`errors`] - Structured error types
//! - [`file_io`] - Config, catalogue and plan files with atomic saves

pub mod calculations;
pub mod config;
pub mod door;
pub mod errors;
pub mod file_io;
pub mod materials;
pub mod plan;

// Re-export commonly used types at crate root for convenience
pub use config::EngineConfig;
pub use errors::{DoorError, DoorResult};
pub use file_io::{load_catalog, load_config, save_catalog, save_config, save_plan};
pub use materials::FrameCatalog;
pub use plan::{compute_plan, DoorBomInput, DoorBomPlan, PlanCache};
