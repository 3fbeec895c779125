//! # Materials Database
//!
//! Reference data consumed by the engine:
//!
//! - [`timber`] - frame stock profiles per species ([`FrameCatalog`])
//! - [`core_types`] - the six infill core types and their nominal strip sizes

pub mod core_types;
pub mod timber;

pub use core_types::{CoreKind, CoreLayoutStyle, CoreSpec, CoreType};
pub use timber::{FrameCatalog, StockProfile, TimberSpecies};
