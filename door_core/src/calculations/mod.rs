//! # Door Engine Stages
//!
//! The engine is four pure stages, each a plain function of its inputs:
//!
//! - [`frame_selection`] - pick a stock profile for the required frame
//!   thickness and length (exact, flip, plane, splice)
//! - [`structure`] - frame width, rail positions, lock-block zone and the
//!   inner core area
//! - [`cutting`] - enumerate the cut list and pack it onto stock bars
//! - [`core_layout`] - tile the inner area with core material
//!
//! Degenerate input never fails: it yields a `NoMatch` selection, an empty
//! layout or an empty plan. All result types serialize to clean JSON for
//! the UI layer.

pub mod core_layout;
pub mod cutting;
pub mod frame_selection;
pub mod structure;

// Re-export commonly used types
pub use core_layout::{calculate_core_layout, CoreLayout, CorePiece, MAX_STRIP_COLUMNS};
pub use cutting::{
    enumerate_pieces, pack_pieces, plan_cutting, CategoryTotal, CutPiece, CuttingPlan, Packing,
    PieceCategory, PlacedPiece, Stock,
};
pub use frame_selection::{
    select_frame, FrameSelection, FrameSelectionInput, NoMatch, SelectedFrame, SelectionStrategy,
    SpliceInfo,
};
pub use structure::{
    calculate_layout, layout_for_frame, DoubleFrameLayout, LockBlockLayout, Rect,
    StructuralLayout,
};
