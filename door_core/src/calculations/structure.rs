//! # Structural Layout
//!
//! Derives the door's frame geometry from the selected frame profile:
//! frame width `F`, rail thickness `R`, interior rail positions, the
//! lock-block zone and the double-frame extents.
//!
//! ## Coordinates
//!
//! All positions are millimetres with `x` from the door's left edge and `y`
//! from its bottom edge. The lock-block zone is measured from the bottom of
//! the door, which is where the handle height is specified.
//!
//! ## Rails
//!
//! Doors at or above the tall-door threshold (2400 mm) get four rail
//! sections, others three. Interior rails sit at `round(H * i / sections)`
//! and are pushed clear of the lock-block avoidance zone when a lock block
//! is fitted:
//!
//! ```text
//!            avoid_top ─────────  zone_top + buffer
//!   zone_top   ┌────────────┐
//!              │ lock block │    centre 1000, height 400
//!   zone_bot   └────────────┘
//!            avoid_bottom ──────  zone_bottom - buffer
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::frame_selection::FrameSelection;
use crate::config::EngineConfig;
use crate::door::{DoorSpec, DoubleFrameConfig, DoubleFrameSides, LockBlockConfig, LockBlockPosition};

/// Axis-aligned rectangle in door coordinates (mm)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn top(&self) -> f64 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Open-interval overlap of `[a0, a1]` and `[b0, b1]`; touching is not overlap.
pub fn spans_overlap(a0: f64, a1: f64, b0: f64, b1: f64) -> bool {
    a0 < b1 && b0 < a1
}

/// Lock-block geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LockBlockLayout {
    /// Side(s) carrying lock blocks
    pub position: LockBlockPosition,
    /// Laminated pieces per side
    pub pieces_per_side: usize,
    /// Total pieces: enabled sides times pieces per side
    pub count: usize,
    /// Lower edge of the lock block (mm from door bottom)
    pub bottom_mm: f64,
    /// Upper edge of the lock block (mm from door bottom)
    pub top_mm: f64,
    /// Lower edge of the rail avoidance zone
    pub avoid_bottom_mm: f64,
    /// Upper edge of the rail avoidance zone
    pub avoid_top_mm: f64,
    /// Width of the laminated block on one side: `pieces * F`
    pub width_per_side_mm: f64,
}

impl LockBlockLayout {
    /// True when at least one side has a lock block
    pub fn is_present(&self) -> bool {
        self.count > 0
    }

    /// Height of the lock block
    pub fn height_mm(&self) -> f64 {
        self.top_mm - self.bottom_mm
    }

    pub fn has_left(&self) -> bool {
        self.position.has_left()
    }

    pub fn has_right(&self) -> bool {
        self.position.has_right()
    }
}

/// Double-frame extents. Each side extent is `F * count` when that side is
/// enabled and the double frame is active, otherwise zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DoubleFrameLayout {
    pub active: bool,
    /// Extra layers per side
    pub count: usize,
    /// `F * count`
    pub extra_width_mm: f64,
    /// Enabled sides after applying the `all` shorthand
    pub sides: DoubleFrameSides,
    pub top_mm: f64,
    pub bottom_mm: f64,
    pub left_mm: f64,
    pub center_mm: f64,
    pub right_mm: f64,
}

impl DoubleFrameLayout {
    fn new(config: &DoubleFrameConfig, frame_width: f64) -> Self {
        let active = config.is_active();
        let count = if active { config.layers() } else { 0 };
        let extra = frame_width * count as f64;
        let sides = config.effective_sides();
        let extent = |enabled: bool| if active && enabled { extra } else { 0.0 };
        Self {
            active,
            count,
            extra_width_mm: extra,
            sides,
            top_mm: extent(sides.top),
            bottom_mm: extent(sides.bottom),
            left_mm: extent(sides.left),
            center_mm: extent(sides.center),
            right_mm: extent(sides.right),
        }
    }
}

/// Derived structural layout of one door.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuralLayout {
    /// Door dimensions the layout was computed for
    pub door: DoorSpec,
    /// Frame face width F (frame use-width)
    pub frame_width_mm: f64,
    /// Rail thickness R (frame use-thickness)
    pub rail_thickness_mm: f64,
    /// `F + DF` when the double frame is active, otherwise `F`
    pub total_frame_width_mm: f64,
    /// 3 or 4
    pub rail_sections: usize,
    /// Interior rail centre lines after lock-block avoidance (mm from bottom)
    pub rail_positions_mm: Vec<f64>,
    /// Nominal rail centre lines
    pub rail_positions_original_mm: Vec<f64>,
    /// True when any rail was moved
    pub rails_adjusted: bool,
    pub lock_block: LockBlockLayout,
    pub double_frame: DoubleFrameLayout,
    /// Area inside the (double) frame
    pub inner: Rect,
}

impl StructuralLayout {
    /// `W - 2F`: clear width between the two stiles
    pub fn clear_width_mm(&self) -> f64 {
        (self.door.width_mm - 2.0 * self.frame_width_mm).max(0.0)
    }

    /// `H - 2F`: clear height between top and bottom rails
    pub fn clear_height_mm(&self) -> f64 {
        (self.door.height_mm - 2.0 * self.frame_width_mm).max(0.0)
    }

    /// Number of interior rails
    pub fn rail_count(&self) -> usize {
        self.rail_positions_mm.len()
    }

    /// Vertical band `[pos - R/2, pos + R/2]` occupied by each rail
    pub fn rail_bands(&self) -> Vec<(f64, f64)> {
        let half = self.rail_thickness_mm / 2.0;
        self.rail_positions_mm
            .iter()
            .map(|pos| (pos - half, pos + half))
            .collect()
    }
}

/// Compute the structural layout from the frame selection.
///
/// Without a frame match `F` and `R` are zero, giving a degenerate layout.
pub fn calculate_layout(
    door: &DoorSpec,
    selection: &FrameSelection,
    lock_block: &LockBlockConfig,
    double_frame: &DoubleFrameConfig,
    config: &EngineConfig,
) -> StructuralLayout {
    layout_for_frame(
        door,
        selection.use_width_mm(),
        selection.use_thickness_mm(),
        lock_block,
        double_frame,
        config,
    )
}

/// Compute the structural layout for explicit frame width `F` and rail
/// thickness `R`.
pub fn layout_for_frame(
    door: &DoorSpec,
    frame_width: f64,
    rail_thickness: f64,
    lock_block: &LockBlockConfig,
    double_frame: &DoubleFrameConfig,
    config: &EngineConfig,
) -> StructuralLayout {
    let door = door.normalized();
    let height = door.height_mm;

    let double_frame = DoubleFrameLayout::new(double_frame, frame_width);
    let total_frame_width = if double_frame.active {
        frame_width + double_frame.extra_width_mm
    } else {
        frame_width
    };

    let half_block = config.lock_block_height_mm / 2.0;
    let bottom = config.lock_block_center_mm - half_block;
    let top = config.lock_block_center_mm + half_block;
    let pieces = lock_block.pieces();
    let lock_block = LockBlockLayout {
        position: lock_block.position,
        pieces_per_side: pieces,
        count: lock_block.count(),
        bottom_mm: bottom,
        top_mm: top,
        avoid_bottom_mm: bottom - config.lock_block_buffer_mm,
        avoid_top_mm: top + config.lock_block_buffer_mm,
        width_per_side_mm: frame_width * pieces as f64,
    };

    let rail_sections = config.rail_sections(height);
    let original: Vec<f64> = if height > 0.0 {
        (1..rail_sections)
            .map(|i| (height * i as f64 / rail_sections as f64).round())
            .collect()
    } else {
        Vec::new()
    };

    let half_rail = rail_thickness / 2.0;
    let positions: Vec<f64> = original
        .iter()
        .map(|&pos| {
            let clashes = lock_block.is_present()
                && spans_overlap(
                    pos - half_rail,
                    pos + half_rail,
                    lock_block.avoid_bottom_mm,
                    lock_block.avoid_top_mm,
                );
            if !clashes {
                return pos;
            }
            let to_bottom = (pos - lock_block.avoid_bottom_mm).abs();
            let to_top = (lock_block.avoid_top_mm - pos).abs();
            let moved = if to_bottom < to_top {
                lock_block.avoid_bottom_mm - half_rail
            } else {
                lock_block.avoid_top_mm + half_rail
            };
            debug!(nominal = pos, moved, "rail shifted clear of lock block");
            moved
        })
        .collect();
    let rails_adjusted = positions != original;

    let inner = Rect::new(
        total_frame_width,
        total_frame_width,
        (door.width_mm - 2.0 * total_frame_width).max(0.0),
        (height - 2.0 * total_frame_width).max(0.0),
    );

    StructuralLayout {
        door,
        frame_width_mm: frame_width,
        rail_thickness_mm: rail_thickness,
        total_frame_width_mm: total_frame_width,
        rail_sections,
        rail_positions_mm: positions,
        rail_positions_original_mm: original,
        rails_adjusted,
        lock_block,
        double_frame,
        inner,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(height: f64, lock: LockBlockConfig, double: DoubleFrameConfig) -> StructuralLayout {
        layout_for_frame(
            &DoorSpec::new(40.0, 800.0, height),
            70.0,
            30.0,
            &lock,
            &double,
            &EngineConfig::default(),
        )
    }

    #[test]
    fn test_three_sections_below_threshold() {
        let l = layout(2000.0, LockBlockConfig::default(), DoubleFrameConfig::default());
        assert_eq!(l.rail_sections, 3);
        assert_eq!(l.rail_positions_original_mm, vec![667.0, 1333.0]);
        assert_eq!(l.rail_positions_mm, l.rail_positions_original_mm);
        assert!(!l.rails_adjusted);
    }

    #[test]
    fn test_four_sections_for_tall_door() {
        let l = layout(2500.0, LockBlockConfig::none(), DoubleFrameConfig::default());
        assert_eq!(l.rail_sections, 4);
        assert_eq!(l.rail_positions_original_mm, vec![625.0, 1250.0, 1875.0]);
        assert_eq!(l.rail_count(), 3);
        // No lock block, nothing moves
        assert!(!l.rails_adjusted);
    }

    #[test]
    fn test_rail_shifted_to_nearer_zone_edge() {
        let l = layout(
            2500.0,
            LockBlockConfig::new(LockBlockPosition::Left, 1),
            DoubleFrameConfig::default(),
        );
        assert_eq!(l.lock_block.avoid_bottom_mm, 750.0);
        assert_eq!(l.lock_block.avoid_top_mm, 1250.0);
        // 1250 sits on the top edge: pushed above by R/2
        assert_eq!(l.rail_positions_mm, vec![625.0, 1265.0, 1875.0]);
        assert!(l.rails_adjusted);
    }

    #[test]
    fn test_rail_shifted_down_when_nearer_bottom_edge() {
        // 767 band [752, 782] clashes and is nearer the 750 edge
        let l = layout(2300.0, LockBlockConfig::default(), DoubleFrameConfig::default());
        assert_eq!(l.rail_positions_original_mm, vec![767.0, 1533.0]);
        assert_eq!(l.rail_positions_mm, vec![735.0, 1533.0]);
    }

    #[test]
    fn test_lock_block_geometry() {
        let l = layout(
            2000.0,
            LockBlockConfig::new(LockBlockPosition::Both, 2),
            DoubleFrameConfig::default(),
        );
        assert_eq!(l.lock_block.count, 4);
        assert_eq!(l.lock_block.bottom_mm, 800.0);
        assert_eq!(l.lock_block.top_mm, 1200.0);
        assert_eq!(l.lock_block.height_mm(), 400.0);
        assert_eq!(l.lock_block.width_per_side_mm, 140.0);
    }

    #[test]
    fn test_double_frame_widens_frame() {
        let double = DoubleFrameConfig::new(
            DoubleFrameSides {
                left: true,
                right: true,
                ..Default::default()
            },
            2,
        );
        let l = layout(2000.0, LockBlockConfig::default(), double);
        assert!(l.double_frame.active);
        assert_eq!(l.double_frame.extra_width_mm, 140.0);
        assert_eq!(l.total_frame_width_mm, 210.0);
        assert_eq!(l.double_frame.left_mm, 140.0);
        assert_eq!(l.double_frame.top_mm, 0.0);
        assert_eq!(l.inner, Rect::new(210.0, 210.0, 380.0, 1580.0));
    }

    #[test]
    fn test_inactive_double_frame_ignored() {
        let double = DoubleFrameConfig::new(DoubleFrameSides::all(), 0);
        let l = layout(2000.0, LockBlockConfig::default(), double);
        assert!(!l.double_frame.active);
        assert_eq!(l.total_frame_width_mm, 70.0);
        assert_eq!(l.double_frame.left_mm, 0.0);
    }

    #[test]
    fn test_degenerate_door() {
        let l = layout_for_frame(
            &DoorSpec::default(),
            0.0,
            0.0,
            &LockBlockConfig::default(),
            &DoubleFrameConfig::default(),
            &EngineConfig::default(),
        );
        assert!(l.rail_positions_mm.is_empty());
        assert!(l.inner.is_empty());
    }

    #[test]
    fn test_layout_from_no_match_selection() {
        use crate::calculations::frame_selection::{FrameSelection, NoMatch};
        let selection = FrameSelection::NoMatch(NoMatch {
            required_thickness_mm: 30.0,
            required_length_mm: 2000.0,
            max_single_length_mm: 0.0,
            max_spliced_length_mm: 0.0,
            reason: String::new(),
        });
        let l = calculate_layout(
            &DoorSpec::new(40.0, 800.0, 2000.0),
            &selection,
            &LockBlockConfig::default(),
            &DoubleFrameConfig::default(),
            &EngineConfig::default(),
        );
        assert_eq!(l.frame_width_mm, 0.0);
        assert_eq!(l.inner.width, 800.0);
    }

    #[test]
    fn test_spans_overlap_is_strict() {
        assert!(spans_overlap(0.0, 10.0, 5.0, 15.0));
        assert!(!spans_overlap(0.0, 10.0, 10.0, 20.0));
    }
}
