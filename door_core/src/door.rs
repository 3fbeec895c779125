//! # Door Inputs
//!
//! The input side of the engine: door dimensions, skin material, lock-block
//! and double-frame options. These come straight from a sales-order form,
//! so every constructor normalises missing, non-numeric, negative or
//! non-finite values to zero rather than failing. A zeroed door simply
//! produces an empty layout and plan.
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "door": { "thickness_mm": 40.0, "width_mm": 800.0, "height_mm": 2000.0 },
//!   "material": { "surface_thickness_mm": 4.0 },
//!   "lock_block": { "position": "both", "pieces_per_side": 2 },
//!   "double_frame": { "sides": { "left": true, "right": true }, "count": 1 }
//! }
//! ```

use serde::{Deserialize, Serialize};

/// Parse a millimetre value from raw form text.
///
/// Missing, non-numeric, negative and non-finite input all become `0.0`.
///
/// ```rust
/// use door_core::door::parse_mm;
///
/// assert_eq!(parse_mm(" 2000 "), 2000.0);
/// assert_eq!(parse_mm(""), 0.0);
/// assert_eq!(parse_mm("abc"), 0.0);
/// assert_eq!(parse_mm("-5"), 0.0);
/// ```
pub fn parse_mm(raw: &str) -> f64 {
    raw.trim().parse::<f64>().map(normalize_mm).unwrap_or(0.0)
}

/// Clamp a length to a finite, non-negative value
pub fn normalize_mm(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Finished door dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DoorSpec {
    /// Overall door thickness T (mm)
    #[serde(default)]
    pub thickness_mm: f64,
    /// Overall door width W (mm)
    #[serde(default)]
    pub width_mm: f64,
    /// Overall door height H (mm)
    #[serde(default)]
    pub height_mm: f64,
}

impl DoorSpec {
    /// Create a door spec, normalising each dimension
    pub fn new(thickness_mm: f64, width_mm: f64, height_mm: f64) -> Self {
        Self {
            thickness_mm: normalize_mm(thickness_mm),
            width_mm: normalize_mm(width_mm),
            height_mm: normalize_mm(height_mm),
        }
    }

    /// Build from raw form fields
    pub fn from_form(thickness: &str, width: &str, height: &str) -> Self {
        Self {
            thickness_mm: parse_mm(thickness),
            width_mm: parse_mm(width),
            height_mm: parse_mm(height),
        }
    }

    /// Copy with every dimension normalised
    pub fn normalized(&self) -> Self {
        Self::new(self.thickness_mm, self.width_mm, self.height_mm)
    }

    /// True when any dimension is zero
    pub fn is_degenerate(&self) -> bool {
        self.thickness_mm <= 0.0 || self.width_mm <= 0.0 || self.height_mm <= 0.0
    }
}

/// Surface skin selection.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MaterialSelection {
    /// Thickness S of each surface skin (mm)
    #[serde(default)]
    pub surface_thickness_mm: f64,
}

impl MaterialSelection {
    /// Create a material selection, normalising the thickness
    pub fn new(surface_thickness_mm: f64) -> Self {
        Self {
            surface_thickness_mm: normalize_mm(surface_thickness_mm),
        }
    }
}

/// Which stile(s) carry a lock block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LockBlockPosition {
    /// No lock block
    None,
    /// Left stile only
    Left,
    /// Right stile only
    Right,
    /// Both stiles
    #[default]
    Both,
}

impl LockBlockPosition {
    /// All positions for UI selection
    pub const ALL: [LockBlockPosition; 4] = [
        LockBlockPosition::None,
        LockBlockPosition::Left,
        LockBlockPosition::Right,
        LockBlockPosition::Both,
    ];

    /// Left stile carries a lock block
    pub fn has_left(&self) -> bool {
        matches!(self, LockBlockPosition::Left | LockBlockPosition::Both)
    }

    /// Right stile carries a lock block
    pub fn has_right(&self) -> bool {
        matches!(self, LockBlockPosition::Right | LockBlockPosition::Both)
    }

    /// Number of stiles carrying a lock block
    pub fn side_count(&self) -> usize {
        usize::from(self.has_left()) + usize::from(self.has_right())
    }
}

/// Lock-block options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LockBlockConfig {
    /// Side(s) with lock blocks
    #[serde(default)]
    pub position: LockBlockPosition,
    /// Laminated pieces per side (1..=4)
    #[serde(default = "default_pieces_per_side")]
    pub pieces_per_side: u8,
}

fn default_pieces_per_side() -> u8 {
    1
}

impl Default for LockBlockConfig {
    fn default() -> Self {
        Self {
            position: LockBlockPosition::default(),
            pieces_per_side: default_pieces_per_side(),
        }
    }
}

impl LockBlockConfig {
    /// Maximum laminated pieces per side
    pub const MAX_PIECES_PER_SIDE: u8 = 4;

    /// Create a config, clamping pieces per side to 1..=4
    pub fn new(position: LockBlockPosition, pieces_per_side: u8) -> Self {
        Self {
            position,
            pieces_per_side: pieces_per_side.clamp(1, Self::MAX_PIECES_PER_SIDE),
        }
    }

    /// No lock blocks at all
    pub fn none() -> Self {
        Self::new(LockBlockPosition::None, 1)
    }

    /// Pieces per side, clamped
    pub fn pieces(&self) -> usize {
        usize::from(self.pieces_per_side.clamp(1, Self::MAX_PIECES_PER_SIDE))
    }

    /// Total lock-block pieces: enabled sides times pieces per side
    pub fn count(&self) -> usize {
        self.position.side_count() * self.pieces()
    }

    /// True when at least one side has a lock block
    pub fn is_present(&self) -> bool {
        self.position.side_count() > 0
    }
}

/// Sides that can carry a double frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DoubleFrameSides {
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub center: bool,
    pub right: bool,
}

impl DoubleFrameSides {
    /// Every side enabled
    pub fn all() -> Self {
        Self {
            top: true,
            bottom: true,
            left: true,
            center: true,
            right: true,
        }
    }

    /// True when at least one side is enabled
    pub fn any(&self) -> bool {
        self.top || self.bottom || self.left || self.center || self.right
    }
}

/// Double-frame options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct DoubleFrameConfig {
    /// Sides with an additional frame member
    #[serde(default)]
    pub sides: DoubleFrameSides,
    /// Shorthand for enabling every side
    #[serde(default)]
    pub all: bool,
    /// Extra layers per enabled side (0..=3)
    #[serde(default)]
    pub count: u8,
}

impl DoubleFrameConfig {
    /// Maximum extra layers
    pub const MAX_COUNT: u8 = 3;

    /// Create a config, clamping the layer count to 0..=3
    pub fn new(sides: DoubleFrameSides, count: u8) -> Self {
        Self {
            sides,
            all: false,
            count: count.min(Self::MAX_COUNT),
        }
    }

    /// Sides after applying the `all` shorthand
    pub fn effective_sides(&self) -> DoubleFrameSides {
        if self.all {
            DoubleFrameSides::all()
        } else {
            self.sides
        }
    }

    /// Layer count, clamped
    pub fn layers(&self) -> usize {
        usize::from(self.count.min(Self::MAX_COUNT))
    }

    /// Active iff at least one layer and at least one side
    pub fn is_active(&self) -> bool {
        self.layers() > 0 && self.effective_sides().any()
    }
}
