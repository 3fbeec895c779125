//! # Cutting Plan
//!
//! Expands the structural layout into a cut list and packs it onto stock
//! bars of the selected profile.
//!
//! ## Cut list
//!
//! | Piece              | Finished length                         | Qty            |
//! |--------------------|-----------------------------------------|----------------|
//! | Stile              | `H`                                     | 2              |
//! | Top/Bottom Rail    | `W - 2F`                                | 2              |
//! | Double Frame L/C/R | `H - 2F`                                | count per side |
//! | Double Frame T/B   | `W - 2F` minus enabled left/right DF    | count per side |
//! | Dam Rail           | `W - 2F` minus active left/right DF     | sections - 1   |
//! | Lock Block         | lock-block height (no cut allowance)    | lock count     |
//!
//! Vertical members longer than a stock bar are split into two splice
//! segments of `ceil(L/2) + overlap/2` when the frame selection is spliced.
//! Dam rails are omitted for no-rail core types.
//!
//! ## Packing
//!
//! First-fit decreasing: pieces are sorted longest first and each goes into
//! the first open bar with room for the piece plus one kerf, otherwise a new
//! bar is opened. The bar count is not guaranteed minimal. Kerf is only
//! consumed between pieces, so each bar is credited one kerf back at the end.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calculations::frame_selection::FrameSelection;
use crate::calculations::structure::StructuralLayout;
use crate::config::EngineConfig;
use crate::materials::CoreType;

/// Cut piece category
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PieceCategory {
    Stile,
    Rail,
    DoubleFrame,
    DamRail,
    LockBlock,
}

impl PieceCategory {
    pub const ALL: [PieceCategory; 5] = [
        PieceCategory::Stile,
        PieceCategory::Rail,
        PieceCategory::DoubleFrame,
        PieceCategory::DamRail,
        PieceCategory::LockBlock,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            PieceCategory::Stile => "Stile",
            PieceCategory::Rail => "Rail",
            PieceCategory::DoubleFrame => "Double Frame",
            PieceCategory::DamRail => "Dam Rail",
            PieceCategory::LockBlock => "Lock Block",
        }
    }
}

/// A line of the cut list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CutPiece {
    pub name: String,
    /// Length in the finished door (mm)
    pub finished_length_mm: f64,
    /// Length to saw, including cut allowance (mm)
    pub cut_length_mm: f64,
    pub quantity: usize,
    pub category: PieceCategory,
    /// One half of a spliced member
    pub is_splice: bool,
}

/// One unit piece placed on a bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedPiece {
    pub name: String,
    pub category: PieceCategory,
    pub finished_length_mm: f64,
    pub cut_length_mm: f64,
    pub is_splice: bool,
}

impl PlacedPiece {
    fn from_cut(piece: &CutPiece) -> Self {
        Self {
            name: piece.name.clone(),
            category: piece.category,
            finished_length_mm: piece.finished_length_mm,
            cut_length_mm: piece.cut_length_mm,
            is_splice: piece.is_splice,
        }
    }
}

/// One stock bar and the pieces assigned to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stock {
    /// 1-based bar number
    pub index: usize,
    pub stock_length_mm: f64,
    pub pieces: Vec<PlacedPiece>,
    /// Offcut left on the bar (mm), never negative
    pub remaining_mm: f64,
}

impl Stock {
    /// Sum of cut lengths on this bar
    pub fn used_length_mm(&self) -> f64 {
        self.pieces.iter().map(|p| p.cut_length_mm).sum()
    }

    /// Number of saw joins between pieces
    pub fn joins(&self) -> usize {
        self.pieces.len().saturating_sub(1)
    }
}

/// Per-category totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: PieceCategory,
    pub pieces: usize,
    pub cut_length_mm: f64,
}

/// Bars produced by the packer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Packing {
    pub bars: Vec<Stock>,
    /// Pieces longer than a stock bar
    pub unplaced: Vec<PlacedPiece>,
}

/// Complete cutting plan for one door.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CuttingPlan {
    /// Profile code the bars are cut from
    pub stock_code: Option<String>,
    pub stock_length_mm: f64,
    pub saw_kerf_mm: f64,
    /// Cut list in enumeration order
    pub pieces: Vec<CutPiece>,
    pub bars: Vec<Stock>,
    pub unplaced: Vec<PlacedPiece>,
    pub total_bars: usize,
    /// Sum of placed cut lengths (mm)
    pub used_length_mm: f64,
    /// Sum of kerf between pieces (mm)
    pub kerf_length_mm: f64,
    /// Sum of offcuts (mm)
    pub waste_mm: f64,
    /// `used / (bars * stock) * 100`, one decimal
    pub efficiency_percent: f64,
    pub summary: Vec<CategoryTotal>,
    /// Problems the shop has to resolve before cutting, e.g. pieces longer
    /// than the selected stock
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl CuttingPlan {
    /// Total unit pieces in the cut list
    pub fn piece_count(&self) -> usize {
        self.pieces.iter().map(|p| p.quantity).sum()
    }

    /// True when stock was selected and every piece landed on a bar
    pub fn is_cuttable(&self) -> bool {
        self.stock_code.is_some() && self.unplaced.is_empty()
    }
}

/// One line per distinct oversize piece, in the order they were rejected.
fn oversize_warnings(unplaced: &[PlacedPiece], stock_length_mm: f64) -> Vec<String> {
    let mut groups: Vec<(&PlacedPiece, usize)> = Vec::new();
    for piece in unplaced {
        match groups
            .iter_mut()
            .find(|(p, _)| p.name == piece.name && p.cut_length_mm == piece.cut_length_mm)
        {
            Some((_, count)) => *count += 1,
            None => groups.push((piece, 1)),
        }
    }
    groups
        .into_iter()
        .map(|(piece, count)| {
            let hint = if piece.is_splice {
                "; splice overlap plus cut allowance overruns the bar"
            } else {
                ""
            };
            format!(
                "{} x {} cut at {} mm exceed the {} mm stock{}",
                count, piece.name, piece.cut_length_mm, stock_length_mm, hint
            )
        })
        .collect()
}

/// Round to one decimal place
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Material efficiency in percent, one decimal. Zero when no bars are used.
pub fn efficiency_percent(used_mm: f64, bars: usize, stock_length_mm: f64) -> f64 {
    let total = bars as f64 * stock_length_mm;
    if total <= 0.0 {
        0.0
    } else {
        round1(used_mm / total * 100.0)
    }
}

struct PieceList<'a> {
    pieces: Vec<CutPiece>,
    config: &'a EngineConfig,
    need_splice: bool,
    stock_length: f64,
}

impl PieceList<'_> {
    fn push(&mut self, name: &str, category: PieceCategory, finished: f64, quantity: usize) {
        self.push_piece(name.to_string(), category, finished, quantity, false);
    }

    fn push_piece(
        &mut self,
        name: String,
        category: PieceCategory,
        finished: f64,
        quantity: usize,
        is_splice: bool,
    ) {
        if finished <= 0.0 || quantity == 0 {
            return;
        }
        let cut = if category == PieceCategory::LockBlock {
            finished
        } else {
            finished + self.config.cut_allowance_mm
        };
        self.pieces.push(CutPiece {
            name,
            finished_length_mm: finished,
            cut_length_mm: cut,
            quantity,
            category,
            is_splice,
        });
    }

    /// Full-height member, split into two splice segments when it is longer
    /// than a bar and the frame is spliced.
    fn push_vertical(&mut self, name: &str, category: PieceCategory, length: f64, quantity: usize) {
        if self.need_splice && length > self.stock_length {
            let segment = (length / 2.0).ceil() + self.config.splice_overlap_mm / 2.0;
            self.push_piece(
                format!("{} (splice segment)", name),
                category,
                segment,
                quantity * 2,
                true,
            );
        } else {
            self.push(name, category, length, quantity);
        }
    }
}

/// Enumerate the cut list for a door.
pub fn enumerate_pieces(
    layout: &StructuralLayout,
    selection: &FrameSelection,
    core: CoreType,
    config: &EngineConfig,
) -> Vec<CutPiece> {
    let mut list = PieceList {
        pieces: Vec::new(),
        config,
        need_splice: selection.need_splice(),
        stock_length: selection.stock_length_mm(),
    };

    let height = layout.door.height_mm;
    let clear_width = layout.door.width_mm - 2.0 * layout.frame_width_mm;
    let clear_height = height - 2.0 * layout.frame_width_mm;
    let df = &layout.double_frame;

    list.push_vertical("Stile", PieceCategory::Stile, height, 2);
    list.push("Top/Bottom Rail", PieceCategory::Rail, clear_width, 2);

    if df.active {
        let sides = df.sides;
        for (name, enabled) in [
            ("Double Frame Left", sides.left),
            ("Double Frame Center", sides.center),
            ("Double Frame Right", sides.right),
        ] {
            if enabled {
                list.push_vertical(name, PieceCategory::DoubleFrame, clear_height, df.count);
            }
        }
        let horizontal = clear_width - df.left_mm - df.right_mm;
        for (name, enabled) in [
            ("Double Frame Top", sides.top),
            ("Double Frame Bottom", sides.bottom),
        ] {
            if enabled {
                list.push(name, PieceCategory::DoubleFrame, horizontal, df.count);
            }
        }
    }

    if core.is_no_rail() {
        debug!(core = core.code(), "dam rails omitted for no-rail core");
    } else {
        let dam = clear_width - df.left_mm - df.right_mm;
        list.push("Dam Rail", PieceCategory::DamRail, dam, layout.rail_count());
    }

    list.push(
        "Lock Block",
        PieceCategory::LockBlock,
        config.lock_block_height_mm,
        layout.lock_block.count,
    );

    list.pieces
}

/// Pack pieces onto bars with first-fit decreasing.
///
/// Each bar's `remaining_mm` ends up as `stock - sum(cut) - (n - 1) * kerf`,
/// which is never negative. Pieces longer than the stock are returned in
/// `unplaced` instead of opening an impossible bar.
pub fn pack_pieces(pieces: &[CutPiece], stock_length_mm: f64, saw_kerf_mm: f64) -> Packing {
    let mut units: Vec<&CutPiece> = pieces
        .iter()
        .flat_map(|p| std::iter::repeat(p).take(p.quantity))
        .collect();
    units.sort_by(|a, b| b.cut_length_mm.total_cmp(&a.cut_length_mm));

    let mut packing = Packing::default();
    for piece in units {
        if stock_length_mm <= 0.0 || piece.cut_length_mm > stock_length_mm {
            warn!(
                piece = %piece.name,
                cut_mm = piece.cut_length_mm,
                stock_mm = stock_length_mm,
                "piece does not fit on a stock bar"
            );
            packing.unplaced.push(PlacedPiece::from_cut(piece));
            continue;
        }

        let needed = piece.cut_length_mm + saw_kerf_mm;
        match packing.bars.iter_mut().find(|bar| bar.remaining_mm >= needed) {
            Some(bar) => {
                bar.remaining_mm -= needed;
                bar.pieces.push(PlacedPiece::from_cut(piece));
            }
            None => {
                let index = packing.bars.len() + 1;
                debug!(index, piece = %piece.name, "opening stock bar");
                packing.bars.push(Stock {
                    index,
                    stock_length_mm,
                    pieces: vec![PlacedPiece::from_cut(piece)],
                    remaining_mm: stock_length_mm - needed,
                });
            }
        }
    }

    // No kerf after the last piece on a bar
    for bar in &mut packing.bars {
        bar.remaining_mm += saw_kerf_mm;
    }
    packing
}

/// Build the full cutting plan for a door.
pub fn plan_cutting(
    layout: &StructuralLayout,
    selection: &FrameSelection,
    core: CoreType,
    config: &EngineConfig,
) -> CuttingPlan {
    let pieces = enumerate_pieces(layout, selection, core, config);
    let stock_length = selection.stock_length_mm();
    let kerf = config.saw_kerf_mm;
    let Packing { bars, unplaced } = pack_pieces(&pieces, stock_length, kerf);

    let used: f64 = bars.iter().map(Stock::used_length_mm).sum();
    let kerf_length: f64 = bars.iter().map(|b| b.joins() as f64 * kerf).sum();
    let waste: f64 = bars.iter().map(|b| b.remaining_mm).sum();
    let efficiency = efficiency_percent(used, bars.len(), stock_length);

    let summary = PieceCategory::ALL
        .iter()
        .filter_map(|category| {
            let matching: Vec<&CutPiece> =
                pieces.iter().filter(|p| p.category == *category).collect();
            if matching.is_empty() {
                return None;
            }
            Some(CategoryTotal {
                category: *category,
                pieces: matching.iter().map(|p| p.quantity).sum(),
                cut_length_mm: matching
                    .iter()
                    .map(|p| p.cut_length_mm * p.quantity as f64)
                    .sum(),
            })
        })
        .collect();

    let warnings = if selection.selected().is_some() {
        oversize_warnings(&unplaced, stock_length)
    } else {
        Vec::new()
    };
    if !warnings.is_empty() {
        warn!(
            unplaced = unplaced.len(),
            stock_mm = stock_length,
            "cutting plan leaves pieces without a bar"
        );
    }

    debug!(
        bars = bars.len(),
        efficiency,
        unplaced = unplaced.len(),
        "cutting plan computed"
    );

    CuttingPlan {
        stock_code: selection.selected().map(|f| f.profile.code.clone()),
        stock_length_mm: stock_length,
        saw_kerf_mm: kerf,
        pieces,
        total_bars: bars.len(),
        bars,
        unplaced,
        used_length_mm: used,
        kerf_length_mm: kerf_length,
        waste_mm: waste,
        efficiency_percent: efficiency,
        summary,
        warnings,
    }
}
