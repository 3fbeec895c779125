//! Property-based tests for engine invariants using the `proptest` crate.

use proptest::prelude::*;

use door_core::calculations::cutting::{efficiency_percent, pack_pieces, CutPiece, PieceCategory};
use door_core::calculations::frame_selection::{select_frame, FrameSelectionInput, SelectionStrategy};
use door_core::calculations::structure::layout_for_frame;
use door_core::calculations::{calculate_core_layout, CoreLayout, StructuralLayout};
use door_core::config::EngineConfig;
use door_core::door::{
    DoorSpec, DoubleFrameConfig, DoubleFrameSides, LockBlockConfig, LockBlockPosition,
    MaterialSelection,
};
use door_core::materials::{CoreLayoutStyle, CoreType, FrameCatalog, TimberSpecies};
use door_core::plan::{compute_plan, DoorBomInput};

const EPS: f64 = 1e-6;

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

fn arb_species() -> impl Strategy<Value = TimberSpecies> {
    prop::sample::select(TimberSpecies::ALL.to_vec())
}

fn arb_core() -> impl Strategy<Value = CoreType> {
    prop::sample::select(CoreType::ALL.to_vec())
}

fn arb_lock_block() -> impl Strategy<Value = LockBlockConfig> {
    (prop::sample::select(LockBlockPosition::ALL.to_vec()), 1u8..=4)
        .prop_map(|(position, pieces)| LockBlockConfig::new(position, pieces))
}

fn arb_double_frame() -> impl Strategy<Value = DoubleFrameConfig> {
    (any::<[bool; 5]>(), 0u8..=3).prop_map(|(s, count)| {
        DoubleFrameConfig::new(
            DoubleFrameSides {
                top: s[0],
                bottom: s[1],
                left: s[2],
                center: s[3],
                right: s[4],
            },
            count,
        )
    })
}

/// Whole-millimetre door dimensions keep every derived length exact.
fn arb_door() -> impl Strategy<Value = DoorSpec> {
    (30u32..=70, 500u32..=1200, 1500u32..=3200)
        .prop_map(|(t, w, h)| DoorSpec::new(t as f64, w as f64, h as f64))
}

fn arb_input() -> impl Strategy<Value = DoorBomInput> {
    (
        arb_species(),
        arb_door(),
        2u32..=8,
        arb_lock_block(),
        arb_double_frame(),
        arb_core(),
    )
        .prop_map(|(species, door, s, lock_block, double_frame, core)| {
            DoorBomInput::new(species, door, MaterialSelection::new(s as f64))
                .with_lock_block(lock_block)
                .with_double_frame(double_frame)
                .with_core(core)
        })
}

fn strict_overlap(a0: f64, a1: f64, b0: f64, b1: f64) -> bool {
    a0 < b1 - EPS && b0 < a1 - EPS
}

// ---------------------------------------------------------------------------
// 1. Frame selection
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn exact_match_picks_shortest_sufficient_length(
        species in arb_species(),
        t in 30u32..=70,
        s in 2u32..=8,
        h in 1500u32..=3200,
    ) {
        let config = EngineConfig::default();
        let catalog = FrameCatalog::standard();
        let input = FrameSelectionInput {
            species,
            door_thickness_mm: t as f64,
            surface_thickness_mm: s as f64,
            door_height_mm: h as f64,
        };
        let selection = select_frame(&input, catalog, &config);
        let required = input.required_thickness_mm(&config);

        if let Some(frame) = selection.selected() {
            if frame.strategy == SelectionStrategy::ExactThickness {
                let shortest = catalog
                    .profiles(species)
                    .iter()
                    .filter(|p| (p.thickness_mm - required).abs() < EPS)
                    .filter(|p| p.length_mm >= h as f64)
                    .map(|p| p.length_mm)
                    .fold(f64::INFINITY, f64::min);
                prop_assert_eq!(frame.profile.length_mm, shortest);
            }
        }
    }

    #[test]
    fn selected_frame_geometry_is_consistent(
        species in arb_species(),
        t in 30u32..=70,
        s in 2u32..=8,
        h in 1500u32..=6000,
    ) {
        let config = EngineConfig::default();
        let input = FrameSelectionInput {
            species,
            door_thickness_mm: t as f64,
            surface_thickness_mm: s as f64,
            door_height_mm: h as f64,
        };
        let selection = select_frame(&input, FrameCatalog::standard(), &config);
        let Some(frame) = selection.selected() else {
            return Ok(());
        };

        // Planing always lands on the required thickness
        prop_assert!((frame.use_thickness_mm - frame.required_thickness_mm).abs() < EPS);
        prop_assert!(frame.plane_amount_mm >= 0.0);

        if frame.is_flipped {
            prop_assert_eq!(frame.use_width_mm, frame.profile.thickness_mm);
            prop_assert_eq!(
                frame.use_thickness_mm + frame.plane_amount_mm,
                frame.profile.width_mm
            );
        } else {
            prop_assert_eq!(frame.use_width_mm, frame.profile.width_mm);
        }

        if frame.need_splice {
            let splice = frame.splice.as_ref().unwrap();
            prop_assert!(splice.effective_length_mm >= h as f64);
            prop_assert!(frame.strategy.is_spliced());
            // Splicing only happens when no single length would do
            let required = frame.required_thickness_mm;
            let single = FrameCatalog::standard()
                .profiles(species)
                .iter()
                .filter(|p| p.thickness_mm >= required || p.width_mm >= required)
                .any(|p| p.length_mm >= h as f64);
            prop_assert!(!single);
        } else {
            prop_assert!(frame.profile.length_mm >= h as f64);
        }
    }
}

// ---------------------------------------------------------------------------
// 2. Structural layout
// ---------------------------------------------------------------------------

fn frame_layout(door: &DoorSpec, f: u32, r: u32, lock: LockBlockConfig) -> StructuralLayout {
    layout_for_frame(
        door,
        f as f64,
        r as f64,
        &lock,
        &DoubleFrameConfig::default(),
        &EngineConfig::default(),
    )
}

proptest! {
    #[test]
    fn rail_count_follows_height(
        door in arb_door(),
        f in 30u32..=100,
        r in 20u32..=50,
        lock in arb_lock_block(),
    ) {
        let layout = frame_layout(&door, f, r, lock);
        let sections = if door.height_mm >= 2400.0 { 4 } else { 3 };
        prop_assert_eq!(layout.rail_sections, sections);
        prop_assert_eq!(layout.rail_count(), sections - 1);
        prop_assert_eq!(
            layout.rail_positions_original_mm.len(),
            layout.rail_positions_mm.len()
        );
    }

    #[test]
    fn rails_never_enter_lock_block_zone(
        door in arb_door(),
        f in 30u32..=100,
        r in 20u32..=50,
        lock in arb_lock_block(),
    ) {
        let layout = frame_layout(&door, f, r, lock);
        let lb = &layout.lock_block;
        if lb.is_present() {
            for (low, high) in layout.rail_bands() {
                prop_assert!(
                    !strict_overlap(low, high, lb.avoid_bottom_mm, lb.avoid_top_mm),
                    "rail band [{}, {}] inside [{}, {}]",
                    low, high, lb.avoid_bottom_mm, lb.avoid_top_mm
                );
            }
        } else {
            prop_assert_eq!(&layout.rail_positions_mm, &layout.rail_positions_original_mm);
            prop_assert!(!layout.rails_adjusted);
        }
    }
}

// ---------------------------------------------------------------------------
// 3. Cutting
// ---------------------------------------------------------------------------

fn arb_pieces() -> impl Strategy<Value = Vec<CutPiece>> {
    prop::collection::vec((50u32..=3000, 1usize..=4), 1..12).prop_map(|raw| {
        raw.into_iter()
            .enumerate()
            .map(|(i, (len, quantity))| CutPiece {
                name: format!("Piece {}", i + 1),
                finished_length_mm: len as f64,
                cut_length_mm: len as f64,
                quantity,
                category: PieceCategory::Rail,
                is_splice: false,
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn packed_bars_respect_capacity(
        pieces in arb_pieces(),
        stock in 1000u32..=3000,
        kerf in 0u32..=8,
    ) {
        let stock = stock as f64;
        let kerf = kerf as f64;
        let packing = pack_pieces(&pieces, stock, kerf);

        for bar in &packing.bars {
            prop_assert!(bar.remaining_mm >= 0.0);
            let total = bar.used_length_mm() + bar.joins() as f64 * kerf + bar.remaining_mm;
            prop_assert!((total - stock).abs() < EPS);
        }

        let wanted: usize = pieces.iter().map(|p| p.quantity).sum();
        let placed: usize = packing.bars.iter().map(|b| b.pieces.len()).sum();
        prop_assert_eq!(placed + packing.unplaced.len(), wanted);
        for piece in &packing.unplaced {
            prop_assert!(piece.cut_length_mm > stock);
        }
    }

    #[test]
    fn cutting_plan_totals_are_conserved(input in arb_input()) {
        let plan = compute_plan(&input, FrameCatalog::standard(), &EngineConfig::default());
        let cutting = &plan.cutting;

        prop_assert_eq!(cutting.total_bars, cutting.bars.len());
        let capacity = cutting.total_bars as f64 * cutting.stock_length_mm;
        let accounted = cutting.used_length_mm + cutting.kerf_length_mm + cutting.waste_mm;
        prop_assert!((accounted - capacity).abs() < EPS);

        prop_assert_eq!(
            cutting.efficiency_percent,
            efficiency_percent(cutting.used_length_mm, cutting.total_bars, cutting.stock_length_mm)
        );
        prop_assert!(cutting.efficiency_percent <= 100.0);

        let placed: usize = cutting.bars.iter().map(|b| b.pieces.len()).sum();
        prop_assert_eq!(placed + cutting.unplaced.len(), cutting.piece_count());
    }
}

// ---------------------------------------------------------------------------
// 4. Core layout
// ---------------------------------------------------------------------------

fn lock_rects(layout: &StructuralLayout) -> Vec<(f64, f64, f64, f64)> {
    let lb = &layout.lock_block;
    let inner = &layout.inner;
    let mut rects = Vec::new();
    if lb.has_left() {
        rects.push((inner.x, inner.x + lb.width_per_side_mm, lb.bottom_mm, lb.top_mm));
    }
    if lb.has_right() {
        rects.push((inner.right() - lb.width_per_side_mm, inner.right(), lb.bottom_mm, lb.top_mm));
    }
    rects
}

fn check_core(layout: &StructuralLayout, core: &CoreLayout) -> Result<(), TestCaseError> {
    let inner = &layout.inner;
    for piece in &core.pieces {
        let r = piece.rect();
        prop_assert!(r.width > 0.0 && r.height > 0.0, "{} is empty", piece.label);
        prop_assert!(r.x >= inner.x - EPS && r.right() <= inner.right() + EPS);
        prop_assert!(r.y >= inner.y - EPS && r.top() <= inner.top() + EPS);

        for (x0, x1, y0, y1) in lock_rects(layout) {
            prop_assert!(
                !(strict_overlap(r.x, r.right(), x0, x1) && strict_overlap(r.y, r.top(), y0, y1)),
                "{} overlaps a lock block",
                piece.label
            );
        }

        let center = layout.double_frame.center_mm;
        if center > 0.0 {
            let mid = layout.door.width_mm / 2.0;
            prop_assert!(
                !strict_overlap(r.x, r.right(), mid - center / 2.0, mid + center / 2.0),
                "{} crosses the centre double-frame member",
                piece.label
            );
        }

        if matches!(
            core.style,
            CoreLayoutStyle::RowSegmented | CoreLayoutStyle::FittedStrips
        ) {
            for (low, high) in layout.rail_bands() {
                prop_assert!(
                    !strict_overlap(r.y, r.top(), low, high),
                    "{} overlaps rail band [{}, {}]",
                    piece.label, low, high
                );
            }
        }
    }
    Ok(())
}

proptest! {
    #[test]
    fn core_pieces_avoid_rails_and_lock_blocks(input in arb_input()) {
        let plan = compute_plan(&input, FrameCatalog::standard(), &EngineConfig::default());
        check_core(&plan.layout, &plan.core_layout)?;
    }

    #[test]
    fn core_pieces_avoid_obstacles_for_any_frame(
        door in arb_door(),
        f in 30u32..=100,
        r in 20u32..=50,
        lock in arb_lock_block(),
        core in arb_core(),
    ) {
        let layout = frame_layout(&door, f, r, lock);
        let core_layout = calculate_core_layout(&layout, core, &EngineConfig::default());
        check_core(&layout, &core_layout)?;
    }
}
