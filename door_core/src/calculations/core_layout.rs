//! # Core Layout
//!
//! Subdivides the panel interior (inside the frame and any double frame)
//! into core pieces, keeping clear of interior rails and lock blocks.
//!
//! - **Full panel** (foam, solid particle board, honeycomb): one sheet,
//!   cut into bottom/middle/top bands only where it meets the lock-block
//!   zone. The middle band is narrowed by the lock-block width on each side
//!   that has one.
//! - **Row segmented** (rockwool): one sheet per row between rail bands,
//!   each row cut around the lock-block zone the same way.
//! - **Fitted strips** (plywood strips): vertical strips; the column count
//!   is the most strips that fit with at least the nominal spacing, and the
//!   spacing is then widened so gaps are equal, edges included. Strips are
//!   cut at each rail band.
//! - **Fixed-pitch strips** (particle strips): vertical strips at the
//!   nominal pitch, centred in the inner width, plus a horizontal dam strip
//!   on each rail line. Strips are cut at each dam strip.
//!
//! A strip segment crossing a lock block is split into lower and upper
//! remainders; remainders shorter than the minimum viable length are
//! dropped.
//!
//! A centre double-frame member runs the full inner height at mid-width.
//! Sheets and dam strips are cut into left and right parts around it, and
//! strip columns that would cross it are left out.
//!
//! Strip sizes that fail [`crate::materials::CoreSpec::has_usable_strips`]
//! lay nothing and the layout comes back empty. Column counts are capped
//! at [`MAX_STRIP_COLUMNS`].

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::calculations::structure::{spans_overlap, Rect, StructuralLayout};
use crate::config::EngineConfig;
use crate::materials::{CoreKind, CoreLayoutStyle, CoreType};

/// Most strip columns laid across one door.
pub const MAX_STRIP_COLUMNS: usize = 10_000;

/// One rectangular core piece in door coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorePiece {
    /// Left edge (mm from door left)
    pub x: f64,
    /// Bottom edge (mm from door bottom)
    pub y: f64,
    pub width_mm: f64,
    pub height_mm: f64,
    pub label: String,
}

impl CorePiece {
    fn from_rect(rect: Rect, label: impl Into<String>) -> Self {
        Self {
            x: rect.x,
            y: rect.y,
            width_mm: rect.width,
            height_mm: rect.height,
            label: label.into(),
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width_mm, self.height_mm)
    }

    pub fn area_mm2(&self) -> f64 {
        self.width_mm * self.height_mm
    }
}

/// Core layout result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreLayout {
    pub core: CoreType,
    pub style: CoreLayoutStyle,
    /// Pieces in layout order
    pub pieces: Vec<CorePiece>,
    /// Strip columns (0 for sheet cores)
    pub columns: usize,
    /// Rows between rails or dam strips (1 for full-panel cores)
    pub rows: usize,
    /// Strip thickness in use (mm)
    pub strip_thickness_mm: f64,
    /// Strip spacing after fitting (mm)
    pub strip_spacing_mm: f64,
    /// Horizontal dam strips (particle strips only)
    pub dam_strips: usize,
    /// Sum of piece areas (mm^2)
    pub covered_area_mm2: f64,
}

impl CoreLayout {
    fn empty(core: CoreType) -> Self {
        Self {
            core,
            style: core.layout_style(),
            pieces: Vec::new(),
            columns: 0,
            rows: 0,
            strip_thickness_mm: 0.0,
            strip_spacing_mm: 0.0,
            dam_strips: 0,
            covered_area_mm2: 0.0,
        }
    }
}

/// Where the lock blocks sit inside the inner area.
struct LockZone {
    present: bool,
    bottom: f64,
    top: f64,
    /// x-range of the left block, if any
    left: Option<(f64, f64)>,
    /// x-range of the right block, if any
    right: Option<(f64, f64)>,
}

impl LockZone {
    fn new(layout: &StructuralLayout) -> Self {
        let lb = &layout.lock_block;
        let inner = &layout.inner;
        let width = lb.width_per_side_mm;
        Self {
            present: lb.is_present(),
            bottom: lb.bottom_mm,
            top: lb.top_mm,
            left: lb.has_left().then(|| (inner.x, inner.x + width)),
            right: lb.has_right().then(|| (inner.right() - width, inner.right())),
        }
    }

    fn crosses_rows(&self, rect: &Rect) -> bool {
        self.present && spans_overlap(rect.y, rect.top(), self.bottom, self.top)
    }

    fn blocks_columns(&self, x0: f64, x1: f64) -> bool {
        [self.left, self.right]
            .iter()
            .flatten()
            .any(|&(b0, b1)| spans_overlap(x0, x1, b0, b1))
    }

    /// Cut a sheet around the lock blocks: part below, part beside, part above.
    fn split_sheet(&self, rect: Rect, label: &str, out: &mut Vec<CorePiece>) {
        if !self.crosses_rows(&rect) {
            out.push(CorePiece::from_rect(rect, label));
            return;
        }
        let mid_bottom = rect.y.max(self.bottom);
        let mid_top = rect.top().min(self.top);

        let below = Rect::new(rect.x, rect.y, rect.width, mid_bottom - rect.y);
        let x0 = self.left.map_or(rect.x, |(_, edge)| rect.x.max(edge));
        let x1 = self.right.map_or(rect.right(), |(edge, _)| rect.right().min(edge));
        let middle = Rect::new(x0, mid_bottom, x1 - x0, mid_top - mid_bottom);
        let above = Rect::new(rect.x, mid_top, rect.width, rect.top() - mid_top);

        for (part, suffix) in [(below, "bottom"), (middle, "middle"), (above, "top")] {
            if !part.is_empty() {
                out.push(CorePiece::from_rect(part, format!("{} {}", label, suffix)));
            }
        }
    }

    /// Cut a vertical strip segment around the lock blocks, dropping short
    /// remainders.
    fn split_strip(&self, rect: Rect, label: &str, min_len: f64, out: &mut Vec<CorePiece>) {
        if !(self.crosses_rows(&rect) && self.blocks_columns(rect.x, rect.right())) {
            out.push(CorePiece::from_rect(rect, label));
            return;
        }
        let lower = Rect::new(rect.x, rect.y, rect.width, self.bottom - rect.y);
        let upper = Rect::new(rect.x, self.top, rect.width, rect.top() - self.top);
        for (part, suffix) in [(lower, "lower"), (upper, "upper")] {
            if part.height >= min_len && !part.is_empty() {
                out.push(CorePiece::from_rect(part, format!("{} {}", label, suffix)));
            } else if part.height > 0.0 {
                trace!(label, height = part.height, "strip remainder dropped");
            }
        }
    }
}

/// Split the inner height into rows between horizontal bands.
fn rows_between(inner: &Rect, bands: &[(f64, f64)]) -> Vec<(f64, f64)> {
    let mut bands: Vec<(f64, f64)> = bands.to_vec();
    bands.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut rows = Vec::new();
    let mut start = inner.y;
    for (low, high) in bands {
        let low = low.clamp(inner.y, inner.top());
        let high = high.clamp(inner.y, inner.top());
        if low > start {
            rows.push((start, low));
        }
        start = start.max(high);
    }
    if inner.top() > start {
        rows.push((start, inner.top()));
    }
    rows
}

/// x-range of the centre double-frame member, if one is fitted.
fn center_member(layout: &StructuralLayout) -> Option<(f64, f64)> {
    let width = layout.double_frame.center_mm;
    (width > 0.0).then(|| {
        let mid = layout.door.width_mm / 2.0;
        (mid - width / 2.0, mid + width / 2.0)
    })
}

/// Cut every piece crossing the centre member into left and right parts.
fn split_at_center(pieces: Vec<CorePiece>, member: (f64, f64)) -> Vec<CorePiece> {
    let (m0, m1) = member;
    let mut out = Vec::with_capacity(pieces.len() + 4);
    for piece in pieces {
        let r = piece.rect();
        if !spans_overlap(r.x, r.right(), m0, m1) {
            out.push(piece);
            continue;
        }
        let left = Rect::new(r.x, r.y, m0 - r.x, r.height);
        let right = Rect::new(m1, r.y, r.right() - m1, r.height);
        for (part, side) in [(left, "left"), (right, "right")] {
            if !part.is_empty() {
                out.push(CorePiece::from_rect(part, format!("{} {}", piece.label, side)));
            }
        }
    }
    out
}

/// Lay out the core for a door.
pub fn calculate_core_layout(
    layout: &StructuralLayout,
    core: CoreType,
    config: &EngineConfig,
) -> CoreLayout {
    let inner = layout.inner;
    if inner.is_empty() {
        return CoreLayout::empty(core);
    }
    let zone = LockZone::new(layout);
    let spec = config.core_spec(core);
    let center = center_member(layout);
    let clear_of_center =
        |x: f64, t: f64| center.map_or(true, |(m0, m1)| !spans_overlap(x, x + t, m0, m1));

    let mut result = CoreLayout::empty(core);
    if core.kind() == CoreKind::Strips && !spec.has_usable_strips() {
        warn!(
            core = core.code(),
            thickness = spec.thickness_mm,
            spacing = spec.spacing_mm,
            "strip sizes cannot be laid, core left empty"
        );
        return result;
    }

    match core.layout_style() {
        CoreLayoutStyle::FullPanel => {
            zone.split_sheet(inner, "Core", &mut result.pieces);
            result.rows = 1;
        }
        CoreLayoutStyle::RowSegmented => {
            let rows = rows_between(&inner, &layout.rail_bands());
            for (i, (bottom, top)) in rows.iter().enumerate() {
                let row = Rect::new(inner.x, *bottom, inner.width, top - bottom);
                zone.split_sheet(row, &format!("Row {}", i + 1), &mut result.pieces);
            }
            result.rows = rows.len();
        }
        CoreLayoutStyle::FittedStrips => {
            let t = spec.thickness_mm;
            let nominal = spec.spacing_mm;
            let columns = if inner.width > nominal + t {
                let fit = ((inner.width - nominal) / (t + nominal)).floor() as usize;
                fit.min(MAX_STRIP_COLUMNS)
            } else {
                0
            };
            let spacing = (inner.width - columns as f64 * t) / (columns as f64 + 1.0);
            let xs: Vec<f64> = (0..columns)
                .map(|i| inner.x + spacing * (i as f64 + 1.0) + t * i as f64)
                .filter(|x| clear_of_center(*x, t))
                .collect();
            let rows = rows_between(&inner, &layout.rail_bands());
            lay_strips(&zone, &xs, t, &rows, config, &mut result.pieces);

            result.columns = xs.len();
            result.rows = rows.len();
            result.strip_thickness_mm = t;
            result.strip_spacing_mm = spacing;
        }
        CoreLayoutStyle::FixedPitchStrips => {
            let t = spec.thickness_mm;
            let spacing = spec.spacing_mm;
            let pitch = t + spacing;
            let columns = if inner.width >= t {
                let fit = ((inner.width + spacing) / pitch).floor() as usize;
                fit.min(MAX_STRIP_COLUMNS)
            } else {
                0
            };
            let occupied = columns as f64 * t + columns.saturating_sub(1) as f64 * spacing;
            let offset = (inner.width - occupied) / 2.0;
            let xs: Vec<f64> = (0..columns)
                .map(|i| inner.x + offset + pitch * i as f64)
                .filter(|x| clear_of_center(*x, t))
                .collect();

            let half = t / 2.0;
            let dam_bands: Vec<(f64, f64)> = layout
                .rail_positions_mm
                .iter()
                .map(|pos| (pos - half, pos + half))
                .filter(|(low, high)| *low >= inner.y && *high <= inner.top())
                .collect();
            let rows = rows_between(&inner, &dam_bands);
            lay_strips(&zone, &xs, t, &rows, config, &mut result.pieces);

            for (i, (low, high)) in dam_bands.iter().enumerate() {
                let dam = Rect::new(inner.x, *low, inner.width, high - low);
                zone.split_sheet(dam, &format!("Dam {}", i + 1), &mut result.pieces);
            }

            result.columns = xs.len();
            result.rows = rows.len();
            result.strip_thickness_mm = t;
            result.strip_spacing_mm = spacing;
            result.dam_strips = dam_bands.len();
        }
    }

    if let Some(member) = center {
        result.pieces = split_at_center(std::mem::take(&mut result.pieces), member);
    }
    result.covered_area_mm2 = result.pieces.iter().map(CorePiece::area_mm2).sum();
    debug!(
        core = core.code(),
        pieces = result.pieces.len(),
        columns = result.columns,
        rows = result.rows,
        "core layout computed"
    );
    result
}

fn lay_strips(
    zone: &LockZone,
    xs: &[f64],
    thickness: f64,
    rows: &[(f64, f64)],
    config: &EngineConfig,
    out: &mut Vec<CorePiece>,
) {
    for (c, x) in xs.iter().enumerate() {
        for (r, (bottom, top)) in rows.iter().enumerate() {
            let segment = Rect::new(*x, *bottom, thickness, top - bottom);
            let label = format!("Strip {}-{}", c + 1, r + 1);
            zone.split_strip(segment, &label, config.min_strip_remainder_mm, out);
        }
    }
}
