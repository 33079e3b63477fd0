#![forbid(unsafe_code)]

//! The grid model: pixel space to grid cells and back.
//!
//! Conversions are deterministic functions of one breakpoint's
//! [`GridConfig`]. A cell at index `i` starts at `gap + i * (cell + gap)`
//! pixels, so the grid carries a gutter on every edge and between every
//! pair of cells. A span of `w` cells measures `w * cell + (w - 1) * gap`
//! pixels.
//!
//! [`GridModel`] additionally tracks the measured container width and the
//! active breakpoint across a stream of resize-observer measurements.

use quilt_core::breakpoint::{Breakpoint, Breakpoints};
use quilt_core::geometry::{CellPoint, CellRect, PxPoint, PxRect};
use quilt_core::item::GridConfig;

/// Smallest usable cell edge, in pixels. Column derivation never produces
/// cells narrower than this.
pub const MIN_CELL_PX: f32 = 80.0;

/// Convert a cell coordinate to the pixel position of its top-left corner.
#[must_use]
pub fn to_pixels(grid: &GridConfig, cell: CellPoint) -> PxPoint {
    PxPoint::new(
        grid.gap_px + f32::from(cell.x) * (grid.cell_size_px + grid.gap_px),
        grid.gap_px + f32::from(cell.y) * (grid.cell_size_px + grid.gap_px),
    )
}

/// Convert a pixel position to the nearest cell coordinate.
///
/// Negative pixel positions clamp to cell zero.
#[must_use]
pub fn to_cell(grid: &GridConfig, px: PxPoint) -> CellPoint {
    let stride = grid.cell_size_px + grid.gap_px;
    if stride <= 0.0 {
        return CellPoint::new(0, 0);
    }
    let x = ((px.x - grid.gap_px) / stride).round().max(0.0);
    let y = ((px.y - grid.gap_px) / stride).round().max(0.0);
    CellPoint::new(x as u16, y as u16)
}

/// Pixel length of a span of `cells` grid cells, gutters included.
#[must_use]
pub fn span_px(grid: &GridConfig, cells: u16) -> f32 {
    if cells == 0 {
        return 0.0;
    }
    f32::from(cells) * grid.cell_size_px + f32::from(cells - 1) * grid.gap_px
}

/// Snap a pixel length to the nearest whole number of cells (at least 1).
#[must_use]
pub fn snap_span(grid: &GridConfig, px: f32) -> u16 {
    let stride = grid.cell_size_px + grid.gap_px;
    if stride <= 0.0 {
        return 1;
    }
    (((px + grid.gap_px) / stride).round().max(1.0)) as u16
}

/// Pixel extent of a placement rectangle.
#[must_use]
pub fn rect_to_px(grid: &GridConfig, rect: CellRect) -> PxRect {
    let origin = to_pixels(grid, rect.position());
    PxRect::new(
        origin.x,
        origin.y,
        span_px(grid, rect.w),
        span_px(grid, rect.h),
    )
}

/// Derive grid geometry for a container width.
///
/// Columns are bounded below by [`MIN_CELL_PX`] usable cell width and the
/// cell size is recomputed to exactly tile the width after gutters:
/// `width = gap * (cols + 1) + cols * cell`. Always yields `cols >= 1`.
#[must_use]
pub fn recompute_grid(template: &GridConfig, container_width: f32) -> GridConfig {
    let gap = template.gap_px.max(0.0);
    let usable = (container_width - gap).max(0.0);
    let cols = ((usable / (MIN_CELL_PX + gap)).floor() as u16).clamp(1, template.cols.max(1));
    let cell = ((container_width - gap * (f32::from(cols) + 1.0)) / f32::from(cols)).max(1.0);
    GridConfig {
        cols,
        rows: template.rows,
        cell_size_px: cell,
        gap_px: gap,
    }
}

/// Breakpoint tracking over a stream of container measurements.
#[derive(Debug, Clone)]
pub struct GridModel {
    breakpoints: Breakpoints,
    container_width: f32,
    active: Breakpoint,
}

impl Default for GridModel {
    fn default() -> Self {
        Self::new(Breakpoints::default())
    }
}

impl GridModel {
    /// Create a model with a threshold table and no measurement yet.
    #[must_use]
    pub fn new(breakpoints: Breakpoints) -> Self {
        Self {
            breakpoints,
            container_width: 0.0,
            active: breakpoints.resolve(0.0),
        }
    }

    /// The threshold table in use.
    #[must_use]
    pub fn breakpoints(&self) -> &Breakpoints {
        &self.breakpoints
    }

    /// Resolve a width against the threshold table without storing it.
    #[must_use]
    pub fn resolve_breakpoint(&self, container_width: f32) -> Breakpoint {
        self.breakpoints.resolve(container_width)
    }

    /// Record a container measurement; returns the newly active breakpoint
    /// when the measurement crossed a threshold.
    pub fn measure(&mut self, container_width: f32) -> Option<Breakpoint> {
        self.container_width = container_width;
        let bp = self.breakpoints.resolve(container_width);
        if bp != self.active {
            self.active = bp;
            Some(bp)
        } else {
            None
        }
    }

    /// The active breakpoint from the latest measurement.
    #[must_use]
    pub fn active(&self) -> Breakpoint {
        self.active
    }

    /// The latest measured container width.
    #[must_use]
    pub fn container_width(&self) -> f32 {
        self.container_width
    }

    /// Derive grid geometry for the latest measurement.
    #[must_use]
    pub fn recompute(&self, template: &GridConfig) -> GridConfig {
        recompute_grid(template, self.container_width)
    }
}

#[cfg(test)]
mod tests {
    use super::{GridModel, recompute_grid, snap_span, span_px, to_cell, to_pixels};
    use quilt_core::breakpoint::{Breakpoint, Breakpoints};
    use quilt_core::geometry::{CellPoint, CellRect, PxPoint};
    use quilt_core::item::GridConfig;

    fn grid() -> GridConfig {
        GridConfig {
            cols: 12,
            rows: 8,
            cell_size_px: 100.0,
            gap_px: 10.0,
        }
    }

    // --- Conversions ---

    #[test]
    fn to_pixels_accounts_for_gutters() {
        let g = grid();
        assert_eq!(to_pixels(&g, CellPoint::new(0, 0)), PxPoint::new(10.0, 10.0));
        assert_eq!(
            to_pixels(&g, CellPoint::new(2, 1)),
            PxPoint::new(230.0, 120.0)
        );
    }

    #[test]
    fn to_cell_rounds_to_nearest() {
        let g = grid();
        assert_eq!(to_cell(&g, PxPoint::new(10.0, 10.0)), CellPoint::new(0, 0));
        // Past the midpoint of the stride, the next cell wins.
        assert_eq!(to_cell(&g, PxPoint::new(70.0, 10.0)), CellPoint::new(1, 0));
        assert_eq!(to_cell(&g, PxPoint::new(40.0, 10.0)), CellPoint::new(0, 0));
    }

    #[test]
    fn to_cell_clamps_negative_positions() {
        let g = grid();
        assert_eq!(
            to_cell(&g, PxPoint::new(-500.0, -500.0)),
            CellPoint::new(0, 0)
        );
    }

    #[test]
    fn conversions_round_trip_on_cell_corners() {
        let g = grid();
        for x in 0..6 {
            for y in 0..6 {
                let cell = CellPoint::new(x, y);
                assert_eq!(to_cell(&g, to_pixels(&g, cell)), cell);
            }
        }
    }

    #[test]
    fn span_and_snap_are_inverse() {
        let g = grid();
        assert_eq!(span_px(&g, 0), 0.0);
        assert_eq!(span_px(&g, 1), 100.0);
        assert_eq!(span_px(&g, 3), 320.0);
        for cells in 1..10 {
            assert_eq!(snap_span(&g, span_px(&g, cells)), cells);
        }
    }

    #[test]
    fn rect_to_px_composes_origin_and_span() {
        let g = grid();
        let px = super::rect_to_px(&g, CellRect::new(1, 0, 2, 3));
        assert_eq!(px.x, 120.0);
        assert_eq!(px.y, 10.0);
        assert_eq!(px.w, 210.0);
        assert_eq!(px.h, 320.0);
    }

    // --- Recompute ---

    #[test]
    fn recompute_tiles_width_exactly() {
        let g = recompute_grid(&grid(), 1200.0);
        let tiled = g.gap_px * f32::from(g.cols + 1) + f32::from(g.cols) * g.cell_size_px;
        assert!((tiled - 1200.0).abs() < 0.01);
        assert!(g.cell_size_px >= super::MIN_CELL_PX);
    }

    #[test]
    fn recompute_never_yields_zero_cols() {
        let g = recompute_grid(&grid(), 20.0);
        assert_eq!(g.cols, 1);
        assert!(g.cell_size_px >= 1.0);
    }

    #[test]
    fn recompute_caps_at_template_cols() {
        let g = recompute_grid(&grid(), 10_000.0);
        assert_eq!(g.cols, 12);
    }

    // --- Measurement tracking ---

    #[test]
    fn measure_reports_threshold_crossings_only() {
        let mut model = GridModel::new(Breakpoints::default());
        assert_eq!(model.measure(800.0), Some(Breakpoint::Md));
        assert_eq!(model.measure(820.0), None);
        assert_eq!(model.measure(1250.0), Some(Breakpoint::Xl));
        assert_eq!(model.active(), Breakpoint::Xl);
        assert_eq!(model.container_width(), 1250.0);
    }

    #[test]
    fn spec_scenario_1200px_resolves_xl() {
        let model = GridModel::default();
        assert_eq!(model.resolve_breakpoint(1200.0), Breakpoint::Xl);
    }
}
