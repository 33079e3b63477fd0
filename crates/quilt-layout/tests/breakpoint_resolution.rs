#![forbid(unsafe_code)]

//! Breakpoint resolution and grid recomputation across container widths.

use proptest::prelude::*;
use quilt_core::breakpoint::{Breakpoint, Breakpoints};
use quilt_core::item::GridConfig;
use quilt_layout::grid::{self, MIN_CELL_PX};

#[test]
fn documented_threshold_table_resolves_1200_to_xl() {
    // {xs:0, sm:576, md:768, lg:992, xl:1200, xxl:1400}
    let bps = Breakpoints::default();
    assert_eq!(bps.resolve(1200.0), Breakpoint::Xl);
}

#[test]
fn each_threshold_is_the_tier_floor() {
    let bps = Breakpoints::default();
    for bp in Breakpoint::ALL {
        assert_eq!(bps.resolve(bps.threshold(bp)), bp);
        if bps.threshold(bp) > 0.0 {
            assert!(bps.resolve(bps.threshold(bp) - 0.5) < bp);
        }
    }
}

proptest! {
    #[test]
    fn resolution_is_monotonic(a in 0.0f32..4000.0, b in 0.0f32..4000.0) {
        let bps = Breakpoints::default();
        let (narrow, wide) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(bps.resolve(narrow) <= bps.resolve(wide));
    }

    #[test]
    fn recompute_always_has_a_column(width in 1.0f32..4000.0) {
        let g = grid::recompute_grid(&GridConfig::default(), width);
        prop_assert!(g.cols >= 1);
        prop_assert!(g.cell_size_px >= 1.0);
    }

    #[test]
    fn recompute_tiles_wide_containers_exactly(width in 400.0f32..4000.0) {
        let template = GridConfig { cols: u16::MAX, ..GridConfig::default() };
        let g = grid::recompute_grid(&template, width);
        let tiled = g.gap_px * f32::from(g.cols + 1) + f32::from(g.cols) * g.cell_size_px;
        prop_assert!((tiled - width).abs() < 0.1);
        prop_assert!(g.cell_size_px + 0.01 >= MIN_CELL_PX);
    }
}
