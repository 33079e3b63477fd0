#![forbid(unsafe_code)]

//! Shortest-column masonry.

use quilt_core::geometry::{CellRect, CellSize};

use super::{Placement, PlacementSet, PlacementSpec};

/// Fill a fixed number of columns, always extending the shortest.
///
/// Widgets keep their input order. Each is assigned to the currently
/// shortest column (leftmost on ties), its width clamped to the column
/// width, and the column's running height grows by the widget height plus
/// spacing. Every widget fits by construction, so nothing overflows.
#[must_use]
pub fn masonry(
    specs: &[PlacementSpec],
    container: CellSize,
    spacing: u16,
    columns: u16,
) -> PlacementSet {
    let columns = columns.clamp(1, container.w.max(1));
    let gutters = spacing.saturating_mul(columns - 1);
    let col_width = (container.w.saturating_sub(gutters) / columns).max(1);

    let mut heights = vec![0u16; columns as usize];
    let placements = specs
        .iter()
        .map(|spec| {
            let col = shortest_column(&heights);
            let x = col as u16 * (col_width + spacing);
            let y = heights[col];
            let w = spec.size.w.clamp(1, col_width);
            let h = spec.size.h.max(1);
            heights[col] = y.saturating_add(h).saturating_add(spacing);
            Placement {
                widget: spec.widget.clone(),
                rect: CellRect::new(x, y, w, h),
            }
        })
        .collect();

    PlacementSet {
        placements,
        overflowed: Vec::new(),
    }
}

#[inline]
fn shortest_column(heights: &[u16]) -> usize {
    let mut best = 0;
    for (i, h) in heights.iter().enumerate() {
        if *h < heights[best] {
            best = i;
        }
    }
    best
}
