#![forbid(unsafe_code)]

//! Greedy row flow, highest priority first.

use quilt_core::geometry::{CellRect, CellSize};

use super::{Placement, PlacementSet, PlacementSpec};

/// Flow widgets into rows, priority descending.
///
/// Widgets are sorted by priority descending (ties keep input order) and
/// laid out left to right. When the next widget would cross the container's
/// right edge the cursor wraps to a new row below the tallest widget of the
/// current row. Widths wider than the container clamp to it, so every
/// widget fits.
#[must_use]
pub fn priority_flow(specs: &[PlacementSpec], container: CellSize, spacing: u16) -> PlacementSet {
    let mut order: Vec<usize> = (0..specs.len()).collect();
    order.sort_by(|&a, &b| specs[b].priority.cmp(&specs[a].priority));

    let cols = container.w.max(1);
    let mut rects: Vec<Option<CellRect>> = vec![None; specs.len()];
    let mut x = 0u16;
    let mut y = 0u16;
    let mut row_h = 0u16;

    for idx in order {
        let spec = &specs[idx];
        let w = spec.size.w.clamp(1, cols);
        let h = spec.size.h.max(1);

        if x.saturating_add(w) > cols {
            // Wrap below the tallest widget of the finished row.
            x = 0;
            y = y.saturating_add(row_h).saturating_add(spacing);
            row_h = 0;
        }

        rects[idx] = Some(CellRect::new(x, y, w, h));
        row_h = row_h.max(h);
        x = x.saturating_add(w).saturating_add(spacing);
    }

    let placements = specs
        .iter()
        .zip(rects)
        .map(|(spec, rect)| Placement {
            widget: spec.widget.clone(),
            rect: rect.unwrap_or_default(),
        })
        .collect();

    PlacementSet {
        placements,
        overflowed: Vec::new(),
    }
}
