#![forbid(unsafe_code)]

//! Recursive golden-ratio partition, highest priority first.

use quilt_core::geometry::{CellRect, CellSize};
use tracing::warn;

use super::{Placement, PlacementSet, PlacementSpec};

/// The golden ratio.
const PHI: f32 = 1.618_034;

/// Partition the container by repeated golden-ratio splits.
///
/// Widgets are ordered by priority descending (ties keep input order).
/// Each takes the major partition of the remaining region, split along the
/// region's longer axis at the golden-ratio point: a cut through x when
/// `width > height * φ`, else through y. The minor partition becomes the
/// region for the rest. A widget reaching an empty region is placed at the
/// deterministic overflow position below everything placed.
///
/// Partition sizes override the requested footprints; callers clamp the
/// results back into widget constraints when materializing placements.
#[must_use]
pub fn golden_ratio(specs: &[PlacementSpec], container: CellSize) -> PlacementSet {
    let mut order: Vec<usize> = (0..specs.len()).collect();
    order.sort_by(|&a, &b| specs[b].priority.cmp(&specs[a].priority));

    let mut region = CellRect::from_size(container);
    let mut rects: Vec<Option<CellRect>> = vec![None; specs.len()];
    let mut overflowed = Vec::new();
    let mut max_bottom = 0u16;

    let last = *order.last().unwrap_or(&0);
    for idx in order {
        let spec = &specs[idx];
        if region.is_empty() {
            warn!(widget = %spec.widget, "golden-ratio region exhausted");
            let rect = CellRect::new(
                0,
                max_bottom,
                spec.size.w.clamp(1, container.w.max(1)),
                spec.size.h.max(1),
            );
            max_bottom = rect.bottom();
            rects[idx] = Some(rect);
            overflowed.push(spec.widget.clone());
            continue;
        }

        // The last widget takes whatever remains whole.
        let rect = if idx == last {
            region
        } else if f32::from(region.w) > f32::from(region.h) * PHI {
            // Wide region: vertical cut at the golden point.
            let major = golden_major(region.w);
            let taken = CellRect::new(region.x, region.y, major, region.h);
            region = CellRect::new(region.x + major, region.y, region.w - major, region.h);
            taken
        } else {
            // Tall (or square-ish) region: horizontal cut.
            let major = golden_major(region.h);
            let taken = CellRect::new(region.x, region.y, region.w, major);
            region = CellRect::new(region.x, region.y + major, region.w, region.h - major);
            taken
        };

        max_bottom = max_bottom.max(rect.bottom());
        rects[idx] = Some(rect);
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
        overflowed,
    }
}

/// Major share of a golden split, at least one cell and strictly less than
/// the whole when the whole allows it.
#[inline]
fn golden_major(extent: u16) -> u16 {
    let major = (f32::from(extent) / PHI).round() as u16;
    major.clamp(1, extent.saturating_sub(1).max(1))
}
