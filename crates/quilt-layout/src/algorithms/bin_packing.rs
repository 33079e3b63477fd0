#![forbid(unsafe_code)]

//! Free-rectangle bin packing with a bottom-left heuristic.

use quilt_core::geometry::{CellRect, CellSize};
use tracing::warn;

use super::{Placement, PlacementSet, PlacementSpec};

/// Weight of the x term in the placement score. Rows dominate; the x term
/// only breaks ties within a row.
const X_WEIGHT: f32 = 0.1;

/// Pack widgets largest-first into a free-rectangle list.
///
/// Widgets are processed by area descending, ties broken by height
/// descending. Each is placed into the free rectangle minimizing
/// `y + 0.1 * x`; a widget no free rectangle can hold goes to the overflow
/// row below everything placed so far. After each placement, every free
/// rectangle overlapping the used region is split into up to four
/// remainders and fully-contained rectangles are dropped.
///
/// Placements come back in input order regardless of packing order.
#[must_use]
pub fn bin_packing(specs: &[PlacementSpec], container: CellSize, spacing: u16) -> PlacementSet {
    let mut order: Vec<usize> = (0..specs.len()).collect();
    order.sort_by(|&a, &b| {
        let (sa, sb) = (specs[a].size, specs[b].size);
        sb.area()
            .cmp(&sa.area())
            .then(sb.h.cmp(&sa.h))
    });

    let mut free: Vec<CellRect> = vec![CellRect::from_size(container)];
    let mut rects: Vec<Option<CellRect>> = vec![None; specs.len()];
    let mut overflowed = Vec::new();
    let mut max_bottom = 0u16;

    for idx in order {
        let spec = &specs[idx];
        let w = spec.size.w.clamp(1, container.w.max(1));
        let h = spec.size.h.max(1);

        let best = free
            .iter()
            .filter(|r| r.w >= w && r.h >= h)
            .min_by(|a, b| score(a).total_cmp(&score(b)))
            .copied();

        let rect = match best {
            Some(slot) => CellRect::new(slot.x, slot.y, w, h),
            None => {
                // Overflow: below the tallest placed widget, flush left.
                let y = if max_bottom == 0 {
                    0
                } else {
                    max_bottom.saturating_add(spacing)
                };
                warn!(widget = %spec.widget, "bin packing overflow placement");
                overflowed.push(spec.widget.clone());
                CellRect::new(0, y, w, h)
            }
        };

        max_bottom = max_bottom.max(rect.bottom());
        rects[idx] = Some(rect);

        // The used region reserves the gutter to the right and below.
        let used = CellRect::new(
            rect.x,
            rect.y,
            rect.w.saturating_add(spacing),
            rect.h.saturating_add(spacing),
        );
        split_free_rects(&mut free, &used);
    }

    let placements = specs
        .iter()
        .zip(rects)
        .map(|(spec, rect)| Placement {
            widget: spec.widget.clone(),
            // Unwrap is safe: every index in `order` was filled above.
            rect: rect.unwrap_or_default(),
        })
        .collect();

    PlacementSet {
        placements,
        overflowed,
    }
}

#[inline]
fn score(rect: &CellRect) -> f32 {
    f32::from(rect.y) + X_WEIGHT * f32::from(rect.x)
}

/// Split every free rectangle overlapping `used` into up to four
/// remainders, then drop rectangles fully contained in another.
fn split_free_rects(free: &mut Vec<CellRect>, used: &CellRect) {
    let mut next = Vec::with_capacity(free.len() + 4);
    for rect in free.drain(..) {
        if !rect.overlaps(used) {
            next.push(rect);
            continue;
        }
        // Left remainder.
        if used.x > rect.x {
            next.push(CellRect::new(rect.x, rect.y, used.x - rect.x, rect.h));
        }
        // Right remainder.
        if rect.right() > used.right() {
            next.push(CellRect::new(
                used.right(),
                rect.y,
                rect.right() - used.right(),
                rect.h,
            ));
        }
        // Top remainder.
        if used.y > rect.y {
            next.push(CellRect::new(rect.x, rect.y, rect.w, used.y - rect.y));
        }
        // Bottom remainder.
        if rect.bottom() > used.bottom() {
            next.push(CellRect::new(
                rect.x,
                used.bottom(),
                rect.w,
                rect.bottom() - used.bottom(),
            ));
        }
    }

    // Drop any rectangle fully contained in another.
    let mut keep = vec![true; next.len()];
    for i in 0..next.len() {
        if !keep[i] {
            continue;
        }
        for j in 0..next.len() {
            if i != j && keep[i] && keep[j] && next[j].contains_rect(&next[i]) {
                // Identical rects: keep the first.
                if next[i] == next[j] && i < j {
                    keep[j] = false;
                } else {
                    keep[i] = false;
                }
            }
        }
    }
    *free = next
        .into_iter()
        .zip(keep)
        .filter_map(|(r, k)| k.then_some(r))
        .collect();
}

#[cfg(test)]
mod tests {
    use super::bin_packing;
    use crate::algorithms::PlacementSpec;
    use quilt_core::geometry::{CellRect, CellSize};

    #[test]
    fn two_widgets_share_the_top_row() {
        // (4,2) and (2,2) into a 6-wide container: both land in row 0.
        let specs = vec![
            PlacementSpec::new("a", CellSize::new(4, 2)),
            PlacementSpec::new("b", CellSize::new(2, 2)),
        ];
        let out = bin_packing(&specs, CellSize::new(6, 8), 0);
        assert_eq!(out.rect_for(&"a".into()), Some(CellRect::new(0, 0, 4, 2)));
        assert_eq!(out.rect_for(&"b".into()), Some(CellRect::new(4, 0, 2, 2)));
        assert!(out.overflowed.is_empty());
    }

    #[test]
    fn larger_area_packs_first() {
        let specs = vec![
            PlacementSpec::new("small", CellSize::new(1, 1)),
            PlacementSpec::new("large", CellSize::new(4, 4)),
        ];
        let out = bin_packing(&specs, CellSize::new(6, 8), 0);
        assert_eq!(
            out.rect_for(&"large".into()),
            Some(CellRect::new(0, 0, 4, 4))
        );
        // The small widget lands beside it, not below.
        assert_eq!(
            out.rect_for(&"small".into()),
            Some(CellRect::new(4, 0, 1, 1))
        );
    }

    #[test]
    fn area_ties_break_by_height() {
        let specs = vec![
            PlacementSpec::new("wide", CellSize::new(4, 1)),
            PlacementSpec::new("tall", CellSize::new(1, 4)),
        ];
        let out = bin_packing(&specs, CellSize::new(6, 8), 0);
        // Same area; the taller widget packs first and takes the origin.
        assert_eq!(out.rect_for(&"tall".into()), Some(CellRect::new(0, 0, 1, 4)));
        assert_eq!(out.rect_for(&"wide".into()), Some(CellRect::new(1, 0, 4, 1)));
    }

    #[test]
    fn no_overlap_among_packed_widgets() {
        let specs: Vec<PlacementSpec> = (0..10u16)
            .map(|i| PlacementSpec::new(format!("w{i}"), CellSize::new(1 + i % 4, 1 + i % 3)))
            .collect();
        let out = bin_packing(&specs, CellSize::new(12, 30), 1);
        for (i, a) in out.placements.iter().enumerate() {
            for b in &out.placements[i + 1..] {
                assert!(
                    !a.rect.overlaps(&b.rect),
                    "{} overlaps {}",
                    a.widget,
                    b.widget
                );
            }
        }
    }

    #[test]
    fn unfittable_widget_goes_to_overflow_row() {
        let specs = vec![
            PlacementSpec::new("fits", CellSize::new(5, 5)),
            PlacementSpec::new("huge", CellSize::new(4, 6)),
        ];
        let out = bin_packing(&specs, CellSize::new(6, 8), 0);
        assert_eq!(out.overflowed, vec!["huge".into()]);
        // Overflow lands below the tallest placed widget.
        let huge = out.rect_for(&"huge".into()).unwrap();
        let fits = out.rect_for(&"fits".into()).unwrap();
        assert_eq!(huge.x, 0);
        assert!(huge.y >= fits.bottom());
    }

    #[test]
    fn spacing_reserves_gutters() {
        let specs = vec![
            PlacementSpec::new("a", CellSize::new(2, 2)),
            PlacementSpec::new("b", CellSize::new(2, 2)),
        ];
        let out = bin_packing(&specs, CellSize::new(6, 8), 1);
        let a = out.rect_for(&"a".into()).unwrap();
        let b = out.rect_for(&"b".into()).unwrap();
        // One clear cell between the two placements.
        assert!(b.x >= a.right() + 1 || a.x >= b.right() + 1 || b.y >= a.bottom() + 1);
    }
}
