#![forbid(unsafe_code)]

//! Pure AABB collision tests over placed items.
//!
//! These functions take the item set by reference and mutate nothing, so
//! the interaction path can validate candidates mid-gesture and the engine
//! can self-check committed layouts with the same code.

use quilt_core::breakpoint::Breakpoint;
use quilt_core::geometry::{CellPoint, CellRect, CellSize};
use quilt_core::item::{GridConfig, ItemId, LayoutItem};

/// Strict AABB intersection: touching edges do not count as overlap.
#[must_use]
pub fn overlaps(a: &CellRect, b: &CellRect) -> bool {
    a.overlaps(b)
}

/// Check a candidate placement against all other items at a breakpoint.
///
/// Collapsed items, items hidden at `bp`, items without a resolvable
/// placement, and the item named by `exclude` are skipped.
#[must_use]
pub fn has_collision(
    candidate: CellRect,
    items: &[LayoutItem],
    exclude: Option<&ItemId>,
    bp: Breakpoint,
) -> bool {
    items.iter().any(|item| {
        if Some(&item.id) == exclude || !item.participates_at(bp) {
            return false;
        }
        item.rect_at(bp)
            .is_some_and(|rect| rect.overlaps(&candidate))
    })
}

/// Row-major scan for the first free slot able to hold `size`.
///
/// Scans `y` from zero downward, unbounded by `grid.rows` (the container
/// grows), and `x` across `[0, cols - w]`; a slot therefore always exists
/// for any size that fits the grid horizontally. Sizes wider than the grid
/// are clamped to the full width first.
#[must_use]
pub fn first_free_position(
    size: CellSize,
    items: &[LayoutItem],
    grid: &GridConfig,
    bp: Breakpoint,
    exclude: Option<&ItemId>,
) -> CellPoint {
    let w = size.w.clamp(1, grid.cols.max(1));
    let h = size.h.max(1);

    let mut y = 0u16;
    loop {
        for x in 0..=grid.cols.saturating_sub(w) {
            let candidate = CellRect::new(x, y, w, h);
            if !has_collision(candidate, items, exclude, bp) {
                return CellPoint::new(x, y);
            }
        }
        y = y.saturating_add(1);
        if y == u16::MAX {
            // Pathological item set; bottom of the addressable grid.
            return CellPoint::new(0, u16::MAX);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{first_free_position, has_collision, overlaps};
    use quilt_core::breakpoint::Breakpoint;
    use quilt_core::geometry::{CellPoint, CellRect, CellSize};
    use quilt_core::item::{GridConfig, LayoutItem};

    const BP: Breakpoint = Breakpoint::Md;

    fn items(rects: &[(&str, CellRect)]) -> Vec<LayoutItem> {
        rects
            .iter()
            .map(|(id, rect)| LayoutItem::new(*id, format!("w-{id}"), *rect))
            .collect()
    }

    // --- overlaps ---

    #[test]
    fn strict_overlap_semantics() {
        let a = CellRect::new(0, 0, 4, 2);
        assert!(overlaps(&a, &CellRect::new(3, 1, 2, 2)));
        assert!(!overlaps(&a, &CellRect::new(4, 0, 2, 2)));
        assert!(!overlaps(&a, &CellRect::new(0, 2, 4, 2)));
    }

    // --- has_collision ---

    #[test]
    fn collision_skips_excluded_item() {
        let set = items(&[("a", CellRect::new(0, 0, 2, 2))]);
        let candidate = CellRect::new(1, 1, 2, 2);
        assert!(has_collision(candidate, &set, None, BP));
        assert!(!has_collision(candidate, &set, Some(&"a".into()), BP));
    }

    #[test]
    fn collision_skips_collapsed_and_hidden() {
        let mut set = items(&[
            ("a", CellRect::new(0, 0, 2, 2)),
            ("b", CellRect::new(2, 0, 2, 2)),
        ]);
        set[0].collapsed = true;
        set[1].hidden.set(Breakpoint::Xs, true);
        assert!(!has_collision(CellRect::new(0, 0, 4, 2), &set, None, BP));
    }

    // --- first_free_position ---

    #[test]
    fn free_scan_prefers_top_left() {
        let grid = GridConfig {
            cols: 6,
            ..GridConfig::default()
        };
        let set = items(&[("a", CellRect::new(0, 0, 4, 2))]);
        assert_eq!(
            first_free_position(CellSize::new(2, 2), &set, &grid, BP, None),
            CellPoint::new(4, 0)
        );
    }

    #[test]
    fn free_scan_wraps_to_next_row() {
        let grid = GridConfig {
            cols: 6,
            ..GridConfig::default()
        };
        let set = items(&[("a", CellRect::new(0, 0, 6, 2))]);
        assert_eq!(
            first_free_position(CellSize::new(3, 1), &set, &grid, BP, None),
            CellPoint::new(0, 2)
        );
    }

    #[test]
    fn free_scan_grows_past_soft_rows() {
        let grid = GridConfig {
            cols: 2,
            rows: 2,
            ..GridConfig::default()
        };
        let set = items(&[("a", CellRect::new(0, 0, 2, 40))]);
        assert_eq!(
            first_free_position(CellSize::new(2, 2), &set, &grid, BP, None),
            CellPoint::new(0, 40)
        );
    }

    #[test]
    fn oversized_requests_clamp_to_grid_width() {
        let grid = GridConfig {
            cols: 4,
            ..GridConfig::default()
        };
        assert_eq!(
            first_free_position(CellSize::new(10, 2), &[], &grid, BP, None),
            CellPoint::new(0, 0)
        );
    }
}
