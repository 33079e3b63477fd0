#![forbid(unsafe_code)]

//! The drag/resize interaction state machine.
//!
//! States are `Idle`, `Dragging`, and `Resizing`. A gesture is well-formed:
//! exactly one begin, zero or more updates, ending in a finish (pointer up)
//! or a cancel. Updates compute a snapped, clamped candidate placement and
//! accept it only when it is collision-free; a rejected candidate leaves
//! the gesture at its last valid placement, so drags "stick" against
//! obstacles instead of jumping through them.
//!
//! The machine owns no layout: callers feed it the item set and grid
//! geometry and apply the rectangles it returns. Locked widgets and locked
//! layouts never leave `Idle`.

use quilt_core::breakpoint::Breakpoint;
use quilt_core::geometry::{CellPoint, CellRect, PxPoint};
use quilt_core::item::{GridConfig, ItemId, LayoutItem};
use quilt_core::widget::{Constraints, Widget};
use quilt_layout::collision::has_collision;
use quilt_layout::grid;
use tracing::trace;

/// Which edge or corner a resize gesture grips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeEdge {
    North,
    South,
    East,
    West,
    NorthWest,
    NorthEast,
    SouthWest,
    SouthEast,
}

impl ResizeEdge {
    /// The gesture moves the left edge.
    #[must_use]
    pub const fn moves_left(self) -> bool {
        matches!(
            self,
            ResizeEdge::West | ResizeEdge::NorthWest | ResizeEdge::SouthWest
        )
    }

    /// The gesture moves the top edge.
    #[must_use]
    pub const fn moves_top(self) -> bool {
        matches!(
            self,
            ResizeEdge::North | ResizeEdge::NorthWest | ResizeEdge::NorthEast
        )
    }

    /// The gesture changes width.
    #[must_use]
    pub const fn horizontal(self) -> bool {
        !matches!(self, ResizeEdge::North | ResizeEdge::South)
    }

    /// The gesture changes height.
    #[must_use]
    pub const fn vertical(self) -> bool {
        !matches!(self, ResizeEdge::East | ResizeEdge::West)
    }

    /// Corner grips drive both axes.
    #[must_use]
    pub const fn is_corner(self) -> bool {
        self.horizontal() && self.vertical()
    }
}

/// Tuning for gesture interpretation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionConfig {
    /// Round pixel positions to the nearest cell; when off, positions
    /// truncate toward the origin instead.
    pub snap_to_grid: bool,
    /// Corner resizes keep the item's original aspect ratio.
    pub preserve_aspect: bool,
    /// Minimum pointer travel in pixels before a drag engages; below it a
    /// down/up pair is a click, not a gesture.
    pub drag_threshold_px: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            snap_to_grid: true,
            preserve_aspect: false,
            drag_threshold_px: 4.0,
        }
    }
}

/// The state of the machine.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionState {
    Idle,
    Dragging {
        item: ItemId,
        /// Pointer-to-item-origin offset captured at pointer down.
        offset: PxPoint,
        start: PxPoint,
        origin: CellRect,
        current: CellRect,
    },
    Resizing {
        item: ItemId,
        edge: ResizeEdge,
        start: PxPoint,
        origin: CellRect,
        current: CellRect,
        constraints: Constraints,
    },
}

/// A finished or cancelled gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureEnd {
    pub item: ItemId,
    /// Placement when the gesture began.
    pub origin: CellRect,
    /// Placement to apply: the last valid candidate on finish, the origin
    /// on cancel.
    pub rect: CellRect,
    /// Whether the gesture produced a placement different from the origin.
    pub changed: bool,
}

/// The drag/resize state machine.
#[derive(Debug, Clone)]
pub struct Interaction {
    config: InteractionConfig,
    state: InteractionState,
}

impl Default for Interaction {
    fn default() -> Self {
        Self::new(InteractionConfig::default())
    }
}

impl Interaction {
    /// Create an idle machine.
    #[must_use]
    pub fn new(config: InteractionConfig) -> Self {
        Self {
            config,
            state: InteractionState::Idle,
        }
    }

    /// The current state.
    #[must_use]
    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self.state, InteractionState::Idle)
    }

    /// The item a gesture currently holds, if any.
    #[must_use]
    pub fn active_item(&self) -> Option<&ItemId> {
        match &self.state {
            InteractionState::Idle => None,
            InteractionState::Dragging { item, .. } | InteractionState::Resizing { item, .. } => {
                Some(item)
            }
        }
    }

    /// `Idle -> Dragging` on pointer down over a movable, unlocked item.
    ///
    /// Returns whether the transition happened.
    pub fn begin_drag(
        &mut self,
        item: &LayoutItem,
        widget: &Widget,
        layout_locked: bool,
        pointer: PxPoint,
        grid_cfg: &GridConfig,
        bp: Breakpoint,
    ) -> bool {
        if !self.is_idle() || layout_locked || !widget.is_movable() {
            return false;
        }
        let Some(rect) = item.rect_at(bp) else {
            return false;
        };
        let origin_px = grid::to_pixels(grid_cfg, rect.position());
        self.state = InteractionState::Dragging {
            item: item.id.clone(),
            offset: PxPoint::new(pointer.x - origin_px.x, pointer.y - origin_px.y),
            start: pointer,
            origin: rect,
            current: rect,
        };
        trace!(item = %item.id, "drag started");
        true
    }

    /// `Dragging -> Dragging` on pointer move.
    ///
    /// Returns the accepted candidate when the placement changed; `None`
    /// when the pointer is below the engage threshold, the candidate is
    /// unchanged, or a collision rejected it (the drag sticks).
    pub fn update_drag(
        &mut self,
        pointer: PxPoint,
        items: &[LayoutItem],
        grid_cfg: &GridConfig,
        bp: Breakpoint,
        enforce_collisions: bool,
    ) -> Option<CellRect> {
        let snap = self.config.snap_to_grid;
        let threshold = self.config.drag_threshold_px;
        let InteractionState::Dragging {
            item,
            offset,
            start,
            current,
            ..
        } = &mut self.state
        else {
            return None;
        };

        if distance(pointer, *start) < threshold {
            return None;
        }

        let target = PxPoint::new(pointer.x - offset.x, pointer.y - offset.y);
        let pos = cell_from_px(grid_cfg, target, snap);
        let max_x = grid_cfg.cols.saturating_sub(current.w);
        let candidate = CellRect::new(pos.x.min(max_x), pos.y, current.w, current.h);

        if candidate == *current {
            return None;
        }
        if enforce_collisions && has_collision(candidate, items, Some(&*item), bp) {
            trace!(item = %item, ?candidate, "drag candidate rejected");
            return None;
        }
        *current = candidate;
        Some(candidate)
    }

    /// `Idle -> Resizing` on pointer down over a resize grip.
    pub fn begin_resize(
        &mut self,
        item: &LayoutItem,
        widget: &Widget,
        layout_locked: bool,
        edge: ResizeEdge,
        pointer: PxPoint,
        bp: Breakpoint,
    ) -> bool {
        if !self.is_idle() || layout_locked || !widget.is_resizable() {
            return false;
        }
        let Some(rect) = item.rect_at(bp) else {
            return false;
        };
        self.state = InteractionState::Resizing {
            item: item.id.clone(),
            edge,
            start: pointer,
            origin: rect,
            current: rect,
            constraints: widget.constraints_at(bp),
        };
        trace!(item = %item.id, ?edge, "resize started");
        true
    }

    /// `Resizing -> Resizing` on pointer move.
    ///
    /// Deltas are measured from the gesture start and applied to the origin
    /// placement per the gripped edge, clamped into the widget's
    /// constraints and the container, then collision-gated like drags.
    pub fn update_resize(
        &mut self,
        pointer: PxPoint,
        items: &[LayoutItem],
        grid_cfg: &GridConfig,
        bp: Breakpoint,
        enforce_collisions: bool,
    ) -> Option<CellRect> {
        let snap = self.config.snap_to_grid;
        let preserve_aspect = self.config.preserve_aspect;
        let InteractionState::Resizing {
            item,
            edge,
            start,
            origin,
            current,
            constraints,
        } = &mut self.state
        else {
            return None;
        };

        let stride = grid_cfg.cell_size_px + grid_cfg.gap_px;
        let dx = delta_cells(pointer.x - start.x, stride, snap);
        let dy = delta_cells(pointer.y - start.y, stride, snap);

        let candidate = resize_candidate(
            *origin,
            *edge,
            dx,
            dy,
            constraints,
            grid_cfg.cols,
            preserve_aspect,
        );

        if candidate == *current {
            return None;
        }
        if enforce_collisions && has_collision(candidate, items, Some(&*item), bp) {
            trace!(item = %item, ?candidate, "resize candidate rejected");
            return None;
        }
        *current = candidate;
        Some(candidate)
    }

    /// `Dragging|Resizing -> Idle` on pointer up.
    ///
    /// Returns the gesture result; `changed` is false for no-op gestures,
    /// which callers must not record in history.
    pub fn finish(&mut self) -> Option<GestureEnd> {
        let end = match std::mem::replace(&mut self.state, InteractionState::Idle) {
            InteractionState::Idle => return None,
            InteractionState::Dragging {
                item,
                origin,
                current,
                ..
            }
            | InteractionState::Resizing {
                item,
                origin,
                current,
                ..
            } => GestureEnd {
                changed: current != origin,
                item,
                origin,
                rect: current,
            },
        };
        trace!(item = %end.item, changed = end.changed, "gesture finished");
        Some(end)
    }

    /// `* -> Idle` on cancellation: the pre-gesture placement is restored
    /// and nothing reaches history.
    pub fn cancel(&mut self) -> Option<GestureEnd> {
        match std::mem::replace(&mut self.state, InteractionState::Idle) {
            InteractionState::Idle => None,
            InteractionState::Dragging {
                item,
                origin,
                current,
                ..
            }
            | InteractionState::Resizing {
                item,
                origin,
                current,
                ..
            } => Some(GestureEnd {
                item,
                origin,
                rect: origin,
                changed: current != origin,
            }),
        }
    }
}

/// Euclidean pointer travel.
#[inline]
fn distance(a: PxPoint, b: PxPoint) -> f32 {
    let (dx, dy) = (a.x - b.x, a.y - b.y);
    (dx * dx + dy * dy).sqrt()
}

/// Pixel position to cell, rounding or truncating per the snap setting.
fn cell_from_px(grid_cfg: &GridConfig, px: PxPoint, snap: bool) -> CellPoint {
    if snap {
        return grid::to_cell(grid_cfg, px);
    }
    let stride = grid_cfg.cell_size_px + grid_cfg.gap_px;
    if stride <= 0.0 {
        return CellPoint::new(0, 0);
    }
    let x = ((px.x - grid_cfg.gap_px) / stride).floor().max(0.0);
    let y = ((px.y - grid_cfg.gap_px) / stride).floor().max(0.0);
    CellPoint::new(x as u16, y as u16)
}

/// Pixel delta to whole cells.
#[inline]
fn delta_cells(delta_px: f32, stride: f32, snap: bool) -> i32 {
    if stride <= 0.0 {
        return 0;
    }
    let raw = delta_px / stride;
    if snap { raw.round() as i32 } else { raw.trunc() as i32 }
}

/// Apply edge deltas to the origin placement, clamped to constraints and
/// container bounds.
fn resize_candidate(
    origin: CellRect,
    edge: ResizeEdge,
    dx: i32,
    dy: i32,
    constraints: &Constraints,
    cols: u16,
    preserve_aspect: bool,
) -> CellRect {
    let mut x = i32::from(origin.x);
    let mut y = i32::from(origin.y);
    let mut w = i32::from(origin.w);
    let mut h = i32::from(origin.h);

    if edge.horizontal() {
        if edge.moves_left() {
            x += dx;
            w -= dx;
        } else {
            w += dx;
        }
    }
    if edge.vertical() {
        if edge.moves_top() {
            y += dy;
            h -= dy;
        } else {
            h += dy;
        }
    }

    // Width clamps to constraints, then to the container; anchored edges
    // stay put while the clamp adjusts the moving edge.
    let right = i32::from(origin.right());
    let bottom = i32::from(origin.bottom());
    w = w.clamp(
        i32::from(constraints.min_w),
        i32::from(constraints.max_w.max(constraints.min_w)),
    );
    if edge.moves_left() {
        x = (right - w).max(0);
        w = right - x;
    } else {
        w = w.min(i32::from(cols) - x.max(0));
        w = w.max(1);
    }

    if preserve_aspect && edge.is_corner() && origin.w > 0 && origin.h > 0 {
        h = (w * i32::from(origin.h) + i32::from(origin.w) / 2) / i32::from(origin.w);
    }

    h = h.clamp(
        i32::from(constraints.min_h),
        i32::from(constraints.max_h.max(constraints.min_h)),
    );
    if edge.moves_top() {
        y = (bottom - h).max(0);
        h = bottom - y;
    }

    CellRect::new(
        x.max(0) as u16,
        y.max(0) as u16,
        w.max(1) as u16,
        h.max(1) as u16,
    )
}
