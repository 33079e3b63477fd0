#![forbid(unsafe_code)]

//! The widget model: registered placeable units.
//!
//! A [`Widget`] is immutable after registration except for its capability
//! flags, which the host may toggle. Its visual payload is an opaque
//! [`RenderHandle`] token the engine positions but never dereferences; the
//! host resolves the token to something renderable.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::breakpoint::{Breakpoint, Responsive};
use crate::geometry::CellSize;

/// Unique widget identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WidgetId(String);

impl WidgetId {
    /// Create an id from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for WidgetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WidgetId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for WidgetId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Opaque token for a widget's visual payload.
///
/// The engine carries the token through placement and scheduling without
/// ever inspecting it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RenderHandle(u64);

impl RenderHandle {
    /// Wrap a host-chosen token value.
    #[must_use]
    pub const fn new(token: u64) -> Self {
        Self(token)
    }

    /// The raw token, for the host to resolve.
    #[must_use]
    pub const fn token(self) -> u64 {
        self.0
    }
}

bitflags! {
    /// Capability flags, toggleable by the host after registration.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Capabilities: u16 {
        /// The item may be resized interactively.
        const RESIZABLE   = 1 << 0;
        /// The item may be dragged.
        const MOVABLE     = 1 << 1;
        /// The item may be removed from a layout.
        const REMOVABLE   = 1 << 2;
        /// The item may be collapsed to its title bar.
        const COLLAPSIBLE = 1 << 3;
        /// All gestures are rejected.
        const LOCKED      = 1 << 4;
        /// The widget participates in rendering and collision.
        const VISIBLE     = 1 << 5;
        /// Render a placeholder until first visible, then stay loaded.
        const LAZY        = 1 << 6;
        /// Render even while off-screen, after all visible widgets.
        const PRELOAD     = 1 << 7;
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Capabilities::RESIZABLE
            | Capabilities::MOVABLE
            | Capabilities::REMOVABLE
            | Capabilities::COLLAPSIBLE
            | Capabilities::VISIBLE
    }
}

/// Per-breakpoint size bounds in grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraints {
    pub min_w: u16,
    pub min_h: u16,
    pub max_w: u16,
    pub max_h: u16,
}

impl Default for Constraints {
    fn default() -> Self {
        Self {
            min_w: 1,
            min_h: 1,
            max_w: u16::MAX,
            max_h: u16::MAX,
        }
    }
}

impl Constraints {
    /// Bounds with explicit minimums and unbounded maximums.
    #[must_use]
    pub const fn at_least(min_w: u16, min_h: u16) -> Self {
        Self {
            min_w,
            min_h,
            max_w: u16::MAX,
            max_h: u16::MAX,
        }
    }

    /// Bounds with explicit minimums and maximums.
    #[must_use]
    pub const fn between(min_w: u16, min_h: u16, max_w: u16, max_h: u16) -> Self {
        Self {
            min_w,
            min_h,
            max_w,
            max_h,
        }
    }

    /// Clamp a size into these bounds.
    #[must_use]
    pub fn clamp(&self, size: CellSize) -> CellSize {
        CellSize {
            w: size.w.clamp(self.min_w, self.max_w.max(self.min_w)),
            h: size.h.clamp(self.min_h, self.max_h.max(self.min_h)),
        }
    }

    /// Check a size against these bounds.
    #[must_use]
    pub const fn allows(&self, size: CellSize) -> bool {
        size.w >= self.min_w && size.w <= self.max_w && size.h >= self.min_h && size.h <= self.max_h
    }
}

/// A registered placeable unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Widget {
    id: WidgetId,
    title: String,
    render_handle: RenderHandle,
    constraints: Responsive<Constraints>,
    default_size: Responsive<CellSize>,
    priority: i32,
    category: String,
    capabilities: Capabilities,
}

impl Widget {
    /// Create a widget with default constraints, a 2x2 default footprint,
    /// priority 0, and the default capability set.
    #[must_use]
    pub fn new(id: impl Into<WidgetId>, title: impl Into<String>, handle: RenderHandle) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            render_handle: handle,
            constraints: Responsive::uniform(Constraints::default()),
            default_size: Responsive::uniform(CellSize::new(2, 2)),
            priority: 0,
            category: String::new(),
            capabilities: Capabilities::default(),
        }
    }

    /// Replace the constraint table.
    #[must_use]
    pub fn with_constraints(mut self, constraints: Responsive<Constraints>) -> Self {
        self.constraints = constraints;
        self
    }

    /// Set the same constraints at every breakpoint.
    #[must_use]
    pub fn with_uniform_constraints(mut self, constraints: Constraints) -> Self {
        self.constraints = Responsive::uniform(constraints);
        self
    }

    /// Replace the default footprint table.
    #[must_use]
    pub fn with_default_size(mut self, size: Responsive<CellSize>) -> Self {
        self.default_size = size;
        self
    }

    /// Set the same default footprint at every breakpoint.
    #[must_use]
    pub fn with_uniform_default_size(mut self, size: CellSize) -> Self {
        self.default_size = Responsive::uniform(size);
        self
    }

    /// Set the render priority (higher = more eager).
    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Set the category label.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Replace the capability set.
    #[must_use]
    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn id(&self) -> &WidgetId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn render_handle(&self) -> RenderHandle {
        self.render_handle
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Toggle capability flags after registration (the one mutable part of
    /// a widget).
    pub fn set_capability(&mut self, flag: Capabilities, on: bool) {
        self.capabilities.set(flag, on);
    }

    /// Constraints at a breakpoint, via responsive inheritance.
    #[must_use]
    pub fn constraints_at(&self, bp: Breakpoint) -> Constraints {
        self.constraints.get(bp).copied().unwrap_or_default()
    }

    /// Default footprint at a breakpoint, clamped into the constraints
    /// there.
    #[must_use]
    pub fn default_size_at(&self, bp: Breakpoint) -> CellSize {
        let raw = self
            .default_size
            .get(bp)
            .copied()
            .unwrap_or(CellSize::new(2, 2));
        self.constraints_at(bp).clamp(raw)
    }

    /// Convenience capability probes.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.capabilities.contains(Capabilities::LOCKED)
    }

    #[must_use]
    pub fn is_movable(&self) -> bool {
        self.capabilities.contains(Capabilities::MOVABLE) && !self.is_locked()
    }

    #[must_use]
    pub fn is_resizable(&self) -> bool {
        self.capabilities.contains(Capabilities::RESIZABLE) && !self.is_locked()
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.capabilities.contains(Capabilities::VISIBLE)
    }

    #[must_use]
    pub fn is_lazy(&self) -> bool {
        self.capabilities.contains(Capabilities::LAZY)
    }

    #[must_use]
    pub fn wants_preload(&self) -> bool {
        self.capabilities.contains(Capabilities::PRELOAD)
    }
}

#[cfg(test)]
mod tests {
    use super::{Capabilities, Constraints, RenderHandle, Widget};
    use crate::breakpoint::{Breakpoint, Responsive};
    use crate::geometry::CellSize;

    fn widget() -> Widget {
        Widget::new("cpu", "CPU usage", RenderHandle::new(1))
    }

    #[test]
    fn default_capabilities_allow_gestures() {
        let w = widget();
        assert!(w.is_movable());
        assert!(w.is_resizable());
        assert!(w.is_visible());
        assert!(!w.is_lazy());
    }

    #[test]
    fn locking_rejects_gestures_without_clearing_flags() {
        let mut w = widget();
        w.set_capability(Capabilities::LOCKED, true);
        assert!(!w.is_movable());
        assert!(!w.is_resizable());
        assert!(w.capabilities().contains(Capabilities::MOVABLE));
    }

    #[test]
    fn constraints_clamp_sizes() {
        let c = Constraints::between(2, 1, 6, 4);
        assert_eq!(c.clamp(CellSize::new(1, 1)), CellSize::new(2, 1));
        assert_eq!(c.clamp(CellSize::new(9, 9)), CellSize::new(6, 4));
        assert!(c.allows(CellSize::new(4, 2)));
        assert!(!c.allows(CellSize::new(7, 2)));
    }

    #[test]
    fn degenerate_constraints_clamp_to_minimum() {
        // min above max: minimum wins rather than panicking in clamp().
        let c = Constraints::between(5, 5, 3, 3);
        assert_eq!(c.clamp(CellSize::new(4, 4)), CellSize::new(5, 5));
    }

    #[test]
    fn default_size_respects_breakpoint_constraints() {
        let w = widget()
            .with_uniform_default_size(CellSize::new(8, 3))
            .with_constraints(
                Responsive::new()
                    .with(Breakpoint::Xs, Constraints::between(1, 1, 4, 4))
                    .with(Breakpoint::Md, Constraints::default()),
            );
        assert_eq!(w.default_size_at(Breakpoint::Xs), CellSize::new(4, 3));
        // Lg inherits the unbounded Md constraints.
        assert_eq!(w.default_size_at(Breakpoint::Lg), CellSize::new(8, 3));
    }
}
