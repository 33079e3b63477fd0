#![forbid(unsafe_code)]

//! Visibility tracking and render prioritization.
//!
//! The scheduler watches which placements intersect the viewport (plus a
//! configurable margin) and keeps a render queue ordered by band: visible
//! high-priority widgets first, then visible medium and low, then
//! off-screen widgets flagged for preload. Off-screen widgets without the
//! preload flag are left out entirely.
//!
//! Lazy widgets render a placeholder until they first enter the visibility
//! set; after that they stay loaded for good, so scrolling away and back
//! never re-runs a widget's load path.
//!
//! Render durations are sampled per widget and widgets whose average
//! sample exceeds one frame budget are flagged slow. Flagging is purely
//! observational; it never reorders the queue.
//!
//! The scheduler only ever *reads* layout state. Host visibility and
//! timing callbacks may arrive between engine commits, so everything here
//! stays re-derivable from the layout at any time.

use std::collections::{HashMap, HashSet, VecDeque};
use std::time::Duration;

use quilt_core::breakpoint::Breakpoint;
use quilt_core::geometry::PxRect;
use quilt_core::item::{GridConfig, ItemId, LayoutConfig};
use quilt_core::registry::WidgetRegistry;
use quilt_core::widget::WidgetId;
use quilt_layout::grid;
use tracing::debug;

/// One frame at 60 fps; renders above it mark a widget slow.
pub const FRAME_BUDGET: Duration = Duration::from_micros(16_700);

/// Scheduler tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchedulerConfig {
    /// Extra pixels around the viewport that still count as visible.
    pub margin_px: f32,
    /// Render-duration samples kept per widget.
    pub max_samples: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            margin_px: 100.0,
            max_samples: 32,
        }
    }
}

/// Priority bands for queue ordering.
///
/// Thresholds are fixed: priority `>= 7` is high, `>= 4` is medium,
/// anything lower is low.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PriorityBand {
    High,
    Medium,
    Low,
}

impl PriorityBand {
    /// Band for a widget priority.
    #[must_use]
    pub const fn from_priority(priority: i32) -> Self {
        if priority >= 7 {
            PriorityBand::High
        } else if priority >= 4 {
            PriorityBand::Medium
        } else {
            PriorityBand::Low
        }
    }
}

/// One slot in the render queue.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderEntry {
    pub widget: WidgetId,
    pub item: ItemId,
    pub band: PriorityBand,
    /// Whether the placement intersects the (margin-expanded) viewport.
    pub visible: bool,
    /// Render a placeholder: the widget is lazy and has never been
    /// visible.
    pub placeholder: bool,
}

/// Visibility set and render queue over the current layout.
#[derive(Debug, Default)]
pub struct RenderScheduler {
    config: SchedulerConfig,
    viewport: PxRect,
    visible: HashSet<WidgetId>,
    loaded: HashSet<WidgetId>,
    samples: HashMap<WidgetId, VecDeque<Duration>>,
    slow: HashSet<WidgetId>,
}

impl RenderScheduler {
    /// Create a scheduler with an empty viewport.
    #[must_use]
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Update the viewport rectangle (host scroll/resize).
    pub fn set_viewport(&mut self, viewport: PxRect) {
        self.viewport = viewport;
    }

    /// The current viewport.
    #[must_use]
    pub fn viewport(&self) -> PxRect {
        self.viewport
    }

    /// Recompute the visibility set and render queue for a layout.
    ///
    /// Items referencing unregistered widgets and items that do not
    /// participate at `bp` are excluded. The queue is ordered visible
    /// (high, medium, low; priority descending inside a band, item id as
    /// the final tie break) followed by off-screen preload widgets.
    pub fn refresh(
        &mut self,
        layout: &LayoutConfig,
        registry: &WidgetRegistry,
        grid_cfg: &GridConfig,
        bp: Breakpoint,
    ) -> Vec<RenderEntry> {
        let window = self.viewport.expand(self.config.margin_px);
        self.visible.clear();

        let mut entries: Vec<(RenderEntry, i32)> = Vec::new();
        for item in &layout.items {
            let Some(widget) = registry.get(&item.widget_id) else {
                continue;
            };
            if !widget.is_visible() || !item.participates_at(bp) {
                continue;
            }
            let Some(rect) = item.rect_at(bp) else {
                continue;
            };

            let visible = grid::rect_to_px(grid_cfg, rect).overlaps(&window);
            if visible {
                self.visible.insert(widget.id().clone());
                if widget.is_lazy() && self.loaded.insert(widget.id().clone()) {
                    debug!(widget = %widget.id(), "lazy widget loaded");
                }
            } else if !widget.wants_preload() {
                continue;
            }

            let placeholder = widget.is_lazy() && !self.loaded.contains(widget.id());
            entries.push((
                RenderEntry {
                    widget: widget.id().clone(),
                    item: item.id.clone(),
                    band: PriorityBand::from_priority(widget.priority()),
                    visible,
                    placeholder,
                },
                widget.priority(),
            ));
        }

        entries.sort_by(|(a, pa), (b, pb)| {
            b.visible
                .cmp(&a.visible)
                .then(a.band.cmp(&b.band))
                .then(pb.cmp(pa))
                .then(a.item.cmp(&b.item))
        });
        entries.into_iter().map(|(entry, _)| entry).collect()
    }

    /// Whether a widget is in the current visibility set.
    #[must_use]
    pub fn is_visible(&self, widget: &WidgetId) -> bool {
        self.visible.contains(widget)
    }

    /// Whether a lazy widget has loaded (entered visibility at least
    /// once). Non-lazy widgets are always considered loaded.
    #[must_use]
    pub fn is_loaded(&self, widget: &WidgetId, registry: &WidgetRegistry) -> bool {
        match registry.get(widget) {
            Some(w) if w.is_lazy() => self.loaded.contains(widget),
            Some(_) => true,
            None => false,
        }
    }

    /// Record one render-duration sample for a widget.
    ///
    /// Samples are bounded per widget; the slow flag follows the running
    /// average against [`FRAME_BUDGET`].
    pub fn record_render_sample(&mut self, widget: &WidgetId, duration: Duration) {
        let samples = self.samples.entry(widget.clone()).or_default();
        if samples.len() >= self.config.max_samples {
            samples.pop_front();
        }
        samples.push_back(duration);

        let total: Duration = samples.iter().sum();
        let average = total / samples.len() as u32;
        if average > FRAME_BUDGET {
            if self.slow.insert(widget.clone()) {
                debug!(widget = %widget, ?average, "widget flagged slow");
            }
        } else {
            self.slow.remove(widget);
        }
    }

    /// Whether a widget's average render time exceeds the frame budget.
    #[must_use]
    pub fn is_slow(&self, widget: &WidgetId) -> bool {
        self.slow.contains(widget)
    }

    /// All widgets currently flagged slow, in arbitrary order.
    pub fn slow_widgets(&self) -> impl Iterator<Item = &WidgetId> {
        self.slow.iter()
    }

    /// Forget samples and flags for a widget (unregistration).
    pub fn forget(&mut self, widget: &WidgetId) {
        self.visible.remove(widget);
        self.loaded.remove(widget);
        self.samples.remove(widget);
        self.slow.remove(widget);
    }
}
