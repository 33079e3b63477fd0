#![forbid(unsafe_code)]

//! Pluggable placement strategies.
//!
//! Every algorithm is a pure function from `(widgets, container)` to
//! placements: no side effects, no dependency on prior placement, and
//! identical inputs give identical outputs. Selecting one is a
//! configuration choice, not a state transition; the engine re-applies the
//! chosen function to the current widget set and swaps the layout
//! atomically.
//!
//! Inputs arrive as [`PlacementSpec`]s: the widget's footprint already
//! resolved for the active breakpoint, plus its priority and (for
//! force-directed seeding) any prior position.

mod bin_packing;
mod force_directed;
mod golden_ratio;
mod masonry;
mod priority_flow;

pub use bin_packing::bin_packing;
pub use force_directed::force_directed;
pub use golden_ratio::golden_ratio;
pub use masonry::masonry;
pub use priority_flow::priority_flow;

use quilt_core::breakpoint::Breakpoint;
use quilt_core::geometry::{CellPoint, CellRect, CellSize};
use quilt_core::widget::{Widget, WidgetId};

/// Per-widget input to a placement algorithm.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementSpec {
    pub widget: WidgetId,
    /// Footprint in cells at the active breakpoint.
    pub size: CellSize,
    /// Higher places earlier in priority-ordered strategies.
    pub priority: i32,
    /// Prior top-left corner, when the widget already has one. Only
    /// force-directed consults it.
    pub seed: Option<CellPoint>,
}

impl PlacementSpec {
    /// Create a spec with priority 0 and no seed position.
    #[must_use]
    pub fn new(widget: impl Into<WidgetId>, size: CellSize) -> Self {
        Self {
            widget: widget.into(),
            size,
            priority: 0,
            seed: None,
        }
    }

    /// Set the priority.
    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Set the seed position.
    #[must_use]
    pub fn with_seed(mut self, seed: CellPoint) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build a spec from a registered widget at a breakpoint.
    #[must_use]
    pub fn from_widget(widget: &Widget, bp: Breakpoint) -> Self {
        Self {
            widget: widget.id().clone(),
            size: widget.default_size_at(bp),
            priority: widget.priority(),
            seed: None,
        }
    }
}

/// One placed widget in an algorithm's output.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub widget: WidgetId,
    pub rect: CellRect,
}

/// An algorithm's full output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlacementSet {
    /// Placements, one per input spec, in input order unless the strategy
    /// documents otherwise.
    pub placements: Vec<Placement>,
    /// Widgets that did not fit and were placed at the deterministic
    /// overflow position below all others.
    pub overflowed: Vec<WidgetId>,
}

impl PlacementSet {
    /// Look up the placement for a widget.
    #[must_use]
    pub fn rect_for(&self, widget: &WidgetId) -> Option<CellRect> {
        self.placements
            .iter()
            .find(|p| &p.widget == widget)
            .map(|p| p.rect)
    }
}

/// The available placement strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    /// Free-rectangle bin packing with a bottom-left heuristic.
    BinPacking,
    /// Force simulation: repulsion, center attraction, damping.
    ForceDirected,
    /// Recursive golden-ratio partition, priority first.
    GoldenRatio,
    /// Shortest-column masonry with a fixed column count.
    Masonry {
        columns: u16,
    },
    /// Greedy row flow, priority first.
    PriorityFlow,
}

impl Default for Algorithm {
    fn default() -> Self {
        Algorithm::BinPacking
    }
}

impl Algorithm {
    /// Masonry with the default column count.
    #[must_use]
    pub const fn masonry() -> Self {
        Algorithm::Masonry { columns: 3 }
    }

    /// Short name for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Algorithm::BinPacking => "bin-packing",
            Algorithm::ForceDirected => "force-directed",
            Algorithm::GoldenRatio => "golden-ratio",
            Algorithm::Masonry { .. } => "masonry",
            Algorithm::PriorityFlow => "priority-flow",
        }
    }

    /// Run the strategy.
    #[must_use]
    pub fn apply(&self, specs: &[PlacementSpec], container: CellSize, spacing: u16) -> PlacementSet {
        match self {
            Algorithm::BinPacking => bin_packing(specs, container, spacing),
            Algorithm::ForceDirected => force_directed(specs, container),
            Algorithm::GoldenRatio => golden_ratio(specs, container),
            Algorithm::Masonry { columns } => masonry(specs, container, spacing, *columns),
            Algorithm::PriorityFlow => priority_flow(specs, container, spacing),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Algorithm, PlacementSpec};
    use quilt_core::geometry::CellSize;

    #[test]
    fn every_strategy_places_every_spec() {
        let specs: Vec<PlacementSpec> = (0..7u16)
            .map(|i| {
                PlacementSpec::new(format!("w{i}"), CellSize::new(2 + i % 3, 1 + i % 2))
                    .with_priority(i32::from(i))
            })
            .collect();
        let container = CellSize::new(12, 10);

        for algo in [
            Algorithm::BinPacking,
            Algorithm::ForceDirected,
            Algorithm::GoldenRatio,
            Algorithm::masonry(),
            Algorithm::PriorityFlow,
        ] {
            let out = algo.apply(&specs, container, 0);
            assert_eq!(out.placements.len(), specs.len(), "{}", algo.name());
            for spec in &specs {
                assert!(
                    out.rect_for(&spec.widget).is_some(),
                    "{} lost {}",
                    algo.name(),
                    spec.widget
                );
            }
        }
    }
}
