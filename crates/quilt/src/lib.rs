#![forbid(unsafe_code)]

//! Quilt public facade crate.
//!
//! This crate provides the stable, ergonomic surface area for hosts. It
//! re-exports the common types from the internal crates and offers a
//! lightweight prelude for day-to-day usage.

// --- Core re-exports -------------------------------------------------------

pub use quilt_core::breakpoint::{Breakpoint, Breakpoints, Responsive};
pub use quilt_core::error::{EngineError, EngineWarning, Result};
pub use quilt_core::event::{PointerButton, PointerEvent, ResizeInput};
pub use quilt_core::geometry::{CellPoint, CellRect, CellSize, PxPoint, PxRect, PxSize};
pub use quilt_core::item::{GridConfig, ItemId, LayoutConfig, LayoutItem};
pub use quilt_core::registry::WidgetRegistry;
pub use quilt_core::widget::{Capabilities, Constraints, RenderHandle, Widget, WidgetId};

// --- Layout re-exports -----------------------------------------------------

pub use quilt_layout::algorithms::{Algorithm, Placement, PlacementSet, PlacementSpec};
pub use quilt_layout::collision::{first_free_position, has_collision, overlaps};
pub use quilt_layout::grid::{GridModel, MIN_CELL_PX};

// --- Engine re-exports -----------------------------------------------------

pub use quilt_engine::engine::{Engine, EngineOptions};
pub use quilt_engine::history::LayoutHistory;
pub use quilt_engine::interaction::{
    Interaction, InteractionConfig, InteractionState, ResizeEdge,
};
pub use quilt_engine::persistence::{
    AutoSave, FileStorage, LayoutDocument, MemoryStorage, StorageBackend,
};
pub use quilt_engine::scheduler::{
    FRAME_BUDGET, PriorityBand, RenderEntry, RenderScheduler, SchedulerConfig,
};

/// Common imports for hosts embedding the engine.
pub mod prelude {
    pub use crate::{
        Algorithm, Breakpoint, CellRect, CellSize, Engine, EngineOptions, LayoutConfig,
        LayoutItem, PointerEvent, PxPoint, RenderHandle, ResizeInput, Widget, WidgetId,
        WidgetRegistry,
    };
}
