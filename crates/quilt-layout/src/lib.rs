#![forbid(unsafe_code)]

//! Layout: the grid model, collision detection, and placement algorithms.
//!
//! - [`GridModel`] - breakpoint resolution and pixel/cell conversion
//! - [`collision`] - pure AABB overlap tests over placed items
//! - [`algorithms`] - the pluggable placement strategies
//!
//! Everything in this crate is deterministic and side-effect free: the same
//! widgets, container, and grid geometry always produce the same answer.
//! State lives in `quilt-engine`; this crate only computes.

pub mod algorithms;
pub mod collision;
pub mod grid;

pub use algorithms::{Algorithm, Placement, PlacementSet, PlacementSpec};
pub use collision::{first_free_position, has_collision, overlaps};
pub use grid::GridModel;
pub use quilt_core::breakpoint::{Breakpoint, Breakpoints, Responsive};
pub use quilt_core::geometry::{CellPoint, CellRect, CellSize, PxPoint, PxRect, PxSize};
pub use quilt_core::item::GridConfig;
