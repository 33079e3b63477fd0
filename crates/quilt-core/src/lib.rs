#![forbid(unsafe_code)]

//! Core: geometry, widget model, registry, events, and the error taxonomy.

pub mod breakpoint;
pub mod error;
pub mod event;
pub mod geometry;
pub mod item;
pub mod registry;
pub mod widget;

pub use breakpoint::{Breakpoint, Breakpoints, Responsive};
pub use error::{EngineError, EngineWarning, Result};
pub use event::{PointerButton, PointerEvent, ResizeInput};
pub use geometry::{CellPoint, CellRect, CellSize, PxPoint, PxRect, PxSize};
pub use item::{GridConfig, ItemId, LayoutConfig, LayoutItem};
pub use registry::WidgetRegistry;
pub use widget::{Capabilities, Constraints, RenderHandle, Widget, WidgetId};
