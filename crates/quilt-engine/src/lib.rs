#![forbid(unsafe_code)]

//! Engine: interaction, scheduling, history, and persistence over the
//! layout model.
//!
//! [`Engine`] is the single entry point for hosts: it owns the live
//! [`LayoutConfig`], consumes pointer and resize streams, validates every
//! mutation through the collision detector, and commits results to a
//! bounded undo/redo history with debounced auto-save.

pub mod engine;
pub mod history;
pub mod interaction;
pub mod persistence;
pub mod scheduler;

pub use engine::{Engine, EngineOptions};
pub use history::{DEFAULT_CAPACITY, LayoutHistory};
pub use interaction::{
    GestureEnd, Interaction, InteractionConfig, InteractionState, ResizeEdge,
};
pub use persistence::{
    AutoSave, DEFAULT_DEBOUNCE, FORMAT_VERSION, FileStorage, LayoutDocument, MemoryStorage,
    StorageBackend,
};
pub use scheduler::{FRAME_BUDGET, PriorityBand, RenderEntry, RenderScheduler, SchedulerConfig};

pub use quilt_core::item::LayoutConfig;
