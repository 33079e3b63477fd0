#![forbid(unsafe_code)]

//! Canonical input types consumed by the engine.
//!
//! The host adapts its own pointer and resize-observer streams into these
//! types; the engine never talks to an input device itself. All events
//! carry absolute pixel coordinates.

use crate::geometry::PxPoint;

/// A pointer event from the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Button pressed at a position.
    Down {
        position: PxPoint,
        button: PointerButton,
    },
    /// Pointer moved while a gesture may be in progress.
    Move { position: PxPoint },
    /// Button released at a position.
    Up { position: PxPoint },
    /// The gesture was abandoned (escape key, focus loss, unmount).
    Cancel,
}

/// Which pointer button an event refers to.
///
/// Only the primary button starts gestures; the rest are carried through
/// for the host's own use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerButton {
    #[default]
    Primary,
    Secondary,
    Middle,
}

/// A container measurement from the host's resize observer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeInput {
    /// Measured container width in pixels.
    pub width_px: f32,
}

impl ResizeInput {
    /// Create a measurement.
    #[must_use]
    pub const fn new(width_px: f32) -> Self {
        Self { width_px }
    }
}
