#![forbid(unsafe_code)]

//! Error taxonomy.
//!
//! No failure in the engine is fatal to the host: constraint violations are
//! clamped, rejected placements revert, corrupt documents fall back to a
//! default layout. [`EngineError`] covers the few operations that can fail
//! outright (storage I/O, mostly); [`EngineWarning`] covers recovered
//! conditions that the host should hear about.

use std::fmt;

use crate::item::ItemId;
use crate::widget::WidgetId;

/// Result alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that abort an operation.
#[derive(Debug)]
pub enum EngineError {
    /// I/O failure while reading or writing persisted layouts.
    Io(std::io::Error),
    /// The persisted document could not be encoded.
    Serialization(String),
    /// A storage backend is present but unusable.
    StorageUnavailable(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Io(e) => write!(f, "I/O error: {e}"),
            EngineError::Serialization(msg) => write!(f, "serialization error: {msg}"),
            EngineError::StorageUnavailable(msg) => write!(f, "storage unavailable: {msg}"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Io(e) => Some(e),
            EngineError::Serialization(_) | EngineError::StorageUnavailable(_) => None,
        }
    }
}

impl From<std::io::Error> for EngineError {
    fn from(e: std::io::Error) -> Self {
        EngineError::Io(e)
    }
}

/// Recovered conditions surfaced to the host.
///
/// Each variant names the degradation that already happened; by the time
/// the host sees one, the engine is in a consistent state.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineWarning {
    /// An item references a widget that is not registered. The item is
    /// excluded from placement and rendering but kept in the document.
    DanglingReference { item: ItemId, widget: WidgetId },
    /// A persisted document was malformed; the default layout is in use.
    PersistenceCorruption { detail: String },
    /// An algorithm could not fit a widget and placed it at the overflow
    /// position below all others.
    AlgorithmOverflow { widget: WidgetId },
}

impl fmt::Display for EngineWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineWarning::DanglingReference { item, widget } => {
                write!(f, "item {item} references unregistered widget {widget}")
            }
            EngineWarning::PersistenceCorruption { detail } => {
                write!(f, "persisted layout unusable, default restored: {detail}")
            }
            EngineWarning::AlgorithmOverflow { widget } => {
                write!(f, "widget {widget} did not fit, placed in overflow row")
            }
        }
    }
}
