#![forbid(unsafe_code)]

//! Layout persistence: versioned JSON documents, storage backends, and
//! debounced auto-save.
//!
//! # Design Invariants
//!
//! 1. **Graceful degradation**: a malformed or unreadable document falls
//!    back to the caller's default layout with a warning; loading never
//!    panics and never fails the host.
//! 2. **Atomic writes**: file storage writes to a temporary file and
//!    renames it over the target, so a crash mid-save cannot corrupt the
//!    previous document.
//! 3. **Latest wins**: the auto-saver keeps at most one pending snapshot;
//!    every new commit replaces it and restarts the debounce window.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Parse error on load | Corrupt/foreign JSON | Default layout, warning |
//! | Unknown `formatVersion` | Newer writer | Default layout, warning |
//! | I/O error on load | Permissions, disk | Default layout, warning |
//! | I/O error on save | Permissions, disk | Error returned, pending kept |

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use quilt_core::error::{EngineError, EngineWarning, Result};
use quilt_core::item::LayoutConfig;

/// Version stamped into every saved document.
pub const FORMAT_VERSION: u32 = 1;

/// Default debounce window for auto-save.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_secs(5);

/// The persisted wire format: a version wrapper around the layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDocument {
    pub format_version: u32,
    pub layout: LayoutConfig,
}

impl LayoutDocument {
    /// Wrap a layout at the current format version.
    #[must_use]
    pub fn new(layout: LayoutConfig) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            layout,
        }
    }
}

/// Encode a layout as a document string.
pub fn encode(layout: &LayoutConfig) -> Result<String> {
    serde_json::to_string_pretty(&LayoutDocument::new(layout.clone()))
        .map_err(|e| EngineError::Serialization(e.to_string()))
}

/// Decode a document string, enforcing the format version.
pub fn decode(json: &str) -> std::result::Result<LayoutConfig, String> {
    let doc: LayoutDocument =
        serde_json::from_str(json).map_err(|e| format!("failed to parse document: {e}"))?;
    if doc.format_version > FORMAT_VERSION {
        return Err(format!(
            "document format {} is newer than supported {}",
            doc.format_version, FORMAT_VERSION
        ));
    }
    Ok(doc.layout)
}

/// Load a layout, falling back to `default` on any failure.
///
/// Returns the layout plus the warning describing the fallback, when one
/// happened. A missing document (first run) is not a failure.
pub fn load_or_default(
    backend: &dyn StorageBackend,
    default: &LayoutConfig,
) -> (LayoutConfig, Option<EngineWarning>) {
    let raw = match backend.load() {
        Ok(Some(raw)) => raw,
        Ok(None) => return (default.clone(), None),
        Err(e) => {
            let warning = EngineWarning::PersistenceCorruption {
                detail: e.to_string(),
            };
            warn!(backend = backend.name(), %e, "layout load failed");
            return (default.clone(), Some(warning));
        }
    };

    match decode(&raw) {
        Ok(layout) => (layout, None),
        Err(detail) => {
            warn!(backend = backend.name(), %detail, "layout document unusable");
            (
                default.clone(),
                Some(EngineWarning::PersistenceCorruption { detail }),
            )
        }
    }
}

/// Pluggable document storage.
pub trait StorageBackend {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    /// Load the stored document, `None` when none exists yet.
    fn load(&self) -> Result<Option<String>>;

    /// Replace the stored document.
    fn save(&self, document: &str) -> Result<()>;

    /// Remove the stored document.
    fn clear(&self) -> Result<()>;
}

/// In-memory storage for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    data: RwLock<Option<String>>,
}

impl MemoryStorage {
    /// Create empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create storage pre-populated with a document.
    #[must_use]
    pub fn with_document(document: impl Into<String>) -> Self {
        Self {
            data: RwLock::new(Some(document.into())),
        }
    }
}

impl StorageBackend for MemoryStorage {
    fn name(&self) -> &str {
        "MemoryStorage"
    }

    fn load(&self) -> Result<Option<String>> {
        let guard = self
            .data
            .read()
            .map_err(|_| EngineError::StorageUnavailable("lock poisoned".into()))?;
        Ok(guard.clone())
    }

    fn save(&self, document: &str) -> Result<()> {
        let mut guard = self
            .data
            .write()
            .map_err(|_| EngineError::StorageUnavailable("lock poisoned".into()))?;
        *guard = Some(document.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut guard = self
            .data
            .write()
            .map_err(|_| EngineError::StorageUnavailable("lock poisoned".into()))?;
        *guard = None;
        Ok(())
    }
}

/// File-backed storage with atomic write-then-rename saves.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Storage at an explicit path; the file is created on first save.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// The backing path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone();
        tmp.set_extension("json.tmp");
        tmp
    }
}

impl StorageBackend for FileStorage {
    fn name(&self) -> &str {
        "FileStorage"
    }

    fn load(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let file = File::open(&self.path)?;
        let mut reader = BufReader::new(file);
        let mut raw = String::new();
        std::io::Read::read_to_string(&mut reader, &mut raw)?;
        Ok(Some(raw))
    }

    fn save(&self, document: &str) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let tmp = self.temp_path();
        {
            let file = File::create(&tmp)?;
            let mut writer = BufWriter::new(file);
            writer.write_all(document.as_bytes())?;
            writer.flush()?;
            writer.get_ref().sync_all()?;
        }
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

/// Debounced, fire-and-forget persistence of committed layouts.
///
/// The host drives time explicitly: [`schedule`](AutoSave::schedule) on
/// every commit, [`poll_at`](AutoSave::poll_at) from its event loop. Only
/// the most recent snapshot inside a debounce window is ever written.
pub struct AutoSave {
    backend: Box<dyn StorageBackend>,
    debounce: Duration,
    pending: Option<LayoutConfig>,
    deadline: Option<Instant>,
}

impl AutoSave {
    /// Create an auto-saver with the default debounce window.
    #[must_use]
    pub fn new(backend: Box<dyn StorageBackend>) -> Self {
        Self::with_debounce(backend, DEFAULT_DEBOUNCE)
    }

    /// Create an auto-saver with an explicit debounce window.
    #[must_use]
    pub fn with_debounce(backend: Box<dyn StorageBackend>, debounce: Duration) -> Self {
        Self {
            backend,
            debounce,
            pending: None,
            deadline: None,
        }
    }

    /// Replace the pending snapshot and restart the debounce window.
    pub fn schedule(&mut self, layout: &LayoutConfig, now: Instant) {
        self.pending = Some(layout.clone());
        self.deadline = Some(now + self.debounce);
    }

    /// Write the pending snapshot if its deadline has passed.
    ///
    /// Returns `true` when a save happened. On a write error the pending
    /// snapshot is kept for the next poll.
    pub fn poll_at(&mut self, now: Instant) -> Result<bool> {
        match self.deadline {
            Some(deadline) if now >= deadline => self.flush(),
            _ => Ok(false),
        }
    }

    /// Write the pending snapshot immediately, if there is one.
    pub fn flush(&mut self) -> Result<bool> {
        let Some(layout) = self.pending.as_ref() else {
            return Ok(false);
        };
        let document = encode(layout)?;
        self.backend.save(&document)?;
        debug!(backend = self.backend.name(), "layout saved");
        self.pending = None;
        self.deadline = None;
        Ok(true)
    }

    /// Whether a snapshot is waiting for its deadline.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// The backend, for direct loads.
    #[must_use]
    pub fn backend(&self) -> &dyn StorageBackend {
        self.backend.as_ref()
    }
}

impl std::fmt::Debug for AutoSave {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutoSave")
            .field("backend", &self.backend.name())
            .field("debounce", &self.debounce)
            .field("pending", &self.pending.is_some())
            .finish()
    }
}
