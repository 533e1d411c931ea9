//! The widget store: the durable side of the board.
//!
//! The board engine treats storage as a fallible collaborator behind the
//! [`WidgetStore`] trait. The store is the only party that assigns widget
//! ids and maintains timestamps; the engine hands it drafts and layout
//! geometry and never assumes a write completed before the next
//! interaction.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          Board                                │
//! │   - In-memory widget snapshot (source of truth for the UI)    │
//! │   - Stages layout writes, flushes through the store           │
//! └──────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        WidgetStore                            │
//! │   - MemoryStore: in-memory (testing, ephemeral boards)        │
//! │   - JsonFileStore: JSON file (requires json-storage)          │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Design Invariants
//!
//! 1. **Graceful degradation**: storage failures never panic; every
//!    operation returns `Result` and the engine logs and continues.
//! 2. **Atomic writes**: file storage uses a write-rename pattern so a
//!    crash mid-save never corrupts the board.
//! 3. **Sanitized loads**: geometry read back from storage is repaired
//!    (spans at least one cell, size at least the minimum) before use.
//! 4. **Cascade removal**: removing a widget also removes its
//!    kind-specific child records; backends own that bookkeeping.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | `StoreError::Io` | File I/O failure | Returned, board state unaffected |
//! | `StoreError::Serialization` | JSON encode/decode | Returned, file left as-is |
//! | `StoreError::Corruption` | Poisoned lock, bad format | Returned |
//! | `StoreError::NotFound` | Update/remove of unknown id | Returned, logged by caller |
//! | Format version mismatch | Older/newer file | Stored board ignored, warning logged |

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::RwLock;

use chrono::Utc;
use gridboard_core::{GridPos, GridSize, WidgetDraft, WidgetId, WidgetRecord};

/// Settings key for the page the user is looking at.
pub const SETTING_CURRENT_PAGE: &str = "current-page";

/// Settings key for the board-wide surface style.
pub const SETTING_SURFACE_STYLE: &str = "surface-style";

// ─────────────────────────────────────────────────────────────────────────────
// Error Types
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can occur during store operations.
#[derive(Debug)]
pub enum StoreError {
    /// I/O error during file operations.
    Io(std::io::Error),
    /// Serialization or deserialization error.
    #[cfg(feature = "json-storage")]
    Serialization(String),
    /// Store state is corrupted or otherwise unusable.
    Corruption(String),
    /// Backend is not available (e.g. file storage without the feature).
    Unavailable(String),
    /// The widget does not exist in the store.
    NotFound(WidgetId),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "json-storage")]
            StoreError::Serialization(msg) => write!(f, "serialization error: {msg}"),
            StoreError::Corruption(msg) => write!(f, "store corruption: {msg}"),
            StoreError::Unavailable(msg) => write!(f, "store unavailable: {msg}"),
            StoreError::NotFound(id) => write!(f, "widget {id} not found"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e)
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

// ─────────────────────────────────────────────────────────────────────────────
// Store Trait
// ─────────────────────────────────────────────────────────────────────────────

/// Trait for pluggable widget storage backends.
///
/// Implementations must be thread-safe (`Send + Sync`). All methods take
/// `&self`; backends use interior mutability.
pub trait WidgetStore: Send + Sync {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    /// All stored widgets, geometry sanitized.
    ///
    /// Returns an empty vector on first run.
    fn list(&self) -> StoreResult<Vec<WidgetRecord>>;

    /// Persist a draft, assigning its id and timestamps.
    fn create(&self, draft: WidgetDraft) -> StoreResult<WidgetRecord>;

    /// Update a widget's layout geometry, bumping `updated_at`.
    fn update_layout(
        &self,
        id: WidgetId,
        pos: GridPos,
        size: GridSize,
    ) -> StoreResult<WidgetRecord>;

    /// Remove a widget and cascade-remove its child records.
    fn remove(&self, id: WidgetId) -> StoreResult<()>;

    /// Read a board setting.
    fn setting(&self, key: &str) -> StoreResult<Option<String>>;

    /// Write a board setting.
    fn put_setting(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Check if the backend is available and functional.
    fn is_available(&self) -> bool {
        true
    }
}

fn materialize(draft: WidgetDraft, id: WidgetId) -> WidgetRecord {
    let now = Utc::now();
    let mut record = WidgetRecord {
        id,
        kind: draft.kind,
        title: draft.title,
        pos: draft.pos,
        size: draft.size,
        min_size: draft.min_size,
        page: draft.page,
        surface: draft.surface,
        locked: draft.locked,
        created_at: now,
        updated_at: now,
    };
    record.sanitize();
    record
}

// ─────────────────────────────────────────────────────────────────────────────
// Memory Store (always available)
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
struct MemoryInner {
    widgets: BTreeMap<WidgetId, WidgetRecord>,
    settings: HashMap<String, String>,
    next_id: u64,
}

/// In-memory store for testing and ephemeral boards.
///
/// Widgets are lost when the process exits. Useful for:
/// - Unit testing placement and mutation logic
/// - Scratch boards that don't need to survive a restart
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<MemoryInner>,
}

impl MemoryStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with records (for tests).
    ///
    /// The id counter resumes past the highest existing id.
    #[must_use]
    pub fn with_records(records: Vec<WidgetRecord>) -> Self {
        let next_id = records.iter().map(|r| r.id.0).max().unwrap_or(0);
        let widgets = records.into_iter().map(|r| (r.id, r)).collect();
        Self {
            inner: RwLock::new(MemoryInner {
                widgets,
                settings: HashMap::new(),
                next_id,
            }),
        }
    }
}

impl WidgetStore for MemoryStore {
    fn name(&self) -> &str {
        "MemoryStore"
    }

    fn list(&self) -> StoreResult<Vec<WidgetRecord>> {
        let guard = self
            .inner
            .read()
            .map_err(|_| StoreError::Corruption("lock poisoned".into()))?;
        let mut records: Vec<WidgetRecord> = guard.widgets.values().cloned().collect();
        for record in &mut records {
            record.sanitize();
        }
        Ok(records)
    }

    fn create(&self, draft: WidgetDraft) -> StoreResult<WidgetRecord> {
        let mut guard = self
            .inner
            .write()
            .map_err(|_| StoreError::Corruption("lock poisoned".into()))?;
        guard.next_id += 1;
        let record = materialize(draft, WidgetId(guard.next_id));
        guard.widgets.insert(record.id, record.clone());
        Ok(record)
    }

    fn update_layout(
        &self,
        id: WidgetId,
        pos: GridPos,
        size: GridSize,
    ) -> StoreResult<WidgetRecord> {
        let mut guard = self
            .inner
            .write()
            .map_err(|_| StoreError::Corruption("lock poisoned".into()))?;
        let record = guard.widgets.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        record.pos = pos;
        record.size = size;
        record.sanitize();
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    fn remove(&self, id: WidgetId) -> StoreResult<()> {
        let mut guard = self
            .inner
            .write()
            .map_err(|_| StoreError::Corruption("lock poisoned".into()))?;
        guard.widgets.remove(&id).ok_or(StoreError::NotFound(id))?;
        Ok(())
    }

    fn setting(&self, key: &str) -> StoreResult<Option<String>> {
        let guard = self
            .inner
            .read()
            .map_err(|_| StoreError::Corruption("lock poisoned".into()))?;
        Ok(guard.settings.get(key).cloned())
    }

    fn put_setting(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut guard = self
            .inner
            .write()
            .map_err(|_| StoreError::Corruption("lock poisoned".into()))?;
        guard.settings.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.inner.read().map(|g| g.widgets.len()).unwrap_or(0);
        f.debug_struct("MemoryStore").field("widgets", &count).finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// JSON File Store (requires json-storage feature)
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(feature = "json-storage")]
mod json_store {
    use super::*;
    use serde::{Deserialize, Serialize};
    use std::fs::{self, File};
    use std::io::{BufReader, BufWriter, Write};
    use std::path::{Path, PathBuf};

    /// On-disk format (JSON).
    #[derive(Serialize, Deserialize)]
    struct BoardFile {
        /// Format version for future migrations.
        format_version: u32,
        /// Highest id ever assigned.
        next_id: u64,
        /// All widget records.
        widgets: Vec<WidgetRecord>,
        /// Board settings (current page, surface style).
        settings: HashMap<String, String>,
    }

    impl BoardFile {
        const FORMAT_VERSION: u32 = 1;

        fn new() -> Self {
            Self {
                format_version: Self::FORMAT_VERSION,
                next_id: 0,
                widgets: Vec::new(),
                settings: HashMap::new(),
            }
        }
    }

    /// File-backed store using a single JSON document.
    ///
    /// Every mutation loads, edits, and atomically rewrites the file:
    /// 1. Write to `{path}.tmp`
    /// 2. Flush and sync
    /// 3. Rename `{path}.tmp` -> `{path}`
    ///
    /// A file written by a different format version is ignored with a
    /// warning rather than rejected, so downgrades start from an empty
    /// board instead of failing to launch.
    pub struct JsonFileStore {
        path: PathBuf,
    }

    impl JsonFileStore {
        /// Create a file store at the given path.
        ///
        /// The file does not need to exist; it is created on first write.
        #[must_use]
        pub fn new(path: impl AsRef<Path>) -> Self {
            Self {
                path: path.as_ref().to_path_buf(),
            }
        }

        fn temp_path(&self) -> PathBuf {
            let mut tmp = self.path.clone();
            tmp.set_extension("json.tmp");
            tmp
        }

        fn load(&self) -> StoreResult<BoardFile> {
            if !self.path.exists() {
                // First run
                return Ok(BoardFile::new());
            }
            let file = File::open(&self.path)?;
            let reader = BufReader::new(file);
            let board: BoardFile = serde_json::from_reader(reader).map_err(|e| {
                StoreError::Serialization(format!("failed to parse board file: {e}"))
            })?;
            if board.format_version != BoardFile::FORMAT_VERSION {
                tracing::warn!(
                    stored = board.format_version,
                    expected = BoardFile::FORMAT_VERSION,
                    "board file format version mismatch, ignoring stored board"
                );
                return Ok(BoardFile::new());
            }
            Ok(board)
        }

        fn save(&self, board: &BoardFile) -> StoreResult<()> {
            if let Some(parent) = self.path.parent()
                && !parent.as_os_str().is_empty()
            {
                fs::create_dir_all(parent)?;
            }

            let tmp_path = self.temp_path();
            {
                let file = File::create(&tmp_path)?;
                let mut writer = BufWriter::new(file);
                serde_json::to_writer_pretty(&mut writer, board).map_err(|e| {
                    StoreError::Serialization(format!("failed to serialize board: {e}"))
                })?;
                writer.flush()?;
                writer.get_ref().sync_all()?;
            }
            fs::rename(&tmp_path, &self.path)?;

            tracing::debug!(
                path = %self.path.display(),
                widgets = board.widgets.len(),
                "saved board"
            );
            Ok(())
        }
    }

    impl WidgetStore for JsonFileStore {
        fn name(&self) -> &str {
            "JsonFileStore"
        }

        fn list(&self) -> StoreResult<Vec<WidgetRecord>> {
            let mut board = self.load()?;
            for record in &mut board.widgets {
                record.sanitize();
            }
            Ok(board.widgets)
        }

        fn create(&self, draft: WidgetDraft) -> StoreResult<WidgetRecord> {
            let mut board = self.load()?;
            board.next_id += 1;
            let record = materialize(draft, WidgetId(board.next_id));
            board.widgets.push(record.clone());
            self.save(&board)?;
            Ok(record)
        }

        fn update_layout(
            &self,
            id: WidgetId,
            pos: GridPos,
            size: GridSize,
        ) -> StoreResult<WidgetRecord> {
            let mut board = self.load()?;
            let record = board
                .widgets
                .iter_mut()
                .find(|w| w.id == id)
                .ok_or(StoreError::NotFound(id))?;
            record.pos = pos;
            record.size = size;
            record.sanitize();
            record.updated_at = Utc::now();
            let updated = record.clone();
            self.save(&board)?;
            Ok(updated)
        }

        fn remove(&self, id: WidgetId) -> StoreResult<()> {
            let mut board = self.load()?;
            let before = board.widgets.len();
            board.widgets.retain(|w| w.id != id);
            if board.widgets.len() == before {
                return Err(StoreError::NotFound(id));
            }
            self.save(&board)?;
            Ok(())
        }

        fn setting(&self, key: &str) -> StoreResult<Option<String>> {
            let board = self.load()?;
            Ok(board.settings.get(key).cloned())
        }

        fn put_setting(&self, key: &str, value: &str) -> StoreResult<()> {
            let mut board = self.load()?;
            board.settings.insert(key.to_string(), value.to_string());
            self.save(&board)
        }

        fn is_available(&self) -> bool {
            match self.path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => {
                    parent.exists() || fs::create_dir_all(parent).is_ok()
                }
                _ => true,
            }
        }
    }

    impl fmt::Debug for JsonFileStore {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("JsonFileStore")
                .field("path", &self.path)
                .finish()
        }
    }
}

#[cfg(feature = "json-storage")]
pub use json_store::JsonFileStore;
