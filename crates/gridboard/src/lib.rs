#![forbid(unsafe_code)]

//! Gridboard public facade crate.
//!
//! This crate provides the stable, ergonomic surface area for hosts. It
//! re-exports the common types from the internal crates and offers a
//! lightweight prelude for day-to-day usage.
//!
//! ```
//! use gridboard::prelude::*;
//!
//! let mut board = Board::new(BoardConfig::default(), Box::new(MemoryStore::new()));
//! board.add_widgets(&[WidgetKind::Todo, WidgetKind::AnalogClock]).unwrap();
//! assert_eq!(board.widgets().len(), 2);
//! ```

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use gridboard_core::{
    GridPos, GridRect, GridSize, LayoutProposal, PageCapacity, PageId, ResizePolicy,
    SurfaceStyle, WidgetDraft, WidgetId, WidgetKind, WidgetRecord, WidgetSpec,
};

// --- Layout re-exports -----------------------------------------------------

pub use gridboard_layout::{find_slot, normalize};

// --- Engine re-exports -----------------------------------------------------

#[cfg(feature = "json-storage")]
pub use gridboard_engine::JsonFileStore;
pub use gridboard_engine::{
    Board, BoardConfig, LayoutWrite, MemoryStore, StoreError, StoreResult, WidgetStore,
    WriteQueue,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for gridboard hosts.
#[derive(Debug)]
pub enum Error {
    /// Storage failure.
    Store(StoreError),
    /// Board-level error with message.
    Board(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Board(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Board(_) => None,
        }
    }
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

/// Convenient result alias for hosts.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude ---------------------------------------------------------------

/// Common imports for typical hosts.
pub mod prelude {
    pub use crate::{
        Board, BoardConfig, GridPos, GridSize, LayoutProposal, MemoryStore, PageCapacity,
        PageId, SurfaceStyle, WidgetId, WidgetKind, WidgetRecord, WidgetStore,
    };
}
