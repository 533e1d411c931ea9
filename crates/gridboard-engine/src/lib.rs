#![forbid(unsafe_code)]

//! The board engine: stateful placement, mutation, and persistence.
//!
//! This crate owns everything stateful about a widget board:
//!
//! - [`Board`] — the controller. Sole writer of the in-memory widget
//!   collection; places new widgets, applies drag/resize mutations, and
//!   funnels every committed arrangement through the normalizer in
//!   `gridboard-layout`.
//! - [`WidgetStore`] — the durable boundary. [`MemoryStore`] always;
//!   `JsonFileStore` with the `json-storage` feature.
//! - [`WriteQueue`] — staged layout writes with an explicit, replaceable
//!   flush deadline instead of ambient timers.
//!
//! Execution is single-threaded and event-driven: mutations apply
//! synchronously in call order, and durable writes trail behind through
//! the queue. The in-memory snapshot is what renders; storage is
//! eventually consistent with it and failures are logged, never fatal.

pub mod board;
pub mod queue;
pub mod store;

pub use board::{Board, BoardConfig};
pub use queue::{LayoutWrite, WriteQueue};
#[cfg(feature = "json-storage")]
pub use store::JsonFileStore;
pub use store::{
    MemoryStore, SETTING_CURRENT_PAGE, SETTING_SURFACE_STYLE, StoreError, StoreResult,
    WidgetStore,
};
