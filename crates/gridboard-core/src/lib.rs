#![forbid(unsafe_code)]

//! Core: grid geometry, the widget data model, and the widget catalog.

pub mod capacity;
pub mod catalog;
pub mod geometry;
pub mod widget;

pub use capacity::PageCapacity;
pub use catalog::{ResizePolicy, WidgetKind, WidgetSpec};
pub use geometry::{GridPos, GridRect, GridSize};
pub use widget::{
    LayoutProposal, PageId, SurfaceStyle, WidgetDraft, WidgetId, WidgetRecord,
};
