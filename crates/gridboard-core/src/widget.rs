//! The widget data model.
//!
//! A [`WidgetRecord`] is the unit the board engine places, moves, and
//! persists. Records are fully valid from creation: a draft is built from a
//! catalog entry with a resolved, collision-free position before the store
//! ever sees it. Timestamps are owned by the store, not the layout engine.

use chrono::{DateTime, Utc};

use crate::catalog::WidgetKind;
use crate::geometry::{GridPos, GridRect, GridSize};

/// Store-assigned widget identifier. Opaque, stable, ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WidgetId(pub u64);

impl std::fmt::Display for WidgetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifier of a page (or tab): an independent coordinate space.
///
/// Widgets on different pages never collide with each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageId(pub u64);

impl PageId {
    /// The default page records land on when none is recorded.
    pub const FIRST: Self = Self(1);

    /// The page numerically after this one.
    #[inline]
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl std::fmt::Display for PageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "page {}", self.0)
    }
}

/// Cosmetic surface treatment, inherited from the board style at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum SurfaceStyle {
    #[default]
    Default,
    Glass,
    Neumorphic,
}

impl SurfaceStyle {
    /// Stable kebab-case label, also the persisted settings value.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            SurfaceStyle::Default => "default",
            SurfaceStyle::Glass => "glass",
            SurfaceStyle::Neumorphic => "neumorphic",
        }
    }

    /// Parse a persisted label; unknown values are `None`.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "default" => Some(SurfaceStyle::Default),
            "glass" => Some(SurfaceStyle::Glass),
            "neumorphic" => Some(SurfaceStyle::Neumorphic),
            _ => None,
        }
    }
}

/// Resolved grid geometry proposed by a drag or resize gesture.
///
/// The gesture collaborator translates pointer movement into cell
/// coordinates before the engine sees anything; the engine never handles
/// pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutProposal {
    /// Proposed top-left cell.
    pub pos: GridPos,
    /// Proposed span.
    pub size: GridSize,
}

impl LayoutProposal {
    /// Create a proposal from raw coordinates.
    #[inline]
    #[must_use]
    pub const fn from_parts(x: u16, y: u16, w: u16, h: u16) -> Self {
        Self {
            pos: GridPos::new(x, y),
            size: GridSize::new(w, h),
        }
    }
}

#[cfg(feature = "serde")]
fn first_page() -> PageId {
    PageId::FIRST
}

/// A widget as placed on a board and held in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WidgetRecord {
    /// Store-assigned identifier.
    pub id: WidgetId,
    /// Catalog kind.
    pub kind: WidgetKind,
    /// Display title, defaulted from the catalog entry.
    pub title: String,
    /// Top-left cell on the page.
    pub pos: GridPos,
    /// Cell span.
    pub size: GridSize,
    /// Smallest size a resize may produce.
    pub min_size: GridSize,
    /// The page this widget belongs to. Records from before paging
    /// existed deserialize onto the first page.
    #[cfg_attr(feature = "serde", serde(default = "first_page"))]
    pub page: PageId,
    /// Cosmetic surface treatment.
    #[cfg_attr(feature = "serde", serde(default))]
    pub surface: SurfaceStyle,
    /// Reserved: excluded from placement decisions, round-trips through
    /// the store.
    #[cfg_attr(feature = "serde", serde(default))]
    pub locked: bool,
    /// Set by the store at creation.
    pub created_at: DateTime<Utc>,
    /// Maintained by the store on every persisted mutation.
    pub updated_at: DateTime<Utc>,
}

impl WidgetRecord {
    /// The rectangle this widget occupies.
    #[inline]
    #[must_use]
    pub const fn rect(&self) -> GridRect {
        GridRect::new(self.pos, self.size)
    }

    /// Repair degenerate geometry loaded from storage.
    ///
    /// Spans are raised to at least one cell and to the recorded minimum
    /// size. Positions need no repair: coordinates are unsigned.
    pub fn sanitize(&mut self) {
        self.min_size.w = self.min_size.w.max(1);
        self.min_size.h = self.min_size.h.max(1);
        self.size = self.size.max(self.min_size);
    }
}

/// A widget awaiting creation: everything but the store-owned fields.
///
/// Drafts placed earlier in a batch participate in collision checks while
/// remaining invisible to persistence until the batch commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetDraft {
    pub kind: WidgetKind,
    pub title: String,
    pub pos: GridPos,
    pub size: GridSize,
    pub min_size: GridSize,
    pub page: PageId,
    pub surface: SurfaceStyle,
    pub locked: bool,
}

impl WidgetDraft {
    /// Build a draft from a catalog entry at a resolved position.
    #[must_use]
    pub fn from_spec(
        kind: WidgetKind,
        page: PageId,
        surface: SurfaceStyle,
        pos: GridPos,
    ) -> Self {
        let spec = kind.spec();
        Self {
            kind,
            title: spec.title.to_string(),
            pos,
            size: spec.default_size,
            min_size: spec.min_size,
            page,
            surface,
            locked: false,
        }
    }

    /// The rectangle this draft would occupy.
    #[inline]
    #[must_use]
    pub const fn rect(&self) -> GridRect {
        GridRect::new(self.pos, self.size)
    }
}
