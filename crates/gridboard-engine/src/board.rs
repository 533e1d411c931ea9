//! The board controller: placement orchestration and layout mutation.
//!
//! A [`Board`] owns the in-memory widget collection and is its only
//! writer. UI bindings read snapshots; gestures and pickers call in
//! through the methods here. Both mutation paths funnel committed
//! arrangements through the normalizer before anything reaches the store.
//!
//! # State model
//!
//! The collection is replaced wholesale on every mutation
//! (copy-on-write `Arc` snapshot), never edited in place, so a snapshot
//! handed to a renderer stays coherent while later mutations land. The
//! in-memory snapshot is the source of truth for rendering; durable
//! storage converges on it through the write queue and may lag behind.
//!
//! # Interactive lifecycle
//!
//! ```text
//! Idle ──drag/resize──▶ Live updates (persist = false, N times)
//!                        │   in-memory only, no normalization
//!                        ▼
//!                       Settle (persist = true, once)
//!                        │   clamp → normalize → stage writes → flush
//!                        ▼
//!                       Idle
//! ```
//!
//! Callers guarantee a settle eventually follows live updates; an
//! abandoned gesture leaves the last live geometry in memory and writes
//! nothing.
//!
//! # Failure Modes
//!
//! | Failure | Behavior |
//! |---------|----------|
//! | Widget wider than the board | Skipped with a warning, batch continues |
//! | Bounded page exhausted | Later pages tried, then a new page opened |
//! | Store failure during a batch | Batch aborted, board state unchanged |
//! | Store failure on settle flush | Logged; memory stays authoritative |
//! | Layout change for unknown id | Warned and ignored |

use std::sync::Arc;
use std::time::{Duration, Instant};

use gridboard_core::{
    GridPos, GridRect, GridSize, LayoutProposal, PageCapacity, PageId, ResizePolicy,
    SurfaceStyle, WidgetDraft, WidgetId, WidgetKind, WidgetRecord,
};
use gridboard_layout::{find_slot, normalize};

use crate::queue::{LayoutWrite, WriteQueue};
use crate::store::{
    SETTING_CURRENT_PAGE, SETTING_SURFACE_STYLE, StoreResult, WidgetStore,
};

/// Board-level configuration, owned by the controller.
///
/// No ambient globals: hosts construct one of these and hand it to
/// [`Board::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardConfig {
    /// Column count of every page.
    pub columns: u16,
    /// Row capacity of a page; bounded boards overflow onto new pages.
    pub capacity: PageCapacity,
    /// Run a normalization pass over the whole board after a batch of
    /// additions. Off by default: batch placement is already
    /// collision-free against its own shadow.
    pub normalize_after_batch: bool,
    /// How long settled writes may sit in the queue before they are due.
    /// Zero means settles persist synchronously.
    pub flush_debounce: Duration,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            columns: 16,
            capacity: PageCapacity::Unbounded,
            normalize_after_batch: false,
            flush_debounce: Duration::ZERO,
        }
    }
}

impl BoardConfig {
    /// Set the column count.
    #[must_use]
    pub fn with_columns(mut self, columns: u16) -> Self {
        self.columns = columns;
        self
    }

    /// Set the page capacity.
    #[must_use]
    pub fn with_capacity(mut self, capacity: PageCapacity) -> Self {
        self.capacity = capacity;
        self
    }

    /// Enable or disable the post-batch normalization pass.
    #[must_use]
    pub fn with_normalize_after_batch(mut self, enabled: bool) -> Self {
        self.normalize_after_batch = enabled;
        self
    }

    /// Set the write-queue debounce window.
    #[must_use]
    pub fn with_flush_debounce(mut self, debounce: Duration) -> Self {
        self.flush_debounce = debounce;
        self
    }
}

/// The widget board: collection state, placement, and mutation.
pub struct Board {
    config: BoardConfig,
    widgets: Arc<[WidgetRecord]>,
    current_page: PageId,
    surface: SurfaceStyle,
    store: Box<dyn WidgetStore>,
    queue: WriteQueue,
}

impl Board {
    /// Create an empty board over the given store.
    ///
    /// Call [`hydrate`](Self::hydrate) to load persisted state.
    #[must_use]
    pub fn new(config: BoardConfig, store: Box<dyn WidgetStore>) -> Self {
        let queue = WriteQueue::new(config.flush_debounce);
        Self {
            config,
            widgets: Vec::new().into(),
            current_page: PageId::FIRST,
            surface: SurfaceStyle::Default,
            store,
            queue,
        }
    }

    /// Load widgets and board settings from the store.
    ///
    /// Loaded geometry is normalized so stale storage can never violate
    /// the no-overlap invariant. A store failure leaves an empty board
    /// and is logged, not propagated.
    pub fn hydrate(&mut self) {
        match self.store.list() {
            Ok(records) => {
                self.widgets = normalize(&records).into();
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to load widgets, starting empty");
                self.widgets = Vec::new().into();
            }
        }

        match self.store.setting(SETTING_SURFACE_STYLE) {
            Ok(Some(value)) => {
                if let Some(style) = SurfaceStyle::from_label(&value) {
                    self.surface = style;
                }
            }
            Ok(None) => {}
            Err(err) => tracing::warn!(error = %err, "failed to load surface style"),
        }

        match self.store.setting(SETTING_CURRENT_PAGE) {
            Ok(Some(value)) => {
                if let Ok(page) = value.parse::<u64>() {
                    self.current_page = PageId(page);
                }
            }
            Ok(None) => {}
            Err(err) => tracing::warn!(error = %err, "failed to load current page"),
        }
    }

    // ── Accessors ──────────────────────────────────────────────────────

    /// A snapshot of every widget. Cheap to clone, immutable.
    #[must_use]
    pub fn widgets(&self) -> Arc<[WidgetRecord]> {
        Arc::clone(&self.widgets)
    }

    /// Widgets on one page.
    #[must_use]
    pub fn page_widgets(&self, page: PageId) -> Vec<WidgetRecord> {
        self.widgets
            .iter()
            .filter(|w| w.page == page)
            .cloned()
            .collect()
    }

    /// Sorted distinct pages that currently hold widgets.
    #[must_use]
    pub fn available_pages(&self) -> Vec<PageId> {
        let mut pages: Vec<PageId> = self.widgets.iter().map(|w| w.page).collect();
        pages.sort_unstable();
        pages.dedup();
        pages
    }

    /// The page the user is looking at.
    #[must_use]
    pub fn current_page(&self) -> PageId {
        self.current_page
    }

    /// The board-wide surface style applied to new widgets.
    #[must_use]
    pub fn surface_style(&self) -> SurfaceStyle {
        self.surface
    }

    /// The board configuration.
    #[must_use]
    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// The storage backend, for host-level inspection.
    #[must_use]
    pub fn store(&self) -> &dyn WidgetStore {
        self.store.as_ref()
    }

    /// Whether settled writes are waiting to be flushed.
    #[must_use]
    pub fn has_pending_writes(&self) -> bool {
        !self.queue.is_empty()
    }

    // ── Settings ───────────────────────────────────────────────────────

    /// Switch the visible page and persist the choice.
    pub fn set_current_page(&mut self, page: PageId) {
        self.current_page = page;
        if let Err(err) = self
            .store
            .put_setting(SETTING_CURRENT_PAGE, &page.0.to_string())
        {
            tracing::error!(error = %err, "failed to persist current page");
        }
    }

    /// Change the surface style for future widgets and persist it.
    pub fn set_surface_style(&mut self, style: SurfaceStyle) {
        self.surface = style;
        if let Err(err) = self.store.put_setting(SETTING_SURFACE_STYLE, style.label()) {
            tracing::error!(error = %err, "failed to persist surface style");
        }
    }

    // ── Placement orchestration ────────────────────────────────────────

    /// Add widgets of the given kinds, one at a time.
    ///
    /// Each placement sees the occupancy shadow of the target page plus
    /// every draft placed earlier in the same call, so batch members
    /// never land on each other. On a bounded board an exhausted page
    /// falls through to later existing pages and finally to a freshly
    /// opened one; unbounded boards always place on the current page.
    ///
    /// The whole batch persists together: a store failure aborts the
    /// call with the board unchanged (widgets already created by the
    /// failing batch remain in the store and surface on next hydrate).
    /// Ends by switching to the last page that received widgets.
    pub fn add_widgets(&mut self, kinds: &[WidgetKind]) -> StoreResult<Vec<WidgetId>> {
        if kinds.is_empty() {
            return Ok(Vec::new());
        }

        let mut drafts: Vec<WidgetDraft> = Vec::new();
        let mut target_page = self.current_page;

        for &kind in kinds {
            let spec = kind.spec();
            if spec.default_size.w > self.config.columns {
                tracing::warn!(
                    kind = %kind,
                    columns = self.config.columns,
                    "widget is wider than the board, skipping"
                );
                continue;
            }
            let (page, pos) = self.resolve_placement(&drafts, spec.default_size, target_page);
            target_page = page;
            drafts.push(WidgetDraft::from_spec(kind, page, self.surface, pos));
        }

        let Some(last_page) = drafts.last().map(|d| d.page) else {
            tracing::warn!("no widgets to create");
            return Ok(Vec::new());
        };

        let mut created = Vec::with_capacity(drafts.len());
        for draft in drafts {
            match self.store.create(draft) {
                Ok(record) => created.push(record),
                Err(err) => {
                    tracing::error!(error = %err, "failed to create widgets, aborting batch");
                    return Err(err);
                }
            }
        }

        let mut next = self.widgets.to_vec();
        next.extend(created.iter().cloned());
        if self.config.normalize_after_batch {
            next = normalize(&next);
        }
        self.widgets = next.into();

        tracing::debug!(count = created.len(), page = %last_page, "widgets added");
        if last_page != self.current_page {
            self.set_current_page(last_page);
        }
        Ok(created.into_iter().map(|w| w.id).collect())
    }

    /// Resolve the page and position for one widget of `size`.
    ///
    /// Always succeeds: a bounded board opens a new page as a last
    /// resort, and an unbounded page cannot be exhausted.
    fn resolve_placement(
        &self,
        drafts: &[WidgetDraft],
        size: GridSize,
        start: PageId,
    ) -> (PageId, GridPos) {
        let shadow = self.shadow_for(drafts, start);
        if let Some(pos) = find_slot(&shadow, size, self.config.columns, self.config.capacity) {
            return (start, pos);
        }

        // Page exhausted (bounded): walk later existing pages in order.
        let max_existing = self
            .available_pages()
            .into_iter()
            .max()
            .unwrap_or(start)
            .max(start);
        let mut page = start.next();
        while page <= max_existing {
            let shadow = self.shadow_for(drafts, page);
            if let Some(pos) =
                find_slot(&shadow, size, self.config.columns, self.config.capacity)
                && self.config.capacity.fits(pos.y.saturating_add(size.h))
            {
                return (page, pos);
            }
            page = page.next();
        }

        // Nothing fits anywhere: open a fresh page.
        (max_existing.next(), GridPos::ORIGIN)
    }

    /// Occupancy shadow for a page: committed widgets plus batch drafts.
    fn shadow_for(&self, drafts: &[WidgetDraft], page: PageId) -> Vec<GridRect> {
        self.widgets
            .iter()
            .filter(|w| w.page == page)
            .map(|w| w.rect())
            .chain(drafts.iter().filter(|d| d.page == page).map(|d| d.rect()))
            .collect()
    }

    // ── Layout mutation pipeline ───────────────────────────────────────

    /// Apply a proposed move/resize to one widget.
    ///
    /// The proposal is constrained by the widget's resize policy and the
    /// board bounds, then compared against current geometry: an
    /// identical result is dropped entirely — no state replacement, no
    /// store traffic — so a caller re-emitting the same geometry cannot
    /// loop. Live updates (`persist = false`) replace in-memory state
    /// only. Settles normalize the page and stage a write for every
    /// widget normalization moved, not just the gesture target.
    pub fn apply_layout_change(&mut self, id: WidgetId, proposed: LayoutProposal, persist: bool) {
        let Some(idx) = self.widgets.iter().position(|w| w.id == id) else {
            tracing::warn!(widget = %id, "layout change for unknown widget");
            return;
        };
        let widget = &self.widgets[idx];
        let (pos, size) = match widget.kind.resize_policy() {
            ResizePolicy::Fixed => self.constrain_fixed(widget, proposed),
            ResizePolicy::Square => self.constrain_square(widget, proposed),
            ResizePolicy::Free => self.constrain_free(widget, proposed),
        };

        if pos == widget.pos && size == widget.size {
            return;
        }

        let mut next = self.widgets.to_vec();
        next[idx].pos = pos;
        next[idx].size = size;

        if !persist {
            // Mid-gesture: no normalization, or the dragged widget's
            // neighbors would visibly jitter under the pointer.
            self.widgets = next.into();
            return;
        }

        let page = next[idx].page;
        let normalized = normalize(&next);
        let now = Instant::now();
        for (before, after) in self.widgets.iter().zip(&normalized) {
            if after.page == page && (before.pos != after.pos || before.size != after.size) {
                self.queue.stage(
                    LayoutWrite {
                        id: after.id,
                        pos: after.pos,
                        size: after.size,
                    },
                    now,
                );
            }
        }
        self.widgets = normalized.into();
        self.flush_due(now);
    }

    /// Remove a widget, then normalize the remainder.
    ///
    /// The store cascades removal of the widget's child records.
    pub fn remove_widget(&mut self, id: WidgetId) -> StoreResult<()> {
        self.store.remove(id)?;
        let remaining: Vec<WidgetRecord> = self
            .widgets
            .iter()
            .filter(|w| w.id != id)
            .cloned()
            .collect();
        self.widgets = normalize(&remaining).into();
        Ok(())
    }

    // ── Write flushing ─────────────────────────────────────────────────

    /// Flush staged writes if the debounce deadline has passed.
    ///
    /// Hosts with a non-zero debounce call this from their tick; with
    /// the default zero debounce settles flush inline and this is a
    /// no-op between gestures.
    pub fn flush_due(&mut self, now: Instant) {
        if self.queue.due(now) {
            self.flush_all();
        }
    }

    /// Flush every staged write regardless of deadline.
    ///
    /// Failures are logged per widget; in-memory state remains the
    /// authority and diverges from storage until a later write lands.
    pub fn flush_all(&mut self) {
        for write in self.queue.drain() {
            if let Err(err) = self.store.update_layout(write.id, write.pos, write.size) {
                tracing::error!(widget = %write.id, error = %err, "failed to persist layout");
            }
        }
    }

    // ── Constraint policies ────────────────────────────────────────────

    /// Fixed-size kinds: the proposal's size is discarded, position is
    /// honored within bounds.
    fn constrain_fixed(
        &self,
        widget: &WidgetRecord,
        proposed: LayoutProposal,
    ) -> (GridPos, GridSize) {
        let size = widget.size;
        let x = proposed.pos.x.min(self.config.columns.saturating_sub(size.w));
        let y = match self.config.capacity.max_rows() {
            Some(rows) => proposed.pos.y.min(rows.saturating_sub(size.h)),
            None => proposed.pos.y,
        };
        (GridPos::new(x, y), size)
    }

    /// Square kinds: whichever dimension moved further wins, the result
    /// is clamped square, and position is re-derived in the same step so
    /// no non-square intermediate is ever committed.
    fn constrain_square(
        &self,
        widget: &WidgetRecord,
        proposed: LayoutProposal,
    ) -> (GridPos, GridSize) {
        let min_side = widget.min_size.w.max(widget.min_size.h);
        let dw = proposed.size.w.abs_diff(widget.size.w);
        let dh = proposed.size.h.abs_diff(widget.size.h);
        let target = if dw > dh {
            proposed.size.w
        } else if dh > dw {
            proposed.size.h
        } else if proposed.size.w > widget.size.w || proposed.size.h > widget.size.h {
            proposed.size.w.max(proposed.size.h)
        } else {
            proposed.size.w.min(proposed.size.h)
        };

        let mut max_side = self.config.columns.saturating_sub(proposed.pos.x);
        if let Some(rows) = self.config.capacity.max_rows() {
            max_side = max_side.min(rows.saturating_sub(proposed.pos.y));
        }
        // The minimum wins when the bounds conflict.
        let side = target.min(max_side.max(1)).max(min_side);

        let x = proposed.pos.x.min(self.config.columns.saturating_sub(side));
        let y = match self.config.capacity.max_rows() {
            Some(rows) => proposed.pos.y.min(rows.saturating_sub(side)),
            None => proposed.pos.y,
        };
        (GridPos::new(x, y), GridSize::new(side, side))
    }

    /// Free kinds: clamp each axis independently against the minimum
    /// size and the board bounds.
    ///
    /// The span is resolved first and the position clamped against it,
    /// so raising a sub-minimum proposal can never push the widget past
    /// an edge.
    fn constrain_free(
        &self,
        widget: &WidgetRecord,
        proposed: LayoutProposal,
    ) -> (GridPos, GridSize) {
        let columns = self.config.columns;
        let w = proposed.size.w.min(columns).max(widget.min_size.w);
        let x = proposed.pos.x.min(columns.saturating_sub(w));
        match self.config.capacity.max_rows() {
            Some(rows) => {
                let h = proposed.size.h.min(rows).max(widget.min_size.h);
                let y = proposed.pos.y.min(rows.saturating_sub(h));
                (GridPos::new(x, y), GridSize::new(w, h))
            }
            None => {
                let h = proposed.size.h.max(widget.min_size.h);
                (GridPos::new(x, proposed.pos.y), GridSize::new(w, h))
            }
        }
    }
}

impl Drop for Board {
    /// Flush anything still staged so teardown never strands a settle.
    fn drop(&mut self) {
        self.flush_all();
    }
}

impl std::fmt::Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Board")
            .field("widgets", &self.widgets.len())
            .field("current_page", &self.current_page)
            .field("store", &self.store.name())
            .finish()
    }
}
