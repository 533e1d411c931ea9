//! Staged layout writes with an explicit flush deadline.
//!
//! Settle events can shift several widgets at once (normalization moves
//! siblings), and a fast sequence of settles would otherwise hammer the
//! store with redundant writes. The [`WriteQueue`] holds the latest
//! geometry per widget together with a single flush deadline:
//!
//! - **Latest-wins**: staging a widget that is already pending replaces
//!   its geometry; there is one entry per widget, keyed by id.
//! - **Replaceable deadline**: each stage pushes the deadline to
//!   `now + debounce`; a zero debounce makes staged writes due
//!   immediately, i.e. settles persist synchronously.
//! - **Explicit drain**: the owner decides when to flush — on the
//!   deadline, on demand, or on teardown. Nothing happens from ambient
//!   timers.
//!
//! Write ordering follows call order: a later stage for the same widget
//! simply overwrites the earlier one before either reaches the store.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use gridboard_core::{GridPos, GridSize, WidgetId};

/// Geometry waiting to be written for one widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutWrite {
    /// The widget the write belongs to.
    pub id: WidgetId,
    /// Final top-left cell.
    pub pos: GridPos,
    /// Final span.
    pub size: GridSize,
}

/// Pending layout writes and their shared flush deadline.
#[derive(Debug)]
pub struct WriteQueue {
    pending: BTreeMap<WidgetId, LayoutWrite>,
    deadline: Option<Instant>,
    debounce: Duration,
}

impl WriteQueue {
    /// Create a queue with the given debounce window.
    #[must_use]
    pub fn new(debounce: Duration) -> Self {
        Self {
            pending: BTreeMap::new(),
            deadline: None,
            debounce,
        }
    }

    /// Stage a write, replacing any pending write for the same widget.
    ///
    /// The flush deadline restarts at `now + debounce`.
    pub fn stage(&mut self, write: LayoutWrite, now: Instant) {
        self.pending.insert(write.id, write);
        self.deadline = Some(now + self.debounce);
    }

    /// Whether staged writes are due at `now`.
    #[must_use]
    pub fn due(&self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) => !self.pending.is_empty() && deadline <= now,
            None => false,
        }
    }

    /// Number of staged writes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is staged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Take every staged write, clearing the deadline.
    pub fn drain(&mut self) -> Vec<LayoutWrite> {
        self.deadline = None;
        std::mem::take(&mut self.pending).into_values().collect()
    }

    /// Discard every staged write without flushing.
    pub fn clear(&mut self) {
        self.pending.clear();
        self.deadline = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(id: u64, x: u16, y: u16) -> LayoutWrite {
        LayoutWrite {
            id: WidgetId(id),
            pos: GridPos::new(x, y),
            size: GridSize::new(2, 2),
        }
    }

    #[test]
    fn latest_write_wins_per_widget() {
        let mut queue = WriteQueue::new(Duration::ZERO);
        let now = Instant::now();
        queue.stage(write(1, 0, 0), now);
        queue.stage(write(1, 5, 5), now);
        queue.stage(write(2, 1, 1), now);
        let drained = queue.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].pos, GridPos::new(5, 5));
        assert!(queue.is_empty());
    }

    #[test]
    fn zero_debounce_is_due_immediately() {
        let mut queue = WriteQueue::new(Duration::ZERO);
        let now = Instant::now();
        assert!(!queue.due(now));
        queue.stage(write(1, 0, 0), now);
        assert!(queue.due(now));
    }

    #[test]
    fn staging_restarts_the_deadline() {
        let mut queue = WriteQueue::new(Duration::from_millis(100));
        let start = Instant::now();
        queue.stage(write(1, 0, 0), start);
        assert!(!queue.due(start));
        assert!(queue.due(start + Duration::from_millis(100)));

        // A later stage pushes the deadline out.
        queue.stage(write(2, 3, 0), start + Duration::from_millis(90));
        assert!(!queue.due(start + Duration::from_millis(150)));
        assert!(queue.due(start + Duration::from_millis(190)));
    }

    #[test]
    fn drain_clears_the_deadline() {
        let mut queue = WriteQueue::new(Duration::ZERO);
        let now = Instant::now();
        queue.stage(write(1, 0, 0), now);
        let _ = queue.drain();
        assert!(!queue.due(now + Duration::from_secs(1)));
    }

    #[test]
    fn clear_discards_without_flushing() {
        let mut queue = WriteQueue::new(Duration::ZERO);
        queue.stage(write(1, 0, 0), Instant::now());
        queue.clear();
        assert!(queue.is_empty());
        assert!(queue.drain().is_empty());
    }
}
