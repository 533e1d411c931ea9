//! First-fit free-slot search.
//!
//! Scans candidate positions in row-major order — `y` from 0 downward,
//! `x` from 0 rightward within each row — and returns the first position
//! where the requested size overlaps nothing. The scan order is part of
//! the contract: callers rely on first-fit-top-left determinism, not just
//! "some free slot".
//!
//! # Search depth
//!
//! - Bounded pages: the scan stops once the widget's bottom edge would
//!   pass the row cap; `None` means the page is exhausted and the caller
//!   must try another page or create one.
//! - Unbounded pages: the scan is capped at the occupied bottom plus a
//!   fixed pad to guarantee termination; if even that is full, the widget
//!   is placed in the first column just past the scanned depth. Unbounded
//!   searches always succeed for any size that fits the columns.
//!
//! # Failure Modes
//!
//! | Condition | Result |
//! |-----------|--------|
//! | `size.w > columns` | `None` (cannot fit on any row) |
//! | `size.w == 0` or `size.h == 0` | `None` (degenerate request) |
//! | Bounded and `size.h > rows` | `None` |
//! | No occupancy | `Some((0, 0))` |

use gridboard_core::{GridPos, GridRect, GridSize, PageCapacity};

/// Extra rows scanned past the occupied bottom on an unbounded page.
pub const UNBOUNDED_SEARCH_PAD: u16 = 50;

/// Extra rows scanned past the occupied bottom on a bounded page.
pub const BOUNDED_SEARCH_PAD: u16 = 10;

/// Find the first free position for `size`, scanning row-major.
pub fn find_slot(
    occupied: &[GridRect],
    size: GridSize,
    columns: u16,
    capacity: PageCapacity,
) -> Option<GridPos> {
    if size.w == 0 || size.h == 0 || size.w > columns {
        return None;
    }

    let occupied_bottom = occupied.iter().map(GridRect::bottom).max().unwrap_or(0);

    // Last row the widget's top edge may start on, and how deep to scan.
    let (max_y, depth) = match capacity {
        PageCapacity::Bounded(rows) => {
            let max_y = rows.checked_sub(size.h)?;
            let depth = max_y.min(occupied_bottom.saturating_add(BOUNDED_SEARCH_PAD));
            (Some(max_y), depth)
        }
        PageCapacity::Unbounded => {
            (None, occupied_bottom.saturating_add(UNBOUNDED_SEARCH_PAD))
        }
    };

    for y in 0..=depth {
        if let Some(max_y) = max_y
            && y > max_y
        {
            return None;
        }
        for x in 0..=(columns - size.w) {
            let candidate = GridRect::new(GridPos::new(x, y), size);
            if !occupied.iter().any(|rect| candidate.overlaps(rect)) {
                return Some(GridPos::new(x, y));
            }
        }
    }

    match capacity {
        PageCapacity::Bounded(_) => None,
        // The scanned region is full; start a fresh row below it.
        PageCapacity::Unbounded => Some(GridPos::new(0, depth.saturating_add(1))),
    }
}
