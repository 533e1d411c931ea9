//! Deterministic overlap resolution.
//!
//! After any persisted mutation the board may carry residual overlaps —
//! a widget dropped onto another, a resize grown into a neighbor, stale
//! geometry loaded from storage. [`normalize`] resolves them per page by
//! pushing contested widgets straight down.
//!
//! # Contract
//!
//! Widgets are processed per page in `(y, x, id)` order; that order
//! decides which widget wins a contested slot (earlier row, then earlier
//! column, then lower id keeps its place; later ones are pushed below the
//! blockers). Only `y` ever changes — `x` and `size` are untouched, so
//! normalization resolves vertical stacking conflicts and never frees
//! horizontal space. The returned vector preserves the input order.
//!
//! Never called during a live drag; mid-gesture geometry is allowed to
//! overlap so the widget under the pointer does not jitter.
//!
//! # Invariants
//!
//! - After a pass, no two widgets on the same page overlap (up to the
//!   attempt guard below).
//! - A second pass over its own output changes nothing (fixed point).
//!
//! # Failure Modes
//!
//! | Condition | Behavior |
//! |-----------|----------|
//! | Push cycle exceeds [`MAX_PUSH_ATTEMPTS`] | Current position kept, best effort, no panic |
//! | Empty input | Empty output |

use std::collections::BTreeMap;

use gridboard_core::{GridRect, PageId, WidgetRecord};

/// Push iterations per widget before giving up on pathological input
/// (e.g. hundreds of identical rectangles at one coordinate).
pub const MAX_PUSH_ATTEMPTS: u32 = 1000;

/// Produce a collision-free arrangement, adjusting only `pos.y`.
#[must_use]
pub fn normalize(widgets: &[WidgetRecord]) -> Vec<WidgetRecord> {
    let mut by_page: BTreeMap<PageId, Vec<usize>> = BTreeMap::new();
    for (idx, widget) in widgets.iter().enumerate() {
        by_page.entry(widget.page).or_default().push(idx);
    }

    let mut resolved_y: Vec<u16> = widgets.iter().map(|w| w.pos.y).collect();

    for indices in by_page.into_values() {
        let mut order = indices;
        order.sort_by_key(|&i| (widgets[i].pos.y, widgets[i].pos.x, widgets[i].id));

        let mut placed: Vec<GridRect> = Vec::with_capacity(order.len());
        for &i in &order {
            let widget = &widgets[i];
            let mut y = widget.pos.y;
            let mut attempts = 0u32;
            loop {
                let candidate =
                    GridRect::from_parts(widget.pos.x, y, widget.size.w, widget.size.h);
                let push_to = placed
                    .iter()
                    .filter(|other| candidate.overlaps(other))
                    .map(|other| other.bottom())
                    .max();
                match push_to {
                    None => break,
                    Some(bottom) => {
                        if attempts >= MAX_PUSH_ATTEMPTS {
                            break;
                        }
                        y = bottom;
                        attempts += 1;
                    }
                }
            }
            resolved_y[i] = y;
            placed.push(GridRect::from_parts(widget.pos.x, y, widget.size.w, widget.size.h));
        }
    }

    widgets
        .iter()
        .enumerate()
        .map(|(i, widget)| {
            let mut out = widget.clone();
            out.pos.y = resolved_y[i];
            out
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use gridboard_core::{
        GridPos, GridSize, SurfaceStyle, WidgetId, WidgetKind, WidgetRecord,
    };

    fn widget(id: u64, x: u16, y: u16, w: u16, h: u16) -> WidgetRecord {
        widget_on(id, x, y, w, h, PageId::FIRST)
    }

    fn widget_on(id: u64, x: u16, y: u16, w: u16, h: u16, page: PageId) -> WidgetRecord {
        WidgetRecord {
            id: WidgetId(id),
            kind: WidgetKind::Notes,
            title: "Notes".to_string(),
            pos: GridPos::new(x, y),
            size: GridSize::new(w, h),
            min_size: GridSize::new(1, 1),
            page,
            surface: SurfaceStyle::Default,
            locked: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn overlapping_pairs(widgets: &[WidgetRecord]) -> usize {
        let mut count = 0;
        for (i, a) in widgets.iter().enumerate() {
            for b in widgets.iter().skip(i + 1) {
                if a.page == b.page && a.rect().overlaps(&b.rect()) {
                    count += 1;
                }
            }
        }
        count
    }

    #[test]
    fn collision_free_input_is_unchanged() {
        let input = vec![widget(1, 0, 0, 4, 2), widget(2, 4, 0, 4, 2)];
        assert_eq!(normalize(&input), input);
    }

    #[test]
    fn loser_is_pushed_below_the_winner() {
        // Same slot: the lower id wins the row, the other drops below.
        let input = vec![widget(2, 0, 0, 2, 3), widget(1, 0, 0, 2, 3)];
        let out = normalize(&input);
        assert_eq!(overlapping_pairs(&out), 0);
        assert_eq!(out[1].pos.y, 0, "lower id keeps the contested slot");
        assert_eq!(out[0].pos.y, 3, "higher id is pushed past the winner");
    }

    #[test]
    fn earlier_row_wins_regardless_of_id() {
        let input = vec![widget(1, 0, 1, 2, 2), widget(9, 0, 0, 2, 2)];
        let out = normalize(&input);
        assert_eq!(out[1].pos.y, 0, "widget already higher keeps its row");
        assert_eq!(out[0].pos.y, 2);
    }

    #[test]
    fn x_and_size_are_never_touched() {
        let input = vec![widget(1, 3, 0, 4, 4), widget(2, 5, 1, 4, 4)];
        let out = normalize(&input);
        for (before, after) in input.iter().zip(&out) {
            assert_eq!(before.pos.x, after.pos.x);
            assert_eq!(before.size, after.size);
        }
        assert_eq!(overlapping_pairs(&out), 0);
    }

    #[test]
    fn output_preserves_input_order() {
        let input = vec![widget(3, 0, 5, 2, 2), widget(1, 0, 0, 2, 2), widget(2, 0, 0, 2, 2)];
        let out = normalize(&input);
        let ids: Vec<u64> = out.iter().map(|w| w.id.0).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn pages_are_independent() {
        // Identical coordinates on different pages never conflict.
        let input = vec![
            widget_on(1, 0, 0, 4, 4, PageId(1)),
            widget_on(2, 0, 0, 4, 4, PageId(2)),
        ];
        let out = normalize(&input);
        assert_eq!(out[0].pos.y, 0);
        assert_eq!(out[1].pos.y, 0);
    }

    #[test]
    fn cascade_pushes_stack_in_order() {
        // Three widgets piled on one slot end up stacked by id.
        let input = vec![widget(1, 0, 0, 2, 2), widget(2, 0, 0, 2, 2), widget(3, 0, 0, 2, 2)];
        let out = normalize(&input);
        assert_eq!(out[0].pos.y, 0);
        assert_eq!(out[1].pos.y, 2);
        assert_eq!(out[2].pos.y, 4);
    }

    #[test]
    fn partial_overlap_pushes_below_lowest_blocker() {
        // The contested widget straddles two placed widgets with
        // different bottoms; it lands below the deeper one.
        let input = vec![
            widget(1, 0, 0, 2, 4),
            widget(2, 2, 0, 2, 2),
            widget(3, 1, 1, 2, 2),
        ];
        let out = normalize(&input);
        assert_eq!(overlapping_pairs(&out), 0);
        assert_eq!(out[2].pos.y, 4, "pushed past the tallest blocker");
    }

    #[test]
    fn normalize_is_idempotent() {
        let input = vec![
            widget(1, 0, 0, 4, 3),
            widget(2, 2, 1, 4, 3),
            widget(3, 0, 2, 2, 2),
            widget(4, 4, 0, 2, 6),
        ];
        let once = normalize(&input);
        let twice = normalize(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn degenerate_pile_terminates() {
        // Far more identical widgets than the attempt guard allows per
        // push; the pass must still terminate and resolve them.
        let input: Vec<WidgetRecord> = (0..200).map(|i| widget(i, 0, 0, 1, 1)).collect();
        let out = normalize(&input);
        assert_eq!(out.len(), 200);
        assert_eq!(overlapping_pairs(&out), 0);
    }

    #[test]
    fn empty_input_is_empty_output() {
        assert!(normalize(&[]).is_empty());
    }
}
