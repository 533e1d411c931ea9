//! Property tests for the normalizer's contract.

use chrono::Utc;
use gridboard_core::{
    GridPos, GridSize, PageId, SurfaceStyle, WidgetId, WidgetKind, WidgetRecord,
};
use gridboard_layout::normalize;
use proptest::prelude::*;

fn record(id: u64, x: u16, y: u16, w: u16, h: u16, page: u64) -> WidgetRecord {
    WidgetRecord {
        id: WidgetId(id),
        kind: WidgetKind::Todo,
        title: "Todo".to_string(),
        pos: GridPos::new(x, y),
        size: GridSize::new(w, h),
        min_size: GridSize::new(1, 1),
        page: PageId(page),
        surface: SurfaceStyle::Default,
        locked: false,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn arb_board() -> impl Strategy<Value = Vec<WidgetRecord>> {
    prop::collection::vec((0u16..12, 0u16..30, 1u16..5, 1u16..5, 1u64..4), 0..25).prop_map(
        |raw| {
            raw.into_iter()
                .enumerate()
                .map(|(i, (x, y, w, h, page))| record(i as u64, x, y, w, h, page))
                .collect()
        },
    )
}

proptest! {
    #[test]
    fn no_same_page_overlap_after_normalize(board in arb_board()) {
        let out = normalize(&board);
        for (i, a) in out.iter().enumerate() {
            for b in out.iter().skip(i + 1) {
                if a.page == b.page {
                    prop_assert!(
                        !a.rect().overlaps(&b.rect()),
                        "{} and {} overlap on {}", a.id, b.id, a.page
                    );
                }
            }
        }
    }

    #[test]
    fn normalize_is_a_fixed_point(board in arb_board()) {
        let once = normalize(&board);
        let twice = normalize(&once);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn only_y_ever_changes(board in arb_board()) {
        let out = normalize(&board);
        prop_assert_eq!(board.len(), out.len());
        for (before, after) in board.iter().zip(&out) {
            prop_assert_eq!(before.id, after.id, "input order preserved");
            prop_assert_eq!(before.pos.x, after.pos.x);
            prop_assert_eq!(before.size, after.size);
        }
    }

    #[test]
    fn widgets_are_only_pushed_down(board in arb_board()) {
        let out = normalize(&board);
        for (before, after) in board.iter().zip(&out) {
            prop_assert!(
                after.pos.y >= before.pos.y,
                "{} moved up from {} to {}", before.id, before.pos.y, after.pos.y
            );
        }
    }
}
