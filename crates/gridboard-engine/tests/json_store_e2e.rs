//! Cross-session persistence through the JSON file store.
//!
//! Requires the `json-storage` feature.

#![cfg(feature = "json-storage")]

use gridboard_core::{GridPos, LayoutProposal, SurfaceStyle, WidgetKind};
use gridboard_engine::{Board, BoardConfig, JsonFileStore, WidgetStore};

#[test]
fn board_survives_a_restart_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("board.json");

    // Session one: build a board, move a widget, change settings.
    {
        let store = JsonFileStore::new(&path);
        let mut board = Board::new(BoardConfig::default(), Box::new(store));
        board.hydrate();
        let ids = board
            .add_widgets(&[WidgetKind::Todo, WidgetKind::AnalogClock])
            .unwrap();
        board.apply_layout_change(ids[0], LayoutProposal::from_parts(8, 0, 4, 5), true);
        board.set_surface_style(SurfaceStyle::Glass);
    }

    // The file is a versioned JSON document.
    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["format_version"], 1);
    assert_eq!(raw["widgets"].as_array().unwrap().len(), 2);

    // Session two: everything is back.
    let store = JsonFileStore::new(&path);
    let mut board = Board::new(BoardConfig::default(), Box::new(store));
    board.hydrate();
    assert_eq!(board.surface_style(), SurfaceStyle::Glass);
    let widgets = board.widgets();
    assert_eq!(widgets.len(), 2);
    assert_eq!(widgets[0].kind, WidgetKind::Todo);
    assert_eq!(widgets[0].pos, GridPos::new(8, 0));
    assert_eq!(widgets[1].kind, WidgetKind::AnalogClock);
}

#[test]
fn corrupt_board_file_is_an_error_not_a_panic() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("board.json");
    std::fs::write(&path, "{ not json").unwrap();

    let store = JsonFileStore::new(&path);
    assert!(store.list().is_err());

    // The engine degrades to an empty board rather than failing.
    let mut board = Board::new(BoardConfig::default(), Box::new(store));
    board.hydrate();
    assert!(board.widgets().is_empty());
}

#[test]
fn ids_keep_advancing_across_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("board.json");

    let first = {
        let store = JsonFileStore::new(&path);
        let mut board = Board::new(BoardConfig::default(), Box::new(store));
        board.add_widgets(&[WidgetKind::Notes]).unwrap()[0]
    };

    let store = JsonFileStore::new(&path);
    let mut board = Board::new(BoardConfig::default(), Box::new(store));
    board.hydrate();
    let second = board.add_widgets(&[WidgetKind::Notes]).unwrap()[0];
    assert!(second > first, "ids must stay unique after a restart");
}
