use rstest::rstest;
use serde_json::json;

use jsontab::{
    CsvReadOptions, CsvWriteOptions, GapMode, ListStrategy, SessionOptions, TableSession,
};

#[rstest]
fn scan_edit_and_rebuild() {
    let mut session = TableSession::new();
    session.scan_value(&json!({
        "name": "Alice",
        "stats": {"hp": 10},
        "items": [{"id": 100, "label": "Potion"}]
    }));

    // plain columns first, then the list block with one grow slot
    assert_eq!(
        session.header(),
        [
            "name",
            "stats.hp",
            "items[0].id",
            "items[0].label",
            "items[1].id",
            "items[1].label",
        ]
    );

    let id = session.column("items[1].id").unwrap();
    let label = session.column("items[1].label").unwrap();
    session.set_cell(0, id, "101");
    session.set_cell(0, label, "Elixir");

    assert_eq!(
        session.records(),
        vec![json!({
            "name": "Alice",
            "stats": {"hp": 10},
            "items": [
                {"id": 100, "label": "Potion"},
                {"id": 101, "label": "Elixir"},
            ]
        })]
    );
}

#[rstest]
fn rescan_merges_with_previous_header() {
    let mut session = TableSession::new();
    session.scan_value(&json!({"items": [{"id": 1}], "name": "x"}));
    assert!(session.column("items[0].id").is_some());

    // the array vanished from the data; its seed column survives the rescan
    session.scan_value(&json!({"name": "y"}));
    assert!(session.column("items[0].id").is_some());
    assert_eq!(session.records(), vec![json!({"name": "y"})]);
}

#[rstest]
fn ragged_collection_gets_a_square_table() {
    let mut session = TableSession::new();
    session.scan_value(&json!([
        {"items": [{"id": 1}]},
        {"items": [{"id": 2, "tag": "x"}]}
    ]));

    // both indices expose the same tails; missing data is just blank
    let tag0 = session.column("items[0].tag").unwrap();
    assert_eq!(session.rows()[0][tag0], "");
    assert_eq!(session.rows()[1][tag0], "x");
}

#[rstest]
fn nested_child_arrays_propagate_across_indices() {
    let mut session = TableSession::with_options(SessionOptions::new().with_grow_extra(0));
    session.scan_value(&json!({
        "a": [
            {"x": 1, "b": [{"c": 1}]},
            {"x": 2}
        ]
    }));

    // the nested block materializes under every outer index, plus one
    // synthetic child slot
    for col in ["a[0].b[0].c", "a[0].b[1].c", "a[1].b[0].c", "a[1].b[1].c"] {
        assert!(session.column(col).is_some(), "{col}");
    }
}

#[rstest]
fn fixed_strategy_session() {
    let options = SessionOptions::new()
        .with_strategy(ListStrategy::Fixed(1))
        .with_grow_extra(0);
    let mut session = TableSession::with_options(options);
    session.scan_value(&json!({"items": [{"id": 1}, {"id": 2}, {"id": 3}]}));
    assert_eq!(session.header(), ["items[0].id"]);
}

#[rstest]
fn sparse_session_keeps_list_positions() {
    let options = SessionOptions::new()
        .with_gap_mode(GapMode::Sparse)
        .with_grow_extra(0);
    let mut session = TableSession::with_options(options);
    session.scan_value(&json!({"tags": ["a", "b", "c"]}));

    // blanking the last cell would shorten the list under break gaps;
    // sparse keeps the position as null
    let last = session.column("tags[2]").unwrap();
    session.set_cell(0, last, "");
    assert_eq!(session.records(), vec![json!({"tags": ["a", "b", null]})]);
}

#[rstest]
fn csv_export_import_preserves_the_table() {
    let mut session = TableSession::new();
    session.scan_value(&json!([
        {"name": "Ada", "note": "says \"hi\""},
        {"name": "Grace", "note": "line\nbreak"}
    ]));

    let csv = session.to_csv(&CsvWriteOptions::default());
    let mut restored = TableSession::new();
    restored.load_csv(&csv, &CsvReadOptions::default()).unwrap();

    assert_eq!(restored.header(), session.header());
    assert_eq!(restored.rows(), session.rows());
}

#[rstest]
fn pushed_row_starts_blank_and_unflattens_empty() {
    let mut session = TableSession::new();
    session.scan_value(&json!({"a": 1}));
    let row = session.push_row();
    assert_eq!(session.records()[row], json!({}));
    session.set_cell(row, 0, "2");
    assert_eq!(session.records()[row], json!({"a": 2}));
}
