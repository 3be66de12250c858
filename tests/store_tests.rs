// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use common::{dec, no_trade, win};
use std::fs;
use tempfile::tempdir;
use tradejournal::error::JournalError;
use tradejournal::journal::Journal;
use tradejournal::models::{Checklist, Direction, Interfered, Mood, Outcome, TradeRecord};
use tradejournal::store::sheet::{COLUMNS, SheetLayout, to_row};
use tradejournal::store::{CsvSheetStore, JsonFileStore, RecordStore, SqliteStore};
use tradejournal::utils::parse_locale_decimal;

fn rich_record() -> TradeRecord {
    let mut r = win("2025-03-14", "150.25");
    r.asset = "XAUUSD".into();
    r.direction = Direction::Both;
    r.time = "09:30".into();
    r.trade_type = "Internal -> External".into();
    r.htf_links = vec!["https://tv.example/htf".into(), "https://tv.example/htf2".into()];
    r.htf_desc = "Bullish narrative,\nswept \"Asia\" low 📈".into();
    r.htf_keypoints = "PDH, PWL".into();
    r.ltf_desc = "Ünïcödé model".into();
    r.general_notes = "line one\nline two".into();
    r.mood = Mood::Euphoric;
    r.interfered = Interfered::Yes;
    r.interfered_how = "moved stop".into();
    r.checklist = Checklist([true, false, true, false, true, false]);
    r
}

fn round_trip(store: &dyn RecordStore) {
    let records = vec![rich_record(), no_trade("2025-03-15"), win("2025-03-16", "-0.5")];
    store.save_all(&records).unwrap();
    let loaded = store.try_load_all().unwrap();
    assert_eq!(loaded, records);
    // Order survives a second save of the loaded set.
    store.save_all(&loaded).unwrap();
    assert_eq!(store.try_load_all().unwrap(), records);
}

#[test]
fn json_store_round_trips_records() {
    let dir = tempdir().unwrap();
    round_trip(&JsonFileStore::new(dir.path().join("nested/trading_data.json")));
}

#[test]
fn csv_store_round_trips_records() {
    let dir = tempdir().unwrap();
    round_trip(&CsvSheetStore::new(dir.path().join("trading_data.csv")));
}

#[test]
fn sqlite_store_round_trips_records() {
    let dir = tempdir().unwrap();
    round_trip(&SqliteStore::new(dir.path().join("journal.sqlite")));
}

#[test]
fn empty_collection_round_trips() {
    let dir = tempdir().unwrap();
    let stores: Vec<Box<dyn RecordStore>> = vec![
        Box::new(JsonFileStore::new(dir.path().join("a.json"))),
        Box::new(CsvSheetStore::new(dir.path().join("a.csv"))),
        Box::new(SqliteStore::new(dir.path().join("a.sqlite"))),
    ];
    for s in stores {
        s.save_all(&[]).unwrap();
        assert!(s.try_load_all().unwrap().is_empty(), "{}", s.describe());
    }
}

#[test]
fn missing_or_corrupt_files_load_as_empty() {
    let dir = tempdir().unwrap();
    let missing = JsonFileStore::new(dir.path().join("nope.json"));
    assert!(matches!(
        missing.try_load_all(),
        Err(JournalError::StoreUnavailable { .. })
    ));
    assert!(missing.load_all().is_empty());

    let corrupt = dir.path().join("corrupt.json");
    fs::write(&corrupt, "{ not json").unwrap();
    assert!(JsonFileStore::new(&corrupt).load_all().is_empty());

    assert!(SqliteStore::new(dir.path().join("nope.sqlite")).load_all().is_empty());
    assert!(CsvSheetStore::new(dir.path().join("nope.csv")).load_all().is_empty());
}

#[test]
fn json_store_accepts_legacy_entries() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("legacy.json");
    fs::write(
        &path,
        r#"[
          {"date": "2024-11-04", "asset": "NQ", "direction": "No Trade",
           "outcome": "No Trade", "pnl": 0, "checklist": [true, false]},
          {"date": "2024-11-05", "asset": "ES", "direction": "Short",
           "outcome": "Loss", "pnl": "-12,5"},
          "garbage",
          {"date": "2024-11-06", "asset": "MES", "pnl": 42.1}
        ]"#,
    )
    .unwrap();
    let store = JsonFileStore::new(&path);
    let records = store.try_load_all().unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].direction, Direction::NoTrade);
    assert_eq!(records[0].checklist.0, [true, false, false, false, false, false]);
    assert_eq!(records[1].pnl, dec("-12.5"));
    assert_eq!(records[2].pnl, dec("42.1"));
    assert_eq!(records[2].outcome, Outcome::Breakeven);
    assert_eq!(records[2].trade_type, "unspecified");
    // Missing ids decode as nil; the journal assigns real ones.
    assert!(records.iter().all(|r| r.id.is_nil()));
    assert!(matches!(
        store.held_back().as_slice(),
        [JournalError::UndecodableEntry { position: 2, .. }]
    ));
}

#[test]
fn json_store_writes_back_undecodable_entries() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("t.json");
    fs::write(
        &path,
        r#"[
          {"date": "2025-01-06", "asset": "NQ", "pnl": "abc"},
          {"date": "2025-01-07", "asset": "ES", "pnl": 5}
        ]"#,
    )
    .unwrap();

    let mut j = Journal::open(Box::new(JsonFileStore::new(&path)));
    assert_eq!(j.len(), 1);
    j.add(win("2025-01-08", "10")).unwrap();

    let v: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let entries = v.as_array().unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[2]["pnl"], "abc");
    assert_eq!(entries[2]["asset"], "NQ");

    // Still there after another full rewrite.
    let mut j = Journal::open(Box::new(JsonFileStore::new(&path)));
    j.delete_last().unwrap();
    let v: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(v.as_array().unwrap().len(), 2);
    assert_eq!(v[1]["pnl"], "abc");
}

#[test]
fn csv_store_writes_back_rejected_rows() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("t.csv");
    let good = to_row(&win("2025-01-06", "10"));
    let mut bad = to_row(&win("2025-01-07", "20"));
    let outcome_at = COLUMNS.iter().position(|c| *c == "outcome").unwrap();
    bad[outcome_at] = "Maybe".into();
    let mut w = csv::Writer::from_path(&path).unwrap();
    w.write_record(COLUMNS).unwrap();
    w.write_record(&bad).unwrap();
    w.write_record(&good).unwrap();
    w.flush().unwrap();
    drop(w);

    let store = CsvSheetStore::new(&path);
    let records = store.try_load_all().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(store.held_back().len(), 1);
    store.save_all(&records).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("Maybe"));
    let reread = CsvSheetStore::new(&path);
    assert_eq!(reread.try_load_all().unwrap(), records);
    assert_eq!(reread.held_back().len(), 1);
}

#[test]
fn json_pnl_keeps_full_precision() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("t.json");
    let store = JsonFileStore::new(&path);
    store
        .save_all(&[win("2025-01-02", "12345678901234567.89")])
        .unwrap();
    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("\"pnl\": 12345678901234567.89"), "{}", text);
    assert_eq!(store.try_load_all().unwrap()[0].pnl, dec("12345678901234567.89"));
}

#[test]
fn json_pnl_is_written_as_a_number() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("t.json");
    JsonFileStore::new(&path)
        .save_all(&[win("2025-01-02", "150.5")])
        .unwrap();
    let v: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(v[0]["pnl"].to_string(), "150.5");
    assert_eq!(v[0]["direction"], "Long");
}

#[test]
fn sheet_rows_decode_blanks_and_locale_numbers() {
    let header: Vec<String> = ["date", "asset", "pnl", "outcome", "htf_links", "checklist", "id"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let layout = SheetLayout::from_header(&header);
    let rows = vec![
        vec!["2025-01-06", "NQ", "1,5", "Win", "", "", ""],
        vec!["", "", "", "", "", "", ""],
        vec!["2025-01-07", "ES", "", "", "a|||b", "[true]", ""],
        vec!["2025-01-08", "ES", "12", "Maybe", "", "", ""],
    ]
    .into_iter()
    .map(|r| r.into_iter().map(String::from).collect::<Vec<String>>());
    let (records, rejected) = layout.decode_all(rows);

    // Blank row skipped, unknown outcome held back.
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].pnl, dec("1.5"));
    assert!(records[0].htf_links.is_empty());
    assert_eq!(records[0].mood, Mood::Neutral);
    assert_eq!(records[1].pnl, dec("0"));
    assert_eq!(records[1].outcome, Outcome::Breakeven);
    assert_eq!(records[1].htf_links, vec!["a".to_string(), "b".to_string()]);
    assert!(records[1].checklist.0[0]);
    assert!(records.iter().all(|r| r.id.is_nil()));
    assert_eq!(rejected.len(), 1);
    assert_eq!(rejected[0].position, 3);
    assert_eq!(rejected[0].cells.len(), COLUMNS.len());
    let outcome_at = COLUMNS.iter().position(|c| *c == "outcome").unwrap();
    assert_eq!(rejected[0].cells[outcome_at], "Maybe");
}

#[test]
fn sheet_decode_reports_malformed_fields() {
    let layout = SheetLayout::canonical();
    let mut row = to_row(&win("2025-01-06", "10"));
    let pnl_at = COLUMNS.iter().position(|c| *c == "pnl").unwrap();
    row[pnl_at] = "ten".into();
    match layout.decode(&row) {
        Err(JournalError::MalformedRecord { field, value, .. }) => {
            assert_eq!(field, "pnl");
            assert_eq!(value, "ten");
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn locale_decimal_parsing() {
    let cases = [
        ("150", "150"),
        ("1,5", "1.5"),
        ("-75.25", "-75.25"),
        ("1.234,56", "1234.56"),
        ("1,234.56", "1234.56"),
        ("  ", "0"),
        ("+3.", "3"),
    ];
    for (input, want) in cases {
        assert_eq!(parse_locale_decimal(input).unwrap(), dec(want), "input {:?}", input);
    }
    assert!(parse_locale_decimal("12abc").is_err());
    assert!(parse_locale_decimal("--1").is_err());
}

#[test]
fn save_to_unwritable_location_is_a_persist_failure() {
    let dir = tempdir().unwrap();
    let blocker = dir.path().join("file");
    fs::write(&blocker, "x").unwrap();
    // Parent "directory" is a regular file.
    let store = JsonFileStore::new(blocker.join("trades.json"));
    assert!(matches!(
        store.save_all(&[win("2025-01-06", "1")]),
        Err(JournalError::PersistFailure { .. })
    ));
}
