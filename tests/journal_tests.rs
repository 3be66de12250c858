// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use common::{dec, loss, win};
use std::cell::{Cell, RefCell};
use std::fs;
use std::rc::Rc;
use tempfile::tempdir;
use tradejournal::error::JournalError;
use tradejournal::journal::Journal;
use tradejournal::models::TradeRecord;
use tradejournal::store::{JsonFileStore, RecordStore};
use uuid::Uuid;

/// Shared in-memory store whose saves can be made to fail.
#[derive(Clone, Default)]
struct MemoryStore {
    saved: Rc<RefCell<Vec<TradeRecord>>>,
    failing: Rc<Cell<bool>>,
}

impl RecordStore for MemoryStore {
    fn describe(&self) -> String {
        "memory".into()
    }

    fn try_load_all(&self) -> Result<Vec<TradeRecord>, JournalError> {
        Ok(self.saved.borrow().clone())
    }

    fn save_all(&self, records: &[TradeRecord]) -> Result<(), JournalError> {
        if self.failing.get() {
            return Err(JournalError::persist_failure("memory", "disk full"));
        }
        *self.saved.borrow_mut() = records.to_vec();
        Ok(())
    }
}

#[test]
fn add_update_delete_by_id() {
    let store = MemoryStore::default();
    let mut j = Journal::open(Box::new(store.clone()));
    let a = j.add(win("2025-01-06", "100")).unwrap();
    let b = j.add(loss("2025-01-07", "-40")).unwrap();
    let c = j.add(win("2025-01-08", "10")).unwrap();
    assert_eq!(store.saved.borrow().len(), 3);

    let mut edited = loss("2025-01-09", "-5");
    edited.id = Uuid::new_v4();
    j.update(b, edited).unwrap();
    let got = j.get(b).unwrap();
    assert_eq!(got.id, b);
    assert_eq!(got.pnl, dec("-5"));
    assert_eq!(j.records()[1].id, b);

    let removed = j.delete(a).unwrap();
    assert_eq!(removed.id, a);
    assert!(j.get(a).is_none());
    // Ids stay addressable after positions shift.
    assert_eq!(j.get(c).unwrap().pnl, dec("10"));
    assert_eq!(
        store.saved.borrow().iter().map(|r| r.id).collect::<Vec<_>>(),
        vec![b, c]
    );
}

#[test]
fn unknown_id_is_record_not_found() {
    let mut j = Journal::open(Box::new(MemoryStore::default()));
    let id = Uuid::new_v4();
    assert_eq!(j.delete(id).unwrap_err(), JournalError::RecordNotFound { id });
    assert!(matches!(
        j.update(id, win("2025-01-06", "1")),
        Err(JournalError::RecordNotFound { .. })
    ));
}

#[test]
fn delete_last_removes_most_recent_entry() {
    let mut j = Journal::open(Box::new(MemoryStore::default()));
    assert!(j.delete_last().unwrap().is_none());
    j.add(win("2025-01-09", "1")).unwrap();
    let last = j.add(win("2025-01-01", "2")).unwrap();
    assert_eq!(j.delete_last().unwrap().unwrap().id, last);
    assert_eq!(j.len(), 1);
}

#[test]
fn resolve_accepts_unique_prefix() {
    let mut j = Journal::open(Box::new(MemoryStore::default()));
    let id = j.add(win("2025-01-06", "1")).unwrap();
    let full = id.to_string();
    assert_eq!(j.resolve(&full).unwrap(), id);
    assert_eq!(j.resolve(&full[..8].to_uppercase()).unwrap(), id);
    assert!(j.resolve("").is_err());
    assert!(matches!(
        j.resolve(&Uuid::new_v4().to_string()),
        Err(JournalError::RecordNotFound { .. })
    ));
}

#[test]
fn failed_save_marks_journal_diverged() {
    let store = MemoryStore::default();
    let mut j = Journal::open(Box::new(store.clone()));
    j.add(win("2025-01-06", "1")).unwrap();
    assert!(!j.is_diverged());

    store.failing.set(true);
    let err = j.add(win("2025-01-07", "2")).unwrap_err();
    assert!(matches!(err, JournalError::PersistFailure { .. }));
    assert!(j.is_diverged());
    assert_eq!(j.len(), 2);
    assert_eq!(store.saved.borrow().len(), 1);

    store.failing.set(false);
    j.commit().unwrap();
    assert!(!j.is_diverged());
    assert_eq!(store.saved.borrow().len(), 2);
}

#[test]
fn duplicate_ids_on_load_are_reassigned() {
    let store = MemoryStore::default();
    let first = win("2025-01-06", "1");
    let mut second = win("2025-01-07", "2");
    second.id = first.id;
    *store.saved.borrow_mut() = vec![first.clone(), second];

    let j = Journal::open(Box::new(store.clone()));
    assert!(!j.is_diverged());
    assert_eq!(j.records()[0].id, first.id);
    assert_ne!(j.records()[1].id, first.id);
    assert!(j.get(j.records()[1].id).is_some());
    // The reassigned id was persisted on open.
    let saved: Vec<Uuid> = store.saved.borrow().iter().map(|r| r.id).collect();
    assert_eq!(saved, j.records().iter().map(|r| r.id).collect::<Vec<_>>());
}

#[test]
fn legacy_entries_keep_their_assigned_ids_across_runs() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("legacy.json");
    fs::write(
        &path,
        r#"[
          {"date": "2024-11-04", "asset": "NQ", "outcome": "Win", "pnl": 10},
          {"date": "2024-11-05", "asset": "ES", "outcome": "Loss", "pnl": -4}
        ]"#,
    )
    .unwrap();

    let first = Journal::open(Box::new(JsonFileStore::new(&path)));
    assert!(!first.is_diverged());
    let id = first.records()[1].id;
    assert!(!id.is_nil());
    assert_ne!(first.records()[0].id, id);

    let second = Journal::open(Box::new(JsonFileStore::new(&path)));
    assert_eq!(second.resolve(&id.to_string()).unwrap(), id);
    assert_eq!(second.get(id).unwrap().asset, "ES");
    assert_eq!(
        second.records().iter().map(|r| r.id).collect::<Vec<_>>(),
        first.records().iter().map(|r| r.id).collect::<Vec<_>>()
    );
}

#[test]
fn unsaved_id_assignment_leaves_journal_diverged() {
    let store = MemoryStore::default();
    let mut legacy = win("2025-01-06", "1");
    legacy.id = Uuid::nil();
    *store.saved.borrow_mut() = vec![legacy];
    store.failing.set(true);

    let j = Journal::open(Box::new(store.clone()));
    assert!(j.is_diverged());
    assert!(!j.records()[0].id.is_nil());
    assert!(store.saved.borrow()[0].id.is_nil());
}

#[test]
fn extend_appends_with_one_write() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("t.json");
    let mut j = Journal::open(Box::new(JsonFileStore::new(&path)));
    assert!(j.is_empty());
    let n = j
        .extend(vec![win("2025-01-06", "1"), loss("2025-01-07", "-1")])
        .unwrap();
    assert_eq!(n, 2);
    let reopened = Journal::open(Box::new(JsonFileStore::new(&path)));
    assert_eq!(reopened.records(), j.records());
}

#[test]
fn headline_uses_entry_number() {
    let mut j = Journal::open(Box::new(MemoryStore::default()));
    j.add(win("2025-01-05", "3")).unwrap();
    let id = j.add(win("2025-01-06", "150")).unwrap();
    let pos = j.position(id).unwrap();
    assert_eq!(
        j.get(id).unwrap().headline(pos + 1, "$"),
        "#2 | 2025-01-06 | NQ | Long | +150.0 $"
    );
    assert_eq!(
        loss("2025-01-07", "-75.46").headline(9, "€"),
        "#9 | 2025-01-07 | NQ | Short | -75.5 €"
    );
}
