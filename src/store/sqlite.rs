// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::RecordStore;
use super::sheet::{COLUMNS, HeldRows, SheetLayout, to_row};
use crate::error::JournalError;
use crate::models::TradeRecord;
use rusqlite::{Connection, ToSql};
use std::path::PathBuf;
use tracing::debug;

/// SQLite file holding the flat row layout; `position` keeps entry order.
pub struct SqliteStore {
    path: PathBuf,
    held: HeldRows,
}

impl SqliteStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SqliteStore {
            path: path.into(),
            held: HeldRows::default(),
        }
    }

    fn open(&self) -> rusqlite::Result<Connection> {
        let conn = Connection::open(&self.path)?;
        init_schema(&conn)?;
        Ok(conn)
    }
}

pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS trades(
        position INTEGER PRIMARY KEY,
        id TEXT NOT NULL,
        date TEXT NOT NULL,
        asset TEXT NOT NULL,
        direction TEXT NOT NULL,
        time TEXT NOT NULL,
        trade_type TEXT NOT NULL,
        htf_links TEXT NOT NULL,
        htf_desc TEXT NOT NULL,
        htf_keypoints TEXT NOT NULL,
        ltf_links TEXT NOT NULL,
        ltf_desc TEXT NOT NULL,
        ltf_keypoints TEXT NOT NULL,
        general_notes TEXT NOT NULL,
        mood TEXT NOT NULL,
        interfered TEXT NOT NULL,
        interfered_how TEXT NOT NULL,
        checklist TEXT NOT NULL,
        outcome TEXT NOT NULL,
        pnl TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_trades_date ON trades(date);
    "#,
    )
}

impl RecordStore for SqliteStore {
    fn describe(&self) -> String {
        format!("sqlite:{}", self.path.display())
    }

    fn try_load_all(&self) -> Result<Vec<TradeRecord>, JournalError> {
        self.held.clear();
        let unavailable = |e: rusqlite::Error| JournalError::store_unavailable(self.describe(), e);
        if !self.path.exists() {
            return Err(JournalError::store_unavailable(
                self.describe(),
                "database file does not exist",
            ));
        }
        let conn = self.open().map_err(unavailable)?;
        let sql = format!("SELECT {} FROM trades ORDER BY position", COLUMNS.join(", "));
        let mut stmt = conn.prepare(&sql).map_err(unavailable)?;
        let mut cur = stmt.query([]).map_err(unavailable)?;
        let mut rows = Vec::new();
        while let Some(r) = cur.next().map_err(unavailable)? {
            let mut row = Vec::with_capacity(COLUMNS.len());
            for i in 0..COLUMNS.len() {
                let cell: Option<String> = r.get(i).map_err(unavailable)?;
                row.push(cell.unwrap_or_default());
            }
            rows.push(row);
        }
        let (records, rejected) = SheetLayout::canonical().decode_all(rows);
        self.held.replace(rejected);
        Ok(records)
    }

    fn held_back(&self) -> Vec<JournalError> {
        self.held.errors(&self.describe())
    }

    fn save_all(&self, records: &[TradeRecord]) -> Result<(), JournalError> {
        let fail = |e: rusqlite::Error| JournalError::persist_failure(self.describe(), e);
        let mut conn = self.open().map_err(fail)?;
        let tx = conn.transaction().map_err(fail)?;
        tx.execute("DELETE FROM trades", []).map_err(fail)?;
        let placeholders: Vec<String> = (2..=COLUMNS.len() + 1).map(|i| format!("?{}", i)).collect();
        let sql = format!(
            "INSERT INTO trades(position, {}) VALUES (?1, {})",
            COLUMNS.join(", "),
            placeholders.join(", ")
        );
        {
            let mut stmt = tx.prepare(&sql).map_err(fail)?;
            let rows = records.iter().map(to_row).chain(self.held.cells());
            for (position, row) in rows.enumerate() {
                let pos = position as i64;
                let mut params: Vec<&dyn ToSql> = Vec::with_capacity(row.len() + 1);
                params.push(&pos);
                params.extend(row.iter().map(|s| s as &dyn ToSql));
                stmt.execute(rusqlite::params_from_iter(params))
                    .map_err(fail)?;
            }
        }
        tx.commit().map_err(fail)?;
        debug!(store = %self.describe(), count = records.len(), "saved records");
        Ok(())
    }
}
