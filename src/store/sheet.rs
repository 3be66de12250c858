// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Flat spreadsheet row layout, shared by the CSV, remote sheet and SQLite
//! stores. Blank cells read as the field's empty value; a blank id reads as
//! the nil id, which the journal replaces on open.

use super::RecordStore;
use crate::error::JournalError;
use crate::models::{Checklist, TradeRecord, UNSPECIFIED_TRADE_TYPE};
use crate::utils::{http_client, parse_locale_decimal};
use csv::{ReaderBuilder, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{debug, warn};
use uuid::Uuid;

pub const COLUMNS: [&str; 19] = [
    "id",
    "date",
    "asset",
    "direction",
    "time",
    "trade_type",
    "htf_links",
    "htf_desc",
    "htf_keypoints",
    "ltf_links",
    "ltf_desc",
    "ltf_keypoints",
    "general_notes",
    "mood",
    "interfered",
    "interfered_how",
    "checklist",
    "outcome",
    "pnl",
];

/// Joins link lists inside one cell; not expected to occur in a URL.
pub const LINK_DELIMITER: &str = "|||";

fn join_links(links: &[String]) -> String {
    links.join(LINK_DELIMITER)
}

fn split_links(cell: &str) -> Vec<String> {
    if cell.is_empty() {
        Vec::new()
    } else {
        cell.split(LINK_DELIMITER).map(str::to_string).collect()
    }
}

fn encode_checklist(c: &Checklist) -> String {
    let items: Vec<&str> = c.0.iter().map(|v| if *v { "true" } else { "false" }).collect();
    format!("[{}]", items.join(", "))
}

pub fn to_row(r: &TradeRecord) -> Vec<String> {
    vec![
        r.id.to_string(),
        r.date.clone(),
        r.asset.clone(),
        r.direction.label().to_string(),
        r.time.clone(),
        r.trade_type.clone(),
        join_links(&r.htf_links),
        r.htf_desc.clone(),
        r.htf_keypoints.clone(),
        join_links(&r.ltf_links),
        r.ltf_desc.clone(),
        r.ltf_keypoints.clone(),
        r.general_notes.clone(),
        r.mood.label().to_string(),
        r.interfered.label().to_string(),
        r.interfered_how.clone(),
        encode_checklist(&r.checklist),
        r.outcome.label().to_string(),
        r.pnl.to_string(),
    ]
}

/// Maps header names to cell positions so reordered sheets still decode.
pub struct SheetLayout {
    index: HashMap<String, usize>,
}

impl SheetLayout {
    pub fn from_header(header: &[String]) -> Self {
        let index = header
            .iter()
            .enumerate()
            .map(|(i, h)| (h.trim().to_lowercase(), i))
            .collect();
        SheetLayout { index }
    }

    pub fn canonical() -> Self {
        let header: Vec<String> = COLUMNS.iter().map(|c| c.to_string()).collect();
        Self::from_header(&header)
    }

    fn cell<'a>(&self, row: &'a [String], name: &str) -> &'a str {
        self.index
            .get(name)
            .and_then(|&i| row.get(i))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Blank reads as the enum default; an unknown label yields the raw cell.
    fn enum_cell<'a, T>(&self, row: &'a [String], name: &str) -> Result<T, &'a str>
    where
        T: FromStr + Default,
    {
        match self.cell(row, name).trim() {
            "" => Ok(T::default()),
            s => s.parse().map_err(|_| s),
        }
    }

    pub fn decode(&self, row: &[String]) -> Result<TradeRecord, JournalError> {
        let text = |name: &str| self.cell(row, name).to_string();
        let id = match self.cell(row, "id").trim() {
            "" => Uuid::nil(),
            s => Uuid::parse_str(s).map_err(|e| JournalError::invalid("id", s, e.to_string()))?,
        };
        let malformed = |field: &'static str, value: &str| JournalError::MalformedRecord {
            id,
            field,
            value: value.to_string(),
        };

        let direction = self.enum_cell(row, "direction").map_err(|v| malformed("direction", v))?;
        let mood = self.enum_cell(row, "mood").map_err(|v| malformed("mood", v))?;
        let interfered = self
            .enum_cell(row, "interfered")
            .map_err(|v| malformed("interfered", v))?;
        let outcome = self.enum_cell(row, "outcome").map_err(|v| malformed("outcome", v))?;
        let checklist = match self.cell(row, "checklist").trim() {
            "" => Checklist::default(),
            s => serde_json::from_str::<Checklist>(s).unwrap_or_else(|e| {
                warn!(%id, error = %e, "unreadable checklist cell, defaulting to unchecked");
                Checklist::default()
            }),
        };
        let pnl_cell = self.cell(row, "pnl");
        let pnl = parse_locale_decimal(pnl_cell).map_err(|_| malformed("pnl", pnl_cell))?;
        let trade_type = match self.cell(row, "trade_type") {
            "" => UNSPECIFIED_TRADE_TYPE.to_string(),
            s => s.to_string(),
        };

        Ok(TradeRecord {
            id,
            date: text("date"),
            asset: text("asset"),
            direction,
            time: text("time"),
            trade_type,
            htf_links: split_links(self.cell(row, "htf_links")),
            htf_desc: text("htf_desc"),
            htf_keypoints: text("htf_keypoints"),
            ltf_links: split_links(self.cell(row, "ltf_links")),
            ltf_desc: text("ltf_desc"),
            ltf_keypoints: text("ltf_keypoints"),
            general_notes: text("general_notes"),
            mood,
            interfered,
            interfered_how: text("interfered_how"),
            checklist,
            outcome,
            pnl,
        })
    }

    /// The row's cells re-ordered to `COLUMNS`.
    fn canonical_cells(&self, row: &[String]) -> Vec<String> {
        COLUMNS.iter().map(|c| self.cell(row, c).to_string()).collect()
    }

    /// Decodes every non-blank row. Rows that fail are returned separately,
    /// in canonical column order, so they can be written back untouched.
    pub fn decode_all<I>(&self, rows: I) -> (Vec<TradeRecord>, Vec<RejectedRow>)
    where
        I: IntoIterator<Item = Vec<String>>,
    {
        let mut records = Vec::new();
        let mut rejected = Vec::new();
        for (position, row) in rows.into_iter().enumerate() {
            if row.iter().all(|c| c.trim().is_empty()) {
                continue;
            }
            match self.decode(&row) {
                Ok(r) => records.push(r),
                Err(e) => {
                    warn!(position, error = %e, "holding back undecodable row");
                    rejected.push(RejectedRow {
                        position,
                        cells: self.canonical_cells(&row),
                        reason: e.to_string(),
                    });
                }
            }
        }
        (records, rejected)
    }
}

/// A data row that failed to decode.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedRow {
    /// Zero-based index among the data rows.
    pub position: usize,
    pub cells: Vec<String>,
    pub reason: String,
}

/// Rejected rows from a store's last load, re-emitted on each save.
#[derive(Debug, Default)]
pub struct HeldRows(RefCell<Vec<RejectedRow>>);

impl HeldRows {
    pub fn replace(&self, rows: Vec<RejectedRow>) {
        *self.0.borrow_mut() = rows;
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    pub fn cells(&self) -> Vec<Vec<String>> {
        self.0.borrow().iter().map(|r| r.cells.clone()).collect()
    }

    pub fn errors(&self, store: &str) -> Vec<JournalError> {
        self.0
            .borrow()
            .iter()
            .map(|r| JournalError::UndecodableEntry {
                store: store.to_string(),
                position: r.position,
                reason: r.reason.clone(),
            })
            .collect()
    }
}

/// Spreadsheet layout stored as a CSV file with a header row.
pub struct CsvSheetStore {
    path: PathBuf,
    held: HeldRows,
}

impl CsvSheetStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CsvSheetStore {
            path: path.into(),
            held: HeldRows::default(),
        }
    }
}

impl RecordStore for CsvSheetStore {
    fn describe(&self) -> String {
        format!("csv:{}", self.path.display())
    }

    fn try_load_all(&self) -> Result<Vec<TradeRecord>, JournalError> {
        self.held.clear();
        let unavailable = |e: &dyn std::fmt::Display| {
            JournalError::store_unavailable(self.describe(), e)
        };
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)
            .map_err(|e| unavailable(&e))?;
        let header: Vec<String> = rdr
            .headers()
            .map_err(|e| unavailable(&e))?
            .iter()
            .map(str::to_string)
            .collect();
        let layout = SheetLayout::from_header(&header);
        let mut rows = Vec::new();
        for result in rdr.records() {
            let rec = result.map_err(|e| unavailable(&e))?;
            rows.push(rec.iter().map(str::to_string).collect());
        }
        let (records, rejected) = layout.decode_all(rows);
        self.held.replace(rejected);
        Ok(records)
    }

    fn held_back(&self) -> Vec<JournalError> {
        self.held.errors(&self.describe())
    }

    fn save_all(&self, records: &[TradeRecord]) -> Result<(), JournalError> {
        let fail = |e: &dyn std::fmt::Display| JournalError::persist_failure(self.describe(), e);
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| fail(&e))?;
        }
        let tmp = self.path.with_extension("csv.tmp");
        {
            let mut wtr = WriterBuilder::new()
                .from_path(&tmp)
                .map_err(|e| fail(&e))?;
            wtr.write_record(COLUMNS).map_err(|e| fail(&e))?;
            for r in records {
                wtr.write_record(to_row(r)).map_err(|e| fail(&e))?;
            }
            for cells in self.held.cells() {
                wtr.write_record(&cells).map_err(|e| fail(&e))?;
            }
            wtr.flush().map_err(|e| fail(&e))?;
        }
        fs::rename(&tmp, &self.path).map_err(|e| fail(&e))?;
        debug!(store = %self.describe(), count = records.len(), "saved records");
        Ok(())
    }
}

/// Body exchanged with a remote sheet endpoint: header row first.
#[derive(Debug, Serialize, Deserialize)]
pub struct SheetValues {
    #[serde(default)]
    pub values: Vec<Vec<serde_json::Value>>,
}

fn cell_text(v: serde_json::Value) -> String {
    match v {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Spreadsheet layout behind an HTTP endpoint: GET returns the sheet, PUT
/// replaces it. Blocking, one attempt per call.
pub struct RemoteSheetStore {
    url: String,
    timeout_secs: u64,
    held: HeldRows,
}

impl RemoteSheetStore {
    pub fn new(url: impl Into<String>, timeout_secs: u64) -> Self {
        RemoteSheetStore {
            url: url.into(),
            timeout_secs,
            held: HeldRows::default(),
        }
    }
}

impl RecordStore for RemoteSheetStore {
    fn describe(&self) -> String {
        format!("remote:{}", self.url)
    }

    fn try_load_all(&self) -> Result<Vec<TradeRecord>, JournalError> {
        self.held.clear();
        let unavailable = |e: &dyn std::fmt::Display| {
            JournalError::store_unavailable(self.describe(), e)
        };
        let client = http_client(self.timeout_secs).map_err(|e| unavailable(&e))?;
        let body: SheetValues = client
            .get(&self.url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| unavailable(&e))?
            .json()
            .map_err(|e| unavailable(&e))?;

        let mut rows = body
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect::<Vec<String>>());
        let Some(header) = rows.next() else {
            return Ok(Vec::new());
        };
        let layout = SheetLayout::from_header(&header);
        let (records, rejected) = layout.decode_all(rows);
        self.held.replace(rejected);
        Ok(records)
    }

    fn held_back(&self) -> Vec<JournalError> {
        self.held.errors(&self.describe())
    }

    fn save_all(&self, records: &[TradeRecord]) -> Result<(), JournalError> {
        let fail = |e: &dyn std::fmt::Display| JournalError::persist_failure(self.describe(), e);
        let mut values: Vec<Vec<serde_json::Value>> = Vec::with_capacity(records.len() + 1);
        values.push(COLUMNS.iter().map(|c| serde_json::Value::from(*c)).collect());
        for r in records {
            values.push(to_row(r).into_iter().map(serde_json::Value::from).collect());
        }
        for cells in self.held.cells() {
            values.push(cells.into_iter().map(serde_json::Value::from).collect());
        }
        let client = http_client(self.timeout_secs).map_err(|e| fail(&e))?;
        client
            .put(&self.url)
            .json(&SheetValues { values })
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| fail(&e))?;
        debug!(store = %self.describe(), count = records.len(), "saved records");
        Ok(())
    }
}
