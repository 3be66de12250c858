// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::RecordStore;
use crate::error::JournalError;
use crate::models::TradeRecord;
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// An array entry that did not decode, kept verbatim.
struct HeldEntry {
    position: usize,
    raw: serde_json::Value,
    reason: String,
}

/// Pretty-printed JSON array of records.
pub struct JsonFileStore {
    path: PathBuf,
    held: RefCell<Vec<HeldEntry>>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore {
            path: path.into(),
            held: RefCell::new(Vec::new()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordStore for JsonFileStore {
    fn describe(&self) -> String {
        format!("json:{}", self.path.display())
    }

    fn try_load_all(&self) -> Result<Vec<TradeRecord>, JournalError> {
        self.held.borrow_mut().clear();
        let s = fs::read_to_string(&self.path)
            .map_err(|e| JournalError::store_unavailable(self.describe(), e))?;
        if s.trim().is_empty() {
            return Ok(Vec::new());
        }
        let values: Vec<serde_json::Value> = serde_json::from_str(&s)
            .map_err(|e| JournalError::store_unavailable(self.describe(), e))?;

        let mut records = Vec::with_capacity(values.len());
        let mut held = Vec::new();
        for (position, raw) in values.into_iter().enumerate() {
            match serde_json::from_value::<TradeRecord>(raw.clone()) {
                Ok(r) => records.push(r),
                Err(e) => {
                    warn!(position, error = %e, "holding back undecodable record");
                    held.push(HeldEntry {
                        position,
                        raw,
                        reason: e.to_string(),
                    });
                }
            }
        }
        *self.held.borrow_mut() = held;
        Ok(records)
    }

    fn held_back(&self) -> Vec<JournalError> {
        self.held
            .borrow()
            .iter()
            .map(|h| JournalError::UndecodableEntry {
                store: self.describe(),
                position: h.position,
                reason: h.reason.clone(),
            })
            .collect()
    }

    fn save_all(&self, records: &[TradeRecord]) -> Result<(), JournalError> {
        let fail = |e: &dyn std::fmt::Display| JournalError::persist_failure(self.describe(), e);
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| fail(&e))?;
        }
        let mut entries = records
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| fail(&e))?;
        entries.extend(self.held.borrow().iter().map(|h| h.raw.clone()));
        let s = serde_json::to_string_pretty(&entries).map_err(|e| fail(&e))?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, s).map_err(|e| fail(&e))?;
        fs::rename(&tmp, &self.path).map_err(|e| fail(&e))?;
        debug!(store = %self.describe(), count = records.len(), "saved records");
        Ok(())
    }
}
