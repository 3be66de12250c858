// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Whole-collection record stores. Every backend loads the full ordered
//! record set and replaces it in full on save; there is no partial update.

pub mod json;
pub mod sheet;
pub mod sqlite;

use crate::config::{Config, StoreKind};
use crate::error::JournalError;
use crate::models::TradeRecord;
use anyhow::{Context, Result};
use tracing::{debug, warn};

pub use json::JsonFileStore;
pub use sheet::{CsvSheetStore, RemoteSheetStore};
pub use sqlite::SqliteStore;

pub trait RecordStore {
    /// Human-readable location, used in logs and messages.
    fn describe(&self) -> String;

    /// Loads every record in stored order, reporting why the medium could not
    /// be read.
    fn try_load_all(&self) -> Result<Vec<TradeRecord>, JournalError>;

    /// Replaces the backing medium with exactly `records`, in order.
    fn save_all(&self, records: &[TradeRecord]) -> Result<(), JournalError>;

    /// Entries from the last load that could not be decoded. They are kept
    /// aside and written back unchanged, after the records, on every save.
    fn held_back(&self) -> Vec<JournalError> {
        Vec::new()
    }

    /// Like `try_load_all`, but an unreadable medium yields an empty journal.
    fn load_all(&self) -> Vec<TradeRecord> {
        match self.try_load_all() {
            Ok(records) => {
                debug!(store = %self.describe(), count = records.len(), "loaded records");
                records
            }
            Err(e) => {
                warn!(error = %e, "store unavailable, starting from an empty journal");
                Vec::new()
            }
        }
    }
}

pub fn open(cfg: &Config) -> Result<Box<dyn RecordStore>> {
    let store: Box<dyn RecordStore> = match cfg.store {
        StoreKind::Json => Box::new(JsonFileStore::new(cfg.resolved_data_path()?)),
        StoreKind::Csv => Box::new(CsvSheetStore::new(cfg.resolved_data_path()?)),
        StoreKind::Sqlite => Box::new(SqliteStore::new(cfg.resolved_data_path()?)),
        StoreKind::Remote => {
            let url = cfg
                .remote_url
                .clone()
                .context("store 'remote' needs remote_url (or TRADEJOURNAL_REMOTE_URL)")?;
            Box::new(RemoteSheetStore::new(url, cfg.remote_timeout_secs))
        }
    };
    debug!(store = %store.describe(), "opened record store");
    Ok(store)
}
