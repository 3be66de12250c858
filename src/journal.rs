// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The in-memory record collection. Records are addressed by id; every
//! mutation rewrites the whole collection through the store.

use crate::error::JournalError;
use crate::models::TradeRecord;
use crate::store::RecordStore;
use std::collections::HashMap;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

pub struct Journal {
    store: Box<dyn RecordStore>,
    records: Vec<TradeRecord>,
    index: HashMap<Uuid, usize>,
    diverged: bool,
}

impl Journal {
    /// Loads the full record set; an unavailable store gives an empty journal.
    ///
    /// Records stored without an id, or with a duplicate one, get a fresh id
    /// that is persisted straight away so it stays valid on the next run.
    pub fn open(store: Box<dyn RecordStore>) -> Self {
        let records = store.load_all();
        let held = store.held_back();
        if !held.is_empty() {
            warn!(
                count = held.len(),
                "undecodable entries held back; they are written back unchanged on save"
            );
        }
        let mut j = Journal {
            store,
            records,
            index: HashMap::new(),
            diverged: false,
        };
        j.reindex();
        if j.diverged && j.commit().is_ok() {
            info!("persisted newly assigned record ids");
        }
        j
    }

    fn reindex(&mut self) {
        self.index.clear();
        for (pos, r) in self.records.iter_mut().enumerate() {
            if r.id.is_nil() {
                r.id = Uuid::new_v4();
                debug!(position = pos, id = %r.id, "assigned id to record without one");
                self.diverged = true;
            } else if self.index.contains_key(&r.id) {
                let fresh = Uuid::new_v4();
                warn!(old = %r.id, new = %fresh, "duplicate record id, reassigning");
                r.id = fresh;
                self.diverged = true;
            }
            self.index.insert(r.id, pos);
        }
    }

    pub fn store(&self) -> &dyn RecordStore {
        self.store.as_ref()
    }

    pub fn records(&self) -> &[TradeRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&TradeRecord> {
        self.index.get(&id).map(|&pos| &self.records[pos])
    }

    /// Zero-based entry position of `id`.
    pub fn position(&self, id: Uuid) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// True when the in-memory records differ from what was last persisted.
    pub fn is_diverged(&self) -> bool {
        self.diverged
    }

    /// Resolves a full id or an unambiguous prefix of one.
    pub fn resolve(&self, id_or_prefix: &str) -> Result<Uuid, JournalError> {
        let needle = id_or_prefix.trim().to_lowercase();
        if let Ok(id) = Uuid::parse_str(&needle) {
            return if self.index.contains_key(&id) {
                Ok(id)
            } else {
                Err(JournalError::RecordNotFound { id })
            };
        }
        let matches: Vec<Uuid> = self
            .records
            .iter()
            .map(|r| r.id)
            .filter(|id| !needle.is_empty() && id.to_string().starts_with(&needle))
            .collect();
        match matches.as_slice() {
            [one] => Ok(*one),
            [] => Err(JournalError::invalid("id", id_or_prefix, "no record matches")),
            _ => Err(JournalError::invalid(
                "id",
                id_or_prefix,
                format!("prefix matches {} records", matches.len()),
            )),
        }
    }

    pub fn add(&mut self, record: TradeRecord) -> Result<Uuid, JournalError> {
        let mut record = record;
        if record.id.is_nil() || self.index.contains_key(&record.id) {
            record.id = Uuid::new_v4();
        }
        let id = record.id;
        self.index.insert(id, self.records.len());
        self.records.push(record);
        self.commit()?;
        info!(%id, "record added");
        Ok(id)
    }

    /// Replaces the record with `id`, keeping its id and position.
    pub fn update(&mut self, id: Uuid, record: TradeRecord) -> Result<(), JournalError> {
        let pos = *self
            .index
            .get(&id)
            .ok_or(JournalError::RecordNotFound { id })?;
        self.records[pos] = TradeRecord { id, ..record };
        self.commit()?;
        info!(%id, "record updated");
        Ok(())
    }

    pub fn delete(&mut self, id: Uuid) -> Result<TradeRecord, JournalError> {
        let pos = *self
            .index
            .get(&id)
            .ok_or(JournalError::RecordNotFound { id })?;
        let removed = self.records.remove(pos);
        self.reindex();
        self.commit()?;
        info!(%id, "record deleted");
        Ok(removed)
    }

    /// Removes the most recently entered record, if any.
    pub fn delete_last(&mut self) -> Result<Option<TradeRecord>, JournalError> {
        match self.records.last().map(|r| r.id) {
            Some(id) => self.delete(id).map(Some),
            None => Ok(None),
        }
    }

    /// Appends many records with a single write.
    pub fn extend(&mut self, records: Vec<TradeRecord>) -> Result<usize, JournalError> {
        let n = records.len();
        self.records.extend(records);
        self.reindex();
        self.commit()?;
        info!(count = n, "records imported");
        Ok(n)
    }

    /// Persists the current collection in full.
    pub fn commit(&mut self) -> Result<(), JournalError> {
        match self.store.save_all(&self.records) {
            Ok(()) => {
                self.diverged = false;
                Ok(())
            }
            Err(e) => {
                self.diverged = true;
                error!(error = %e, "journal not saved; in-memory records differ from the store");
                Err(e)
            }
        }
    }
}
