// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use uuid::Uuid;

/// Errors raised at the library boundary.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum JournalError {
    #[error("store {store} unavailable: {reason}")]
    StoreUnavailable { store: String, reason: String },

    #[error("record {id} has malformed {field} '{value}'")]
    MalformedRecord {
        id: Uuid,
        field: &'static str,
        value: String,
    },

    #[error("entry #{} in {store} could not be decoded: {reason}", .position + 1)]
    UndecodableEntry {
        store: String,
        position: usize,
        reason: String,
    },

    #[error("failed to persist to {store}: {reason}")]
    PersistFailure { store: String, reason: String },

    #[error("record {id} not found")]
    RecordNotFound { id: Uuid },

    #[error("invalid {field} '{value}': {reason}")]
    InvalidValue {
        field: &'static str,
        value: String,
        reason: String,
    },
}

impl JournalError {
    pub fn store_unavailable(store: impl Into<String>, reason: impl ToString) -> Self {
        JournalError::StoreUnavailable {
            store: store.into(),
            reason: reason.to_string(),
        }
    }

    pub fn persist_failure(store: impl Into<String>, reason: impl ToString) -> Self {
        JournalError::PersistFailure {
            store: store.into(),
            reason: reason.to_string(),
        }
    }

    pub fn invalid(field: &'static str, value: impl Into<String>, reason: impl Into<String>) -> Self {
        JournalError::InvalidValue {
            field,
            value: value.into(),
            reason: reason.into(),
        }
    }
}
