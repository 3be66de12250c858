// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Config;
use crate::journal::Journal;
use crate::models::Interfered;
use crate::utils::pretty_table;
use anyhow::Result;

/// Collects (issue, detail) pairs without printing them.
pub fn diagnose(journal: &Journal, cfg: &Config) -> Vec<Vec<String>> {
    let mut rows = Vec::new();

    // 1) Store readability
    match journal.store().try_load_all() {
        Ok(_) => {
            for e in journal.store().held_back() {
                rows.push(vec!["undecodable_entry".into(), e.to_string()]);
            }
        }
        Err(e) => rows.push(vec!["store_unavailable".into(), e.to_string()]),
    }

    // 2) Per-record problems
    for (pos, r) in journal.records().iter().enumerate() {
        let at = format!("#{} ({})", pos + 1, r.id);
        if let Err(e) = r.trade_date() {
            rows.push(vec!["malformed_date".into(), format!("{}: {}", at, e)]);
        }
        if cfg.check_asset(&r.asset).is_err() {
            rows.push(vec!["unknown_asset".into(), format!("{}: '{}'", at, r.asset)]);
        }
        if cfg.check_trade_type(&r.trade_type).is_err() {
            rows.push(vec![
                "unknown_trade_type".into(),
                format!("{}: '{}'", at, r.trade_type),
            ]);
        }
        if r.interfered == Interfered::No && !r.interfered_how.trim().is_empty() {
            rows.push(vec!["interference_note_without_flag".into(), at]);
        }
    }

    // 3) In-memory state that never reached the store
    if journal.is_diverged() {
        rows.push(vec![
            "unsaved_changes".into(),
            "in-memory records differ from the store; the last save failed".into(),
        ]);
    }
    rows
}

pub fn handle(journal: &Journal, cfg: &Config) -> Result<()> {
    let rows = diagnose(journal, cfg);
    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
