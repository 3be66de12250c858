// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::journal::Journal;
use crate::store::{CsvSheetStore, JsonFileStore, RecordStore};
use anyhow::{Context, Result, anyhow};
use std::path::Path;

pub fn handle(journal: &mut Journal, sub: &clap::ArgMatches) -> Result<()> {
    let path = sub.get_one::<String>("path").unwrap().trim();
    let fmt = match sub.get_one::<String>("format") {
        Some(f) => f.to_lowercase(),
        None => Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default(),
    };
    let source: Box<dyn RecordStore> = match fmt.as_str() {
        "json" => Box::new(JsonFileStore::new(path)),
        "csv" => Box::new(CsvSheetStore::new(path)),
        _ => return Err(anyhow!("Unknown format for {} (use csv|json)", path)),
    };
    // An explicit import must not silently read as empty.
    let records = source
        .try_load_all()
        .with_context(|| format!("Import from {}", path))?;
    for e in source.held_back() {
        eprintln!("warning: {} (not imported)", e);
    }
    let n = journal.extend(records)?;
    println!("Imported {} trades from {}", n, path);
    Ok(())
}
