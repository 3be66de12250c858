// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::journal::Journal;
use crate::store::{CsvSheetStore, JsonFileStore, RecordStore};
use anyhow::{Result, anyhow};

pub fn handle(journal: &Journal, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap().trim();

    let target: Box<dyn RecordStore> = match fmt.as_str() {
        "json" => Box::new(JsonFileStore::new(out)),
        "csv" => Box::new(CsvSheetStore::new(out)),
        _ => return Err(anyhow!("Unknown format: {} (use csv|json)", fmt)),
    };
    target.save_all(journal.records())?;
    println!("Exported {} trades to {}", journal.len(), out);
    Ok(())
}
