// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Config;
use crate::filter::FilterConfig;
use crate::journal::Journal;
use crate::models::TradeRecord;
use crate::report::{HistoryRow, history};
use crate::utils::{fmt_pnl, maybe_print_json, parse_date, pretty_table};
use anyhow::Result;
use chrono::NaiveDate;
use std::collections::BTreeSet;

fn collect_set(sub: &clap::ArgMatches, name: &str) -> BTreeSet<String> {
    sub.get_many::<String>(name)
        .map(|vals| vals.map(|v| v.trim().to_string()).collect())
        .unwrap_or_default()
}

pub fn filter_config(sub: &clap::ArgMatches) -> Result<FilterConfig> {
    let from = sub.get_one::<String>("from").map(|s| parse_date(s)).transpose()?;
    let to = sub.get_one::<String>("to").map(|s| parse_date(s)).transpose()?;
    let date_range = match (from, to) {
        (None, None) => None,
        (from, to) => Some((from.unwrap_or(NaiveDate::MIN), to.unwrap_or(NaiveDate::MAX))),
    };
    let sort = match sub.get_one::<String>("sort") {
        Some(s) => s.parse()?,
        None => Default::default(),
    };
    Ok(FilterConfig {
        assets: collect_set(sub, "asset"),
        outcomes: collect_set(sub, "outcome"),
        directions: collect_set(sub, "direction"),
        date_range,
        sort,
    })
}

pub fn query_rows(records: &[TradeRecord], sub: &clap::ArgMatches) -> Result<Vec<HistoryRow>> {
    let cfg = filter_config(sub)?;
    let mut rows = history(records, &cfg).rows;
    if let Some(limit) = sub.get_one::<usize>("limit") {
        rows.truncate(*limit);
    }
    Ok(rows)
}

pub fn handle(journal: &Journal, cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(journal.records(), sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                let mut id = r.id.to_string();
                id.truncate(8);
                vec![
                    format!("#{}", r.number),
                    r.date.clone(),
                    r.asset.clone(),
                    r.direction.clone(),
                    r.outcome.clone(),
                    fmt_pnl(&r.pnl, &cfg.currency_symbol),
                    format!("{}/6", r.checklist_score),
                    id,
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["#", "Date", "Asset", "Direction", "Outcome", "PnL", "Checklist", "Id"],
                rows,
            )
        );
    }
    Ok(())
}
