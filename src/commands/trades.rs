// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::{Config, StoreKind};
use crate::error::JournalError;
use crate::journal::Journal;
use crate::models::{CHECKLIST_LABELS, Checklist, Interfered, TradeRecord};
use crate::store::RecordStore;
use crate::utils::{fmt_pnl, maybe_print_json, parse_date, parse_pnl, pretty_table};
use anyhow::{Context, Result};

/// Creates an empty store unless one is already readable.
pub fn init(store: &dyn RecordStore, cfg: &Config) -> Result<()> {
    let exists = backing_file_exists(cfg)?;
    match store.try_load_all() {
        Ok(records) => {
            println!(
                "Journal already initialized at {} ({} trades)",
                store.describe(),
                records.len()
            );
        }
        Err(JournalError::StoreUnavailable { .. }) if !exists => {
            store.save_all(&[])?;
            println!("Journal initialized at {}", store.describe());
        }
        Err(e) => {
            return Err(e).context("Store exists but cannot be read; not overwriting it");
        }
    }
    Ok(())
}

fn backing_file_exists(cfg: &Config) -> Result<bool> {
    Ok(match cfg.store {
        StoreKind::Remote => true,
        _ => cfg.resolved_data_path()?.exists(),
    })
}

/// Applies the record flags in `sub` on top of `base` (or a fresh record).
pub fn build_record(
    cfg: &Config,
    sub: &clap::ArgMatches,
    base: Option<&TradeRecord>,
) -> Result<TradeRecord> {
    let mut r = match base {
        Some(b) => b.clone(),
        None => TradeRecord::new(chrono::Local::now().date_naive(), ""),
    };
    let text = |name: &str| sub.get_one::<String>(name).cloned();

    if let Some(d) = text("date") {
        r.date = parse_date(&d)?.to_string();
    }
    if let Some(a) = text("asset") {
        let a = a.trim().to_string();
        cfg.check_asset(&a)?;
        r.asset = a;
    }
    if let Some(d) = text("direction") {
        r.direction = d.parse()?;
    }
    if let Some(t) = text("time") {
        r.time = t;
    }
    if let Some(t) = text("type") {
        cfg.check_trade_type(&t)?;
        r.trade_type = t;
    }
    if let Some(links) = sub.get_many::<String>("htf-link") {
        r.htf_links = links.cloned().collect();
    }
    if let Some(links) = sub.get_many::<String>("ltf-link") {
        r.ltf_links = links.cloned().collect();
    }
    if let Some(v) = text("htf-desc") {
        r.htf_desc = v;
    }
    if let Some(v) = text("htf-keypoints") {
        r.htf_keypoints = v;
    }
    if let Some(v) = text("ltf-desc") {
        r.ltf_desc = v;
    }
    if let Some(v) = text("ltf-keypoints") {
        r.ltf_keypoints = v;
    }
    if let Some(v) = text("notes") {
        r.general_notes = v;
    }
    if let Some(m) = text("mood") {
        r.mood = m.parse()?;
    }
    match (text("interfered"), text("interfered-how")) {
        (Some(i), how) => {
            r.interfered = i.parse()?;
            if let Some(how) = how {
                r.interfered_how = how;
            }
        }
        (None, Some(how)) => {
            r.interfered = Interfered::Yes;
            r.interfered_how = how;
        }
        (None, None) => {}
    }
    if r.interfered == Interfered::No {
        r.interfered_how.clear();
    }
    if sub.get_flag("no-checks") {
        r.checklist = Checklist::default();
    } else if let Some(checks) = sub.get_many::<usize>("check") {
        let positions: Vec<usize> = checks.copied().collect();
        r.checklist = Checklist::from_positions(&positions)?;
    }
    if let Some(o) = text("outcome") {
        r.outcome = o.parse()?;
    }
    if let Some(p) = text("pnl") {
        r.pnl = parse_pnl(&p)?;
    }
    Ok(r)
}

pub fn add(journal: &mut Journal, cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let record = build_record(cfg, sub, None)?;
    let summary = format!(
        "{} {} {} on {}",
        record.asset,
        record.direction,
        fmt_pnl(&record.pnl, &cfg.currency_symbol),
        record.date
    );
    let id = journal.add(record)?;
    println!("Recorded {} (id {})", summary, id);
    Ok(())
}

pub fn edit(journal: &mut Journal, cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let id = journal.resolve(sub.get_one::<String>("id").unwrap())?;
    let current = journal
        .get(id)
        .cloned()
        .ok_or(JournalError::RecordNotFound { id })?;
    let updated = build_record(cfg, sub, Some(&current))?;
    journal.update(id, updated)?;
    println!("Updated {}", id);
    Ok(())
}

pub fn delete(journal: &mut Journal, sub: &clap::ArgMatches) -> Result<()> {
    let id = journal.resolve(sub.get_one::<String>("id").unwrap())?;
    let removed = journal.delete(id)?;
    println!("Deleted {} {} on {}", removed.asset, removed.direction, removed.date);
    Ok(())
}

pub fn delete_last(journal: &mut Journal) -> Result<()> {
    match journal.delete_last()? {
        Some(r) => println!("Deleted last entry: {} {} on {}", r.asset, r.direction, r.date),
        None => println!("Journal is empty; nothing to delete"),
    }
    Ok(())
}

pub fn show(journal: &Journal, cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let id = journal.resolve(sub.get_one::<String>("id").unwrap())?;
    let r = journal.get(id).ok_or(JournalError::RecordNotFound { id })?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), r)? {
        return Ok(());
    }
    if let Some(pos) = journal.position(id) {
        println!("{}", r.headline(pos + 1, &cfg.currency_symbol));
    }
    let mut rows = vec![
        vec!["Id".into(), r.id.to_string()],
        vec!["Date".into(), r.date.clone()],
        vec!["Asset".into(), r.asset.clone()],
        vec!["Direction".into(), r.direction.to_string()],
        vec!["Time".into(), r.time.clone()],
        vec!["Type".into(), r.trade_type.clone()],
        vec!["HTF Key Points".into(), r.htf_keypoints.clone()],
        vec!["HTF Narrative".into(), r.htf_desc.clone()],
        vec!["LTF Key Points".into(), r.ltf_keypoints.clone()],
        vec!["LTF Model".into(), r.ltf_desc.clone()],
        vec!["General Notes".into(), r.general_notes.clone()],
        vec!["Mood".into(), r.mood.to_string()],
        vec!["Interfered".into(), r.interfered.to_string()],
    ];
    if r.interfered == Interfered::Yes {
        rows.push(vec!["How".into(), r.interfered_how.clone()]);
    }
    for (label, ticked) in CHECKLIST_LABELS.iter().zip(r.checklist.0) {
        rows.push(vec![label.to_string(), if ticked { "yes" } else { "no" }.into()]);
    }
    rows.push(vec!["Outcome".into(), r.outcome.to_string()]);
    rows.push(vec!["PnL".into(), fmt_pnl(&r.pnl, &cfg.currency_symbol)]);
    for url in r.chart_urls() {
        rows.push(vec!["Chart".into(), url]);
    }
    println!("{}", pretty_table(&["Field", "Value"], rows));
    Ok(())
}
