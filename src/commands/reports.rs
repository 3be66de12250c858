// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Config;
use crate::engine::{
    DayClass, MonthGrid, SummaryStats, WeekClass, day_aggregate, month_grid, summary_stats,
    week_aggregate,
};
use crate::error::JournalError;
use crate::journal::Journal;
use crate::report::{dashboard as dashboard_view, day_label};
use crate::utils::{fmt_pnl, maybe_print_json, parse_date, parse_month, pretty_table};
use anyhow::Result;
use chrono::{Datelike, Local};

fn class_tag(class: DayClass) -> &'static str {
    match class {
        DayClass::Empty => "",
        DayClass::EvaluationPositive => "EVAL+",
        DayClass::EvaluationNegative => "EVAL-",
        DayClass::EvaluationNeutral => "EVAL",
        DayClass::NoTrade => "NT",
        DayClass::Win => "WIN",
        DayClass::Loss => "LOSS",
        DayClass::Breakeven => "BE",
    }
}

fn week_tag(class: WeekClass) -> &'static str {
    match class {
        WeekClass::Win => "WIN",
        WeekClass::Loss => "LOSS",
        WeekClass::Flat => "FLAT",
    }
}

fn warn_skipped(skipped: &[JournalError]) {
    for e in skipped {
        eprintln!("warning: {}", e);
    }
}

/// `--month YYYY-MM`, or the current month.
pub fn target_month(sub: &clap::ArgMatches) -> Result<(i32, u32)> {
    match sub.get_one::<String>("month") {
        Some(m) => parse_month(m),
        None => {
            let today = Local::now().date_naive();
            Ok((today.year(), today.month()))
        }
    }
}

fn grid_table(grid: &MonthGrid<'_>, ccy: &str) -> comfy_table::Table {
    let rows: Vec<Vec<String>> = grid
        .weeks
        .iter()
        .map(|w| {
            let mut row: Vec<String> = w
                .days
                .iter()
                .map(|slot| match slot.day() {
                    None => String::new(),
                    Some(d) => {
                        let mut cell = d.date.day().to_string();
                        let label = day_label(&d.net_pnl, d.class, ccy);
                        if !label.is_empty() {
                            cell.push('\n');
                            cell.push_str(&label);
                        }
                        // "No Trade" already names the class.
                        if d.class != DayClass::Empty && d.class != DayClass::NoTrade {
                            cell.push('\n');
                            cell.push_str(class_tag(d.class));
                        }
                        cell
                    }
                })
                .collect();
            row.push(format!(
                "{}\n{}",
                fmt_pnl(&w.week.net_pnl, ccy),
                week_tag(w.week.class)
            ));
            row
        })
        .collect();
    pretty_table(
        &["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun", "Week"],
        rows,
    )
}

fn summary_table(s: &SummaryStats, ccy: &str) -> comfy_table::Table {
    pretty_table(
        &["Net P&L", "Win Rate", "Trades", "No Trade Days"],
        vec![vec![
            fmt_pnl(&s.total_pnl, ccy),
            format!("{:.1}%", s.win_rate * 100.0),
            s.valid_trade_count.to_string(),
            s.no_trade_day_count.to_string(),
        ]],
    )
}

pub fn calendar(journal: &Journal, cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let (year, month) = target_month(sub)?;
    let grid = month_grid(journal.records(), year, month)?;
    warn_skipped(&grid.skipped);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &grid)? {
        println!("Trading Calendar {}-{:02}", year, month);
        println!("{}", grid_table(&grid, &cfg.currency_symbol));
    }
    Ok(())
}

pub fn day(journal: &Journal, cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let agg = day_aggregate(journal.records(), date);
    warn_skipped(&agg.skipped);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &agg)? {
        let rows: Vec<Vec<String>> = agg
            .records
            .iter()
            .map(|r| {
                vec![
                    r.asset.clone(),
                    r.direction.to_string(),
                    r.time.clone(),
                    r.outcome.to_string(),
                    fmt_pnl(&r.pnl, &cfg.currency_symbol),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Asset", "Direction", "Time", "Outcome", "PnL"], rows)
        );
        println!(
            "{}: {} {:?}",
            agg.date,
            fmt_pnl(&agg.net_pnl, &cfg.currency_symbol),
            agg.class
        );
    }
    Ok(())
}

pub fn week(journal: &Journal, cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let agg = week_aggregate(journal.records(), date);
    warn_skipped(&agg.skipped);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &agg)? {
        println!(
            "{}",
            pretty_table(
                &["From", "To", "Trades", "Net P&L", "Result"],
                vec![vec![
                    agg.start.to_string(),
                    agg.end.to_string(),
                    agg.record_count.to_string(),
                    fmt_pnl(&agg.net_pnl, &cfg.currency_symbol),
                    week_tag(agg.class).to_string(),
                ]],
            )
        );
    }
    Ok(())
}

pub fn summary(journal: &Journal, cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let stats = summary_stats(journal.records());
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &stats)? {
        println!("{}", summary_table(&stats, &cfg.currency_symbol));
    }
    Ok(())
}

pub fn dashboard(journal: &Journal, cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let (year, month) = target_month(sub)?;
    let view = dashboard_view(journal.records(), year, month, &cfg.currency_symbol)?;
    warn_skipped(&view.grid.skipped);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &view)? {
        if journal.is_empty() {
            println!("No trades logged yet.");
            return Ok(());
        }
        println!("{}", summary_table(&view.summary, &cfg.currency_symbol));
        println!("Trading Calendar {}-{:02}", year, month);
        println!("{}", grid_table(&view.grid, &cfg.currency_symbol));
    }
    Ok(())
}
