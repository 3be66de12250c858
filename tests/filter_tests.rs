// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use common::{date, loss, no_trade, win};
use std::collections::BTreeSet;
use tradejournal::filter::{FilterConfig, SortKey, filter_and_sort};
use tradejournal::models::TradeRecord;
use tradejournal::report::history;

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn sample() -> Vec<TradeRecord> {
    let mut es = win("2025-02-03", "200");
    es.asset = "ES".into();
    vec![
        win("2025-02-05", "100"),   // 0
        loss("2025-02-04", "-50"),  // 1
        es,                         // 2
        no_trade("2025-02-06"),     // 3
        win("2025-02-04", "100"),   // 4
    ]
}

fn positions(records: &[TradeRecord], cfg: &FilterConfig) -> Vec<usize> {
    filter_and_sort(records, cfg).iter().map(|p| p.position).collect()
}

#[test]
fn default_config_lists_everything_newest_first() {
    let records = sample();
    // Same-day records keep entry order.
    assert_eq!(positions(&records, &FilterConfig::default()), vec![3, 0, 1, 4, 2]);
}

#[test]
fn dimensions_combine_with_and_values_with_or() {
    let records = sample();
    let cfg = FilterConfig {
        assets: set(&["NQ", "ES"]),
        outcomes: set(&["win"]),
        ..Default::default()
    };
    assert_eq!(positions(&records, &cfg), vec![0, 4, 2]);

    let cfg = FilterConfig {
        assets: set(&["NQ"]),
        outcomes: set(&["Win", "Loss"]),
        sort: SortKey::DateAscending,
        ..Default::default()
    };
    assert_eq!(positions(&records, &cfg), vec![1, 4, 0]);
}

#[test]
fn direction_filter_accepts_label_or_variant_name() {
    let records = sample();
    for name in ["No Trade", "notrade"] {
        let cfg = FilterConfig {
            directions: set(&[name]),
            ..Default::default()
        };
        assert_eq!(positions(&records, &cfg), vec![3], "filter {}", name);
    }
}

#[test]
fn date_range_is_inclusive_and_inverted_range_is_empty() {
    let records = sample();
    let cfg = FilterConfig {
        date_range: Some((date(2025, 2, 4), date(2025, 2, 5))),
        sort: SortKey::DateAscending,
        ..Default::default()
    };
    assert_eq!(positions(&records, &cfg), vec![1, 4, 0]);

    let cfg = FilterConfig {
        date_range: Some((date(2025, 2, 5), date(2025, 2, 4))),
        ..Default::default()
    };
    assert!(filter_and_sort(&records, &cfg).is_empty());
}

#[test]
fn pnl_sorts_are_stable() {
    let records = sample();
    let cfg = FilterConfig {
        sort: SortKey::PnlDescending,
        ..Default::default()
    };
    assert_eq!(positions(&records, &cfg), vec![2, 0, 4, 3, 1]);
    let cfg = FilterConfig {
        sort: SortKey::PnlAscending,
        ..Default::default()
    };
    assert_eq!(positions(&records, &cfg), vec![1, 3, 0, 4, 2]);
}

#[test]
fn malformed_dates_sort_last_and_fail_date_ranges() {
    let mut records = sample();
    records.push(win("someday", "1"));
    for sort in [SortKey::DateDescending, SortKey::DateAscending] {
        let cfg = FilterConfig {
            sort,
            ..Default::default()
        };
        assert_eq!(positions(&records, &cfg).last(), Some(&5));
    }
    let cfg = FilterConfig {
        date_range: Some((chrono::NaiveDate::MIN, chrono::NaiveDate::MAX)),
        ..Default::default()
    };
    assert!(!positions(&records, &cfg).contains(&5));
}

#[test]
fn filtering_is_idempotent() {
    let records = sample();
    let cfg = FilterConfig {
        outcomes: set(&["Win"]),
        sort: SortKey::PnlAscending,
        ..Default::default()
    };
    let once: Vec<TradeRecord> = filter_and_sort(&records, &cfg)
        .iter()
        .map(|p| p.record.clone())
        .collect();
    let twice: Vec<TradeRecord> = filter_and_sort(&once, &cfg)
        .iter()
        .map(|p| p.record.clone())
        .collect();
    assert_eq!(once, twice);
}

#[test]
fn sort_key_parses_aliases() {
    assert_eq!("newest".parse::<SortKey>().unwrap(), SortKey::DateDescending);
    assert_eq!("PNL-ASC".parse::<SortKey>().unwrap(), SortKey::PnlAscending);
    assert!("sideways".parse::<SortKey>().is_err());
}

#[test]
fn history_rows_number_entries_from_one() {
    let mut records = sample();
    records[0].htf_links = vec!["https://tv.example/a".into(), "note".into()];
    records[0].checklist.0[1] = true;
    let view = history(&records, &FilterConfig::default());
    let row = view.rows.iter().find(|r| r.number == 1).unwrap();
    assert_eq!(row.id, records[0].id);
    assert_eq!(row.chart_urls, vec!["https://tv.example/a".to_string()]);
    assert_eq!(row.checklist_score, 1);
    assert_eq!(view.rows[0].direction, "No Trade");
}
