// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::JournalError;
use crate::models::TradeRecord;
use chrono::NaiveDate;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SortKey {
    #[default]
    DateDescending,
    DateAscending,
    PnlDescending,
    PnlAscending,
}

impl FromStr for SortKey {
    type Err = JournalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "date-desc" | "newest" => Ok(SortKey::DateDescending),
            "date-asc" | "oldest" => Ok(SortKey::DateAscending),
            "pnl-desc" | "best" => Ok(SortKey::PnlDescending),
            "pnl-asc" | "worst" => Ok(SortKey::PnlAscending),
            _ => Err(JournalError::invalid(
                "sort",
                s,
                "expected date-desc, date-asc, pnl-desc or pnl-asc",
            )),
        }
    }
}

/// History filters. An empty set leaves that dimension unfiltered; values
/// within a set are alternatives, dimensions are combined with AND.
#[derive(Debug, Clone, Default)]
pub struct FilterConfig {
    pub assets: BTreeSet<String>,
    pub outcomes: BTreeSet<String>,
    pub directions: BTreeSet<String>,
    /// Inclusive; a start after the end matches nothing.
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub sort: SortKey,
}

/// A record with its position in entry order.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Positioned<'a> {
    pub position: usize,
    pub record: &'a TradeRecord,
}

fn label_matches(set: &BTreeSet<String>, label: &str, variant: &str) -> bool {
    set.is_empty()
        || set
            .iter()
            .any(|v| v.eq_ignore_ascii_case(label) || v.eq_ignore_ascii_case(variant))
}

impl FilterConfig {
    pub fn matches(&self, r: &TradeRecord) -> bool {
        if !self.assets.is_empty() && !self.assets.contains(&r.asset) {
            return false;
        }
        if !label_matches(&self.outcomes, r.outcome.label(), &format!("{:?}", r.outcome)) {
            return false;
        }
        if !label_matches(
            &self.directions,
            r.direction.label(),
            &format!("{:?}", r.direction),
        ) {
            return false;
        }
        if let Some((start, end)) = self.date_range {
            match r.trade_date() {
                Ok(d) => start <= d && d <= end,
                Err(_) => false,
            }
        } else {
            true
        }
    }
}

/// Dated records first, malformed dates last, whatever the direction.
fn cmp_dates(a: &TradeRecord, b: &TradeRecord, descending: bool) -> Ordering {
    match (a.trade_date().ok(), b.trade_date().ok()) {
        (Some(x), Some(y)) if descending => y.cmp(&x),
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

pub fn filter_and_sort<'a>(records: &'a [TradeRecord], cfg: &FilterConfig) -> Vec<Positioned<'a>> {
    let mut out: Vec<Positioned<'a>> = records
        .iter()
        .enumerate()
        .filter(|(_, r)| cfg.matches(r))
        .map(|(position, record)| Positioned { position, record })
        .collect();

    // sort_by is stable: equal keys keep entry order.
    match cfg.sort {
        SortKey::DateDescending => out.sort_by(|a, b| cmp_dates(a.record, b.record, true)),
        SortKey::DateAscending => out.sort_by(|a, b| cmp_dates(a.record, b.record, false)),
        SortKey::PnlDescending => out.sort_by(|a, b| b.record.pnl.cmp(&a.record.pnl)),
        SortKey::PnlAscending => out.sort_by(|a, b| a.record.pnl.cmp(&b.record.pnl)),
    }
    out
}
