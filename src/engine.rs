// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Calendar aggregation: per-day and per-week PnL, day classification, the
//! Monday-first month grid and the overall summary. Everything here is a pure
//! function of the record slice.
//!
//! Records whose date does not parse are never counted. They are reported as
//! `JournalError::MalformedRecord` in the `skipped` list of whatever was being
//! computed, and the rest of the set is aggregated as usual.

use crate::error::JournalError;
use crate::models::{Outcome, TradeRecord};
use crate::utils::{first_of_month, month_end};
use chrono::{Datelike, Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DayClass {
    Empty,
    EvaluationPositive,
    EvaluationNegative,
    EvaluationNeutral,
    NoTrade,
    Win,
    Loss,
    Breakeven,
}

impl DayClass {
    pub fn is_evaluation(&self) -> bool {
        matches!(
            self,
            DayClass::EvaluationPositive | DayClass::EvaluationNegative | DayClass::EvaluationNeutral
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WeekClass {
    Win,
    Loss,
    Flat,
}

fn errors_as_strings<S: Serializer>(errs: &[JournalError], s: S) -> Result<S::Ok, S::Error> {
    s.collect_seq(errs.iter().map(|e| e.to_string()))
}

#[derive(Debug, Clone, Serialize)]
pub struct DayAggregate<'a> {
    pub date: NaiveDate,
    pub records: Vec<&'a TradeRecord>,
    pub net_pnl: Decimal,
    pub valid_count: usize,
    pub has_no_trade: bool,
    pub class: DayClass,
    #[serde(
        skip_serializing_if = "Vec::is_empty",
        serialize_with = "errors_as_strings"
    )]
    pub skipped: Vec<JournalError>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeekAggregate {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub net_pnl: Decimal,
    pub record_count: usize,
    pub class: WeekClass,
    #[serde(
        skip_serializing_if = "Vec::is_empty",
        serialize_with = "errors_as_strings"
    )]
    pub skipped: Vec<JournalError>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "slot", rename_all = "lowercase")]
pub enum DaySlot<'a> {
    /// A leading or trailing day that belongs to the adjacent month.
    Outside,
    Day(DayAggregate<'a>),
}

impl<'a> DaySlot<'a> {
    pub fn day(&self) -> Option<&DayAggregate<'a>> {
        match self {
            DaySlot::Day(d) => Some(d),
            DaySlot::Outside => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GridWeek<'a> {
    /// Monday first.
    pub days: [DaySlot<'a>; 7],
    pub week: WeekAggregate,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthGrid<'a> {
    pub year: i32,
    pub month: u32,
    pub weeks: Vec<GridWeek<'a>>,
    #[serde(
        skip_serializing_if = "Vec::is_empty",
        serialize_with = "errors_as_strings"
    )]
    pub skipped: Vec<JournalError>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStats {
    pub total_pnl: Decimal,
    pub win_rate: f64,
    pub wins: usize,
    pub valid_trade_count: usize,
    pub no_trade_day_count: usize,
}

/// Records grouped by parsed date, in entry order within each day.
pub struct DatedIndex<'a> {
    by_day: BTreeMap<NaiveDate, Vec<&'a TradeRecord>>,
    skipped: Vec<JournalError>,
}

impl<'a> DatedIndex<'a> {
    pub fn build(records: &'a [TradeRecord]) -> Self {
        let mut by_day: BTreeMap<NaiveDate, Vec<&'a TradeRecord>> = BTreeMap::new();
        let mut skipped = Vec::new();
        for r in records {
            match r.trade_date() {
                Ok(d) => by_day.entry(d).or_default().push(r),
                Err(e) => skipped.push(e),
            }
        }
        DatedIndex { by_day, skipped }
    }

    pub fn skipped(&self) -> &[JournalError] {
        &self.skipped
    }

    pub fn day(&self, date: NaiveDate) -> DayAggregate<'a> {
        let records = self.by_day.get(&date).cloned().unwrap_or_default();
        let net_pnl: Decimal = records.iter().map(|r| r.pnl).sum();
        let valid_count = records.iter().filter(|r| r.is_valid_trade()).count();
        let has_no_trade = records.iter().any(|r| !r.is_valid_trade());
        let class = classify_day(&records, net_pnl, valid_count, has_no_trade);
        DayAggregate {
            date,
            records,
            net_pnl,
            valid_count,
            has_no_trade,
            class,
            skipped: Vec::new(),
        }
    }

    pub fn week(&self, any_date_in_week: NaiveDate) -> WeekAggregate {
        let (start, end) = week_span(any_date_in_week);
        let mut net_pnl = Decimal::ZERO;
        let mut record_count = 0;
        for (_, day) in self.by_day.range(start..=end) {
            net_pnl += day.iter().map(|r| r.pnl).sum::<Decimal>();
            record_count += day.len();
        }
        WeekAggregate {
            start,
            end,
            net_pnl,
            record_count,
            class: classify_week(net_pnl),
            skipped: Vec::new(),
        }
    }
}

/// Monday through Sunday of the week containing `date`, inclusive.
pub fn week_span(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let offset = u64::from(date.weekday().num_days_from_monday());
    let start = date.checked_sub_days(Days::new(offset)).unwrap_or(NaiveDate::MIN);
    let end = start.checked_add_days(Days::new(6)).unwrap_or(NaiveDate::MAX);
    (start, end)
}

fn classify_day(
    records: &[&TradeRecord],
    net_pnl: Decimal,
    valid_count: usize,
    has_no_trade: bool,
) -> DayClass {
    if records.is_empty() {
        return DayClass::Empty;
    }
    if valid_count > 0 && net_pnl.is_zero() {
        let valid = || records.iter().filter(|r| r.is_valid_trade());
        return if valid().any(|r| r.outcome == Outcome::Win) {
            DayClass::EvaluationPositive
        } else if valid().any(|r| r.outcome == Outcome::Loss) {
            DayClass::EvaluationNegative
        } else {
            DayClass::EvaluationNeutral
        };
    }
    if has_no_trade && net_pnl.is_zero() && valid_count == 0 {
        return DayClass::NoTrade;
    }
    if net_pnl > Decimal::ZERO {
        DayClass::Win
    } else if net_pnl < Decimal::ZERO {
        DayClass::Loss
    } else {
        DayClass::Breakeven
    }
}

fn classify_week(net_pnl: Decimal) -> WeekClass {
    if net_pnl > Decimal::ZERO {
        WeekClass::Win
    } else if net_pnl < Decimal::ZERO {
        WeekClass::Loss
    } else {
        WeekClass::Flat
    }
}

pub fn day_aggregate(records: &[TradeRecord], date: NaiveDate) -> DayAggregate<'_> {
    let index = DatedIndex::build(records);
    let mut day = index.day(date);
    day.skipped = index.skipped;
    day
}

pub fn week_aggregate(records: &[TradeRecord], any_date_in_week: NaiveDate) -> WeekAggregate {
    let index = DatedIndex::build(records);
    let mut week = index.week(any_date_in_week);
    week.skipped = index.skipped;
    week
}

pub fn month_grid(records: &[TradeRecord], year: i32, month: u32) -> Result<MonthGrid<'_>, JournalError> {
    let invalid = || JournalError::invalid("month", format!("{}-{:02}", year, month), "no such month");
    let first = first_of_month(year, month).ok_or_else(invalid)?;
    let last = month_end(year, month).ok_or_else(invalid)?;
    let offset = first.weekday().num_days_from_monday();
    let days_in_month = last.day();
    let week_count = (days_in_month + offset).div_ceil(7);

    let index = DatedIndex::build(records);
    let mut weeks = Vec::with_capacity(week_count as usize);
    for w in 0..week_count {
        let days: [DaySlot<'_>; 7] = std::array::from_fn(|col| {
            let cell = w * 7 + col as u32;
            if cell >= offset && cell - offset < days_in_month {
                let date = first + Days::new(u64::from(cell - offset));
                DaySlot::Day(index.day(date))
            } else {
                DaySlot::Outside
            }
        });
        // Column 0 of every row is that week's Monday, in or out of month.
        let monday = if w * 7 >= offset {
            first + Days::new(u64::from(w * 7 - offset))
        } else {
            week_span(first).0
        };
        weeks.push(GridWeek {
            days,
            week: index.week(monday),
        });
    }

    Ok(MonthGrid {
        year,
        month,
        weeks,
        skipped: index.skipped,
    })
}

pub fn summary_stats(records: &[TradeRecord]) -> SummaryStats {
    let total_pnl: Decimal = records.iter().map(|r| r.pnl).sum();
    let valid: Vec<&TradeRecord> = records.iter().filter(|r| r.is_valid_trade()).collect();
    // Only valid trades count as wins, so wins never exceed the denominator.
    let wins = valid.iter().filter(|r| r.outcome == Outcome::Win).count();
    let valid_trade_count = valid.len();
    let win_rate = if valid_trade_count == 0 {
        0.0
    } else {
        wins as f64 / valid_trade_count as f64
    };
    // Counts records, not distinct dates.
    let no_trade_day_count = records.len() - valid_trade_count;
    SummaryStats {
        total_pnl,
        win_rate,
        wins,
        valid_trade_count,
        no_trade_day_count,
    }
}
