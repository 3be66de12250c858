// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Read-only view models for the dashboard and history screens.

use crate::engine::{DayClass, MonthGrid, SummaryStats, month_grid, summary_stats};
use crate::error::JournalError;
use crate::filter::{FilterConfig, Positioned, filter_and_sort};
use crate::models::TradeRecord;
use crate::utils::fmt_pnl;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView<'a> {
    pub summary: SummaryStats,
    pub win_rate_pct: String,
    pub grid: MonthGrid<'a>,
    /// Calendar cell text, one row of seven per grid week.
    pub labels: Vec<Vec<String>>,
}

/// Text shown inside a calendar cell: signed PnL, "No Trade", or nothing.
pub fn day_label(net_pnl: &Decimal, class: DayClass, ccy: &str) -> String {
    if !net_pnl.is_zero() {
        fmt_pnl(net_pnl, ccy)
    } else if class == DayClass::NoTrade {
        "No Trade".to_string()
    } else if class.is_evaluation() {
        fmt_pnl(net_pnl, ccy)
    } else {
        String::new()
    }
}

pub fn dashboard<'a>(
    records: &'a [TradeRecord],
    year: i32,
    month: u32,
    ccy: &str,
) -> Result<DashboardView<'a>, JournalError> {
    let summary = summary_stats(records);
    let grid = month_grid(records, year, month)?;
    let labels = grid
        .weeks
        .iter()
        .map(|w| {
            w.days
                .iter()
                .map(|slot| {
                    slot.day()
                        .map(|d| day_label(&d.net_pnl, d.class, ccy))
                        .unwrap_or_default()
                })
                .collect()
        })
        .collect();
    Ok(DashboardView {
        win_rate_pct: format!("{:.1}%", summary.win_rate * 100.0),
        summary,
        grid,
        labels,
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryRow {
    pub id: Uuid,
    /// 1-based entry number.
    pub number: usize,
    pub date: String,
    pub asset: String,
    pub direction: String,
    pub outcome: String,
    pub pnl: Decimal,
    pub checklist_score: usize,
    pub chart_urls: Vec<String>,
}

impl From<Positioned<'_>> for HistoryRow {
    fn from(p: Positioned<'_>) -> Self {
        let r = p.record;
        HistoryRow {
            id: r.id,
            number: p.position + 1,
            date: r.date.clone(),
            asset: r.asset.clone(),
            direction: r.direction.label().to_string(),
            outcome: r.outcome.label().to_string(),
            pnl: r.pnl,
            checklist_score: r.checklist.score(),
            chart_urls: r.chart_urls(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryView {
    pub rows: Vec<HistoryRow>,
}

pub fn history(records: &[TradeRecord], cfg: &FilterConfig) -> HistoryView {
    HistoryView {
        rows: filter_and_sort(records, cfg)
            .into_iter()
            .map(HistoryRow::from)
            .collect(),
    }
}
