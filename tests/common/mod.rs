// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

#![allow(dead_code)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;
use tradejournal::models::{Direction, Outcome, TradeRecord};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

pub fn rec(day: &str, direction: Direction, outcome: Outcome, pnl: &str) -> TradeRecord {
    let mut r = TradeRecord::new(date(2025, 1, 1), "NQ");
    r.date = day.to_string();
    r.direction = direction;
    r.outcome = outcome;
    r.pnl = dec(pnl);
    r
}

pub fn win(day: &str, pnl: &str) -> TradeRecord {
    rec(day, Direction::Long, Outcome::Win, pnl)
}

pub fn loss(day: &str, pnl: &str) -> TradeRecord {
    rec(day, Direction::Short, Outcome::Loss, pnl)
}

pub fn no_trade(day: &str) -> TradeRecord {
    rec(day, Direction::NoTrade, Outcome::NoTrade, "0")
}
