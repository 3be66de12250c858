// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::JournalError;
use crate::utils::fmt_pnl;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

pub const UNSPECIFIED_TRADE_TYPE: &str = "unspecified";

pub const CHECKLIST_LABELS: [&str; 6] = [
    "Good trading conditions?",
    "Trade aligns with HTF?",
    "Delivery from LTF keypoint?",
    "Good Draw of Liquidity?",
    "Good execution?",
    "Good mental during trading?",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Long,
    Short,
    Both,
    #[serde(rename = "No Trade", alias = "NoTrade")]
    NoTrade,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Loss,
    #[default]
    Breakeven,
    #[serde(rename = "No Trade", alias = "NoTrade")]
    NoTrade,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum Mood {
    Stressed,
    #[default]
    Neutral,
    Euphoric,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Interfered {
    #[default]
    No,
    Yes,
}

/// Normalizes a label for lookup: lowercase, no spaces, dashes or underscores.
fn label_key(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

macro_rules! labelled_enum {
    ($ty:ident, $field:literal, [$(($variant:ident, $label:literal)),+ $(,)?]) => {
        impl $ty {
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            pub fn label(&self) -> &'static str {
                match self {
                    $($ty::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $ty {
            type Err = JournalError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let key = label_key(s);
                $ty::ALL
                    .iter()
                    .copied()
                    .find(|v| label_key(v.label()) == key)
                    .ok_or_else(|| {
                        let expected: Vec<&str> = $ty::ALL.iter().map(|v| v.label()).collect();
                        JournalError::invalid($field, s, format!("expected one of {}", expected.join(", ")))
                    })
            }
        }
    };
}

labelled_enum!(
    Direction,
    "direction",
    [(Long, "Long"), (Short, "Short"), (Both, "Both"), (NoTrade, "No Trade")]
);
labelled_enum!(
    Outcome,
    "outcome",
    [(Win, "Win"), (Loss, "Loss"), (Breakeven, "Breakeven"), (NoTrade, "No Trade")]
);
labelled_enum!(
    Mood,
    "mood",
    [(Stressed, "Stressed"), (Neutral, "Neutral"), (Euphoric, "Euphoric")]
);
labelled_enum!(Interfered, "interfered", [(No, "No"), (Yes, "Yes")]);

/// Six fixed yes/no answers, in `CHECKLIST_LABELS` order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Checklist(pub [bool; 6]);

impl Checklist {
    /// Builds a checklist from possibly short or long legacy data; missing
    /// positions are false, extra positions are dropped.
    pub fn from_slice(items: &[bool]) -> Self {
        let mut out = [false; 6];
        for (slot, v) in out.iter_mut().zip(items) {
            *slot = *v;
        }
        Checklist(out)
    }

    /// Checks the given 1-based positions.
    pub fn from_positions(positions: &[usize]) -> Result<Self, JournalError> {
        let mut out = [false; 6];
        for &p in positions {
            if !(1..=6).contains(&p) {
                return Err(JournalError::invalid(
                    "checklist",
                    p.to_string(),
                    "positions are 1 to 6",
                ));
            }
            out[p - 1] = true;
        }
        Ok(Checklist(out))
    }

    pub fn score(&self) -> usize {
        self.0.iter().filter(|v| **v).count()
    }
}

impl Serialize for Checklist {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(s)
    }
}

impl<'de> Deserialize<'de> for Checklist {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let raw: Option<Vec<Option<bool>>> = Option::deserialize(d)?;
        let flat: Vec<bool> = raw
            .unwrap_or_default()
            .into_iter()
            .map(|v| v.unwrap_or(false))
            .collect();
        Ok(Checklist::from_slice(&flat))
    }
}

/// PnL is persisted as an exact JSON number. Legacy files may also hold it as
/// text with a comma or period decimal separator, or as null.
mod pnl_number {
    use crate::utils::parse_locale_decimal;
    use rust_decimal::Decimal;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawPnl {
        Number(#[serde(with = "rust_decimal::serde::arbitrary_precision")] Decimal),
        Text(String),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Decimal, D::Error> {
        match Option::<RawPnl>::deserialize(d)? {
            None => Ok(Decimal::ZERO),
            Some(RawPnl::Number(v)) => Ok(v),
            Some(RawPnl::Text(s)) => parse_locale_decimal(&s).map_err(D::Error::custom),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    /// Nil when the stored entry had none; `Journal::open` assigns one.
    #[serde(default)]
    pub id: Uuid,
    pub date: String, // YYYY-MM-DD
    #[serde(default)]
    pub asset: String,
    #[serde(default)]
    pub direction: Direction,
    #[serde(default)]
    pub time: String,
    #[serde(default = "unspecified_trade_type")]
    pub trade_type: String,
    #[serde(default)]
    pub htf_links: Vec<String>,
    #[serde(default)]
    pub htf_desc: String,
    #[serde(default)]
    pub htf_keypoints: String,
    #[serde(default)]
    pub ltf_links: Vec<String>,
    #[serde(default)]
    pub ltf_desc: String,
    #[serde(default)]
    pub ltf_keypoints: String,
    #[serde(default)]
    pub general_notes: String,
    #[serde(default)]
    pub mood: Mood,
    #[serde(default)]
    pub interfered: Interfered,
    #[serde(default)]
    pub interfered_how: String,
    #[serde(default)]
    pub checklist: Checklist,
    #[serde(default)]
    pub outcome: Outcome,
    #[serde(
        default,
        serialize_with = "rust_decimal::serde::arbitrary_precision::serialize",
        deserialize_with = "pnl_number::deserialize"
    )]
    pub pnl: Decimal,
}

fn unspecified_trade_type() -> String {
    UNSPECIFIED_TRADE_TYPE.to_string()
}

impl TradeRecord {
    /// A fresh record with a new id and every optional field empty.
    pub fn new(date: NaiveDate, asset: impl Into<String>) -> Self {
        TradeRecord {
            id: Uuid::new_v4(),
            date: date.to_string(),
            asset: asset.into(),
            direction: Direction::default(),
            time: String::new(),
            trade_type: unspecified_trade_type(),
            htf_links: Vec::new(),
            htf_desc: String::new(),
            htf_keypoints: String::new(),
            ltf_links: Vec::new(),
            ltf_desc: String::new(),
            ltf_keypoints: String::new(),
            general_notes: String::new(),
            mood: Mood::default(),
            interfered: Interfered::default(),
            interfered_how: String::new(),
            checklist: Checklist::default(),
            outcome: Outcome::default(),
            pnl: Decimal::ZERO,
        }
    }

    pub fn trade_date(&self) -> Result<NaiveDate, JournalError> {
        NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").map_err(|_| {
            JournalError::MalformedRecord {
                id: self.id,
                field: "date",
                value: self.date.clone(),
            }
        })
    }

    /// False for deliberate no-trade entries, which stay out of trade counts.
    pub fn is_valid_trade(&self) -> bool {
        self.direction != Direction::NoTrade
    }

    /// One-line history entry, e.g. `#3 | 2025-01-06 | NQ | Long | +150.0 $`.
    pub fn headline(&self, number: usize, ccy: &str) -> String {
        format!(
            "#{} | {} | {} | {} | {}",
            number,
            self.date,
            self.asset,
            self.direction,
            fmt_pnl(&self.pnl, ccy)
        )
    }

    /// Link entries that look like chart URLs, HTF first.
    pub fn chart_urls(&self) -> Vec<String> {
        self.htf_links
            .iter()
            .chain(self.ltf_links.iter())
            .filter(|l| l.contains("http"))
            .map(|l| l.trim().to_string())
            .collect()
    }
}
