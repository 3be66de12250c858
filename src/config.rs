// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Runtime configuration: YAML file, then environment, then CLI flags.

use crate::error::JournalError;
use crate::models::UNSPECIFIED_TRADE_TYPE;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Tradejournal", "tradejournal"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    #[default]
    Json,
    Csv,
    Remote,
    Sqlite,
}

impl FromStr for StoreKind {
    type Err = JournalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(StoreKind::Json),
            "csv" | "sheet" => Ok(StoreKind::Csv),
            "remote" => Ok(StoreKind::Remote),
            "sqlite" => Ok(StoreKind::Sqlite),
            _ => Err(JournalError::invalid(
                "store",
                s,
                "expected json, csv, remote or sqlite",
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub store: StoreKind,
    /// Backing file for json/csv/sqlite; defaults under the platform data dir.
    pub data_path: Option<PathBuf>,
    pub remote_url: Option<String>,
    pub remote_timeout_secs: u64,
    pub symbols: Vec<String>,
    pub trade_types: Vec<String>,
    pub currency_symbol: String,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            store: StoreKind::Json,
            data_path: None,
            remote_url: None,
            remote_timeout_secs: 15,
            symbols: ["NQ", "MNQ", "ES", "MES", "XAUUSD"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            trade_types: [
                "Internal -> External",
                "External -> Internal",
                "Internal -> Internal",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            currency_symbol: "$".into(),
            log_level: "warn".into(),
        }
    }
}

pub fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")
}

pub fn default_config_path() -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().join("config.yaml"))
}

impl Config {
    /// Reads the YAML file if it exists; a missing file yields defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Config::default());
        }
        let s = fs::read_to_string(path)
            .with_context(|| format!("Read config {}", path.display()))?;
        let cfg: Self = serde_yaml::from_str(&s)
            .with_context(|| format!("Parse config {}", path.display()))?;
        Ok(cfg)
    }

    /// File (from `--config` or the default location), then environment, then
    /// the global `--store` / `--data` flags.
    pub fn from_matches(m: &clap::ArgMatches) -> Result<Self> {
        let path = match m.get_one::<String>("config") {
            Some(p) => PathBuf::from(p),
            None => default_config_path()?,
        };
        let mut cfg = Config::load(&path)?;
        cfg.apply_env()?;
        if let Some(s) = m.get_one::<String>("store") {
            cfg.store = s.parse()?;
        }
        if let Some(d) = m.get_one::<String>("data") {
            cfg.data_path = Some(PathBuf::from(d));
        }
        Ok(cfg)
    }

    /// Applies `TRADEJOURNAL_*` environment overrides.
    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(v) = std::env::var("TRADEJOURNAL_STORE") {
            self.store = v.parse()?;
        }
        if let Ok(v) = std::env::var("TRADEJOURNAL_DATA") {
            self.data_path = Some(PathBuf::from(v));
        }
        if let Ok(v) = std::env::var("TRADEJOURNAL_REMOTE_URL") {
            self.remote_url = Some(v);
        }
        Ok(())
    }

    /// Resolved backing file, creating the data dir for the default location.
    pub fn resolved_data_path(&self) -> Result<PathBuf> {
        if let Some(p) = &self.data_path {
            return Ok(p.clone());
        }
        let proj = project_dirs()?;
        let data_dir = proj.data_dir();
        fs::create_dir_all(data_dir).context("Failed to create data dir")?;
        let file = match self.store {
            StoreKind::Json | StoreKind::Remote => "trading_data.json",
            StoreKind::Csv => "trading_data.csv",
            StoreKind::Sqlite => "tradejournal.sqlite",
        };
        Ok(data_dir.join(file))
    }

    pub fn check_asset(&self, asset: &str) -> Result<(), JournalError> {
        if self.symbols.iter().any(|s| s == asset) {
            Ok(())
        } else {
            Err(JournalError::invalid(
                "asset",
                asset,
                format!("expected one of {}", self.symbols.join(", ")),
            ))
        }
    }

    pub fn check_trade_type(&self, trade_type: &str) -> Result<(), JournalError> {
        if trade_type == UNSPECIFIED_TRADE_TYPE || self.trade_types.iter().any(|t| t == trade_type)
        {
            Ok(())
        } else {
            Err(JournalError::invalid(
                "trade_type",
                trade_type,
                format!(
                    "expected one of {}, or {}",
                    self.trade_types.join(", "),
                    UNSPECIFIED_TRADE_TYPE
                ),
            ))
        }
    }
}
