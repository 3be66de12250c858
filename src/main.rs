// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use tradejournal::{cli, commands, config::Config, journal::Journal, store};

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let cfg = Config::from_matches(&matches)?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let store = store::open(&cfg)?;
    if let Some(("init", _)) = matches.subcommand() {
        return commands::trades::init(store.as_ref(), &cfg);
    }

    let mut journal = Journal::open(store);
    match matches.subcommand() {
        Some(("add", sub)) => commands::trades::add(&mut journal, &cfg, sub)?,
        Some(("edit", sub)) => commands::trades::edit(&mut journal, &cfg, sub)?,
        Some(("delete", sub)) => commands::trades::delete(&mut journal, sub)?,
        Some(("delete-last", _)) => commands::trades::delete_last(&mut journal)?,
        Some(("show", sub)) => commands::trades::show(&journal, &cfg, sub)?,
        Some(("history", sub)) => commands::history::handle(&journal, &cfg, sub)?,
        Some(("calendar", sub)) => commands::reports::calendar(&journal, &cfg, sub)?,
        Some(("day", sub)) => commands::reports::day(&journal, &cfg, sub)?,
        Some(("week", sub)) => commands::reports::week(&journal, &cfg, sub)?,
        Some(("summary", sub)) => commands::reports::summary(&journal, &cfg, sub)?,
        Some(("dashboard", sub)) => commands::reports::dashboard(&journal, &cfg, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&journal, sub)?,
        Some(("import", sub)) => commands::importer::handle(&mut journal, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&journal, &cfg)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
