// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

/// Record fields shared by `add` and `edit`; only `add` requires an asset.
fn record_args(cmd: Command, adding: bool) -> Command {
    cmd.arg(Arg::new("date").long("date").help("Trade date YYYY-MM-DD (default: today)"))
        .arg(Arg::new("asset").long("asset").required(adding))
        .arg(
            Arg::new("direction")
                .long("direction")
                .help("Long | Short | Both | No Trade"),
        )
        .arg(Arg::new("time").long("time").help("Execution time label"))
        .arg(Arg::new("type").long("type").help("Delivery model, or 'unspecified'"))
        .arg(
            Arg::new("htf-link")
                .long("htf-link")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("ltf-link")
                .long("ltf-link")
                .action(ArgAction::Append),
        )
        .arg(Arg::new("htf-desc").long("htf-desc").help("HTF narrative"))
        .arg(Arg::new("htf-keypoints").long("htf-keypoints"))
        .arg(Arg::new("ltf-desc").long("ltf-desc").help("LTF model"))
        .arg(Arg::new("ltf-keypoints").long("ltf-keypoints"))
        .arg(Arg::new("notes").long("notes").help("General notes"))
        .arg(Arg::new("mood").long("mood").help("Stressed | Neutral | Euphoric"))
        .arg(Arg::new("interfered").long("interfered").help("No | Yes"))
        .arg(Arg::new("interfered-how").long("interfered-how"))
        .arg(
            Arg::new("check")
                .long("check")
                .action(ArgAction::Append)
                .value_parser(value_parser!(usize))
                .help("Checklist position 1-6 to tick (repeatable)"),
        )
        .arg(
            Arg::new("no-checks")
                .long("no-checks")
                .action(ArgAction::SetTrue)
                .conflicts_with("check")
                .help("Untick every checklist item"),
        )
        .arg(
            Arg::new("outcome")
                .long("outcome")
                .help("Win | Loss | Breakeven | No Trade"),
        )
        .arg(
            Arg::new("pnl")
                .long("pnl")
                .allow_hyphen_values(true)
                .help("Profit/loss; comma or period decimals"),
        )
}

pub fn build_cli() -> Command {
    Command::new("tradejournal")
        .about("Personal trading journal: calendar P&L, win rate and trade history")
        .version(clap::crate_version!())
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .help("Path to config.yaml"),
        )
        .arg(
            Arg::new("store")
                .long("store")
                .global(true)
                .help("json | csv | remote | sqlite"),
        )
        .arg(
            Arg::new("data")
                .long("data")
                .global(true)
                .help("Backing file for the store"),
        )
        .subcommand(Command::new("init").about("Create an empty journal store"))
        .subcommand(record_args(Command::new("add").about("Log a trade"), true))
        .subcommand(record_args(
            Command::new("edit")
                .about("Overwrite fields of a logged trade")
                .arg(Arg::new("id").required(true).help("Record id or unique prefix")),
            false,
        ))
        .subcommand(
            Command::new("delete")
                .about("Delete a trade")
                .arg(Arg::new("id").required(true)),
        )
        .subcommand(Command::new("delete-last").about("Delete the most recently entered trade"))
        .subcommand(json_flags(
            Command::new("show")
                .about("Show one trade in full")
                .arg(Arg::new("id").required(true)),
        ))
        .subcommand(json_flags(
            Command::new("history")
                .about("Filtered, sorted trade history")
                .arg(Arg::new("asset").long("asset").action(ArgAction::Append))
                .arg(Arg::new("outcome").long("outcome").action(ArgAction::Append))
                .arg(Arg::new("direction").long("direction").action(ArgAction::Append))
                .arg(Arg::new("from").long("from").help("Start date, inclusive"))
                .arg(Arg::new("to").long("to").help("End date, inclusive"))
                .arg(
                    Arg::new("sort")
                        .long("sort")
                        .default_value("date-desc")
                        .help("date-desc | date-asc | pnl-desc | pnl-asc"),
                )
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .value_parser(value_parser!(usize)),
                ),
        ))
        .subcommand(json_flags(
            Command::new("calendar")
                .about("Monthly P&L calendar with weekly totals")
                .arg(Arg::new("month").long("month").help("YYYY-MM (default: this month)")),
        ))
        .subcommand(json_flags(
            Command::new("day")
                .about("Trades and result for one day")
                .arg(Arg::new("date").required(true)),
        ))
        .subcommand(json_flags(
            Command::new("week")
                .about("Monday-Sunday result for the week containing a date")
                .arg(Arg::new("date").required(true)),
        ))
        .subcommand(json_flags(
            Command::new("summary").about("Net P&L, win rate, trade and no-trade counts"),
        ))
        .subcommand(json_flags(
            Command::new("dashboard")
                .about("Summary plus calendar, as one view")
                .arg(Arg::new("month").long("month").help("YYYY-MM (default: this month)")),
        ))
        .subcommand(
            Command::new("export")
                .about("Write all trades to a file")
                .arg(
                    Arg::new("format")
                        .long("format")
                        .default_value("json")
                        .help("json | csv"),
                )
                .arg(Arg::new("out").long("out").required(true)),
        )
        .subcommand(
            Command::new("import")
                .about("Append trades from a json or csv file")
                .arg(Arg::new("path").long("path").required(true))
                .arg(Arg::new("format").long("format").help("json | csv (default: by extension)")),
        )
        .subcommand(Command::new("doctor").about("Check the journal for problems"))
}
