// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print as JSON lines"),
    )
}

fn trip_fields(cmd: Command, required_name: bool) -> Command {
    cmd.arg(
        Arg::new("name")
            .long("name")
            .required(required_name)
            .help("Trip name"),
    )
    .arg(
        Arg::new("currency")
            .long("currency")
            .help("Currency code; non-ISO codes are kept as custom labels"),
    )
    .arg(Arg::new("start").long("start").help("Start date YYYY-MM-DD"))
    .arg(Arg::new("end").long("end").help("End date YYYY-MM-DD"))
    .arg(Arg::new("daily_budget").long("daily-budget"))
    .arg(Arg::new("total_budget").long("total-budget"))
    .arg(Arg::new("image").long("image").help("Stored cover image reference"))
}

fn tx_fields(cmd: Command, adding: bool) -> Command {
    cmd.arg(Arg::new("amount").long("amount").required(adding))
        .arg(
            Arg::new("date")
                .long("date")
                .help("YYYY-MM-DD, defaults to today"),
        )
        .arg(
            Arg::new("category")
                .long("category")
                .required(adding)
                .help("Category key, see `tripclip categories`"),
        )
        .arg(Arg::new("payment").long("payment").help("Payment method key"))
        .arg(
            Arg::new("type")
                .long("type")
                .value_parser(["expense", "income"])
                .help("Defaults to expense"),
        )
        .arg(Arg::new("notes").long("notes"))
        .arg(
            Arg::new("exclude")
                .long("exclude")
                .action(ArgAction::SetTrue)
                .help("Record without counting toward the budget"),
        )
        .arg(
            Arg::new("lat")
                .long("lat")
                .value_parser(clap::value_parser!(f64))
                .requires("lon"),
        )
        .arg(
            Arg::new("lon")
                .long("lon")
                .value_parser(clap::value_parser!(f64))
                .requires("lat"),
        )
        .arg(Arg::new("image").long("image"))
}

pub fn build_cli() -> Command {
    Command::new("tripclip")
        .version(crate_version!())
        .about("Offline-first trip expense tracker")
        .subcommand(Command::new("init").about("Create the local database"))
        .subcommand(
            Command::new("trip")
                .about("Manage trips")
                .subcommand(trip_fields(Command::new("add"), true).arg(
                    Arg::new("active").long("active").action(ArgAction::SetTrue),
                ))
                .subcommand(json_flags(Command::new("list")))
                .subcommand(trip_fields(
                    Command::new("edit").arg(Arg::new("id").required(true)),
                    false,
                ))
                .subcommand(Command::new("rm").arg(Arg::new("id").required(true)))
                .subcommand(
                    Command::new("activate")
                        .about("Make this the active trip")
                        .arg(Arg::new("id").required(true)),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Manage transactions")
                .subcommand(tx_fields(
                    Command::new("add").arg(Arg::new("trip").long("trip").required(true)),
                    true,
                ))
                .subcommand(json_flags(
                    Command::new("list").arg(Arg::new("trip").long("trip").required(true)),
                ))
                .subcommand(tx_fields(
                    Command::new("edit")
                        .arg(Arg::new("id").required(true))
                        .arg(
                            Arg::new("include")
                                .long("include")
                                .action(ArgAction::SetTrue)
                                .conflicts_with("exclude")
                                .help("Count toward the budget again"),
                        ),
                    false,
                ))
                .subcommand(Command::new("rm").arg(Arg::new("id").required(true))),
        )
        .subcommand(json_flags(
            Command::new("summary")
                .about("Spend versus budget for a trip")
                .arg(Arg::new("trip").required(true)),
        ))
        .subcommand(
            Command::new("export")
                .about("Export a trip's transactions")
                .arg(Arg::new("trip").long("trip").required(true))
                .arg(
                    Arg::new("format")
                        .long("format")
                        .default_value("csv")
                        .help("csv|json"),
                )
                .arg(Arg::new("out").long("out").required(true)),
        )
        .subcommand(Command::new("doctor").about("Check local data for inconsistencies"))
        .subcommand(
            Command::new("profile")
                .about("Profile preferences")
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("key").required(true))
                        .arg(Arg::new("value").required(true)),
                )
                .subcommand(Command::new("show")),
        )
        .subcommand(Command::new("categories").about("List categories and payment methods"))
        .subcommand(
            Command::new("sync")
                .about("Remote sync")
                .subcommand(Command::new("pull").about("Apply remote changes locally")),
        )
}
