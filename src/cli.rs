// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn out_flags() -> [Arg; 2] {
    [
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print the result as pretty JSON"),
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print the result as JSON lines"),
    ]
}

fn paging_args() -> [Arg; 2] {
    [
        Arg::new("skip")
            .long("skip")
            .value_parser(value_parser!(i64))
            .default_value("0")
            .help("Rows to skip"),
        Arg::new("limit")
            .long("limit")
            .value_parser(value_parser!(i64))
            .default_value("0")
            .help("Page size (0 means the configured default)"),
    ]
}

fn sorting_args() -> [Arg; 2] {
    [
        Arg::new("sort-by")
            .long("sort-by")
            .help("Column to sort by (unknown columns are ignored)"),
        Arg::new("order")
            .long("order")
            .default_value("asc")
            .help("asc or desc"),
    ]
}

fn range_args() -> [Arg; 2] {
    [
        Arg::new("from")
            .long("from")
            .required(true)
            .help("Start date YYYY-MM-DD"),
        Arg::new("to").long("to").help("End date YYYY-MM-DD"),
    ]
}

pub fn build_cli() -> Command {
    Command::new("beanbase")
        .about("Ledger-to-SQLite sync and query tool")
        .version(clap::crate_version!())
        .arg(
            Arg::new("ledger")
                .long("ledger")
                .global(true)
                .help("Path to the ledger file (overrides BEANBASE_LEDGER)"),
        )
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .help("Path to the SQLite database (overrides BEANBASE_DB)"),
        )
        .arg(
            Arg::new("currencies")
                .long("currencies")
                .global(true)
                .help("Comma-separated tracked currencies, first is base (overrides BEANBASE_CURRENCIES)"),
        )
        .subcommand(Command::new("init").about("Create the database and schema"))
        .subcommand(Command::new("sync").about("Replace stored transactions from the ledger"))
        .subcommand(
            Command::new("watch")
                .about("Sync now, then keep syncing on ledger changes")
                .arg(
                    Arg::new("debounce")
                        .long("debounce")
                        .value_parser(value_parser!(u64))
                        .default_value("2")
                        .help("Seconds to ignore repeat events for the same file"),
                ),
        )
        .subcommand(
            Command::new("expenses")
                .about("Query expense transactions")
                .subcommand(
                    Command::new("list")
                        .about("Filtered, sorted, paginated expense rows")
                        .arg(Arg::new("from").long("from").help("Start date YYYY-MM-DD"))
                        .arg(Arg::new("to").long("to").help("End date YYYY-MM-DD (exclusive)"))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("subcategory").long("subcategory"))
                        .arg(Arg::new("tag").long("tag"))
                        .arg(Arg::new("account").long("account").help("Account prefix"))
                        .args(paging_args())
                        .args(sorting_args())
                        .args(out_flags()),
                )
                .subcommand(
                    Command::new("summary")
                        .about("Per-currency expense totals grouped by a dimension")
                        .args(range_args())
                        .arg(
                            Arg::new("group-by")
                                .long("group-by")
                                .default_value("category")
                                .help("category, subcategory, or month"),
                        )
                        .args(out_flags()),
                ),
        )
        .subcommand(
            Command::new("income")
                .about("Query income transactions")
                .subcommand(
                    Command::new("list")
                        .about("Filtered, sorted, paginated income rows")
                        .arg(Arg::new("from").long("from").help("Start date YYYY-MM-DD"))
                        .arg(Arg::new("to").long("to").help("End date YYYY-MM-DD (inclusive)"))
                        .arg(Arg::new("origin").long("origin"))
                        .arg(Arg::new("account").long("account").help("Account prefix"))
                        .args(paging_args())
                        .args(sorting_args())
                        .args(out_flags()),
                )
                .subcommand(
                    Command::new("summary")
                        .about("Per-currency income totals grouped by a dimension")
                        .args(range_args())
                        .arg(
                            Arg::new("group-by")
                                .long("group-by")
                                .default_value("origin")
                                .help("origin or month"),
                        )
                        .args(out_flags()),
                ),
        )
        .subcommand(
            Command::new("account")
                .about("Account hierarchy and per-account reports")
                .subcommand(
                    Command::new("add")
                        .about("Create an account")
                        .arg(Arg::new("name").required(true))
                        .arg(Arg::new("type").long("type").required(true))
                        .arg(Arg::new("currency").long("currency").required(true))
                        .arg(
                            Arg::new("parent")
                                .long("parent")
                                .value_parser(value_parser!(i64))
                                .help("Parent account id"),
                        )
                        .arg(
                            Arg::new("inactive")
                                .long("inactive")
                                .action(ArgAction::SetTrue),
                        )
                        .args(out_flags()),
                )
                .subcommand(
                    Command::new("list")
                        .about("Search accounts")
                        .arg(Arg::new("name").long("name").help("Name substring"))
                        .arg(Arg::new("type").long("type"))
                        .arg(Arg::new("currency").long("currency"))
                        .arg(
                            Arg::new("parent")
                                .long("parent")
                                .value_parser(value_parser!(i64)),
                        )
                        .args(paging_args())
                        .args(sorting_args())
                        .args(out_flags()),
                )
                .subcommand(
                    Command::new("children")
                        .about("Direct children of an account")
                        .arg(
                            Arg::new("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .args(paging_args())
                        .args(out_flags()),
                )
                .subcommand(
                    Command::new("parent")
                        .about("Direct parent of an account")
                        .arg(
                            Arg::new("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .args(out_flags()),
                )
                .subcommand(
                    Command::new("set-parent")
                        .about("Re-parent an account (omit --parent to make it a root)")
                        .arg(
                            Arg::new("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(
                            Arg::new("parent")
                                .long("parent")
                                .value_parser(value_parser!(i64)),
                        ),
                )
                .subcommand(
                    Command::new("balance")
                        .about("Income minus expenses for an account prefix")
                        .arg(Arg::new("name").required(true).help("Account prefix"))
                        .arg(Arg::new("as-of").long("as-of").help("Date YYYY-MM-DD (default today)"))
                        .args(out_flags()),
                )
                .subcommand(
                    Command::new("history")
                        .about("Combined expense and income history for an account prefix")
                        .arg(Arg::new("name").required(true).help("Account prefix"))
                        .args(range_args())
                        .args(paging_args())
                        .args(out_flags()),
                ),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert an amount between tracked currencies at the static display rates")
                .arg(Arg::new("amount").required(true))
                .arg(Arg::new("from").required(true))
                .arg(
                    Arg::new("to")
                        .required(true)
                        .help("Target currency, or a comma-separated list"),
                ),
        )
}
