// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use beanbase::config::{Config, parse_currency_list};
use beanbase::{cli, commands, db};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let mut cfg = Config::from_env()?;
    if let Some(p) = matches.get_one::<String>("ledger") {
        cfg.ledger_path = Some(PathBuf::from(p));
    }
    if let Some(p) = matches.get_one::<String>("db") {
        cfg.db_path = Some(PathBuf::from(p));
    }
    if let Some(list) = matches.get_one::<String>("currencies") {
        cfg.currencies = parse_currency_list(list)?;
    }
    let db_path = match &cfg.db_path {
        Some(p) => p.clone(),
        None => db::default_db_path()?,
    };

    let mut conn = db::open_or_init(&db_path, &cfg.currencies)?;

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", db_path.display());
        }
        Some(("sync", _)) => commands::sync::handle(&mut conn, &cfg)?,
        Some(("watch", sub)) => commands::watch::handle(&cfg, db_path, sub)?,
        Some(("expenses", sub)) => commands::expenses::handle(&conn, &cfg, sub)?,
        Some(("income", sub)) => commands::income::handle(&conn, &cfg, sub)?,
        Some(("account", sub)) => commands::accounts::handle(&conn, &cfg, sub)?,
        Some(("convert", sub)) => commands::convert::handle(sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
