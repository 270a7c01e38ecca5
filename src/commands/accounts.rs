// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::accounts::{self, AccountFilters};
use crate::config::Config;
use crate::models::{Account, NewAccount};
use crate::summary;
use crate::utils::{maybe_print_json, parse_date, pretty_table};

pub fn handle(conn: &Connection, cfg: &Config, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, cfg, sub)?,
        Some(("children", sub)) => children(conn, cfg, sub)?,
        Some(("parent", sub)) => parent(conn, sub)?,
        Some(("set-parent", sub)) => set_parent(conn, sub)?,
        Some(("balance", sub)) => balance(conn, cfg, sub)?,
        Some(("history", sub)) => history(conn, cfg, sub)?,
        _ => {}
    }
    Ok(())
}

fn account_rows(accounts: &[Account]) -> Vec<Vec<String>> {
    accounts
        .iter()
        .map(|a| {
            vec![
                a.id.to_string(),
                a.name.clone(),
                a.r#type.clone(),
                a.currency.clone(),
                if a.is_active { "yes".into() } else { "no".into() },
                a.parent_id.map(|p| p.to_string()).unwrap_or_default(),
            ]
        })
        .collect()
}

const ACCOUNT_HEADERS: &[&str] = &["ID", "Name", "Type", "CCY", "Active", "Parent"];

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let new = NewAccount {
        name: sub.get_one::<String>("name").unwrap().clone(),
        r#type: sub.get_one::<String>("type").unwrap().clone(),
        currency: sub.get_one::<String>("currency").unwrap().to_uppercase(),
        is_active: !sub.get_flag("inactive"),
        parent_id: sub.get_one::<i64>("parent").copied(),
    };
    let account = accounts::create_account(conn, &new)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &account)? {
        println!("Created account '{}' with id {}", account.name, account.id);
    }
    Ok(())
}

fn list(conn: &Connection, cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let filters = AccountFilters {
        name: sub.get_one::<String>("name").cloned(),
        r#type: sub.get_one::<String>("type").cloned(),
        currency: sub.get_one::<String>("currency").map(|s| s.to_uppercase()),
        parent_id: sub.get_one::<i64>("parent").copied(),
        ..Default::default()
    };
    let (rows, count) = accounts::search_accounts(
        conn,
        &filters,
        super::pagination_from(sub, cfg.default_limit),
        &super::sorting_from(sub),
    )?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
        return Ok(());
    }
    println!("{}", pretty_table(ACCOUNT_HEADERS, account_rows(&rows)));
    println!("{} of {} account(s)", rows.len(), count);
    Ok(())
}

fn children(conn: &Connection, cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let (rows, count) =
        accounts::children(conn, id, super::pagination_from(sub, cfg.default_limit))?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
        return Ok(());
    }
    println!("{}", pretty_table(ACCOUNT_HEADERS, account_rows(&rows)));
    println!("{} of {} child account(s)", rows.len(), count);
    Ok(())
}

fn parent(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    match accounts::parent(conn, id)? {
        Some(account) => {
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &account)? {
                println!(
                    "{}",
                    pretty_table(ACCOUNT_HEADERS, account_rows(&[account]))
                );
            }
        }
        None => println!("Account {} has no parent", id),
    }
    Ok(())
}

fn set_parent(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let parent_id = sub.get_one::<i64>("parent").copied();
    accounts::set_parent(conn, id, parent_id)?;
    match parent_id {
        Some(pid) => println!("Account {} is now a child of {}", id, pid),
        None => println!("Account {} is now a root account", id),
    }
    Ok(())
}

fn balance(conn: &Connection, cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap();
    let as_of = sub
        .get_one::<String>("as-of")
        .map(|s| parse_date(s))
        .transpose()?;
    let result = summary::account_balance(conn, cfg, name, as_of)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &result)? {
        return Ok(());
    }
    let data = result
        .balance
        .iter()
        .enumerate()
        .map(|(i, (ccy, bal))| {
            vec![
                ccy.clone(),
                format!("{:.2}", result.income.amounts[i].1),
                format!("{:.2}", result.expenses.amounts[i].1),
                format!("{:.2}", bal),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["CCY", "Income", "Expenses", "Balance"], data)
    );
    println!(
        "{} transaction(s) for '{}' as of {}",
        result.transaction_count, result.account_name, result.as_of_date
    );
    Ok(())
}

fn history(conn: &Connection, cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap();
    let from = parse_date(sub.get_one::<String>("from").unwrap())?;
    let to = match sub.get_one::<String>("to") {
        Some(s) => parse_date(s)?,
        None => chrono::Local::now().date_naive(),
    };
    let result = accounts::account_transactions(
        conn,
        cfg,
        name,
        from,
        to,
        super::pagination_from(sub, cfg.default_limit),
    )?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &result)? {
        return Ok(());
    }

    let mut headers = vec!["Date", "Kind", "Account", "Narration"];
    headers.extend(cfg.currencies.iter().map(|s| s.as_str()));
    let mut data: Vec<Vec<String>> = Vec::new();
    for e in &result.expenses {
        let mut r = vec![
            e.date.to_string(),
            "expense".into(),
            e.account.clone(),
            e.narration.clone(),
        ];
        r.extend(e.amounts.iter().map(|(_, v)| format!("{:.2}", v)));
        data.push(r);
    }
    for i in &result.incomes {
        let mut r = vec![
            i.date.to_string(),
            "income".into(),
            i.account.clone(),
            i.narration.clone(),
        ];
        r.extend(i.amounts.iter().map(|(_, v)| format!("{:.2}", v)));
        data.push(r);
    }
    data.sort_by(|a, b| b[0].cmp(&a[0]));
    println!("{}", pretty_table(&headers, data));
    println!(
        "{} transaction(s) total ({} expense, {} income)",
        result.total_transactions, result.expenses_summary.count, result.incomes_summary.count
    );
    Ok(())
}
