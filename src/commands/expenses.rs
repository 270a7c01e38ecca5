// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::config::Config;
use crate::search::{SearchFilters, SearchOptions};
use crate::store;
use crate::summary;
use crate::utils::{maybe_print_json, parse_date, pretty_table};

pub fn handle(conn: &Connection, cfg: &Config, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(conn, cfg, sub)?,
        Some(("summary", sub)) => grouped(conn, cfg, sub)?,
        _ => {}
    }
    Ok(())
}

fn list(conn: &Connection, cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let filters = SearchFilters {
        from_date: sub
            .get_one::<String>("from")
            .map(|s| parse_date(s))
            .transpose()?,
        to_date: sub
            .get_one::<String>("to")
            .map(|s| parse_date(s))
            .transpose()?,
        category: sub.get_one::<String>("category").cloned(),
        subcategory: sub.get_one::<String>("subcategory").cloned(),
        tag: sub.get_one::<String>("tag").cloned(),
        account: sub.get_one::<String>("account").cloned(),
        ..Default::default()
    };
    let opts = SearchOptions::default()
        .with_filters(filters)
        .with_pagination(super::pagination_from(sub, cfg.default_limit))
        .with_sorting(super::sorting_from(sub));

    let (rows, count) = store::search_expenses(conn, &cfg.currencies, &opts)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
        return Ok(());
    }

    let mut headers = vec!["Date", "Category", "Subcategory", "Payee", "Narration", "Tags"];
    headers.extend(cfg.currencies.iter().map(|s| s.as_str()));
    let data = rows
        .iter()
        .map(|e| {
            let mut r = vec![
                e.date.to_string(),
                e.category.clone(),
                e.subcategory.clone(),
                e.payee.clone().unwrap_or_default(),
                e.narration.clone(),
                e.tags.clone().unwrap_or_default(),
            ];
            r.extend(e.amounts.iter().map(|(_, v)| format!("{:.2}", v)));
            r
        })
        .collect();
    println!("{}", pretty_table(&headers, data));
    println!("{} of {} row(s)", rows.len(), count);
    Ok(())
}

fn grouped(conn: &Connection, cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let from = parse_date(sub.get_one::<String>("from").unwrap())?;
    let to = sub
        .get_one::<String>("to")
        .map(|s| parse_date(s))
        .transpose()?;
    let group_by = sub.get_one::<String>("group-by").unwrap();

    let result = summary::expense_summary(conn, cfg, from, to, group_by)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &result)? {
        return Ok(());
    }

    let mut headers = vec!["Group", "Count"];
    headers.extend(cfg.currencies.iter().map(|s| s.as_str()));
    let data = result
        .data
        .iter()
        .map(|b| {
            let mut r = vec![b.group.clone(), b.count.to_string()];
            r.extend(b.amounts.iter().map(|(_, v)| format!("{:.2}", v)));
            r
        })
        .collect();
    println!("{}", pretty_table(&headers, data));
    Ok(())
}
