// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Repository over the two transaction tables. Searches return the page
//! of rows plus the total count under the same predicate; the sync path
//! replaces a whole table inside one transaction.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{Connection, params_from_iter};
use rust_decimal::Decimal;

use crate::db::amount_column;
use crate::extract::{ExpenseRow, IncomeRow};
use crate::models::{Expense, Income};
use crate::search::{self, SearchFilters, SearchOptions, TableSpec};

fn amount_cols(currencies: &[String]) -> String {
    currencies
        .iter()
        .map(|c| amount_column(c))
        .collect::<Vec<_>>()
        .join(", ")
}

fn parse_amounts(
    row: &rusqlite::Row<'_>,
    first_idx: usize,
    currencies: &[String],
) -> Result<Vec<(String, Decimal)>> {
    let mut amounts = Vec::with_capacity(currencies.len());
    for (i, ccy) in currencies.iter().enumerate() {
        let raw: String = row.get(first_idx + i)?;
        let value = raw
            .parse::<Decimal>()
            .with_context(|| format!("Invalid stored amount '{}' for {}", raw, ccy))?;
        amounts.push((ccy.clone(), value));
    }
    Ok(amounts)
}

fn count_rows(conn: &Connection, spec: &TableSpec, filters: &SearchFilters) -> Result<i64> {
    let (where_sql, params) = search::build_where(spec, filters);
    let sql = format!("SELECT COUNT(*) FROM {}{}", spec.table, where_sql);
    let mut stmt = conn.prepare(&sql)?;
    let count: i64 = stmt.query_row(params_from_iter(params.iter()), |r| r.get(0))?;
    Ok(count)
}

pub fn count_expenses(conn: &Connection, filters: &SearchFilters) -> Result<i64> {
    count_rows(conn, &search::EXPENSES, filters)
}

pub fn count_income(conn: &Connection, filters: &SearchFilters) -> Result<i64> {
    count_rows(conn, &search::INCOME, filters)
}

/// Filter, sort, paginate. Returns `(rows, count)` where `count` ignores
/// sorting and pagination.
pub fn search_expenses(
    conn: &Connection,
    currencies: &[String],
    opts: &SearchOptions,
) -> Result<(Vec<Expense>, i64)> {
    let spec = &search::EXPENSES;
    let count = count_rows(conn, spec, &opts.filters)?;
    let (where_sql, params) = search::build_where(spec, &opts.filters);
    let sql = format!(
        "SELECT id, date, account, category, subcategory, payee, narration, tags, {} FROM expenses{}{}{}",
        amount_cols(currencies),
        where_sql,
        search::build_order(spec, &opts.sorting),
        search::build_paging(&opts.pagination),
    );
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(params_from_iter(params.iter()))?;
    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        data.push(Expense {
            id: r.get(0)?,
            date: r.get::<_, NaiveDate>(1)?,
            account: r.get(2)?,
            category: r.get(3)?,
            subcategory: r.get(4)?,
            payee: r.get(5)?,
            narration: r.get(6)?,
            tags: r.get(7)?,
            amounts: parse_amounts(r, 8, currencies)?,
        });
    }
    Ok((data, count))
}

pub fn search_income(
    conn: &Connection,
    currencies: &[String],
    opts: &SearchOptions,
) -> Result<(Vec<Income>, i64)> {
    let spec = &search::INCOME;
    let count = count_rows(conn, spec, &opts.filters)?;
    let (where_sql, params) = search::build_where(spec, &opts.filters);
    let sql = format!(
        "SELECT id, date, account, origin, payee, narration, {} FROM income{}{}{}",
        amount_cols(currencies),
        where_sql,
        search::build_order(spec, &opts.sorting),
        search::build_paging(&opts.pagination),
    );
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(params_from_iter(params.iter()))?;
    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        data.push(Income {
            id: r.get(0)?,
            date: r.get::<_, NaiveDate>(1)?,
            account: r.get(2)?,
            origin: r.get(3)?,
            payee: r.get(4)?,
            narration: r.get(5)?,
            amounts: parse_amounts(r, 6, currencies)?,
        });
    }
    Ok((data, count))
}

fn placeholders(n: usize) -> String {
    (1..=n)
        .map(|i| format!("?{}", i))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Full refresh: delete everything, bulk-insert the fresh extraction, all
/// inside one transaction. A failed insert rolls the delete back, so a
/// concurrent reader only ever sees the pre- or post-sync table.
pub fn replace_expenses(
    conn: &mut Connection,
    currencies: &[String],
    rows: &[ExpenseRow],
) -> Result<usize> {
    let sql = format!(
        "INSERT INTO expenses(date, account, category, subcategory, payee, narration, tags, {}) VALUES ({})",
        amount_cols(currencies),
        placeholders(7 + currencies.len()),
    );
    let tx = conn.transaction()?;
    tx.execute("DELETE FROM expenses", [])?;
    {
        let mut stmt = tx.prepare(&sql)?;
        for row in rows {
            let mut values: Vec<Option<String>> = vec![
                Some(row.date.to_string()),
                Some(row.account.clone()),
                Some(row.category.clone()),
                Some(row.subcategory.clone()),
                row.payee.clone(),
                Some(row.narration.clone()),
                row.tags.clone(),
            ];
            values.extend(row.amounts.iter().map(|a| Some(a.to_string())));
            stmt.execute(params_from_iter(values.iter()))?;
        }
    }
    tx.commit()?;
    Ok(rows.len())
}

pub fn replace_income(
    conn: &mut Connection,
    currencies: &[String],
    rows: &[IncomeRow],
) -> Result<usize> {
    let sql = format!(
        "INSERT INTO income(date, account, origin, payee, narration, {}) VALUES ({})",
        amount_cols(currencies),
        placeholders(5 + currencies.len()),
    );
    let tx = conn.transaction()?;
    tx.execute("DELETE FROM income", [])?;
    {
        let mut stmt = tx.prepare(&sql)?;
        for row in rows {
            let mut values: Vec<Option<String>> = vec![
                Some(row.date.to_string()),
                Some(row.account.clone()),
                Some(row.origin.clone()),
                row.payee.clone(),
                Some(row.narration.clone()),
            ];
            values.extend(row.amounts.iter().map(|a| Some(a.to_string())));
            stmt.execute(params_from_iter(values.iter()))?;
        }
    }
    tx.commit()?;
    Ok(rows.len())
}
