// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Account entity CRUD and structural hierarchy resolution. This is the
//! id-linked account tree, separate from the colon-delimited account
//! paths on transactions (those resolve by string prefix in the search
//! pipeline). The parent graph must stay acyclic: creation rejects a
//! missing parent and re-parenting rejects a cycle.

use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, params, params_from_iter};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::config::Config;
use crate::models::{Account, AccountTransactions, NewAccount, SideTotals};
use crate::search::{SearchFilters, SearchOptions, SearchPagination, SearchSorting, SortOrder};
use crate::store;

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("account {0} not found")]
    NotFound(i64),
    #[error("parent account {0} not found")]
    ParentNotFound(i64),
    #[error("account {0} cannot become a descendant of itself")]
    CycleDetected(i64),
}

const SORTABLE: &[&str] = &["name", "type", "currency", "created_at"];

fn row_to_account(r: &rusqlite::Row<'_>) -> rusqlite::Result<Account> {
    Ok(Account {
        id: r.get(0)?,
        name: r.get(1)?,
        r#type: r.get(2)?,
        currency: r.get(3)?,
        is_active: r.get(4)?,
        parent_id: r.get(5)?,
    })
}

const ACCOUNT_COLS: &str = "id, name, type, currency, is_active, parent_id";

pub fn get_account(conn: &Connection, id: i64) -> Result<Option<Account>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM accounts WHERE id=?1",
        ACCOUNT_COLS
    ))?;
    Ok(stmt.query_row(params![id], row_to_account).optional()?)
}

pub fn create_account(conn: &Connection, new: &NewAccount) -> Result<Account> {
    if let Some(pid) = new.parent_id {
        if get_account(conn, pid)?.is_none() {
            return Err(AccountError::ParentNotFound(pid).into());
        }
    }
    conn.execute(
        "INSERT INTO accounts(name, type, currency, is_active, parent_id) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![new.name, new.r#type, new.currency, new.is_active, new.parent_id],
    )?;
    let id = conn.last_insert_rowid();
    get_account(conn, id)?.ok_or_else(|| AccountError::NotFound(id).into())
}

/// Re-parent an account. Walks the proposed ancestor chain; if it passes
/// through the account itself the change would create a cycle and is
/// rejected.
pub fn set_parent(conn: &Connection, id: i64, parent_id: Option<i64>) -> Result<()> {
    if get_account(conn, id)?.is_none() {
        return Err(AccountError::NotFound(id).into());
    }
    if let Some(pid) = parent_id {
        let mut cursor = Some(pid);
        while let Some(current) = cursor {
            if current == id {
                return Err(AccountError::CycleDetected(id).into());
            }
            cursor = match get_account(conn, current)? {
                Some(acct) => acct.parent_id,
                None => return Err(AccountError::ParentNotFound(pid).into()),
            };
        }
    }
    conn.execute(
        "UPDATE accounts SET parent_id=?1 WHERE id=?2",
        params![parent_id, id],
    )?;
    Ok(())
}

pub fn delete_account(conn: &Connection, id: i64) -> Result<bool> {
    let n = conn.execute("DELETE FROM accounts WHERE id=?1", params![id])?;
    Ok(n > 0)
}

/// Direct children only (one level), paginated.
pub fn children(
    conn: &Connection,
    parent_id: i64,
    pagination: SearchPagination,
) -> Result<(Vec<Account>, i64)> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM accounts WHERE parent_id=?1",
        params![parent_id],
        |r| r.get(0),
    )?;
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM accounts WHERE parent_id=?1 ORDER BY name LIMIT ?2 OFFSET ?3",
        ACCOUNT_COLS
    ))?;
    let rows = stmt.query_map(
        params![parent_id, pagination.limit, pagination.skip],
        row_to_account,
    )?;
    let mut data = Vec::new();
    for row in rows {
        data.push(row?);
    }
    Ok((data, count))
}

/// Direct parent, or None for a root account (or an unknown id).
pub fn parent(conn: &Connection, id: i64) -> Result<Option<Account>> {
    match get_account(conn, id)? {
        Some(Account {
            parent_id: Some(pid),
            ..
        }) => get_account(conn, pid),
        _ => Ok(None),
    }
}

/// Filters for the account entity search. `name` is a free-text substring
/// match; everything else is equality.
#[derive(Debug, Clone, Default)]
pub struct AccountFilters {
    pub name: Option<String>,
    pub r#type: Option<String>,
    pub currency: Option<String>,
    pub is_active: Option<bool>,
    pub parent_id: Option<i64>,
}

pub fn search_accounts(
    conn: &Connection,
    filters: &AccountFilters,
    pagination: SearchPagination,
    sorting: &SearchSorting,
) -> Result<(Vec<Account>, i64)> {
    let mut where_sql = String::from(" WHERE 1=1");
    let mut params_vec: Vec<String> = Vec::new();

    if let Some(name) = &filters.name {
        where_sql.push_str(" AND name LIKE ?");
        params_vec.push(format!("%{}%", name));
    }
    if let Some(t) = &filters.r#type {
        where_sql.push_str(" AND type=?");
        params_vec.push(t.clone());
    }
    if let Some(c) = &filters.currency {
        where_sql.push_str(" AND currency=?");
        params_vec.push(c.clone());
    }
    if let Some(active) = filters.is_active {
        where_sql.push_str(" AND is_active=?");
        params_vec.push(if active { "1".into() } else { "0".into() });
    }
    if let Some(pid) = filters.parent_id {
        where_sql.push_str(" AND parent_id=?");
        params_vec.push(pid.to_string());
    }

    let count: i64 = conn.query_row(
        &format!("SELECT COUNT(*) FROM accounts{}", where_sql),
        params_from_iter(params_vec.iter()),
        |r| r.get(0),
    )?;

    let order = match &sorting.sort_by {
        Some(col) if SORTABLE.contains(&col.as_str()) => format!(
            " ORDER BY {} {}",
            col,
            if sorting.sort_order == SortOrder::Desc {
                "DESC"
            } else {
                "ASC"
            }
        ),
        _ => String::new(),
    };

    let sql = format!(
        "SELECT {} FROM accounts{}{} LIMIT {} OFFSET {}",
        ACCOUNT_COLS, where_sql, order, pagination.limit, pagination.skip
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(params_vec.iter()), row_to_account)?;
    let mut data = Vec::new();
    for row in rows {
        data.push(row?);
    }
    Ok((data, count))
}

fn sum_amounts<'a, I>(rows: I, currencies: &[String]) -> Vec<(String, Decimal)>
where
    I: Iterator<Item = &'a Vec<(String, Decimal)>>,
{
    let mut totals = vec![Decimal::ZERO; currencies.len()];
    for amounts in rows {
        for (i, (_, value)) in amounts.iter().enumerate() {
            totals[i] += *value;
        }
    }
    currencies
        .iter()
        .cloned()
        .zip(totals)
        .collect()
}

/// Combined expense + income history for an account prefix, with per-side
/// totals over the returned page. Income ranges include `to_date`;
/// expense ranges exclude it.
pub fn account_transactions(
    conn: &Connection,
    cfg: &Config,
    account_name: &str,
    from_date: NaiveDate,
    to_date: NaiveDate,
    pagination: SearchPagination,
) -> Result<AccountTransactions> {
    let filters = SearchFilters {
        from_date: Some(from_date),
        to_date: Some(to_date),
        account: Some(account_name.to_string()),
        ..Default::default()
    };
    let opts = SearchOptions::default()
        .with_filters(filters)
        .with_pagination(pagination);

    let (expenses, expense_count) = store::search_expenses(conn, &cfg.currencies, &opts)?;
    let (incomes, income_count) = store::search_income(conn, &cfg.currencies, &opts)?;

    let expenses_summary = SideTotals {
        amounts: sum_amounts(expenses.iter().map(|e| &e.amounts), &cfg.currencies),
        count: expense_count,
    };
    let incomes_summary = SideTotals {
        amounts: sum_amounts(incomes.iter().map(|i| &i.amounts), &cfg.currencies),
        count: income_count,
    };

    Ok(AccountTransactions {
        account_name: account_name.to_string(),
        from_date,
        to_date,
        expenses,
        incomes,
        expenses_summary,
        incomes_summary,
        total_transactions: expense_count + income_count,
    })
}
