// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Per-currency aggregation over transaction rows: grouped summaries and
//! the income-minus-expenses balance for an account prefix. Amounts in
//! different currencies never collapse into one number; every bucket and
//! balance keeps one total per tracked currency.

use anyhow::Result;
use chrono::{Local, NaiveDate};
use once_cell::sync::Lazy;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

use crate::config::Config;
use crate::models::{BalanceSummary, Expense, Income, SideTotals};
use crate::search::{MAX_PAGE_LIMIT, SearchFilters, SearchOptions, SearchPagination};
use crate::store;

/// Earliest date considered when a balance query gives no lower bound.
pub static EPOCH_OF_RECORD: Lazy<NaiveDate> =
    Lazy::new(|| NaiveDate::from_ymd_opt(1900, 1, 1).unwrap());

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("invalid group_by '{value}' for {variant} (expected one of: {allowed})")]
    InvalidGroupBy {
        value: String,
        variant: &'static str,
        allowed: &'static str,
    },
}

/// Grouping dimension for summaries. Category and subcategory apply to
/// expenses, origin to income, month to both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupBy {
    Category,
    Subcategory,
    Origin,
    Month,
}

impl GroupBy {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "category" => Some(GroupBy::Category),
            "subcategory" => Some(GroupBy::Subcategory),
            "origin" => Some(GroupBy::Origin),
            "month" => Some(GroupBy::Month),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryBucket {
    pub group: String,
    pub amounts: Vec<(String, Decimal)>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub data: Vec<SummaryBucket>,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
}

/// First day of the row's month, rendered as a date.
fn month_key(date: NaiveDate) -> String {
    format!("{}-01", date.format("%Y-%m"))
}

/// Accumulates rows into buckets keyed by the group string, preserving
/// first-seen order.
struct Accumulator {
    currencies: Vec<String>,
    buckets: Vec<SummaryBucket>,
    index: HashMap<String, usize>,
}

impl Accumulator {
    fn new(currencies: &[String]) -> Self {
        Self {
            currencies: currencies.to_vec(),
            buckets: Vec::new(),
            index: HashMap::new(),
        }
    }

    fn add(&mut self, key: String, amounts: &[(String, Decimal)]) {
        let idx = match self.index.get(&key) {
            Some(&i) => i,
            None => {
                self.buckets.push(SummaryBucket {
                    group: key.clone(),
                    amounts: self
                        .currencies
                        .iter()
                        .map(|c| (c.clone(), Decimal::ZERO))
                        .collect(),
                    count: 0,
                });
                let i = self.buckets.len() - 1;
                self.index.insert(key, i);
                i
            }
        };
        let bucket = &mut self.buckets[idx];
        for (slot, (_, value)) in bucket.amounts.iter_mut().zip(amounts) {
            slot.1 += *value;
        }
        bucket.count += 1;
    }

    fn into_buckets(self) -> Vec<SummaryBucket> {
        self.buckets
    }
}

pub fn aggregate_expenses(
    rows: &[Expense],
    group_by: GroupBy,
    currencies: &[String],
) -> Result<Vec<SummaryBucket>, QueryError> {
    let mut acc = Accumulator::new(currencies);
    for row in rows {
        let key = match group_by {
            GroupBy::Category => row.category.clone(),
            GroupBy::Subcategory => format!("{}.{}", row.category, row.subcategory),
            GroupBy::Month => month_key(row.date),
            GroupBy::Origin => {
                return Err(QueryError::InvalidGroupBy {
                    value: "origin".into(),
                    variant: "expenses",
                    allowed: "category, subcategory, month",
                });
            }
        };
        acc.add(key, &row.amounts);
    }
    Ok(acc.into_buckets())
}

pub fn aggregate_income(
    rows: &[Income],
    group_by: GroupBy,
    currencies: &[String],
) -> Result<Vec<SummaryBucket>, QueryError> {
    let mut acc = Accumulator::new(currencies);
    for row in rows {
        let key = match group_by {
            GroupBy::Origin => row.origin.clone(),
            GroupBy::Month => month_key(row.date),
            GroupBy::Category | GroupBy::Subcategory => {
                return Err(QueryError::InvalidGroupBy {
                    value: "category/subcategory".into(),
                    variant: "income",
                    allowed: "origin, month",
                });
            }
        };
        acc.add(key, &row.amounts);
    }
    Ok(acc.into_buckets())
}

fn parse_group_by(
    raw: &str,
    variant: &'static str,
    allowed: &'static str,
) -> Result<GroupBy, QueryError> {
    GroupBy::parse(raw).ok_or_else(|| QueryError::InvalidGroupBy {
        value: raw.to_string(),
        variant,
        allowed,
    })
}

fn range_options(from_date: NaiveDate, to_date: NaiveDate) -> SearchOptions {
    SearchOptions::default()
        .with_filters(SearchFilters {
            from_date: Some(from_date),
            to_date: Some(to_date),
            ..Default::default()
        })
        .with_pagination(SearchPagination::new(0, MAX_PAGE_LIMIT))
}

/// Grouped expense totals over a date range. `to_date` defaults to today
/// and, as everywhere on the expense side, the end date is exclusive.
pub fn expense_summary(
    conn: &Connection,
    cfg: &Config,
    from_date: NaiveDate,
    to_date: Option<NaiveDate>,
    group_by: &str,
) -> Result<Summary> {
    let group = parse_group_by(group_by, "expenses", "category, subcategory, month")?;
    let to_date = to_date.unwrap_or_else(|| Local::now().date_naive());
    let opts = range_options(from_date, to_date);
    let (rows, _) = store::search_expenses(conn, &cfg.currencies, &opts)?;
    let data = aggregate_expenses(&rows, group, &cfg.currencies)?;
    Ok(Summary {
        data,
        from_date,
        to_date,
    })
}

/// Grouped income totals over a date range (end date inclusive).
pub fn income_summary(
    conn: &Connection,
    cfg: &Config,
    from_date: NaiveDate,
    to_date: Option<NaiveDate>,
    group_by: &str,
) -> Result<Summary> {
    let group = parse_group_by(group_by, "income", "origin, month")?;
    let to_date = to_date.unwrap_or_else(|| Local::now().date_naive());
    let opts = range_options(from_date, to_date);
    let (rows, _) = store::search_income(conn, &cfg.currencies, &opts)?;
    let data = aggregate_income(&rows, group, &cfg.currencies)?;
    Ok(Summary {
        data,
        from_date,
        to_date,
    })
}

fn side_totals(rows: &[Vec<(String, Decimal)>], currencies: &[String], count: i64) -> SideTotals {
    let mut totals = vec![Decimal::ZERO; currencies.len()];
    for amounts in rows {
        for (i, (_, value)) in amounts.iter().enumerate() {
            totals[i] += *value;
        }
    }
    SideTotals {
        amounts: currencies.iter().cloned().zip(totals).collect(),
        count,
    }
}

/// Income minus expenses for an account prefix, from the epoch of record
/// up to and including `as_of`. The expense side's exclusive end bound is
/// shifted one day past `as_of` so both sides cover the same days.
pub fn account_balance(
    conn: &Connection,
    cfg: &Config,
    account_name: &str,
    as_of: Option<NaiveDate>,
) -> Result<BalanceSummary> {
    let as_of = as_of.unwrap_or_else(|| Local::now().date_naive());
    // succ_opt only fails at NaiveDate::MAX.
    let expense_bound = as_of.succ_opt().unwrap_or(as_of);

    let base = SearchFilters {
        from_date: Some(*EPOCH_OF_RECORD),
        account: Some(account_name.to_string()),
        ..Default::default()
    };

    let income_opts = SearchOptions::default()
        .with_filters(SearchFilters {
            to_date: Some(as_of),
            ..base.clone()
        })
        .with_pagination(SearchPagination::new(0, MAX_PAGE_LIMIT));
    let expense_opts = SearchOptions::default()
        .with_filters(SearchFilters {
            to_date: Some(expense_bound),
            ..base
        })
        .with_pagination(SearchPagination::new(0, MAX_PAGE_LIMIT));

    let (income_rows, income_count) = store::search_income(conn, &cfg.currencies, &income_opts)?;
    let (expense_rows, expense_count) =
        store::search_expenses(conn, &cfg.currencies, &expense_opts)?;

    let income = side_totals(
        &income_rows.iter().map(|r| r.amounts.clone()).collect::<Vec<_>>(),
        &cfg.currencies,
        income_count,
    );
    let expenses = side_totals(
        &expense_rows.iter().map(|r| r.amounts.clone()).collect::<Vec<_>>(),
        &cfg.currencies,
        expense_count,
    );

    let balance = cfg
        .currencies
        .iter()
        .enumerate()
        .map(|(i, c)| (c.clone(), income.amounts[i].1 - expenses.amounts[i].1))
        .collect();

    Ok(BalanceSummary {
        account_name: account_name.to_string(),
        as_of_date: as_of,
        balance,
        income,
        expenses,
        transaction_count: income_count + expense_count,
    })
}
