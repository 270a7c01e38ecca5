// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Query translator: maps parsed postings onto the two extraction shapes
//! (expenses, income), deriving category/subcategory/origin from account
//! path segments and converting each amount into every tracked currency
//! at the posting date.

use rust_decimal::Decimal;

use crate::fx::PriceTable;
use crate::models::Posting;

const EXPENSE_ROOT: &str = "Expenses";
const INCOME_ROOT: &str = "Income";

#[derive(Debug, Clone)]
pub struct ExpenseRow {
    pub date: chrono::NaiveDate,
    pub account: String,
    pub category: String,
    pub subcategory: String,
    pub payee: Option<String>,
    pub narration: String,
    pub tags: Option<String>,
    pub amounts: Vec<Decimal>,
}

#[derive(Debug, Clone)]
pub struct IncomeRow {
    pub date: chrono::NaiveDate,
    pub account: String,
    pub origin: String,
    pub payee: Option<String>,
    pub narration: String,
    pub amounts: Vec<Decimal>,
}

/// Nth 1-based segment of a colon-delimited account path, clamped to the
/// last segment when the path is shorter ("Expenses:Food" still yields a
/// subcategory of "Food").
fn segment(account: &str, n: usize) -> String {
    let parts: Vec<&str> = account.split(':').collect();
    let idx = n.saturating_sub(1).min(parts.len().saturating_sub(1));
    parts[idx].to_string()
}

/// Amounts are stored as absolute values in every tracked currency;
/// sign conventions differ between ledger styles and the store keeps
/// expense and income totals positive.
fn tracked_amounts(
    posting: &Posting,
    prices: &PriceTable,
    currencies: &[String],
) -> Vec<Vec<Decimal>> {
    posting
        .amounts
        .iter()
        .map(|amt| {
            currencies
                .iter()
                .map(|ccy| {
                    prices
                        .convert(posting.date, amt.number.abs(), &amt.currency, ccy)
                })
                .collect()
        })
        .collect()
}

fn joined_tags(tags: &[String]) -> Option<String> {
    if tags.is_empty() {
        return None;
    }
    let mut sorted = tags.to_vec();
    sorted.sort();
    Some(sorted.join(","))
}

pub fn extract_expenses(
    postings: &[Posting],
    prices: &PriceTable,
    currencies: &[String],
) -> Vec<ExpenseRow> {
    let mut rows = Vec::new();
    for p in postings {
        if !p.account.starts_with(EXPENSE_ROOT) {
            continue;
        }
        for amounts in tracked_amounts(p, prices, currencies) {
            rows.push(ExpenseRow {
                date: p.date,
                account: p.account.clone(),
                category: segment(&p.account, 2),
                subcategory: segment(&p.account, 3),
                payee: p.payee.clone(),
                narration: p.narration.clone(),
                tags: joined_tags(&p.tags),
                amounts,
            });
        }
    }
    // Presentation ordering only; stable sort keeps source order within a day.
    rows.sort_by(|a, b| b.date.cmp(&a.date));
    rows
}

pub fn extract_income(
    postings: &[Posting],
    prices: &PriceTable,
    currencies: &[String],
) -> Vec<IncomeRow> {
    let mut rows = Vec::new();
    for p in postings {
        if !p.account.starts_with(INCOME_ROOT) {
            continue;
        }
        for amounts in tracked_amounts(p, prices, currencies) {
            rows.push(IncomeRow {
                date: p.date,
                account: p.account.clone(),
                origin: segment(&p.account, 3),
                payee: p.payee.clone(),
                narration: p.narration.clone(),
                amounts,
            });
        }
    }
    rows.sort_by(|a, b| b.date.cmp(&a.date));
    rows
}
