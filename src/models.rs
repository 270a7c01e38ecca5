// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One (currency, signed number) pair on a posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Amount {
    pub number: Decimal,
    pub currency: String,
}

/// A dated movement of an amount into or out of an account, flattened
/// from a ledger entry. Produced fresh on every parse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Posting {
    pub date: NaiveDate,
    pub account: String,
    pub payee: Option<String>,
    pub narration: String,
    pub tags: Vec<String>,
    pub amounts: Vec<Amount>,
}

/// A `price` directive: 1 `base` = `rate` `quote` as of `date`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceEntry {
    pub date: NaiveDate,
    pub base: String,
    pub quote: String,
    pub rate: Decimal,
}

/// Materialized expense transaction. Replaced wholesale on each sync.
/// `amounts` is aligned with the configured tracked currency list.
#[derive(Debug, Clone, Serialize)]
pub struct Expense {
    pub id: i64,
    pub date: NaiveDate,
    pub account: String,
    pub category: String,
    pub subcategory: String,
    pub payee: Option<String>,
    pub narration: String,
    pub tags: Option<String>,
    pub amounts: Vec<(String, Decimal)>,
}

/// Materialized income transaction. Amounts are stored positive.
#[derive(Debug, Clone, Serialize)]
pub struct Income {
    pub id: i64,
    pub date: NaiveDate,
    pub account: String,
    pub origin: String,
    pub payee: Option<String>,
    pub narration: String,
    pub amounts: Vec<(String, Decimal)>,
}

/// Account hierarchy entity, distinct from the colon-delimited account
/// path strings carried on transactions.
#[derive(Debug, Clone, Serialize)]
pub struct Account {
    pub id: i64,
    pub name: String,
    pub r#type: String,
    pub currency: String,
    pub is_active: bool,
    pub parent_id: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub r#type: String,
    pub currency: String,
    pub is_active: bool,
    pub parent_id: Option<i64>,
}

/// Per-side totals used by balances and account histories.
#[derive(Debug, Clone, Serialize)]
pub struct SideTotals {
    pub amounts: Vec<(String, Decimal)>,
    pub count: i64,
}

/// Combined transaction history for one account prefix.
#[derive(Debug, Clone, Serialize)]
pub struct AccountTransactions {
    pub account_name: String,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub expenses: Vec<Expense>,
    pub incomes: Vec<Income>,
    pub expenses_summary: SideTotals,
    pub incomes_summary: SideTotals,
    pub total_transactions: i64,
}

/// Income minus expenses for one account prefix up to a date.
#[derive(Debug, Clone, Serialize)]
pub struct BalanceSummary {
    pub account_name: String,
    pub as_of_date: NaiveDate,
    pub balance: Vec<(String, Decimal)>,
    pub income: SideTotals,
    pub expenses: SideTotals,
    pub transaction_count: i64,
}
