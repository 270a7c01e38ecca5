// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Generic filter -> sort -> paginate composition over a transaction
//! table. The same builders drive both the expenses and income tables;
//! each stage is a no-op when its option is unset.

use chrono::NaiveDate;

pub const DEFAULT_PAGE_LIMIT: i64 = 50;
pub const MAX_PAGE_LIMIT: i64 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn parse(s: &str) -> Self {
        if s.eq_ignore_ascii_case("desc") {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        }
    }

    fn sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Optional predicates. Variant-specific fields (category, subcategory,
/// tag for expenses; origin for income) are silently skipped on the table
/// that has no such column.
#[derive(Debug, Clone, Default)]
pub struct SearchFilters {
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub origin: Option<String>,
    pub tag: Option<String>,
    pub account: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct SearchPagination {
    pub skip: i64,
    pub limit: i64,
}

impl SearchPagination {
    /// Negative skip becomes 0; a limit of zero or less falls back to the
    /// default, anything above the cap is clamped to it.
    pub fn new(skip: i64, limit: i64) -> Self {
        let limit = if limit <= 0 {
            DEFAULT_PAGE_LIMIT
        } else {
            limit.min(MAX_PAGE_LIMIT)
        };
        Self {
            skip: skip.max(0),
            limit,
        }
    }
}

impl Default for SearchPagination {
    fn default() -> Self {
        Self::new(0, DEFAULT_PAGE_LIMIT)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SearchSorting {
    pub sort_by: Option<String>,
    pub sort_order: SortOrder,
}

/// Immutable composition of filters, sorting, and pagination. The `with_*`
/// transforms consume and return a new value; an existing options value is
/// never mutated in place.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    pub filters: SearchFilters,
    pub pagination: SearchPagination,
    pub sorting: SearchSorting,
}

impl SearchOptions {
    pub fn with_filters(mut self, filters: SearchFilters) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_pagination(mut self, pagination: SearchPagination) -> Self {
        self.pagination = pagination;
        self
    }

    pub fn with_sorting(mut self, sorting: SearchSorting) -> Self {
        self.sorting = sorting;
        self
    }
}

/// Per-table knobs for the shared builders. `to_date_inclusive` preserves
/// the variant asymmetry: expense ranges exclude the end date, income
/// ranges include it.
pub struct TableSpec {
    pub table: &'static str,
    pub sortable: &'static [&'static str],
    pub equality: &'static [&'static str],
    pub to_date_inclusive: bool,
}

pub const EXPENSES: TableSpec = TableSpec {
    table: "expenses",
    sortable: &[
        "date",
        "account",
        "category",
        "subcategory",
        "payee",
        "narration",
    ],
    equality: &["category", "subcategory", "tags"],
    to_date_inclusive: false,
};

pub const INCOME: TableSpec = TableSpec {
    table: "income",
    sortable: &["date", "account", "origin", "payee", "narration"],
    equality: &["origin"],
    to_date_inclusive: true,
};

/// WHERE clause shared by the data query and `count`, so the count always
/// reflects exactly the filtered predicate.
pub fn build_where(spec: &TableSpec, f: &SearchFilters) -> (String, Vec<String>) {
    let mut sql = String::from(" WHERE 1=1");
    let mut params: Vec<String> = Vec::new();

    if let Some(d) = f.from_date {
        sql.push_str(" AND date >= ?");
        params.push(d.to_string());
    }
    if let Some(d) = f.to_date {
        if spec.to_date_inclusive {
            sql.push_str(" AND date <= ?");
        } else {
            sql.push_str(" AND date < ?");
        }
        params.push(d.to_string());
    }

    let equalities = [
        ("category", &f.category),
        ("subcategory", &f.subcategory),
        ("origin", &f.origin),
        ("tags", &f.tag),
    ];
    for (col, value) in equalities {
        if !spec.equality.contains(&col) {
            continue;
        }
        if let Some(v) = value {
            sql.push_str(&format!(" AND {}=?", col));
            params.push(v.clone());
        }
    }

    if let Some(account) = &f.account {
        // Raw prefix: "Assets:Cash" also matches "Assets:CashFlow". This is
        // the documented account-and-descendants behavior.
        sql.push_str(" AND account LIKE ?");
        params.push(format!("{}%", account));
    }

    (sql, params)
}

/// An unrecognized sort column is skipped, not an error.
pub fn build_order(spec: &TableSpec, s: &SearchSorting) -> String {
    match &s.sort_by {
        Some(col) if spec.sortable.contains(&col.as_str()) => {
            format!(" ORDER BY {} {}", col, s.sort_order.sql())
        }
        _ => String::new(),
    }
}

pub fn build_paging(p: &SearchPagination) -> String {
    format!(" LIMIT {} OFFSET {}", p.limit, p.skip)
}
