// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use beanbase::accounts::{self, AccountFilters};
use beanbase::config::Config;
use beanbase::db;
use beanbase::extract::{ExpenseRow, IncomeRow};
use beanbase::models::NewAccount;
use beanbase::search::{SearchPagination, SearchSorting, SortOrder};
use beanbase::store;
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn, &["ARS".to_string()]).unwrap();
    conn
}

fn new_account(name: &str, parent_id: Option<i64>) -> NewAccount {
    NewAccount {
        name: name.to_string(),
        r#type: "asset".to_string(),
        currency: "ARS".to_string(),
        is_active: true,
        parent_id,
    }
}

#[test]
fn create_and_fetch() {
    let conn = setup();
    let created = accounts::create_account(&conn, &new_account("Cash", None)).unwrap();
    let fetched = accounts::get_account(&conn, created.id).unwrap().unwrap();
    assert_eq!(fetched.name, "Cash");
    assert!(fetched.is_active);
    assert_eq!(fetched.parent_id, None);
}

#[test]
fn missing_parent_is_rejected() {
    let conn = setup();
    let err = accounts::create_account(&conn, &new_account("Orphan", Some(999))).unwrap_err();
    assert!(err.to_string().contains("parent account 999 not found"));
}

#[test]
fn reparent_cycle_is_rejected() {
    let conn = setup();
    let root = accounts::create_account(&conn, &new_account("Root", None)).unwrap();
    let mid = accounts::create_account(&conn, &new_account("Mid", Some(root.id))).unwrap();
    let leaf = accounts::create_account(&conn, &new_account("Leaf", Some(mid.id))).unwrap();

    // Root under its own grandchild would close a cycle.
    let err = accounts::set_parent(&conn, root.id, Some(leaf.id)).unwrap_err();
    assert!(err.to_string().contains("descendant of itself"));

    // A legal move still works.
    accounts::set_parent(&conn, leaf.id, Some(root.id)).unwrap();
    let moved = accounts::get_account(&conn, leaf.id).unwrap().unwrap();
    assert_eq!(moved.parent_id, Some(root.id));
}

#[test]
fn self_parent_is_rejected() {
    let conn = setup();
    let a = accounts::create_account(&conn, &new_account("A", None)).unwrap();
    let err = accounts::set_parent(&conn, a.id, Some(a.id)).unwrap_err();
    assert!(err.to_string().contains("descendant of itself"));
}

#[test]
fn children_are_paginated() {
    let conn = setup();
    let root = accounts::create_account(&conn, &new_account("Root", None)).unwrap();
    for i in 1..=5 {
        accounts::create_account(&conn, &new_account(&format!("Child{}", i), Some(root.id)))
            .unwrap();
    }
    let (page, count) =
        accounts::children(&conn, root.id, SearchPagination::new(0, 2)).unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(count, 5);

    let (rest, _) = accounts::children(&conn, root.id, SearchPagination::new(4, 10)).unwrap();
    assert_eq!(rest.len(), 1);
}

#[test]
fn parent_lookup() {
    let conn = setup();
    let root = accounts::create_account(&conn, &new_account("Root", None)).unwrap();
    let child = accounts::create_account(&conn, &new_account("Child", Some(root.id))).unwrap();

    let p = accounts::parent(&conn, child.id).unwrap().unwrap();
    assert_eq!(p.id, root.id);
    assert!(accounts::parent(&conn, root.id).unwrap().is_none());
}

#[test]
fn name_search_is_substring_match() {
    let conn = setup();
    accounts::create_account(&conn, &new_account("Bank Checking", None)).unwrap();
    accounts::create_account(&conn, &new_account("Bank Savings", None)).unwrap();
    accounts::create_account(&conn, &new_account("Wallet", None)).unwrap();

    let filters = AccountFilters {
        name: Some("Bank".to_string()),
        ..Default::default()
    };
    let sorting = SearchSorting {
        sort_by: Some("name".to_string()),
        sort_order: SortOrder::Asc,
    };
    let (rows, count) =
        accounts::search_accounts(&conn, &filters, SearchPagination::default(), &sorting).unwrap();
    assert_eq!(count, 2);
    assert_eq!(rows[0].name, "Bank Checking");
    assert_eq!(rows[1].name, "Bank Savings");
}

#[test]
fn delete_reports_whether_a_row_went_away() {
    let conn = setup();
    let a = accounts::create_account(&conn, &new_account("Gone", None)).unwrap();
    assert!(accounts::delete_account(&conn, a.id).unwrap());
    assert!(!accounts::delete_account(&conn, a.id).unwrap());
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn transaction_history_combines_both_sides() {
    let mut conn = setup();
    let cfg = Config::new(None, vec!["ARS".to_string()]).unwrap();
    let expenses = vec![ExpenseRow {
        date: d(2024, 1, 5),
        account: "Expenses:Food:Groceries".to_string(),
        category: "Food".to_string(),
        subcategory: "Groceries".to_string(),
        payee: None,
        narration: "weekly".to_string(),
        tags: None,
        amounts: vec![Decimal::new(50, 0)],
    }];
    store::replace_expenses(&mut conn, &cfg.currencies, &expenses).unwrap();
    let incomes = vec![IncomeRow {
        date: d(2024, 1, 15),
        account: "Income:Job:Salary".to_string(),
        origin: "Salary".to_string(),
        payee: None,
        narration: "january".to_string(),
        amounts: vec![Decimal::new(1000, 0)],
    }];
    store::replace_income(&mut conn, &cfg.currencies, &incomes).unwrap();

    // The income-side end date is inclusive, so Jan 15 lands inside.
    let history = accounts::account_transactions(
        &conn,
        &cfg,
        "",
        d(2024, 1, 1),
        d(2024, 1, 15),
        SearchPagination::default(),
    )
    .unwrap();
    assert_eq!(history.total_transactions, 2);
    assert_eq!(history.expenses_summary.count, 1);
    assert_eq!(history.incomes_summary.count, 1);
    assert_eq!(history.expenses_summary.amounts[0].1, Decimal::new(50, 0));
    assert_eq!(history.incomes_summary.amounts[0].1, Decimal::new(1000, 0));
}
