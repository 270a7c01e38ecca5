// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use beanbase::db;
use beanbase::search::SearchOptions;
use beanbase::store;
use beanbase::sync::{SyncEngine, SyncOutcome, sync_once};
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::io::Write;

fn currencies() -> Vec<String> {
    vec!["ARS".to_string(), "USD".to_string()]
}

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn, &currencies()).unwrap();
    conn
}

const LEDGER: &str = r#"
2024-01-02 price ARS 0.0012 USD

2024-01-05 * "SuperMart" "Groceries" #food
  Expenses:Food:Groceries  -50.00 ARS
  Assets:Cash  50.00 ARS

2024-01-15 * "Acme" "Salary"
  Income:Job:Salary  1000.00 ARS
  Assets:Bank:Checking  -1000.00 ARS
"#;

fn write_ledger(dir: &tempfile::TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("main.bean");
    let mut f = std::fs::File::create(&path).unwrap();
    f.write_all(contents.as_bytes()).unwrap();
    path
}

#[test]
fn sync_populates_both_tables() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_ledger(&dir, LEDGER);
    let mut conn = setup();

    let report = sync_once(&mut conn, &path, &currencies());
    assert!(report.is_ok());
    assert_eq!(*report.expenses.as_ref().unwrap(), 1);
    assert_eq!(*report.income.as_ref().unwrap(), 1);
    assert_eq!(report.parse_errors, 0);

    let (expenses, _) =
        store::search_expenses(&conn, &currencies(), &SearchOptions::default()).unwrap();
    assert_eq!(expenses.len(), 1);
    let e = &expenses[0];
    assert_eq!(e.category, "Food");
    assert_eq!(e.subcategory, "Groceries");
    assert_eq!(e.tags.as_deref(), Some("food"));
    // Stored absolute, converted at the posting-date rate.
    assert_eq!(e.amounts[0].1, Decimal::new(5000, 2));
    assert_eq!(e.amounts[1].1, Decimal::new(50, 0) * Decimal::new(12, 4));

    let (incomes, _) =
        store::search_income(&conn, &currencies(), &SearchOptions::default()).unwrap();
    assert_eq!(incomes.len(), 1);
    assert_eq!(incomes[0].origin, "Salary");
}

#[test]
fn resync_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_ledger(&dir, LEDGER);
    let mut conn = setup();

    sync_once(&mut conn, &path, &currencies());
    sync_once(&mut conn, &path, &currencies());

    let (expenses, count) =
        store::search_expenses(&conn, &currencies(), &SearchOptions::default()).unwrap();
    assert_eq!(count, 1);
    assert_eq!(expenses.len(), 1);
}

#[test]
fn resync_replaces_stale_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_ledger(&dir, LEDGER);
    let mut conn = setup();
    sync_once(&mut conn, &path, &currencies());

    let edited = r#"
2024-02-01 * "OtherMart" "New groceries"
  Expenses:Food:Groceries  -75.00 ARS
  Assets:Cash  75.00 ARS
"#;
    write_ledger(&dir, edited);
    let report = sync_once(&mut conn, &path, &currencies());
    assert!(report.is_ok());

    let (expenses, count) =
        store::search_expenses(&conn, &currencies(), &SearchOptions::default()).unwrap();
    assert_eq!(count, 1);
    assert_eq!(expenses[0].narration, "New groceries");
    let (_, income_count) =
        store::search_income(&conn, &currencies(), &SearchOptions::default()).unwrap();
    assert_eq!(income_count, 0);
}

#[test]
fn parse_problems_do_not_abort_the_sync() {
    let dir = tempfile::tempdir().unwrap();
    let noisy = format!("{}\n2024-13-40 * \"broken header\"\n", LEDGER);
    let path = write_ledger(&dir, &noisy);
    let mut conn = setup();

    let report = sync_once(&mut conn, &path, &currencies());
    assert!(report.is_ok());
    assert_eq!(report.parse_errors, 1);
    let (_, count) =
        store::search_expenses(&conn, &currencies(), &SearchOptions::default()).unwrap();
    assert_eq!(count, 1);
}

#[test]
fn missing_ledger_reports_source_error_per_variant() {
    let mut conn = setup();
    let report = sync_once(
        &mut conn,
        std::path::Path::new("/nonexistent/ledger.bean"),
        &currencies(),
    );
    assert!(!report.is_ok());
    assert!(report.expenses.is_err());
    assert!(report.income.is_err());
}

#[test]
fn queued_request_is_never_lost() {
    let dir = tempfile::tempdir().unwrap();
    let ledger_path = write_ledger(&dir, LEDGER);
    let db_path = dir.path().join("test.sqlite");
    db::open_or_init(&db_path, &currencies()).unwrap();
    let engine = std::sync::Arc::new(SyncEngine::new(
        db_path.clone(),
        ledger_path,
        currencies(),
    ));
    engine.sync_all().unwrap();

    // Race a concurrent caller against an edit-then-sync. Whatever the
    // interleaving, a request made after the edit must be served by a
    // pass that reads the edited file before both callers return.
    for rev in 0..10 {
        let other = {
            let engine = std::sync::Arc::clone(&engine);
            std::thread::spawn(move || {
                engine.sync_all().unwrap();
            })
        };
        let edited = format!(
            "2024-03-01 * \"Shop\" \"rev {}\"\n  Expenses:Misc:Other  -1.00 ARS\n  Assets:Cash  1.00 ARS\n",
            rev
        );
        write_ledger(&dir, &edited);
        engine.sync_all().unwrap();
        other.join().unwrap();

        let conn = Connection::open(&db_path).unwrap();
        let (rows, _) =
            store::search_expenses(&conn, &currencies(), &SearchOptions::default()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].narration, format!("rev {}", rev));
    }
}

#[test]
fn engine_completes_against_file_database() {
    let dir = tempfile::tempdir().unwrap();
    let ledger_path = write_ledger(&dir, LEDGER);
    let db_path = dir.path().join("test.sqlite");
    db::open_or_init(&db_path, &currencies()).unwrap();

    let engine = SyncEngine::new(db_path.clone(), ledger_path, currencies());
    let outcome = engine.sync_all().unwrap();
    assert_eq!(outcome, SyncOutcome::Completed);

    let conn = Connection::open(&db_path).unwrap();
    let (_, count) =
        store::search_expenses(&conn, &currencies(), &SearchOptions::default()).unwrap();
    assert_eq!(count, 1);
}
