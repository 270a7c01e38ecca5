// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use beanbase::ledger;
use rust_decimal::Decimal;

const FIXTURE: &str = r#"
; monthly ledger
option "operating_currency" "ARS"

2024-01-02 price ARS 0.0012 USD

2024-01-05 * "SuperMart" "Weekly groceries" #food #weekly
  Expenses:Food:Groceries  50.00 ARS
  Assets:Cash  -50.00 ARS

2024-01-10 ! "Pending taxi"
  Expenses:Transport:Taxi  1,200.00 ARS
  Assets:Cash

2024-01-15 * "Acme" "Salary"
  Income:Job:Salary  -1000.00 USD
  Assets:Bank:Checking  1000.00 USD
"#;

#[test]
fn parses_postings_with_header_metadata() {
    let file = ledger::parse(FIXTURE);
    assert!(file.errors.is_empty(), "unexpected errors: {:?}", file.errors);

    let groceries = file
        .postings
        .iter()
        .find(|p| p.account == "Expenses:Food:Groceries")
        .unwrap();
    assert_eq!(groceries.payee.as_deref(), Some("SuperMart"));
    assert_eq!(groceries.narration, "Weekly groceries");
    assert_eq!(groceries.tags, vec!["food", "weekly"]);
    assert_eq!(groceries.amounts.len(), 1);
    assert_eq!(groceries.amounts[0].number, Decimal::new(5000, 2));
    assert_eq!(groceries.amounts[0].currency, "ARS");
}

#[test]
fn single_quoted_string_is_narration_only() {
    let file = ledger::parse(FIXTURE);
    let taxi = file
        .postings
        .iter()
        .find(|p| p.account == "Expenses:Transport:Taxi")
        .unwrap();
    assert_eq!(taxi.payee, None);
    assert_eq!(taxi.narration, "Pending taxi");
    // Thousands separator stripped.
    assert_eq!(taxi.amounts[0].number, Decimal::new(120000, 2));
}

#[test]
fn amount_elided_postings_are_skipped() {
    let file = ledger::parse(FIXTURE);
    // "Assets:Cash" under the taxi entry has no amount and produces no posting.
    let cash_postings = file
        .postings
        .iter()
        .filter(|p| p.account == "Assets:Cash")
        .count();
    assert_eq!(cash_postings, 1);
}

#[test]
fn price_directives_are_collected() {
    let file = ledger::parse(FIXTURE);
    assert_eq!(file.prices.len(), 1);
    let price = &file.prices[0];
    assert_eq!(price.base, "ARS");
    assert_eq!(price.quote, "USD");
    assert_eq!(price.rate, Decimal::new(12, 4));
}

#[test]
fn bad_entries_are_collected_not_fatal() {
    let text = r#"
  Orphan:Posting  5.00 ARS

2024-01-05 * "Ok" "Fine"
  Expenses:Food:Snacks  10.00 ARS

2024-99-99 * "Bad date"
"#;
    let file = ledger::parse(text);
    assert_eq!(file.postings.len(), 1);
    assert_eq!(file.errors.len(), 2);
    assert!(file.errors[0].message.contains("outside of a transaction"));
}

#[test]
fn missing_file_is_source_unavailable() {
    let err = ledger::load(std::path::Path::new("/nonexistent/ledger.bean")).unwrap_err();
    assert!(err.to_string().contains("cannot open ledger"));
}

#[test]
fn comments_are_stripped() {
    let text = "2024-01-05 * \"X\" \"Y\" ; trailing comment\n  Expenses:Misc:Other  1.00 ARS ; note\n";
    let file = ledger::parse(text);
    assert_eq!(file.postings.len(), 1);
    assert_eq!(file.postings[0].narration, "Y");
}
