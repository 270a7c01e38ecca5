// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use beanbase::fx::{self, DEFAULT_RATES, PriceTable, RateSource, StaticRates};
use beanbase::models::PriceEntry;
use chrono::NaiveDate;
use rust_decimal::Decimal;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn identity_conversion() {
    let rates = StaticRates::new();
    assert_eq!(
        fx::convert(&rates, Decimal::new(100, 0), "ARS", "ARS"),
        Decimal::new(100, 0)
    );
}

#[test]
fn unknown_pair_passes_through() {
    let rates = StaticRates::new();
    assert_eq!(
        fx::convert(&rates, Decimal::new(100, 0), "ARS", "EUR"),
        Decimal::new(100, 0)
    );
}

#[test]
fn default_rates_apply() {
    let amount = Decimal::new(1000, 0);
    let usd = fx::convert(&*DEFAULT_RATES, amount, "ARS", "USD");
    assert_eq!(usd, Decimal::new(12, 1)); // 1000 * 0.0012
}

#[test]
fn rate_source_is_swappable() {
    struct Doubler;
    impl RateSource for Doubler {
        fn rate(&self, _from: &str, _to: &str) -> Option<Decimal> {
            Some(Decimal::new(2, 0))
        }
    }
    assert_eq!(
        fx::convert(&Doubler, Decimal::new(5, 0), "ARS", "USD"),
        Decimal::new(10, 0)
    );
}

#[test]
fn display_amounts_shapes_each_currency() {
    let shaped = fx::display_amounts(
        &*DEFAULT_RATES,
        "ARS",
        Decimal::new(1000, 0),
        &["ARS".to_string(), "USD".to_string()],
    );
    assert_eq!(shaped[0], ("ARS".to_string(), Decimal::new(1000, 0)));
    assert_eq!(shaped[1], ("USD".to_string(), Decimal::new(12, 1)));
}

fn price_entries() -> Vec<PriceEntry> {
    vec![
        PriceEntry {
            date: d(2024, 1, 2),
            base: "ARS".into(),
            quote: "USD".into(),
            rate: Decimal::new(1, 3), // 0.001
        },
        PriceEntry {
            date: d(2024, 1, 10),
            base: "ARS".into(),
            quote: "USD".into(),
            rate: Decimal::new(2, 3), // 0.002
        },
        PriceEntry {
            date: d(2024, 1, 2),
            base: "EUR".into(),
            quote: "ARS".into(),
            rate: Decimal::new(1000, 0),
        },
    ]
}

#[test]
fn price_table_uses_on_or_before_rate() {
    let table = PriceTable::from_entries(&price_entries(), "ARS");
    // Between the two dated rates, the earlier one applies.
    assert_eq!(
        table.convert(d(2024, 1, 5), Decimal::new(1000, 0), "ARS", "USD"),
        Decimal::new(1000, 3)
    );
    // On the later date, the newer rate applies.
    assert_eq!(
        table.convert(d(2024, 1, 10), Decimal::new(1000, 0), "ARS", "USD"),
        Decimal::new(2000, 3)
    );
}

#[test]
fn price_table_before_first_rate_is_unconverted() {
    let table = PriceTable::from_entries(&price_entries(), "ARS");
    assert_eq!(
        table.convert(d(2023, 12, 1), Decimal::new(100, 0), "ARS", "USD"),
        Decimal::new(100, 0)
    );
}

#[test]
fn price_table_falls_back_to_reciprocal() {
    let table = PriceTable::from_entries(&price_entries(), "ARS");
    // Only EUR->ARS is quoted; ARS->EUR uses 1/rate.
    assert_eq!(
        table.convert(d(2024, 1, 5), Decimal::new(2000, 0), "ARS", "EUR"),
        Decimal::new(2, 0)
    );
}

#[test]
fn convert_command_accepts_currency_lists() {
    let cli = beanbase::cli::build_cli();
    let matches = cli.get_matches_from(["beanbase", "convert", "1000", "ars", "usd,cars"]);
    if let Some(("convert", sub)) = matches.subcommand() {
        beanbase::commands::convert::handle(sub).unwrap();
    } else {
        panic!("no convert subcommand");
    }
}

#[test]
fn price_table_triangulates_through_base() {
    let table = PriceTable::from_entries(&price_entries(), "ARS");
    // EUR -> ARS -> USD.
    let v = table.convert(d(2024, 1, 5), Decimal::new(1, 0), "EUR", "USD");
    assert_eq!(v, Decimal::new(1000, 3)); // 1 EUR = 1000 ARS = 1.000 USD
}
