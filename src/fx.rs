// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Currency conversion. Two concerns live here: the date-aware
//! [`PriceTable`] built from ledger price directives (used while
//! extracting rows), and the swappable [`RateSource`] used to shape
//! responses into display currencies. Unknown pairs never error; the
//! amount comes back unconverted.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};

use crate::models::PriceEntry;

/// A source of display conversion rates. Implementations can be a static
/// table or a live feed; callers only see the trait.
pub trait RateSource {
    fn rate(&self, from: &str, to: &str) -> Option<Decimal>;
}

/// Fixed rate table keyed by ordered currency pair.
#[derive(Debug, Clone, Default)]
pub struct StaticRates {
    rates: HashMap<(String, String), Decimal>,
}

impl StaticRates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rate(mut self, from: &str, to: &str, rate: Decimal) -> Self {
        self.rates
            .insert((from.to_string(), to.to_string()), rate);
        self
    }
}

impl RateSource for StaticRates {
    fn rate(&self, from: &str, to: &str) -> Option<Decimal> {
        self.rates
            .get(&(from.to_string(), to.to_string()))
            .copied()
    }
}

/// Placeholder display rates, pending a live source. cARS is ARS adjusted
/// for inflation.
pub static DEFAULT_RATES: Lazy<StaticRates> = Lazy::new(|| {
    StaticRates::new()
        .with_rate("ARS", "USD", Decimal::new(12, 4))
        .with_rate("USD", "ARS", Decimal::new(850, 0))
        .with_rate("ARS", "CARS", Decimal::new(120, 2))
});

/// Identity when `from == to`; unknown pair returns the amount unchanged.
pub fn convert(rates: &dyn RateSource, amount: Decimal, from: &str, to: &str) -> Decimal {
    if from == to {
        return amount;
    }
    match rates.rate(from, to) {
        Some(r) => amount * r,
        None => amount,
    }
}

/// Shape one base-currency amount into a list of requested display
/// currencies.
pub fn display_amounts(
    rates: &dyn RateSource,
    base: &str,
    amount: Decimal,
    currencies: &[String],
) -> Vec<(String, Decimal)> {
    currencies
        .iter()
        .map(|ccy| (ccy.clone(), convert(rates, amount, base, ccy)))
        .collect()
}

/// Dated rates built from ledger `price` directives. Lookup uses the
/// closest rate on or before the requested date; a direct pair is tried
/// first, then the reciprocal, then triangulation through the base
/// currency.
#[derive(Debug, Clone)]
pub struct PriceTable {
    base: String,
    rates: HashMap<(String, String), BTreeMap<NaiveDate, Decimal>>,
}

impl PriceTable {
    pub fn from_entries(entries: &[PriceEntry], base: &str) -> Self {
        let mut rates: HashMap<(String, String), BTreeMap<NaiveDate, Decimal>> = HashMap::new();
        for e in entries {
            rates
                .entry((e.base.clone(), e.quote.clone()))
                .or_default()
                .insert(e.date, e.rate);
        }
        Self {
            base: base.to_string(),
            rates,
        }
    }

    pub fn empty(base: &str) -> Self {
        Self {
            base: base.to_string(),
            rates: HashMap::new(),
        }
    }

    fn find_rate(&self, date: NaiveDate, base: &str, quote: &str) -> Option<Decimal> {
        self.rates
            .get(&(base.to_string(), quote.to_string()))?
            .range(..=date)
            .next_back()
            .map(|(_, r)| *r)
    }

    fn direct_or_reciprocal(
        &self,
        date: NaiveDate,
        amount: Decimal,
        from: &str,
        to: &str,
    ) -> Option<Decimal> {
        if from == to {
            return Some(amount);
        }
        if let Some(r) = self.find_rate(date, from, to) {
            return Some(amount * r);
        }
        if let Some(r) = self.find_rate(date, to, from) {
            if !r.is_zero() {
                return Some(amount / r);
            }
        }
        None
    }

    /// Convert `amount` at `date`. Unknown pairs come back unconverted.
    pub fn convert(&self, date: NaiveDate, amount: Decimal, from: &str, to: &str) -> Decimal {
        if from == to {
            return amount;
        }
        if let Some(v) = self.direct_or_reciprocal(date, amount, from, to) {
            return v;
        }
        // Hub triangulation through the base currency.
        if from != self.base && to != self.base {
            if let Some(via) = self.direct_or_reciprocal(date, amount, from, &self.base) {
                if let Some(v) = self.direct_or_reciprocal(date, via, &self.base, to) {
                    return v;
                }
            }
        }
        amount
    }
}
