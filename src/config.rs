// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};

use crate::search::DEFAULT_PAGE_LIMIT;

pub const ENV_LEDGER: &str = "BEANBASE_LEDGER";
pub const ENV_DB: &str = "BEANBASE_DB";
pub const ENV_CURRENCIES: &str = "BEANBASE_CURRENCIES";
pub const ENV_PAGE_LIMIT: &str = "BEANBASE_PAGE_LIMIT";

/// Externally-supplied inputs, passed down the call chain explicitly.
/// The first tracked currency is the base currency; every posting amount
/// is converted into each tracked currency at ingestion time.
#[derive(Debug, Clone)]
pub struct Config {
    pub ledger_path: Option<PathBuf>,
    pub db_path: Option<PathBuf>,
    pub currencies: Vec<String>,
    pub default_limit: i64,
}

impl Config {
    pub fn new(ledger_path: Option<PathBuf>, currencies: Vec<String>) -> Result<Self> {
        validate_currencies(&currencies)?;
        Ok(Self {
            ledger_path,
            db_path: None,
            currencies,
            default_limit: DEFAULT_PAGE_LIMIT,
        })
    }

    /// Read configuration from the environment. Currencies default to
    /// "ARS,USD" when unset.
    pub fn from_env() -> Result<Self> {
        let ledger_path = std::env::var_os(ENV_LEDGER).map(PathBuf::from);
        let db_path = std::env::var_os(ENV_DB).map(PathBuf::from);
        let currencies = match std::env::var(ENV_CURRENCIES) {
            Ok(v) => parse_currency_list(&v)?,
            Err(_) => vec!["ARS".to_string(), "USD".to_string()],
        };
        let default_limit = match std::env::var(ENV_PAGE_LIMIT) {
            Ok(v) => v
                .parse::<i64>()
                .with_context(|| format!("Invalid {} '{}'", ENV_PAGE_LIMIT, v))?,
            Err(_) => DEFAULT_PAGE_LIMIT,
        };
        let mut cfg = Self::new(ledger_path, currencies)?;
        cfg.db_path = db_path;
        cfg.default_limit = if default_limit > 0 {
            default_limit
        } else {
            DEFAULT_PAGE_LIMIT
        };
        Ok(cfg)
    }

    pub fn base_currency(&self) -> &str {
        &self.currencies[0]
    }

    pub fn require_ledger(&self) -> Result<&Path> {
        self.ledger_path
            .as_deref()
            .with_context(|| format!("No ledger path; pass --ledger or set {}", ENV_LEDGER))
    }
}

pub fn parse_currency_list(s: &str) -> Result<Vec<String>> {
    let list: Vec<String> = s
        .split(',')
        .map(|c| c.trim().to_uppercase())
        .filter(|c| !c.is_empty())
        .collect();
    validate_currencies(&list)?;
    Ok(list)
}

/// Currency codes become `amount_<ccy>` column names, so they must stay
/// plain alphanumeric before they get anywhere near SQL.
fn validate_currencies(currencies: &[String]) -> Result<()> {
    if currencies.is_empty() {
        bail!("Tracked currency list must not be empty");
    }
    for c in currencies {
        if c.is_empty() || !c.chars().all(|ch| ch.is_ascii_alphanumeric()) {
            bail!("Invalid currency code '{}'", c);
        }
    }
    Ok(())
}
