// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.alphavelocity", "Beanbase", "beanbase"));

pub fn default_db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("beanbase.sqlite"))
}

pub fn open_or_init(path: &Path, currencies: &[String]) -> Result<Connection> {
    let conn =
        Connection::open(path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn, currencies)?;
    Ok(conn)
}

pub fn amount_column(currency: &str) -> String {
    format!("amount_{}", currency.to_lowercase())
}

/// Transaction tables carry one TEXT decimal column per tracked currency,
/// generated from the configured list at init time.
pub fn init_schema(conn: &Connection, currencies: &[String]) -> Result<()> {
    let amount_cols = currencies
        .iter()
        .map(|c| format!(",\n        {} TEXT NOT NULL DEFAULT '0'", amount_column(c)))
        .collect::<String>();

    conn.execute_batch(&format!(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS expenses(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date TEXT NOT NULL,
        account TEXT NOT NULL,
        category TEXT NOT NULL,
        subcategory TEXT NOT NULL,
        payee TEXT,
        narration TEXT NOT NULL,
        tags TEXT{amount_cols}
    );
    CREATE INDEX IF NOT EXISTS idx_expenses_date ON expenses(date);
    CREATE INDEX IF NOT EXISTS idx_expenses_account ON expenses(account);
    CREATE INDEX IF NOT EXISTS idx_expenses_category ON expenses(category);
    CREATE INDEX IF NOT EXISTS idx_expenses_subcategory ON expenses(subcategory);
    CREATE INDEX IF NOT EXISTS idx_expenses_tags ON expenses(tags);

    CREATE TABLE IF NOT EXISTS income(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date TEXT NOT NULL,
        account TEXT NOT NULL,
        origin TEXT NOT NULL,
        payee TEXT,
        narration TEXT NOT NULL{amount_cols}
    );
    CREATE INDEX IF NOT EXISTS idx_income_date ON income(date);
    CREATE INDEX IF NOT EXISTS idx_income_account ON income(account);
    CREATE INDEX IF NOT EXISTS idx_income_origin ON income(origin);

    CREATE TABLE IF NOT EXISTS accounts(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        type TEXT NOT NULL,
        currency TEXT NOT NULL,
        is_active INTEGER NOT NULL DEFAULT 1,
        parent_id INTEGER REFERENCES accounts(id),
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    CREATE INDEX IF NOT EXISTS idx_accounts_name ON accounts(name);
    CREATE INDEX IF NOT EXISTS idx_accounts_parent ON accounts(parent_id);
    "#,
    ))?;
    Ok(())
}
