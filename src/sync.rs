// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Sync engine: full-refresh load of the transaction tables from the
//! ledger source. One sync runs at a time; a request arriving mid-flight
//! is coalesced into a rerun once the current pass finishes.

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::extract;
use crate::fx::PriceTable;
use crate::ledger;
use crate::store;

#[derive(Debug, Error)]
pub enum SyncError {
    /// The ledger could not be opened at all. Retried on the next watch
    /// event, not immediately.
    #[error("ledger source unavailable: {0}")]
    Source(String),
    #[error("storage failure: {0}")]
    Storage(String),
}

/// Per-variant outcome of one sync pass. A failure in one variant never
/// hides the other's result.
#[derive(Debug)]
pub struct SyncReport {
    pub expenses: Result<usize, SyncError>,
    pub income: Result<usize, SyncError>,
    pub parse_errors: usize,
}

impl SyncReport {
    pub fn is_ok(&self) -> bool {
        self.expenses.is_ok() && self.income.is_ok()
    }

    pub fn log(&self) {
        match &self.expenses {
            Ok(n) => info!("synced {} expense rows", n),
            Err(e) => error!("expenses sync failed: {}", e),
        }
        match &self.income {
            Ok(n) => info!("synced {} income rows", n),
            Err(e) => error!("income sync failed: {}", e),
        }
        if self.parse_errors > 0 {
            warn!("ledger had {} parse problem(s); synced partial data", self.parse_errors);
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum SyncOutcome {
    /// This call performed the sync (possibly more than one pass if
    /// requests were coalesced while it ran).
    Completed,
    /// Another sync was in flight; it will run once more on our behalf.
    Coalesced,
}

/// One full-refresh pass: parse the ledger once, then replace each table
/// in its own transaction. Expenses first, then income; an extraction or
/// storage failure in one variant does not stop the other.
pub fn sync_once(conn: &mut Connection, ledger_path: &Path, currencies: &[String]) -> SyncReport {
    let file = match ledger::load(ledger_path) {
        Ok(f) => f,
        Err(e) => {
            let msg = e.to_string();
            return SyncReport {
                expenses: Err(SyncError::Source(msg.clone())),
                income: Err(SyncError::Source(msg)),
                parse_errors: 0,
            };
        }
    };
    for err in &file.errors {
        warn!("ledger parse: line {}: {}", err.line, err.message);
    }

    let prices = PriceTable::from_entries(&file.prices, &currencies[0]);

    let expense_rows = extract::extract_expenses(&file.postings, &prices, currencies);
    let expenses = store::replace_expenses(conn, currencies, &expense_rows)
        .map_err(|e| SyncError::Storage(format!("{:#}", e)));

    let income_rows = extract::extract_income(&file.postings, &prices, currencies);
    let income = store::replace_income(conn, currencies, &income_rows)
        .map_err(|e| SyncError::Storage(format!("{:#}", e)));

    SyncReport {
        expenses,
        income,
        parse_errors: file.errors.len(),
    }
}

/// Serializes sync passes across threads. Opens its own connection per
/// pass, so it can be driven from the watcher thread.
pub struct SyncEngine {
    db_path: PathBuf,
    ledger_path: PathBuf,
    currencies: Vec<String>,
    running: Mutex<()>,
    pending: AtomicBool,
}

impl SyncEngine {
    pub fn new(db_path: PathBuf, ledger_path: PathBuf, currencies: Vec<String>) -> Self {
        Self {
            db_path,
            ledger_path,
            currencies,
            running: Mutex::new(()),
            pending: AtomicBool::new(false),
        }
    }

    /// Run a full sync, serialized against other callers. If a sync is
    /// already in flight the request is coalesced: the running pass will
    /// go around once more after it finishes.
    pub fn sync_all(&self) -> Result<SyncOutcome> {
        let guard = match self.running.try_lock() {
            Ok(g) => g,
            Err(_) => {
                self.pending.store(true, Ordering::SeqCst);
                info!("sync already in flight; queued a rerun");
                return Ok(SyncOutcome::Coalesced);
            }
        };

        let mut conn = Connection::open(&self.db_path)
            .with_context(|| format!("Open DB at {}", self.db_path.display()))?;
        self.run_passes(&mut conn);
        drop(guard);

        // A request queued between the last pending check and the lock
        // release has no runner unless it is picked up here.
        while self.pending.load(Ordering::SeqCst) {
            match self.running.try_lock() {
                Ok(guard) => {
                    self.run_passes(&mut conn);
                    drop(guard);
                }
                // Someone else holds the lock; their pass started after the
                // request was queued and covers it.
                Err(_) => break,
            }
        }
        Ok(SyncOutcome::Completed)
    }

    fn run_passes(&self, conn: &mut Connection) {
        loop {
            let report = sync_once(conn, &self.ledger_path, &self.currencies);
            report.log();
            if !self.pending.swap(false, Ordering::SeqCst) {
                break;
            }
            info!("rerunning sync for a request coalesced mid-flight");
        }
    }
}
