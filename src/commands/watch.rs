// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::error;

use crate::config::Config;
use crate::sync::SyncEngine;
use crate::watcher::LedgerWatcher;

/// Sync immediately, then keep the database in step with the ledger until
/// the user presses Enter. The watcher covers the ledger's directory, so
/// editors that replace the file on save are picked up too.
pub fn handle(cfg: &Config, db_path: PathBuf, m: &clap::ArgMatches) -> Result<()> {
    let ledger = cfg.require_ledger()?.to_path_buf();
    let watch_dir = ledger
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."));
    let debounce = Duration::from_secs(*m.get_one::<u64>("debounce").unwrap_or(&2));

    let engine = Arc::new(SyncEngine::new(
        db_path,
        ledger,
        cfg.currencies.clone(),
    ));
    engine.sync_all().context("Initial sync failed")?;

    let on_change = {
        let engine = Arc::clone(&engine);
        move || {
            if let Err(e) = engine.sync_all() {
                error!("sync after change failed: {:#}", e);
            }
        }
    };
    let mut watcher = LedgerWatcher::new(watch_dir, on_change).with_debounce(debounce);
    watcher.start()?;

    println!("Watching for ledger changes. Press Enter to stop.");
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;

    watcher.stop();
    Ok(())
}
