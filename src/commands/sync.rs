// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};
use rusqlite::Connection;

use crate::config::Config;
use crate::sync::sync_once;

pub fn handle(conn: &mut Connection, cfg: &Config) -> Result<()> {
    let ledger = cfg.require_ledger()?;
    let report = sync_once(conn, ledger, &cfg.currencies);
    report.log();
    if !report.is_ok() {
        bail!("sync finished with errors");
    }
    Ok(())
}
