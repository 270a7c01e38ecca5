// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};

use crate::fx::{self, DEFAULT_RATES};
use crate::utils::{fmt_money, parse_decimal};

pub fn handle(m: &clap::ArgMatches) -> Result<()> {
    let amount = parse_decimal(m.get_one::<String>("amount").unwrap())?;
    let from = m.get_one::<String>("from").unwrap().to_uppercase();
    let targets: Vec<String> = m
        .get_one::<String>("to")
        .unwrap()
        .split(',')
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect();
    if targets.is_empty() {
        bail!("No target currency given");
    }

    for (ccy, value) in fx::display_amounts(&*DEFAULT_RATES, &from, amount, &targets) {
        println!("{} = {}", fmt_money(&amount, &from), fmt_money(&value, &ccy));
    }
    Ok(())
}
