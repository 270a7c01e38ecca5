// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod accounts;
pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod extract;
pub mod fx;
pub mod ledger;
pub mod models;
pub mod search;
pub mod store;
pub mod summary;
pub mod sync;
pub mod utils;
pub mod watcher;
