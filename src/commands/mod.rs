// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod accounts;
pub mod convert;
pub mod expenses;
pub mod income;
pub mod sync;
pub mod watch;

use crate::search::{SearchPagination, SearchSorting, SortOrder};
use clap::ArgMatches;

pub(crate) fn pagination_from(m: &ArgMatches, default_limit: i64) -> SearchPagination {
    let skip = *m.get_one::<i64>("skip").unwrap_or(&0);
    let mut limit = *m.get_one::<i64>("limit").unwrap_or(&0);
    if limit <= 0 {
        limit = default_limit;
    }
    SearchPagination::new(skip, limit)
}

pub(crate) fn sorting_from(m: &ArgMatches) -> SearchSorting {
    SearchSorting {
        sort_by: m.get_one::<String>("sort-by").cloned(),
        sort_order: m
            .get_one::<String>("order")
            .map(|s| SortOrder::parse(s))
            .unwrap_or_default(),
    }
}
