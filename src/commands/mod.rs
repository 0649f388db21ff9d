// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod companies;
pub mod wallets;
pub mod transactions;
pub mod budgets;
pub mod suppliers;
pub mod dashboard;
pub mod alerts;
pub mod reports;
pub mod sync;
pub mod doctor;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

/// `--as-of` as a UTC instant at noon, or the current time.
pub(crate) fn as_of(sub: &clap::ArgMatches) -> Result<DateTime<Utc>> {
    match sub.get_one::<String>("as-of") {
        Some(s) => {
            let d = crate::utils::parse_date(s)?;
            let noon = d.and_hms_opt(12, 0, 0).context("Invalid --as-of time")?;
            Ok(noon.and_utc())
        }
        None => Ok(Utc::now()),
    }
}
