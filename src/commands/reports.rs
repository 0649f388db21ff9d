// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::budgeting::derive_all;
use crate::report;
use crate::store;
use anyhow::{Context, Result};
use rusqlite::Connection;
use tracing::info;

pub fn handle(conn: &Connection, company: &str, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => {
            let txs = store::list_transactions(conn, company)?;
            write_out(sub, &report::transactions_csv(&txs)?)?;
        }
        Some(("budgets", sub)) => {
            let txs = store::list_transactions(conn, company)?;
            let budgets = derive_all(&store::list_budgets(conn, company)?, &txs);
            write_out(sub, &report::budgets_csv(&budgets)?)?;
        }
        Some(("summary", sub)) => {
            let now = crate::commands::as_of(sub)?;
            let (data, snap) = crate::commands::dashboard::load(conn, company, now)?;
            let budgets = derive_all(&snap.budgets, &snap.transactions);
            let text =
                report::financial_summary(&data, &snap.transactions, &budgets, now.date_naive());
            write_out(sub, &text)?;
        }
        Some(("json", sub)) => {
            let now = crate::commands::as_of(sub)?;
            let (data, _) = crate::commands::dashboard::load(conn, company, now)?;
            write_out(sub, &report::dashboard_json(&data)?)?;
        }
        _ => {}
    }
    Ok(())
}

fn write_out(sub: &clap::ArgMatches, content: &str) -> Result<()> {
    let out = sub.get_one::<String>("out").unwrap();
    std::fs::write(out, content).with_context(|| format!("Failed to write {}", out))?;
    info!(path = %out, bytes = content.len(), "report written");
    println!("Report written to {}", out);
    Ok(())
}
