// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::{api_url, set_api_url};
use crate::models::{Company, CompanyPlan, CompanyStatus};
use crate::remote::{DataSource, RestClient, Snapshot, SnapshotCache};
use crate::store;
use anyhow::Result;
use rusqlite::Connection;
use tracing::{info, warn};

pub fn handle(conn: &mut Connection, company: Option<&str>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("pull", sub)) => {
            let company = crate::config::resolve_company(conn, company)?;
            let url = match sub.get_one::<String>("url") {
                Some(u) => u.clone(),
                None => api_url(conn)?,
            };
            let client = RestClient::new(&url)?;
            let base = client.base_url().to_string();
            let n = pull(conn, &company, client)?;
            println!(
                "Pulled {} wallets, {} transactions, {} budgets for {} from {}",
                n.0, n.1, n.2, company, base
            );
        }
        Some(("set-url", sub)) => {
            let url = sub.get_one::<String>("url").unwrap();
            set_api_url(conn, url)?;
            println!("REST backend set to {}", url);
        }
        _ => {}
    }
    Ok(())
}

/// Copies one company's wallets, transactions and budgets from `source` into SQLite.
///
/// Remote wallet balances are taken as-is; remote budget `spent` values are dropped.
pub fn pull<S: DataSource>(
    conn: &mut Connection,
    company: &str,
    source: S,
) -> Result<(usize, usize, usize)> {
    let mut cache = SnapshotCache::new(source);
    let snap: &Snapshot = cache.refresh(company)?;

    let db_tx = conn.transaction()?;
    if !store::company_exists(&db_tx, company)? {
        warn!(company, "company missing locally; creating placeholder");
        store::upsert_company(
            &db_tx,
            &Company {
                id: company.to_string(),
                name: company.to_string(),
                industry: String::new(),
                status: CompanyStatus::Active,
                plan: CompanyPlan::Starter,
                created_at: String::new(),
            },
        )?;
    }
    for w in &snap.wallets {
        store::upsert_wallet(&db_tx, w)?;
    }
    for t in &snap.transactions {
        store::upsert_transaction(&db_tx, t)?;
    }
    for b in &snap.budgets {
        store::import_budget(&db_tx, b)?;
    }
    db_tx.commit()?;
    info!(
        company,
        fetched_at = %snap.fetched_at,
        wallets = snap.wallets.len(),
        transactions = snap.transactions.len(),
        budgets = snap.budgets.len(),
        "sync complete"
    );
    Ok((snap.wallets.len(), snap.transactions.len(), snap.budgets.len()))
}
