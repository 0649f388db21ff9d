// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store;
use crate::utils::{parse_month, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Consistency problems across every company, as (issue, detail) rows.
pub fn find_issues(conn: &Connection) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();

    for company in store::list_companies(conn)? {
        let wallets: HashMap<String, _> = store::list_wallets(conn, &company.id)?
            .into_iter()
            .map(|w| (w.id.clone(), w))
            .collect();

        // 1) Transactions whose wallet is gone or has another currency
        for t in store::list_transactions(conn, &company.id)? {
            match wallets.get(&t.wallet_id) {
                None => rows.push(vec![
                    "txn_unknown_wallet".into(),
                    format!("{} -> {}", t.id, t.wallet_id),
                ]),
                Some(w) if w.currency != t.currency => rows.push(vec![
                    "txn_currency_mismatch".into(),
                    format!("{} {} in {} wallet {}", t.id, t.currency, w.currency, w.id),
                ]),
                Some(_) => {}
            }
        }

        // 2) Budgets that cannot yield a utilization or have a bad month
        for b in store::list_budgets(conn, &company.id)? {
            if b.limit <= Decimal::ZERO {
                rows.push(vec![
                    "budget_non_positive_limit".into(),
                    format!("{} ({} {})", b.id, b.category, b.month),
                ]);
            }
            if parse_month(&b.month).is_err() {
                rows.push(vec!["budget_bad_month".into(), format!("{} '{}'", b.id, b.month)]);
            }
        }

        // 3) Wallets overdrawn past their credit line
        for w in wallets.values() {
            if w.available() < Decimal::ZERO {
                rows.push(vec![
                    "wallet_overdrawn".into(),
                    format!("{} balance {:.2} credit {:.2}", w.id, w.balance, w.credit_limit),
                ]);
            }
        }
    }
    Ok(rows)
}

pub fn handle(conn: &Connection) -> Result<()> {
    let rows = find_issues(conn)?;
    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
