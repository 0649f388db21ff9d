// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::dashboard::{compute_dashboard, DashboardData};
use crate::remote::{Snapshot, SnapshotCache, SqliteSource};
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use tracing::debug;

/// Loads the company's data and aggregates it as of `now`.
pub fn load(
    conn: &Connection,
    company: &str,
    now: DateTime<Utc>,
) -> Result<(DashboardData, Snapshot)> {
    let mut cache = SnapshotCache::new(SqliteSource::new(conn));
    let snap = cache.load(company)?.clone();
    let data = compute_dashboard(&snap.transactions, &snap.budgets, company, now)
        .with_wallets(&snap.wallets, company);
    debug!(
        company,
        alerts = data.alerts.len(),
        months = data.monthly_expenses.len(),
        "dashboard computed"
    );
    Ok((data, snap))
}

pub fn handle(conn: &Connection, company: &str, sub: &clap::ArgMatches) -> Result<()> {
    let now = crate::commands::as_of(sub)?;
    let (data, _) = load(conn, company, now)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }

    println!(
        "{}",
        pretty_table(
            &["Balance", "Income", "Expenses", "Growth", "Pending", "Over budget"],
            vec![vec![
                format!("{:.2}", data.total_balance),
                format!("{:.2}", data.total_income),
                format!("{:.2}", data.total_expenses),
                format!("{:.1}%", data.growth_percentage),
                data.pending_approvals.to_string(),
                data.overdue_budgets.to_string(),
            ]],
        )
    );

    let mut months: Vec<String> = data
        .monthly_income
        .iter()
        .chain(data.monthly_expenses.iter())
        .map(|m| m.month.clone())
        .collect();
    months.sort();
    months.dedup();
    let amount_in = |series: &[crate::dashboard::MonthlyAmount], month: &str| {
        series
            .iter()
            .find(|m| m.month == month)
            .map(|m| format!("{:.2}", m.amount))
            .unwrap_or_else(|| "0.00".into())
    };
    let rows = months
        .iter()
        .map(|m| {
            vec![
                m.clone(),
                amount_in(&data.monthly_income, m),
                amount_in(&data.monthly_expenses, m),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Month", "Income", "Expenses"], rows));

    let rows = data
        .expenses_by_category
        .iter()
        .map(|c| vec![c.category.clone(), format!("{:.2}", c.amount)])
        .collect();
    println!("{}", pretty_table(&["Category", "Spent"], rows));

    if !data.wallets_summary.is_empty() {
        let rows = data
            .wallets_summary
            .iter()
            .map(|w| {
                vec![
                    w.name.clone(),
                    format!("{:.2}", w.balance),
                    format!("{:.1}%", w.percentage),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Wallet", "Balance", "Share"], rows));
    }

    if let Some(month) = data.biggest_expense_month() {
        println!("Biggest expense month: {}", month);
    }
    if !data.alerts.is_empty() {
        println!("{} alert(s); run `alerts` for details", data.alerts.len());
    }
    Ok(())
}
