// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::budgeting::{budget_utilization, derive, derive_all};
use crate::models::{Budget, BudgetStatus};
use crate::store;
use crate::utils::{
    maybe_print_json, new_id, parse_amount, parse_limit, parse_month, pretty_table,
};
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &Connection, company: &str, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(conn, company, sub)?,
        Some(("list", sub)) => list(conn, company, sub)?,
        Some(("show", sub)) => show(conn, company, sub)?,
        Some(("rm", sub)) => {
            let id = sub.get_one::<String>("id").unwrap();
            store::delete_budget(conn, company, id)?;
            println!("Removed budget '{}'", id);
        }
        _ => {}
    }
    Ok(())
}

fn set(conn: &Connection, company: &str, sub: &clap::ArgMatches) -> Result<()> {
    let month = parse_month(sub.get_one::<String>("month").unwrap().trim())?;
    let limit = parse_limit(sub.get_one::<String>("limit").unwrap().trim())?;
    let wallet = store::get_wallet(conn, company, sub.get_one::<String>("wallet").unwrap())?;
    let budget = Budget {
        id: sub
            .get_one::<String>("id")
            .cloned()
            .unwrap_or_else(|| new_id("bgt")),
        company_id: company.to_string(),
        wallet_id: wallet.id,
        department: sub.get_one::<String>("department").unwrap().to_string(),
        category: sub.get_one::<String>("category").unwrap().trim().to_string(),
        subcategory: sub.get_one::<String>("subcategory").unwrap().to_string(),
        month,
        limit,
        spent: Decimal::ZERO,
        forecast: parse_amount(sub.get_one::<String>("forecast").unwrap())?,
        status: BudgetStatus::Pending,
        notes: sub.get_one::<String>("notes").unwrap().to_string(),
    };
    store::upsert_budget(conn, &budget)?;
    println!(
        "Budget {} set for {} / {} = {:.2}",
        budget.id, budget.month, budget.category, budget.limit
    );
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetRow {
    #[serde(flatten)]
    pub budget: Budget,
    pub utilization: crate::budgeting::Utilization,
}

/// Company budgets with spent, status and utilization derived from transactions.
pub fn query_rows(
    conn: &Connection,
    company: &str,
    month: Option<&str>,
) -> Result<Vec<BudgetRow>> {
    let txs = store::list_transactions(conn, company)?;
    let budgets: Vec<Budget> = store::list_budgets(conn, company)?
        .into_iter()
        .filter(|b| month.is_none_or(|m| b.month == m))
        .collect();
    Ok(derive_all(&budgets, &txs)
        .into_iter()
        .map(|b| BudgetRow {
            utilization: budget_utilization(&b),
            budget: b,
        })
        .collect())
}

fn list(conn: &Connection, company: &str, sub: &clap::ArgMatches) -> Result<()> {
    let month = sub.get_one::<String>("month").map(|s| s.as_str());
    let data = query_rows(conn, company, month)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .into_iter()
            .map(|r| {
                vec![
                    r.budget.id,
                    r.budget.month,
                    r.budget.category,
                    format!("{:.2}", r.budget.limit),
                    format!("{:.2}", r.budget.spent),
                    r.utilization.to_string(),
                    r.budget.status.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Month", "Category", "Limit", "Spent", "Used", "Status"],
                rows
            )
        );
    }
    Ok(())
}

fn show(conn: &Connection, company: &str, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap();
    let txs = store::list_transactions(conn, company)?;
    let b = derive(&store::get_budget(conn, company, id)?, &txs);
    let row = BudgetRow {
        utilization: budget_utilization(&b),
        budget: b,
    };
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &row)? {
        let b = &row.budget;
        println!(
            "{} {} / {} (wallet {}): spent {:.2} of {:.2} ({}), forecast {:.2}, {}",
            b.id,
            b.month,
            b.category,
            b.wallet_id,
            b.spent,
            b.limit,
            row.utilization,
            b.forecast,
            b.status
        );
    }
    Ok(())
}
