// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Report rendering. Everything returns a `String`; callers decide where it goes.

use anyhow::Result;
use chrono::NaiveDate;
use csv::{QuoteStyle, WriterBuilder};
use std::fmt::Write as _;

use crate::budgeting::budget_utilization;
use crate::dashboard::DashboardData;
use crate::models::{Budget, BudgetStatus, Transaction, TransactionStatus};

const RULE: &str =
    "================================================================================";
const LATEST_TRANSACTIONS: usize = 10;

fn quoted_csv(headers: &[&str], rows: Vec<Vec<String>>) -> Result<String> {
    let mut wtr = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(Vec::new());
    wtr.write_record(headers)?;
    for row in rows {
        wtr.write_record(&row)?;
    }
    let bytes = wtr.into_inner().map_err(|e| anyhow::anyhow!("{}", e.error()))?;
    Ok(String::from_utf8(bytes)?)
}

pub fn transactions_csv(transactions: &[Transaction]) -> Result<String> {
    let rows = transactions
        .iter()
        .map(|t| {
            vec![
                t.date.to_string(),
                t.description.clone(),
                t.r#type.to_string(),
                t.status.to_string(),
                t.amount.to_string(),
                t.category.clone(),
                t.invoice_number.clone().unwrap_or_default(),
                t.due_date.map(|d| d.to_string()).unwrap_or_default(),
            ]
        })
        .collect();
    quoted_csv(
        &[
            "Date",
            "Description",
            "Type",
            "Status",
            "Amount",
            "Category",
            "Invoice",
            "DueDate",
        ],
        rows,
    )
}

/// Budgets must already be derived; spent and status are written as given.
pub fn budgets_csv(budgets: &[Budget]) -> Result<String> {
    let rows = budgets
        .iter()
        .map(|b| {
            vec![
                b.department.clone(),
                b.category.clone(),
                b.month.clone(),
                b.limit.to_string(),
                b.spent.to_string(),
                b.forecast.to_string(),
                b.status.to_string(),
            ]
        })
        .collect();
    quoted_csv(
        &[
            "Department",
            "Category",
            "Month",
            "Limit",
            "Spent",
            "Forecast",
            "Status",
        ],
        rows,
    )
}

fn count_tx(transactions: &[Transaction], status: TransactionStatus) -> usize {
    transactions.iter().filter(|t| t.status == status).count()
}

fn count_budgets(budgets: &[Budget], status: BudgetStatus) -> usize {
    budgets.iter().filter(|b| b.status == status).count()
}

fn section(out: &mut String, title: &str) {
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "{:^80}", title);
    let _ = writeln!(out, "{RULE}");
}

/// Plain-text financial summary.
pub fn financial_summary(
    data: &DashboardData,
    transactions: &[Transaction],
    budgets: &[Budget],
    generated_on: NaiveDate,
) -> String {
    let mut out = String::new();
    section(&mut out, "FINANCIAL REPORT");
    let _ = writeln!(out, "Report date: {}", generated_on);
    let _ = writeln!(out);

    section(&mut out, "FINANCIAL SUMMARY");
    let _ = writeln!(out, "{:<32}{:.2}", "Total balance:", data.total_balance);
    let _ = writeln!(out, "{:<32}{:.2}", "Total income:", data.total_income);
    let _ = writeln!(out, "{:<32}{:.2}", "Total expenses:", data.total_expenses);
    let _ = writeln!(
        out,
        "{:<32}{:.2}",
        "Profit/Loss:",
        data.total_income.saturating_sub(data.total_expenses)
    );
    let _ = writeln!(out, "{:<32}{:.2}%", "Income growth:", data.growth_percentage);
    let _ = writeln!(out);

    section(&mut out, "TRANSACTIONS");
    let _ = writeln!(out, "{:<32}{}", "Total transactions:", transactions.len());
    let _ = writeln!(
        out,
        "{:<32}{}",
        "Pending:",
        count_tx(transactions, TransactionStatus::Pending)
    );
    let _ = writeln!(
        out,
        "{:<32}{}",
        "Confirmed:",
        count_tx(transactions, TransactionStatus::Confirmed)
    );
    let _ = writeln!(
        out,
        "{:<32}{}",
        "Paid:",
        count_tx(transactions, TransactionStatus::Paid)
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "Latest transactions:");
    for (idx, t) in transactions.iter().take(LATEST_TRANSACTIONS).enumerate() {
        let _ = writeln!(out, "{}. {} - {}", idx + 1, t.date, t.description);
        let _ = writeln!(
            out,
            "   Amount: {:.2} {} | Type: {} | Status: {}",
            t.amount, t.currency, t.r#type, t.status
        );
    }
    let _ = writeln!(out);

    section(&mut out, "BUDGETS");
    let _ = writeln!(out, "{:<32}{}", "Budgets:", budgets.len());
    let _ = writeln!(
        out,
        "{:<32}{}",
        "Healthy:",
        count_budgets(budgets, BudgetStatus::Healthy)
    );
    let _ = writeln!(
        out,
        "{:<32}{}",
        "Warning:",
        count_budgets(budgets, BudgetStatus::Warning)
    );
    let _ = writeln!(
        out,
        "{:<32}{}",
        "Exceeded:",
        count_budgets(budgets, BudgetStatus::Exceeded)
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "Budget spending:");
    for (idx, b) in budgets.iter().enumerate() {
        let _ = writeln!(out, "{}. {} - {} ({})", idx + 1, b.department, b.category, b.month);
        let _ = writeln!(
            out,
            "   Limit: {:.2} | Spent: {:.2} ({}) | Forecast: {:.2}",
            b.limit,
            b.spent,
            budget_utilization(b),
            b.forecast
        );
    }
    let _ = writeln!(out);

    if !data.alerts.is_empty() {
        section(&mut out, "ALERTS");
        for a in &data.alerts {
            let _ = writeln!(out, "[{}] {}: {}", a.severity, a.title, a.message);
        }
        let _ = writeln!(out);
    }

    section(&mut out, "END OF REPORT");
    out
}

pub fn dashboard_json(data: &DashboardData) -> Result<String> {
    Ok(serde_json::to_string_pretty(data)?)
}
