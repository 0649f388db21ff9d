// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Dashboard aggregation over one company's transactions and budgets.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::alerts::{anomaly_alerts, budget_alerts};
use crate::budgeting::{derive_all, saturating_sum};
use crate::models::{Alert, Budget, BudgetStatus, Transaction, TransactionStatus, Wallet};

pub const TOP_EXPENSES_LIMIT: usize = 5;
pub const UPCOMING_PAYMENTS_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyAmount {
    pub month: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryAmount {
    pub category: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletSummary {
    pub wallet_id: String,
    pub name: String,
    pub balance: Decimal,
    pub percentage: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub total_balance: Decimal,
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub pending_approvals: usize,
    pub overdue_budgets: usize,
    pub growth_percentage: Decimal,
    pub monthly_expenses: Vec<MonthlyAmount>,
    pub expenses_by_category: Vec<CategoryAmount>,
    pub monthly_income: Vec<MonthlyAmount>,
    pub wallets_summary: Vec<WalletSummary>,
    pub alerts: Vec<Alert>,
    /// First expenses in input order, not ranked by amount.
    pub top_expenses: Vec<Transaction>,
    pub upcoming_payments: Vec<Transaction>,
}

impl DashboardData {
    /// Attaches the company's wallet balances and their share of the total.
    pub fn with_wallets(mut self, wallets: &[Wallet], company_id: &str) -> Self {
        self.wallets_summary = summarize_wallets(wallets, company_id);
        self
    }

    /// Month with the largest expense total; the later month wins a tie.
    pub fn biggest_expense_month(&self) -> Option<&str> {
        self.monthly_expenses
            .iter()
            .reduce(|best, m| if best.amount > m.amount { best } else { m })
            .map(|m| m.month.as_str())
    }
}

/// Builds the dashboard for `company_id`.
///
/// Pure: the only clock is `now`, used to pick the current budget month and
/// to stamp alerts.
pub fn compute_dashboard(
    transactions: &[Transaction],
    budgets: &[Budget],
    company_id: &str,
    now: DateTime<Utc>,
) -> DashboardData {
    let txs: Vec<Transaction> = transactions
        .iter()
        .filter(|t| t.company_id == company_id)
        .cloned()
        .collect();
    let company_budgets: Vec<Budget> = budgets
        .iter()
        .filter(|b| b.company_id == company_id)
        .cloned()
        .collect();
    let budgets = derive_all(&company_budgets, &txs);

    let total_income = saturating_sum(
        txs.iter()
            .filter(|t| t.is_realized_income())
            .map(|t| t.amount),
    );
    let total_expenses = saturating_sum(txs.iter().filter(|t| t.is_expense()).map(|t| t.amount));

    let monthly_expenses = monthly_series(txs.iter().filter(|t| t.is_expense()));
    let monthly_income = monthly_series(txs.iter().filter(|t| t.is_realized_income()));
    let growth_percentage = growth_percentage(&monthly_income);

    let mut alerts = budget_alerts(&budgets, now);
    alerts.extend(anomaly_alerts(&txs, now));

    DashboardData {
        total_balance: total_income.saturating_sub(total_expenses),
        total_income,
        total_expenses,
        pending_approvals: txs
            .iter()
            .filter(|t| t.status == TransactionStatus::Pending)
            .count(),
        overdue_budgets: budgets
            .iter()
            .filter(|b| b.status == BudgetStatus::Exceeded)
            .count(),
        growth_percentage,
        monthly_expenses,
        expenses_by_category: expenses_by_category(&txs),
        monthly_income,
        wallets_summary: Vec::new(),
        alerts,
        top_expenses: txs
            .iter()
            .filter(|t| t.is_expense())
            .take(TOP_EXPENSES_LIMIT)
            .cloned()
            .collect(),
        upcoming_payments: txs
            .iter()
            .filter(|t| t.is_unpaid_invoice())
            .take(UPCOMING_PAYMENTS_LIMIT)
            .cloned()
            .collect(),
    }
}

/// Sums amounts per year-month, ascending by month.
pub fn monthly_series<'a, I>(transactions: I) -> Vec<MonthlyAmount>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut map: BTreeMap<String, Decimal> = BTreeMap::new();
    for t in transactions {
        let sum = map.entry(t.month_key()).or_insert(Decimal::ZERO);
        *sum = sum.saturating_add(t.amount);
    }
    map.into_iter()
        .map(|(month, amount)| MonthlyAmount { month, amount })
        .collect()
}

/// Expense totals per category, largest first; ties keep encounter order.
pub fn expenses_by_category(transactions: &[Transaction]) -> Vec<CategoryAmount> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut items: Vec<CategoryAmount> = Vec::new();
    for t in transactions.iter().filter(|t| t.is_expense()) {
        match index.get(t.category.as_str()) {
            Some(&i) => items[i].amount = items[i].amount.saturating_add(t.amount),
            None => {
                index.insert(t.category.as_str(), items.len());
                items.push(CategoryAmount {
                    category: t.category.clone(),
                    amount: t.amount,
                });
            }
        }
    }
    items.sort_by(|a, b| b.amount.cmp(&a.amount));
    items
}

/// Change between the last two months of income, in percent.
///
/// Zero with fewer than two months, when the earlier month is zero, or when
/// the ratio does not fit in a `Decimal`.
pub fn growth_percentage(monthly_income: &[MonthlyAmount]) -> Decimal {
    let [.., prev, last] = monthly_income else {
        return Decimal::ZERO;
    };
    if prev.amount.is_zero() {
        return Decimal::ZERO;
    }
    last.amount
        .checked_sub(prev.amount)
        .and_then(|d| d.checked_mul(Decimal::ONE_HUNDRED))
        .and_then(|d| d.checked_div(prev.amount))
        .unwrap_or(Decimal::ZERO)
}

pub fn summarize_wallets(wallets: &[Wallet], company_id: &str) -> Vec<WalletSummary> {
    let owned: Vec<&Wallet> = wallets.iter().filter(|w| w.company_id == company_id).collect();
    let total = saturating_sum(owned.iter().map(|w| w.balance));
    owned
        .into_iter()
        .map(|w| WalletSummary {
            wallet_id: w.id.clone(),
            name: w.name.clone(),
            balance: w.balance,
            percentage: w
                .balance
                .checked_mul(Decimal::ONE_HUNDRED)
                .and_then(|p| p.checked_div(total))
                .unwrap_or(Decimal::ZERO),
        })
        .collect()
}
