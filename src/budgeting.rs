// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Budget projections derived from transactions.
//!
//! A budget's `spent` and `status` are never read from storage: both are
//! recomputed here every time a budget is shown, reported or aggregated.

use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

use crate::models::{Budget, BudgetStatus, Transaction};
use crate::utils::canonical_month;

/// Share of the limit above which a budget is flagged as near its limit.
pub fn warning_ratio() -> Decimal {
    Decimal::new(8, 1)
}

/// Budget utilization as a percentage of its limit.
///
/// `Undefined` stands in for a zero limit, where spent ÷ limit has no value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "percent", rename_all = "lowercase")]
pub enum Utilization {
    Defined(Decimal),
    Undefined,
}

impl Utilization {
    pub fn percent(&self) -> Option<Decimal> {
        match self {
            Utilization::Defined(p) => Some(*p),
            Utilization::Undefined => None,
        }
    }
}

impl fmt::Display for Utilization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Utilization::Defined(p) => write!(f, "{:.1}%", p),
            Utilization::Undefined => f.write_str("n/a"),
        }
    }
}

/// `Undefined` also covers a percentage too large for a `Decimal`.
pub fn utilization(spent: Decimal, limit: Decimal) -> Utilization {
    if limit.is_zero() {
        return Utilization::Undefined;
    }
    match spent
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|p| p.checked_div(limit))
    {
        Some(p) => Utilization::Defined(p),
        None => Utilization::Undefined,
    }
}

/// Sum that clamps at `Decimal::MAX` / `Decimal::MIN` instead of panicking.
pub fn saturating_sum<I>(amounts: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    amounts
        .into_iter()
        .fold(Decimal::ZERO, |acc, d| acc.saturating_add(d))
}

/// `limit × 0.8`, the spend above which a budget is near its limit.
pub fn warning_threshold(limit: Decimal) -> Decimal {
    limit.saturating_mul(warning_ratio())
}

/// Sum of expenses in the budget's company, category and month.
pub fn spent_for(budget: &Budget, transactions: &[Transaction]) -> Decimal {
    let month = canonical_month(&budget.month).unwrap_or_else(|| budget.month.clone());
    saturating_sum(
        transactions
            .iter()
            .filter(|t| {
                t.is_expense()
                    && t.company_id == budget.company_id
                    && t.category == budget.category
                    && t.month_key() == month
            })
            .map(|t| t.amount),
    )
}

pub fn derive_status(spent: Decimal, limit: Decimal) -> BudgetStatus {
    if limit.is_zero() && spent.is_zero() {
        BudgetStatus::Pending
    } else if spent > limit {
        BudgetStatus::Exceeded
    } else if spent > warning_threshold(limit) {
        BudgetStatus::Warning
    } else {
        BudgetStatus::Healthy
    }
}

/// Copy of `budget` with `spent` and `status` recomputed from `transactions`
/// and the month zero-padded.
pub fn derive(budget: &Budget, transactions: &[Transaction]) -> Budget {
    let spent = spent_for(budget, transactions);
    Budget {
        month: canonical_month(&budget.month).unwrap_or_else(|| budget.month.clone()),
        spent,
        status: derive_status(spent, budget.limit),
        ..budget.clone()
    }
}

pub fn derive_all(budgets: &[Budget], transactions: &[Transaction]) -> Vec<Budget> {
    budgets.iter().map(|b| derive(b, transactions)).collect()
}

pub fn is_exceeded(budget: &Budget) -> bool {
    budget.spent > budget.limit
}

pub fn budget_utilization(budget: &Budget) -> Utilization {
    utilization(budget.spent, budget.limit)
}
