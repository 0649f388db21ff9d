// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Transient alerts: generated on every aggregation, never stored.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::budgeting::{budget_utilization, saturating_sum, warning_threshold};
use crate::models::{Alert, AlertSeverity, AlertType, Budget, Transaction};

/// How many of the latest expenses are checked for anomalies.
pub const ANOMALY_WINDOW: usize = 5;

/// Budget threshold alerts for budgets of `now`'s month.
///
/// `budgets` must already carry derived `spent` values.
pub fn budget_alerts(budgets: &[Budget], now: DateTime<Utc>) -> Vec<Alert> {
    let current_month = now.format("%Y-%m").to_string();
    let mut out = Vec::new();
    for b in budgets.iter().filter(|b| b.month == current_month) {
        let (id, severity, title, message) = if b.spent > b.limit {
            (
                format!("alert-{}", b.id),
                AlertSeverity::Danger,
                "Budget exceeded",
                format!(
                    "Budget \"{}\" exceeded: {:.2} / {:.2}",
                    b.category, b.spent, b.limit
                ),
            )
        } else if b.spent > warning_threshold(b.limit) {
            (
                format!("alert-warn-{}", b.id),
                AlertSeverity::Warning,
                "Budget near limit",
                format!(
                    "Budget \"{}\" almost exceeded: {:.2} / {:.2}",
                    b.category, b.spent, b.limit
                ),
            )
        } else {
            continue;
        };
        out.push(Alert {
            id,
            company_id: b.company_id.clone(),
            r#type: AlertType::BudgetWarning,
            severity,
            title: title.to_string(),
            message,
            wallet_id: Some(b.wallet_id.clone()),
            budget_id: Some(b.id.clone()),
            transaction_id: None,
            threshold: Some(b.limit),
            current_value: Some(b.spent),
            percentage: budget_utilization(b).percent(),
            amount: None,
            created_at: now,
            read: false,
        });
    }
    out
}

/// Flags recent expenses larger than twice the average expense.
///
/// The average runs over every expense; only the last `ANOMALY_WINDOW`
/// expenses in input order are candidates.
pub fn anomaly_alerts(transactions: &[Transaction], now: DateTime<Utc>) -> Vec<Alert> {
    let expenses: Vec<&Transaction> = transactions.iter().filter(|t| t.is_expense()).collect();
    let total = saturating_sum(expenses.iter().map(|t| t.amount));
    let avg = total / Decimal::from(expenses.len().max(1));
    let threshold = avg.saturating_mul(Decimal::TWO);

    let skip = expenses.len().saturating_sub(ANOMALY_WINDOW);
    expenses[skip..]
        .iter()
        .filter(|t| t.amount > threshold)
        .map(|t| Alert {
            id: format!("alert-unusual-{}", t.id),
            company_id: t.company_id.clone(),
            r#type: AlertType::TransactionAnomaly,
            severity: AlertSeverity::Info,
            title: "Unusual expense".to_string(),
            message: format!("Unusual expense: {} ({:.2})", t.description, t.amount),
            wallet_id: Some(t.wallet_id.clone()),
            budget_id: None,
            transaction_id: Some(t.id.clone()),
            threshold: Some(threshold),
            current_value: None,
            percentage: None,
            amount: Some(t.amount),
            created_at: now,
            read: false,
        })
        .collect()
}

/// Session-local view over a batch of alerts.
///
/// Read and dismissed state live only as long as the inbox.
#[derive(Debug, Clone, Default)]
pub struct AlertInbox {
    alerts: Vec<Alert>,
}

impl AlertInbox {
    /// Newest first; alerts created at the same instant keep their order.
    pub fn new(mut alerts: Vec<Alert>) -> Self {
        alerts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Self { alerts }
    }

    pub fn all(&self) -> &[Alert] {
        &self.alerts
    }

    pub fn filtered(&self, severity: Option<AlertSeverity>) -> Vec<&Alert> {
        self.alerts
            .iter()
            .filter(|a| severity.is_none_or(|s| a.severity == s))
            .collect()
    }

    pub fn unread_count(&self) -> usize {
        self.alerts.iter().filter(|a| !a.read).count()
    }

    /// Returns false when no alert has this id.
    pub fn mark_read(&mut self, id: &str) -> bool {
        match self.alerts.iter_mut().find(|a| a.id == id) {
            Some(a) => {
                a.read = true;
                true
            }
            None => false,
        }
    }

    pub fn mark_all_read(&mut self) {
        for a in &mut self.alerts {
            a.read = true;
        }
    }

    pub fn dismiss(&mut self, id: &str) -> bool {
        let before = self.alerts.len();
        self.alerts.retain(|a| a.id != id);
        self.alerts.len() != before
    }

    pub fn dismiss_all(&mut self) {
        self.alerts.clear();
    }
}
