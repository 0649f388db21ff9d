// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use fundsight::alerts::{anomaly_alerts, budget_alerts, AlertInbox};
use fundsight::models::{
    Alert, AlertSeverity, AlertType, Budget, BudgetStatus, Transaction, TransactionStatus,
    TransactionType,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 15, 9, 30, 0).unwrap()
}

fn spent_budget(id: &str, month: &str, limit: Decimal, spent: Decimal) -> Budget {
    Budget {
        id: id.into(),
        company_id: "acme".into(),
        wallet_id: "w1".into(),
        department: String::new(),
        category: "ops".into(),
        subcategory: String::new(),
        month: month.into(),
        limit,
        spent,
        forecast: Decimal::ZERO,
        status: BudgetStatus::Pending,
        notes: String::new(),
    }
}

fn expense(id: &str, amount: Decimal) -> Transaction {
    Transaction {
        id: id.into(),
        company_id: "acme".into(),
        wallet_id: "w1".into(),
        r#type: TransactionType::Expense,
        status: TransactionStatus::Paid,
        amount,
        currency: "EUR".into(),
        category: "ops".into(),
        subcategory: String::new(),
        description: format!("expense {}", id),
        invoice_number: None,
        related_entity: None,
        date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        due_date: None,
        paid_date: None,
        approved_by: None,
    }
}

#[test]
fn budget_alerts_by_threshold() {
    let budgets = vec![
        spent_budget("over", "2024-03", dec!(100), dec!(120)),
        spent_budget("near", "2024-03", dec!(100), dec!(90)),
        spent_budget("fine", "2024-03", dec!(100), dec!(50)),
        spent_budget("old", "2024-02", dec!(100), dec!(500)),
    ];
    let alerts = budget_alerts(&budgets, now());
    let ids: Vec<_> = alerts.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["alert-over", "alert-warn-near"]);

    assert_eq!(alerts[0].severity, AlertSeverity::Danger);
    assert_eq!(alerts[0].percentage, Some(dec!(120)));
    assert_eq!(alerts[1].severity, AlertSeverity::Warning);
    assert!(alerts.iter().all(|a| a.r#type == AlertType::BudgetWarning));
    assert!(alerts.iter().all(|a| a.created_at == now() && !a.read));
}

#[test]
fn zero_limit_budget_alert_has_no_percentage() {
    let alerts = budget_alerts(&[spent_budget("z", "2024-03", Decimal::ZERO, dec!(1))], now());
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].percentage, None);
}

#[test]
fn anomaly_only_in_recent_window() {
    // Average is 30, threshold 60. Only the last five expenses are checked.
    let txs = vec![
        expense("a", dec!(100)),
        expense("b", dec!(10)),
        expense("c", dec!(10)),
        expense("d", dec!(10)),
        expense("e", dec!(10)),
        expense("f", dec!(40)),
    ];
    assert!(anomaly_alerts(&txs, now()).is_empty());

    let mut txs = txs;
    txs.push(expense("g", dec!(200)));
    let alerts = anomaly_alerts(&txs, now());
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].id, "alert-unusual-g");
    assert_eq!(alerts[0].r#type, AlertType::TransactionAnomaly);
    assert_eq!(alerts[0].severity, AlertSeverity::Info);
    assert_eq!(alerts[0].amount, Some(dec!(200)));
}

#[test]
fn anomaly_ignores_non_expenses() {
    let mut income = expense("i", dec!(10000));
    income.r#type = TransactionType::Income;
    let txs = vec![expense("a", dec!(10)), expense("b", dec!(10)), income];
    assert!(anomaly_alerts(&txs, now()).is_empty());
    assert!(anomaly_alerts(&[], now()).is_empty());
}

fn alert(id: &str, severity: AlertSeverity, minutes_ago: i64) -> Alert {
    Alert {
        id: id.into(),
        company_id: "acme".into(),
        r#type: AlertType::BudgetWarning,
        severity,
        title: id.into(),
        message: String::new(),
        wallet_id: None,
        budget_id: None,
        transaction_id: None,
        threshold: None,
        current_value: None,
        percentage: None,
        amount: None,
        created_at: now() - Duration::minutes(minutes_ago),
        read: false,
    }
}

#[test]
fn inbox_sorts_newest_first() {
    let inbox = AlertInbox::new(vec![
        alert("old", AlertSeverity::Info, 30),
        alert("new", AlertSeverity::Danger, 0),
        alert("mid", AlertSeverity::Warning, 10),
    ]);
    let ids: Vec<_> = inbox.all().iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["new", "mid", "old"]);
}

#[test]
fn inbox_filter_read_and_dismiss() {
    let mut inbox = AlertInbox::new(vec![
        alert("a", AlertSeverity::Danger, 0),
        alert("b", AlertSeverity::Warning, 1),
        alert("c", AlertSeverity::Warning, 2),
    ]);
    assert_eq!(inbox.filtered(Some(AlertSeverity::Warning)).len(), 2);
    assert_eq!(inbox.filtered(None).len(), 3);
    assert_eq!(inbox.unread_count(), 3);

    assert!(inbox.mark_read("b"));
    assert!(!inbox.mark_read("missing"));
    assert_eq!(inbox.unread_count(), 2);

    assert!(inbox.dismiss("a"));
    assert!(!inbox.dismiss("a"));
    assert!(inbox.filtered(Some(AlertSeverity::Danger)).is_empty());

    inbox.mark_all_read();
    assert_eq!(inbox.unread_count(), 0);
    inbox.dismiss_all();
    assert!(inbox.all().is_empty());
}

#[test]
fn alert_json_omits_empty_fields() {
    let v = serde_json::to_value(alert("a", AlertSeverity::Info, 0)).unwrap();
    assert_eq!(v["type"], "budget_warning");
    assert_eq!(v["severity"], "info");
    assert!(v.get("walletId").is_none());
    assert!(v.get("createdAt").is_some());
}
