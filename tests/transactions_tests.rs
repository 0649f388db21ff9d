// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use fundsight::error::FundsightError;
use fundsight::models::{
    Company, CompanyPlan, CompanyStatus, Transaction, TransactionStatus, TransactionType, Wallet,
    WalletStatus, WalletType,
};
use fundsight::{cli, commands::transactions, db, store};
use rusqlite::Connection;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn company(id: &str) -> Company {
    Company {
        id: id.into(),
        name: id.to_uppercase(),
        industry: String::new(),
        status: CompanyStatus::Active,
        plan: CompanyPlan::Starter,
        created_at: String::new(),
    }
}

fn wallet(id: &str, company_id: &str, balance: Decimal, credit_limit: Decimal) -> Wallet {
    Wallet {
        id: id.into(),
        company_id: company_id.into(),
        name: id.into(),
        r#type: WalletType::Operational,
        currency: "EUR".into(),
        balance,
        initial_balance: balance,
        credit_limit,
        status: WalletStatus::Active,
        description: String::new(),
        created_at: String::new(),
    }
}

fn tx(id: &str, kind: TransactionType, amount: Decimal, date: &str) -> Transaction {
    Transaction {
        id: id.into(),
        company_id: "acme".into(),
        wallet_id: "w1".into(),
        r#type: kind,
        status: TransactionStatus::Pending,
        amount,
        currency: "EUR".into(),
        category: "ops".into(),
        subcategory: String::new(),
        description: format!("{} {}", kind, id),
        invoice_number: None,
        related_entity: None,
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        due_date: None,
        paid_date: None,
        approved_by: None,
    }
}

fn setup() -> Connection {
    let conn = db::open_in_memory().unwrap();
    store::upsert_company(&conn, &company("acme")).unwrap();
    store::upsert_company(&conn, &company("globex")).unwrap();
    store::upsert_wallet(&conn, &wallet("w1", "acme", dec!(100), dec!(50))).unwrap();
    conn
}

fn record(conn: &mut Connection, t: Transaction, allow_overdraft: bool) {
    store::record_transaction(conn, &t, allow_overdraft).unwrap();
}

fn balance(conn: &Connection) -> Decimal {
    store::get_wallet(conn, "acme", "w1").unwrap().balance
}

#[test]
fn recording_moves_wallet_balance() {
    let mut conn = setup();
    record(&mut conn, tx("t1", TransactionType::Income, dec!(40), "2024-01-01"), false);
    record(&mut conn, tx("t2", TransactionType::Expense, dec!(15.5), "2024-01-02"), false);
    assert_eq!(balance(&conn), dec!(124.5));
}

#[test]
fn debit_beyond_credit_line_is_refused() {
    let mut conn = setup();
    let err = store::record_transaction(
        &mut conn,
        &tx("t1", TransactionType::Expense, dec!(150.01), "2024-01-01"),
        false,
    )
    .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<FundsightError>(),
        Some(FundsightError::InsufficientFunds { .. })
    ));
    // Nothing was written.
    assert!(store::list_transactions(&conn, "acme").unwrap().is_empty());
    assert_eq!(balance(&conn), dec!(100));

    // Exactly balance plus credit line is fine.
    record(&mut conn, tx("t2", TransactionType::Expense, dec!(150), "2024-01-01"), false);
    assert_eq!(balance(&conn), dec!(-50));
}

#[test]
fn overdraft_can_be_forced() {
    let mut conn = setup();
    record(&mut conn, tx("t1", TransactionType::Transfer, dec!(500), "2024-01-01"), true);
    assert_eq!(balance(&conn), dec!(-400));
}

#[test]
fn unknown_wallet_is_an_error() {
    let mut conn = setup();
    let mut t = tx("t1", TransactionType::Income, dec!(1), "2024-01-01");
    t.wallet_id = "nope".into();
    let err = store::record_transaction(&mut conn, &t, false).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<FundsightError>(),
        Some(FundsightError::WalletNotFound(_))
    ));
}

#[test]
fn status_transitions() {
    let mut conn = setup();
    record(&mut conn, tx("t1", TransactionType::Invoice, dec!(10), "2024-01-01"), false);

    let t = store::transition(
        &conn,
        "acme",
        "t1",
        TransactionStatus::Confirmed,
        Some("dana"),
        None,
    )
    .unwrap();
    assert_eq!(t.approved_by.as_deref(), Some("dana"));

    let paid_on = NaiveDate::from_ymd_opt(2024, 1, 9).unwrap();
    let t = store::transition(
        &conn,
        "acme",
        "t1",
        TransactionStatus::Paid,
        None,
        Some(paid_on),
    )
    .unwrap();
    assert_eq!(t.paid_date, Some(paid_on));
    assert_eq!(t.approved_by.as_deref(), Some("dana"));

    let err = store::transition(
        &conn,
        "acme",
        "t1",
        TransactionStatus::Rejected,
        None,
        None,
    )
    .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<FundsightError>(),
        Some(FundsightError::InvalidTransition {
            from: TransactionStatus::Paid,
            to: TransactionStatus::Rejected
        })
    ));

    let stored = store::get_transaction(&conn, "acme", "t1").unwrap();
    assert_eq!(stored.status, TransactionStatus::Paid);
    assert!(stored.is_realized_income());

    let t = store::transition(
        &conn,
        "acme",
        "t1",
        TransactionStatus::Completed,
        None,
        None,
    )
    .unwrap();
    assert_eq!(t.paid_date, Some(paid_on));
    assert!(store::transition(&conn, "acme", "t1", TransactionStatus::Paid, None, None).is_err());
}

#[test]
fn transactions_are_scoped_by_company() {
    let mut conn = setup();
    record(&mut conn, tx("t1", TransactionType::Income, dec!(1), "2024-01-01"), false);
    assert!(store::get_transaction(&conn, "globex", "t1").is_err());
    assert!(store::list_transactions(&conn, "globex").unwrap().is_empty());
    assert!(store::delete_transaction(&conn, "globex", "t1").is_err());
}

fn list_matches(args: &[&str]) -> clap::ArgMatches {
    let mut argv = vec!["fundsight", "tx", "list"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    let Some(("tx", tx_m)) = matches.subcommand() else {
        panic!("no tx subcommand");
    };
    let Some(("list", list_m)) = tx_m.subcommand() else {
        panic!("no list subcommand");
    };
    list_m.clone()
}

fn query(conn: &Connection, args: &[&str]) -> anyhow::Result<Vec<Transaction>> {
    transactions::query_rows(conn, "acme", &list_matches(args))
}

fn seeded() -> Connection {
    let mut conn = setup();
    for (i, kind) in [
        TransactionType::Expense,
        TransactionType::Income,
        TransactionType::Expense,
    ]
    .into_iter()
    .enumerate()
    {
        let mut t = tx(&format!("t{}", i + 1), kind, dec!(10), &format!("2025-01-0{}", i + 1));
        if i == 2 {
            t.description = "Printer toner".into();
            t.invoice_number = Some("INV-42".into());
        }
        store::record_transaction(&mut conn, &t, false).unwrap();
    }
    conn
}

#[test]
fn list_limit_respected() {
    let conn = seeded();
    let rows = query(&conn, &["--limit", "2"]).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].id, "t3");
    assert_eq!(rows[1].id, "t2");
}

#[test]
fn list_filters_by_type_and_dates() {
    let conn = seeded();
    let rows = query(&conn, &["--type", "expense"]).unwrap();
    let ids: Vec<_> = rows.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["t3", "t1"]);

    let rows = transactions::query_rows(
        &conn,
        "acme",
        &list_matches(&["--from", "2025-01-02", "--to", "2025-01-02"]),
    )
    .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].r#type, TransactionType::Income);
}

#[test]
fn list_search_is_case_insensitive() {
    let conn = seeded();
    let rows = query(&conn, &["--search", "TONER"]).unwrap();
    assert_eq!(rows.len(), 1);
    let rows = query(&conn, &["--search", "inv-4"]).unwrap();
    assert_eq!(rows.len(), 1);
}

#[test]
fn bad_type_filter_is_rejected() {
    let conn = seeded();
    let err = query(&conn, &["--type", "gift"]).unwrap_err();
    assert!(err.to_string().contains("transaction type"));
}

#[test]
fn add_command_records_transaction() {
    let mut conn = setup();
    let matches = cli::build_cli().get_matches_from([
        "fundsight", "tx", "add", "--wallet", "w1", "--type", "expense", "--amount", "30",
        "--category", "travel", "--date", "2025-02-01",
    ]);
    let Some(("tx", tx_m)) = matches.subcommand() else {
        panic!("no tx subcommand");
    };
    transactions::handle(&mut conn, "acme", tx_m).unwrap();

    let all = store::list_transactions(&conn, "acme").unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].category, "travel");
    assert_eq!(all[0].status, TransactionStatus::Pending);
    assert!(all[0].is_awaiting_approval());
    assert_eq!(balance(&conn), dec!(70));
}

#[test]
fn overdue_invoices() {
    let mut conn = setup();
    let mut t = tx("i1", TransactionType::Invoice, dec!(10), "2025-01-01");
    t.due_date = NaiveDate::from_ymd_opt(2025, 1, 31);
    store::record_transaction(&mut conn, &t, false).unwrap();
    let stored = store::get_transaction(&conn, "acme", "i1").unwrap();
    assert!(!stored.is_overdue(NaiveDate::from_ymd_opt(2025, 1, 31).unwrap()));
    assert!(stored.is_overdue(NaiveDate::from_ymd_opt(2025, 2, 1).unwrap()));
}

#[test]
fn balance_overflow_is_an_error() {
    let mut conn = setup();
    store::upsert_wallet(&conn, &wallet("w1", "acme", Decimal::MAX, Decimal::ZERO)).unwrap();
    let err = store::record_transaction(
        &mut conn,
        &tx("t1", TransactionType::Income, dec!(1), "2024-01-01"),
        false,
    )
    .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<FundsightError>(),
        Some(FundsightError::BalanceOverflow(_))
    ));
    assert!(store::list_transactions(&conn, "acme").unwrap().is_empty());
    assert_eq!(balance(&conn), Decimal::MAX);
}
