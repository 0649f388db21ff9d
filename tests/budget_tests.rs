// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use fundsight::budgeting::{derive, derive_status, is_exceeded, utilization, Utilization};
use fundsight::models::{
    Budget, BudgetStatus, Company, CompanyPlan, CompanyStatus, Transaction, TransactionStatus,
    TransactionType, Wallet, WalletStatus, WalletType,
};
use fundsight::utils::parse_month;
use fundsight::{cli, commands::budgets, db, store};
use rstest::rstest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn expense(id: &str, amount: Decimal, date: &str, category: &str) -> Transaction {
    Transaction {
        id: id.into(),
        company_id: "acme".into(),
        wallet_id: "w1".into(),
        r#type: TransactionType::Expense,
        status: TransactionStatus::Paid,
        amount,
        currency: "EUR".into(),
        category: category.into(),
        subcategory: String::new(),
        description: String::new(),
        invoice_number: None,
        related_entity: None,
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        due_date: None,
        paid_date: None,
        approved_by: None,
    }
}

fn budget(id: &str, category: &str, month: &str, limit: Decimal) -> Budget {
    Budget {
        id: id.into(),
        company_id: "acme".into(),
        wallet_id: "w1".into(),
        department: "ops".into(),
        category: category.into(),
        subcategory: String::new(),
        month: month.into(),
        limit,
        // Stored values are ignored by derivation.
        spent: dec!(12345),
        forecast: Decimal::ZERO,
        status: BudgetStatus::Exceeded,
        notes: String::new(),
    }
}

#[test]
fn spent_is_derived_from_matching_expenses() {
    let txs = vec![
        expense("t1", dec!(200), "2024-01-20", "purchases"),
        expense("t2", dec!(50), "2024-02-01", "purchases"),
        expense("t3", dec!(75), "2024-01-21", "travel"),
    ];
    let b = derive(&budget("b1", "purchases", "2024-01", dec!(500)), &txs);
    assert_eq!(b.spent, dec!(200));
    assert_eq!(b.status, BudgetStatus::Healthy);
    assert!(!is_exceeded(&b));
    assert_eq!(utilization(b.spent, b.limit), Utilization::Defined(dec!(40)));
}

#[test]
fn income_does_not_count_as_spent() {
    let mut income = expense("t1", dec!(900), "2024-01-02", "purchases");
    income.r#type = TransactionType::Income;
    let b = derive(&budget("b1", "purchases", "2024-01", dec!(500)), &[income]);
    assert_eq!(b.spent, Decimal::ZERO);
}

#[test]
fn zero_limit_has_undefined_utilization() {
    let u = utilization(dec!(10), Decimal::ZERO);
    assert_eq!(u, Utilization::Undefined);
    assert_eq!(u.percent(), None);
    assert_eq!(u.to_string(), "n/a");
    assert_eq!(utilization(Decimal::ZERO, Decimal::ZERO), Utilization::Undefined);
}

#[rstest]
#[case(dec!(0), dec!(0), BudgetStatus::Pending)]
#[case(dec!(0), dec!(100), BudgetStatus::Healthy)]
#[case(dec!(80), dec!(100), BudgetStatus::Healthy)]
#[case(dec!(80.01), dec!(100), BudgetStatus::Warning)]
#[case(dec!(100), dec!(100), BudgetStatus::Warning)]
#[case(dec!(100.01), dec!(100), BudgetStatus::Exceeded)]
#[case(dec!(5), dec!(0), BudgetStatus::Exceeded)]
fn status_thresholds(#[case] spent: Decimal, #[case] limit: Decimal, #[case] want: BudgetStatus) {
    assert_eq!(derive_status(spent, limit), want);
}

fn setup() -> rusqlite::Connection {
    let conn = db::open_in_memory().unwrap();
    store::upsert_company(
        &conn,
        &Company {
            id: "acme".into(),
            name: "Acme".into(),
            industry: String::new(),
            status: CompanyStatus::Active,
            plan: CompanyPlan::Starter,
            created_at: String::new(),
        },
    )
    .unwrap();
    conn
}

#[test]
fn store_rejects_non_positive_limit() {
    let conn = setup();
    let err =
        store::upsert_budget(&conn, &budget("b0", "ops", "2024-01", Decimal::ZERO)).unwrap_err();
    assert!(err.to_string().contains("limit"));
    // Imported budgets are kept as-is.
    store::import_budget(&conn, &budget("b0", "ops", "2024-01", Decimal::ZERO)).unwrap();
    assert_eq!(store::list_budgets(&conn, "acme").unwrap().len(), 1);
}

#[test]
fn listed_rows_carry_derived_values() {
    let conn = setup();
    store::upsert_budget(&conn, &budget("b1", "purchases", "2024-01", dec!(500))).unwrap();
    store::upsert_budget(&conn, &budget("b2", "purchases", "2024-02", dec!(100))).unwrap();
    store::upsert_transaction(&conn, &expense("t1", dec!(200), "2024-01-20", "purchases")).unwrap();

    let cli = cli::build_cli();
    let matches = cli.get_matches_from(["fundsight", "budget", "list", "--month", "2024-01"]);
    let Some(("budget", bm)) = matches.subcommand() else {
        panic!("no budget subcommand");
    };
    let Some(("list", lm)) = bm.subcommand() else {
        panic!("no list subcommand");
    };
    let month = lm.get_one::<String>("month").map(String::as_str);
    let rows = budgets::query_rows(&conn, "acme", month).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].budget.spent, dec!(200));
    assert_eq!(rows[0].budget.status, BudgetStatus::Healthy);
    assert_eq!(rows[0].utilization, Utilization::Defined(dec!(40)));
}

#[test]
fn unpadded_month_still_matches_expenses() {
    let conn = setup();
    store::upsert_wallet(
        &conn,
        &Wallet {
            id: "w1".into(),
            company_id: "acme".into(),
            name: "Main".into(),
            r#type: WalletType::Operational,
            currency: "EUR".into(),
            balance: dec!(1000),
            initial_balance: dec!(1000),
            credit_limit: Decimal::ZERO,
            status: WalletStatus::Active,
            description: String::new(),
            created_at: String::new(),
        },
    )
    .unwrap();
    store::upsert_transaction(&conn, &expense("t1", dec!(150), "2024-01-05", "ops")).unwrap();

    let matches = cli::build_cli().get_matches_from([
        "fundsight", "budget", "set", "--id", "b1", "--wallet", "w1", "--category", "ops",
        "--month", "2024-1", "--limit", "100",
    ]);
    let Some(("budget", bm)) = matches.subcommand() else {
        panic!("no budget subcommand");
    };
    budgets::handle(&conn, "acme", bm).unwrap();

    let rows = budgets::query_rows(&conn, "acme", Some("2024-01")).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].budget.month, "2024-01");
    assert_eq!(rows[0].budget.spent, dec!(150));
    assert_eq!(rows[0].budget.status, BudgetStatus::Exceeded);
}

#[test]
fn months_are_zero_padded() {
    assert_eq!(parse_month("2024-1").unwrap(), "2024-01");
    assert_eq!(parse_month(" 2024-11 ").unwrap(), "2024-11");
    assert!(parse_month("2024-13").is_err());

    // A budget built in memory with a short month derives the same way.
    let b = derive(
        &budget("b1", "ops", "2024-1", dec!(100)),
        &[expense("t1", dec!(150), "2024-01-05", "ops")],
    );
    assert_eq!(b.month, "2024-01");
    assert_eq!(b.spent, dec!(150));
    assert_eq!(b.status, BudgetStatus::Exceeded);
}

#[test]
fn imported_months_are_normalized() {
    let conn = setup();
    store::import_budget(&conn, &budget("b1", "ops", "2024-3", dec!(100))).unwrap();
    store::import_budget(&conn, &budget("b2", "ops", "2024-13", dec!(100))).unwrap();
    let mut months: Vec<String> = store::list_budgets(&conn, "acme")
        .unwrap()
        .into_iter()
        .map(|b| b.month)
        .collect();
    months.sort();
    assert_eq!(months, vec!["2024-03", "2024-13"]);
}
