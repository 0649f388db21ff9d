// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Transaction, TransactionStatus};
use crate::store::{self, TransactionQuery};
use crate::utils::{maybe_print_json, new_id, parse_amount, parse_date, pretty_table};
use anyhow::Result;
use chrono::Utc;
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, company: &str, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, company, sub)?,
        Some(("list", sub)) => list(conn, company, sub)?,
        Some(("approve", sub)) => {
            let id = sub.get_one::<String>("id").unwrap();
            let by = sub.get_one::<String>("by").unwrap();
            store::transition(conn, company, id, TransactionStatus::Confirmed, Some(by), None)?;
            println!("Approved {} (by {})", id, by);
        }
        Some(("reject", sub)) => {
            let id = sub.get_one::<String>("id").unwrap();
            store::transition(conn, company, id, TransactionStatus::Rejected, None, None)?;
            println!("Rejected {}", id);
        }
        Some(("pay", sub)) => {
            let id = sub.get_one::<String>("id").unwrap();
            let paid_on = match sub.get_one::<String>("date") {
                Some(d) => parse_date(d)?,
                None => Utc::now().date_naive(),
            };
            store::transition(conn, company, id, TransactionStatus::Paid, None, Some(paid_on))?;
            println!("Marked {} as paid on {}", id, paid_on);
        }
        Some(("complete", sub)) => {
            let id = sub.get_one::<String>("id").unwrap();
            store::transition(conn, company, id, TransactionStatus::Completed, None, None)?;
            println!("Completed {}", id);
        }
        Some(("rm", sub)) => {
            let id = sub.get_one::<String>("id").unwrap();
            store::delete_transaction(conn, company, id)?;
            println!("Removed transaction '{}'", id);
        }
        Some(("pending", sub)) => {
            let data: Vec<Transaction> = store::list_transactions(conn, company)?
                .into_iter()
                .filter(|t| t.is_awaiting_approval())
                .collect();
            print_rows(sub, &data)?;
        }
        Some(("overdue", sub)) => {
            let today = crate::commands::as_of(sub)?.date_naive();
            let data: Vec<Transaction> = store::list_transactions(conn, company)?
                .into_iter()
                .filter(|t| t.is_overdue(today))
                .collect();
            print_rows(sub, &data)?;
        }
        _ => {}
    }
    Ok(())
}

fn add(conn: &mut Connection, company: &str, sub: &clap::ArgMatches) -> Result<()> {
    let wallet_id = sub.get_one::<String>("wallet").unwrap();
    let wallet = store::get_wallet(conn, company, wallet_id)?;
    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => Utc::now().date_naive(),
    };
    let status: TransactionStatus = sub.get_one::<String>("status").unwrap().parse()?;
    let tx = Transaction {
        id: new_id("tx"),
        company_id: company.to_string(),
        wallet_id: wallet.id.clone(),
        r#type: sub.get_one::<String>("type").unwrap().parse()?,
        status,
        amount: parse_amount(sub.get_one::<String>("amount").unwrap())?,
        currency: wallet.currency.clone(),
        category: sub.get_one::<String>("category").unwrap().to_string(),
        subcategory: sub.get_one::<String>("subcategory").unwrap().to_string(),
        description: sub.get_one::<String>("description").unwrap().to_string(),
        invoice_number: sub.get_one::<String>("invoice").cloned(),
        related_entity: sub.get_one::<String>("supplier").cloned(),
        date,
        due_date: sub.get_one::<String>("due").map(|d| parse_date(d)).transpose()?,
        paid_date: (status == TransactionStatus::Paid).then_some(date),
        approved_by: None,
    };
    store::record_transaction(conn, &tx, sub.get_flag("allow-overdraft"))?;
    println!(
        "Recorded {} {} {} on {} in '{}' as {}",
        tx.r#type, tx.amount, tx.currency, tx.date, wallet.name, tx.id
    );
    Ok(())
}

fn list(conn: &Connection, company: &str, sub: &clap::ArgMatches) -> Result<()> {
    let data = query_rows(conn, company, sub)?;
    print_rows(sub, &data)
}

fn print_rows(sub: &clap::ArgMatches, data: &[Transaction]) -> Result<()> {
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|t| {
                vec![
                    t.id.clone(),
                    t.date.to_string(),
                    t.r#type.to_string(),
                    t.status.to_string(),
                    format!("{:.2}", t.amount),
                    t.currency.clone(),
                    t.category.clone(),
                    t.description.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Type", "Status", "Amount", "CCY", "Category", "Description"],
                rows,
            )
        );
    }
    Ok(())
}

pub fn query_rows(
    conn: &Connection,
    company: &str,
    sub: &clap::ArgMatches,
) -> Result<Vec<Transaction>> {
    let q = TransactionQuery {
        r#type: sub
            .get_one::<String>("type")
            .map(|s| s.parse())
            .transpose()?,
        status: sub
            .get_one::<String>("status")
            .map(|s| s.parse())
            .transpose()?,
        category: sub.get_one::<String>("category").cloned(),
        wallet_id: sub.get_one::<String>("wallet").cloned(),
        from: sub.get_one::<String>("from").map(|s| parse_date(s)).transpose()?,
        to: sub.get_one::<String>("to").map(|s| parse_date(s)).transpose()?,
        search: sub.get_one::<String>("search").cloned(),
        limit: sub.get_one::<usize>("limit").copied(),
    };
    store::query_transactions(conn, company, &q)
}
