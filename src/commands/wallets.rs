// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Wallet, WalletStatus};
use crate::store;
use crate::utils::{fmt_money, maybe_print_json, new_id, parse_amount, parse_decimal, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, company: &str, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, company, sub)?,
        Some(("list", sub)) => list(conn, company, sub)?,
        Some(("show", sub)) => show(conn, company, sub)?,
        Some(("check", sub)) => {
            let id = sub.get_one::<String>("id").unwrap();
            let amount = parse_amount(sub.get_one::<String>("amount").unwrap())?;
            let w = store::get_wallet(conn, company, id)?;
            if w.can_debit(amount) {
                println!(
                    "OK: {} can cover {} (available {})",
                    w.name,
                    fmt_money(&amount, &w.currency),
                    fmt_money(&w.available(), &w.currency)
                );
            } else {
                println!(
                    "Insufficient: {} cannot cover {} (available {})",
                    w.name,
                    fmt_money(&amount, &w.currency),
                    fmt_money(&w.available(), &w.currency)
                );
            }
        }
        Some(("rm", sub)) => {
            let id = sub.get_one::<String>("id").unwrap();
            store::delete_wallet(conn, company, id)?;
            println!("Removed wallet '{}'", id);
        }
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, company: &str, sub: &clap::ArgMatches) -> Result<()> {
    let balance = parse_decimal(sub.get_one::<String>("balance").unwrap())?;
    let wallet = Wallet {
        id: new_id("wallet"),
        company_id: company.to_string(),
        name: sub.get_one::<String>("name").unwrap().to_string(),
        r#type: sub.get_one::<String>("type").unwrap().parse()?,
        currency: sub.get_one::<String>("currency").unwrap().to_uppercase(),
        balance,
        initial_balance: balance,
        credit_limit: parse_amount(sub.get_one::<String>("credit-limit").unwrap())?,
        status: WalletStatus::Active,
        description: sub.get_one::<String>("description").unwrap().to_string(),
        created_at: String::new(),
    };
    store::get_company(conn, company)?;
    store::upsert_wallet(conn, &wallet)?;
    println!(
        "Added wallet '{}' ({}, {}) as {}",
        wallet.name, wallet.r#type, wallet.currency, wallet.id
    );
    Ok(())
}

fn list(conn: &Connection, company: &str, sub: &clap::ArgMatches) -> Result<()> {
    let wallets = store::list_wallets(conn, company)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &wallets)? {
        let rows = wallets
            .into_iter()
            .map(|w| {
                vec![
                    w.id,
                    w.name,
                    w.r#type.to_string(),
                    w.currency,
                    format!("{:.2}", w.balance),
                    format!("{:.2}", w.credit_limit),
                    w.status.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Name", "Type", "CCY", "Balance", "Credit", "Status"],
                rows
            )
        );
    }
    Ok(())
}

fn show(conn: &Connection, company: &str, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap();
    let w = store::get_wallet(conn, company, id)?;
    let txs: Vec<_> = store::list_transactions(conn, company)?
        .into_iter()
        .filter(|t| t.wallet_id == w.id)
        .collect();
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &w)? {
        return Ok(());
    }
    println!(
        "{} ({}) balance {} | initial {} | credit {} | {} transactions",
        w.name,
        w.r#type,
        fmt_money(&w.balance, &w.currency),
        fmt_money(&w.initial_balance, &w.currency),
        fmt_money(&w.credit_limit, &w.currency),
        txs.len()
    );
    let rows = txs
        .into_iter()
        .map(|t| {
            vec![
                t.date.to_string(),
                t.r#type.to_string(),
                t.status.to_string(),
                format!("{:.2}", t.signed_amount()),
                t.description,
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Date", "Type", "Status", "Amount", "Description"], rows)
    );
    Ok(())
}
