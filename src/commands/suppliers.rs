// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Supplier, SupplierStatus};
use crate::store;
use crate::utils::{maybe_print_json, new_id, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, company: &str, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let arg = |k: &str| sub.get_one::<String>(k).cloned().unwrap_or_default();
            let s = Supplier {
                id: new_id("sup"),
                company_id: company.to_string(),
                name: arg("name"),
                r#type: arg("type"),
                email: arg("email"),
                phone: arg("phone"),
                city: arg("city"),
                country: arg("country"),
                payment_terms: arg("terms"),
                status: SupplierStatus::Active,
                created_at: String::new(),
            };
            store::get_company(conn, company)?;
            store::upsert_supplier(conn, &s)?;
            println!("Added supplier '{}' as {}", s.name, s.id);
        }
        Some(("list", sub)) => {
            let data = store::list_suppliers(conn, company)?;
            print_rows(sub, &data)?;
        }
        Some(("search", sub)) => {
            let q = sub.get_one::<String>("query").unwrap();
            let data = store::search_suppliers(conn, company, q)?;
            print_rows(sub, &data)?;
        }
        Some(("rm", sub)) => {
            let id = sub.get_one::<String>("id").unwrap();
            store::delete_supplier(conn, company, id)?;
            println!("Removed supplier '{}'", id);
        }
        _ => {}
    }
    Ok(())
}

fn print_rows(sub: &clap::ArgMatches, data: &[Supplier]) -> Result<()> {
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|s| {
                vec![
                    s.id.clone(),
                    s.name.clone(),
                    s.email.clone(),
                    s.city.clone(),
                    s.payment_terms.clone(),
                    s.status.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "Name", "Email", "City", "Terms", "Status"], rows)
        );
    }
    Ok(())
}
