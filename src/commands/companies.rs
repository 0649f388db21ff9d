// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::{current_company, set_current_company};
use crate::models::{Company, CompanyStatus};
use crate::store;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn handle(conn: &Connection, company_flag: Option<&str>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let company = Company {
                id: sub.get_one::<String>("id").unwrap().trim().to_string(),
                name: sub.get_one::<String>("name").unwrap().to_string(),
                industry: sub.get_one::<String>("industry").unwrap().to_string(),
                status: CompanyStatus::Active,
                plan: sub.get_one::<String>("plan").unwrap().parse()?,
                created_at: String::new(),
            };
            store::upsert_company(conn, &company)?;
            info!(id = %company.id, "company saved");
            println!("Added company '{}' ({})", company.name, company.id);
        }
        Some(("list", sub)) => {
            let companies = store::list_companies(conn)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &companies)? {
                let selected = current_company(conn)?;
                let rows = companies
                    .into_iter()
                    .map(|c| {
                        let mark = if selected.as_deref() == Some(c.id.as_str()) {
                            "*".to_string()
                        } else {
                            String::new()
                        };
                        vec![
                            mark,
                            c.id,
                            c.name,
                            c.industry,
                            c.plan.to_string(),
                            c.status.to_string(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["", "ID", "Name", "Industry", "Plan", "Status"], rows)
                );
            }
        }
        Some(("use", sub)) => {
            let id = sub.get_one::<String>("id").unwrap();
            let company = store::get_company(conn, id)?;
            set_current_company(conn, &company.id)?;
            println!("Now using company '{}' ({})", company.name, company.id);
        }
        Some(("show", _)) => {
            let id = crate::config::resolve_company(conn, company_flag)?;
            let c = store::get_company(conn, &id)?;
            println!(
                "{}",
                pretty_table(
                    &["ID", "Name", "Industry", "Plan", "Status", "Created"],
                    vec![vec![
                        c.id,
                        c.name,
                        c.industry,
                        c.plan.to_string(),
                        c.status.to_string(),
                        c.created_at
                    ]],
                )
            );
        }
        _ => {}
    }
    Ok(())
}
