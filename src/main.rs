// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use fundsight::{cli, commands, config, db, logging};

/// `--company` is global, so it may sit at any depth of the command line.
fn company_flag(m: &clap::ArgMatches) -> Option<String> {
    let mut found = m.get_one::<String>("company").cloned();
    let mut cur = m;
    while let Some((_, sub)) = cur.subcommand() {
        if let Some(v) = sub.get_one::<String>("company") {
            found = Some(v.clone());
        }
        cur = sub;
    }
    found
}

fn main() -> Result<()> {
    logging::init(&config::log_filter());

    let matches = cli::build_cli().get_matches();

    let path = config::db_path()?;
    let mut conn = db::open_or_init(&path)?;
    let flag = company_flag(&matches);
    let company = || config::resolve_company(&conn, flag.as_deref());

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", path.display());
        }
        Some(("company", sub)) => commands::companies::handle(&conn, flag.as_deref(), sub)?,
        Some(("wallet", sub)) => commands::wallets::handle(&conn, &company()?, sub)?,
        Some(("tx", sub)) => {
            let id = company()?;
            commands::transactions::handle(&mut conn, &id, sub)?
        }
        Some(("budget", sub)) => commands::budgets::handle(&conn, &company()?, sub)?,
        Some(("supplier", sub)) => commands::suppliers::handle(&conn, &company()?, sub)?,
        Some(("dashboard", sub)) => commands::dashboard::handle(&conn, &company()?, sub)?,
        Some(("alerts", sub)) => commands::alerts::handle(&conn, &company()?, sub)?,
        Some(("report", sub)) => commands::reports::handle(&conn, &company()?, sub)?,
        Some(("sync", sub)) => commands::sync::handle(&mut conn, flag.as_deref(), sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&conn)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
