// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::alerts::AlertInbox;
use crate::models::AlertSeverity;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, company: &str, sub: &clap::ArgMatches) -> Result<()> {
    let severity: Option<AlertSeverity> = sub
        .get_one::<String>("severity")
        .map(|s| s.parse())
        .transpose()?;
    let now = crate::commands::as_of(sub)?;
    let (data, _) = crate::commands::dashboard::load(conn, company, now)?;
    let inbox = AlertInbox::new(data.alerts);
    let shown = inbox.filtered(severity);

    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &shown)? {
        return Ok(());
    }
    if shown.is_empty() {
        println!("No alerts.");
        return Ok(());
    }
    let rows = shown
        .iter()
        .map(|a| {
            vec![
                a.severity.to_string(),
                a.title.clone(),
                a.message.clone(),
                a.id.clone(),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Severity", "Title", "Message", "ID"], rows));
    println!("{} unread", inbox.unread_count());
    Ok(())
}
