// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print as JSON lines"),
    )
}

fn as_of_arg() -> Arg {
    Arg::new("as-of")
        .long("as-of")
        .value_name("YYYY-MM-DD")
        .help("Evaluate as if today were this date")
}

fn id_arg() -> Arg {
    Arg::new("id").required(true)
}

fn company_cmd() -> Command {
    Command::new("company")
        .about("Manage companies (tenants)")
        .subcommand(
            Command::new("add")
                .arg(id_arg())
                .arg(Arg::new("name").long("name").required(true))
                .arg(Arg::new("industry").long("industry").default_value(""))
                .arg(Arg::new("plan").long("plan").default_value("starter")),
        )
        .subcommand(json_flags(Command::new("list")))
        .subcommand(Command::new("use").about("Select the default company").arg(id_arg()))
        .subcommand(Command::new("show"))
}

fn wallet_cmd() -> Command {
    Command::new("wallet")
        .about("Manage wallets")
        .subcommand(
            Command::new("add")
                .arg(Arg::new("name").long("name").required(true))
                .arg(Arg::new("type").long("type").default_value("operational"))
                .arg(Arg::new("currency").long("currency").required(true))
                .arg(Arg::new("balance").long("balance").default_value("0"))
                .arg(Arg::new("credit-limit").long("credit-limit").default_value("0"))
                .arg(Arg::new("description").long("description").default_value("")),
        )
        .subcommand(json_flags(Command::new("list")))
        .subcommand(json_flags(Command::new("show").arg(id_arg())))
        .subcommand(
            Command::new("check")
                .about("Can this wallet cover a debit?")
                .arg(id_arg())
                .arg(Arg::new("amount").required(true)),
        )
        .subcommand(Command::new("rm").arg(id_arg()))
}

fn tx_cmd() -> Command {
    Command::new("tx")
        .about("Record and review transactions")
        .subcommand(
            Command::new("add")
                .arg(Arg::new("wallet").long("wallet").required(true))
                .arg(Arg::new("type").long("type").required(true))
                .arg(Arg::new("amount").long("amount").required(true))
                .arg(Arg::new("category").long("category").required(true))
                .arg(Arg::new("subcategory").long("subcategory").default_value(""))
                .arg(Arg::new("description").long("description").default_value(""))
                .arg(Arg::new("date").long("date").value_name("YYYY-MM-DD"))
                .arg(Arg::new("due").long("due").value_name("YYYY-MM-DD"))
                .arg(Arg::new("invoice").long("invoice"))
                .arg(Arg::new("supplier").long("supplier"))
                .arg(Arg::new("status").long("status").default_value("pending"))
                .arg(
                    Arg::new("allow-overdraft")
                        .long("allow-overdraft")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(json_flags(
            Command::new("list")
                .arg(Arg::new("type").long("type"))
                .arg(Arg::new("status").long("status"))
                .arg(Arg::new("category").long("category"))
                .arg(Arg::new("wallet").long("wallet"))
                .arg(Arg::new("from").long("from").value_name("YYYY-MM-DD"))
                .arg(Arg::new("to").long("to").value_name("YYYY-MM-DD"))
                .arg(Arg::new("search").long("search"))
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .value_parser(value_parser!(usize)),
                ),
        ))
        .subcommand(
            Command::new("approve")
                .arg(id_arg())
                .arg(Arg::new("by").long("by").required(true)),
        )
        .subcommand(Command::new("reject").arg(id_arg()))
        .subcommand(
            Command::new("pay")
                .arg(id_arg())
                .arg(Arg::new("date").long("date").value_name("YYYY-MM-DD")),
        )
        .subcommand(Command::new("complete").about("Close a paid transaction").arg(id_arg()))
        .subcommand(Command::new("rm").arg(id_arg()))
        .subcommand(json_flags(
            Command::new("pending").about("Pending transactions awaiting approval"),
        ))
        .subcommand(json_flags(
            Command::new("overdue")
                .about("Unpaid invoices past their due date")
                .arg(as_of_arg()),
        ))
}

fn budget_cmd() -> Command {
    Command::new("budget")
        .about("Monthly category budgets")
        .subcommand(
            Command::new("set")
                .arg(Arg::new("id").long("id"))
                .arg(Arg::new("wallet").long("wallet").required(true))
                .arg(Arg::new("category").long("category").required(true))
                .arg(Arg::new("month").long("month").required(true))
                .arg(Arg::new("limit").long("limit").required(true))
                .arg(Arg::new("subcategory").long("subcategory").default_value(""))
                .arg(Arg::new("department").long("department").default_value(""))
                .arg(Arg::new("forecast").long("forecast").default_value("0"))
                .arg(Arg::new("notes").long("notes").default_value("")),
        )
        .subcommand(json_flags(
            Command::new("list").arg(Arg::new("month").long("month")),
        ))
        .subcommand(json_flags(Command::new("show").arg(id_arg())))
        .subcommand(Command::new("rm").arg(id_arg()))
}

fn supplier_cmd() -> Command {
    Command::new("supplier")
        .about("Manage suppliers")
        .subcommand(
            Command::new("add")
                .arg(Arg::new("name").long("name").required(true))
                .arg(Arg::new("type").long("type").default_value(""))
                .arg(Arg::new("email").long("email").default_value(""))
                .arg(Arg::new("phone").long("phone").default_value(""))
                .arg(Arg::new("city").long("city").default_value(""))
                .arg(Arg::new("country").long("country").default_value(""))
                .arg(Arg::new("terms").long("terms").default_value("")),
        )
        .subcommand(json_flags(Command::new("list")))
        .subcommand(json_flags(
            Command::new("search").arg(Arg::new("query").required(true)),
        ))
        .subcommand(Command::new("rm").arg(id_arg()))
}

fn report_cmd() -> Command {
    let out = || Arg::new("out").long("out").required(true);
    Command::new("report")
        .about("Write reports to files")
        .subcommand(Command::new("transactions").about("CSV of transactions").arg(out()))
        .subcommand(Command::new("budgets").about("CSV of budgets").arg(out()))
        .subcommand(
            Command::new("summary")
                .about("Plain-text financial summary")
                .arg(out())
                .arg(as_of_arg()),
        )
        .subcommand(
            Command::new("json")
                .about("Dashboard as JSON")
                .arg(out())
                .arg(as_of_arg()),
        )
}

pub fn build_cli() -> Command {
    Command::new("fundsight")
        .about("Multi-company treasury, budgets and dashboard")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("company")
                .long("company")
                .global(true)
                .help("Company to operate on (defaults to `company use`)"),
        )
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(company_cmd())
        .subcommand(wallet_cmd())
        .subcommand(tx_cmd())
        .subcommand(budget_cmd())
        .subcommand(supplier_cmd())
        .subcommand(json_flags(
            Command::new("dashboard")
                .about("Aggregated dashboard for the company")
                .arg(as_of_arg()),
        ))
        .subcommand(json_flags(
            Command::new("alerts")
                .about("Alerts derived from budgets and recent expenses")
                .arg(Arg::new("severity").long("severity"))
                .arg(as_of_arg()),
        ))
        .subcommand(report_cmd())
        .subcommand(
            Command::new("sync")
                .about("Pull data from the REST backend")
                .subcommand(Command::new("pull").arg(Arg::new("url").long("url")))
                .subcommand(Command::new("set-url").arg(Arg::new("url").required(true))),
        )
        .subcommand(Command::new("doctor").about("Check data consistency"))
}
