// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Row mapping between SQLite and the domain models.
//!
//! Every query is scoped by company id.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::error::FundsightError;
use crate::models::{
    Budget, BudgetStatus, Company, Supplier, Transaction, TransactionStatus, TransactionType,
    Wallet,
};
use crate::utils::{canonical_month, decimal_column, parse_date, parse_month};

const COMPANY_COLS: &str = "id, name, industry, status, plan, created_at";
const WALLET_COLS: &str = "id, company_id, name, type, currency, balance, initial_balance, credit_limit, status, description, created_at";
const TX_COLS: &str = "id, company_id, wallet_id, type, status, amount, currency, category, subcategory, description, invoice_number, related_entity, date, due_date, paid_date, approved_by";
const BUDGET_COLS: &str = "id, company_id, wallet_id, department, category, subcategory, month, limit_amount, forecast, notes";
const SUPPLIER_COLS: &str = "id, company_id, name, type, email, phone, city, country, payment_terms, status, created_at";

fn opt_date(v: Option<String>) -> Result<Option<NaiveDate>> {
    v.filter(|s| !s.is_empty()).map(|s| parse_date(&s)).transpose()
}

fn company_from_row(r: &Row) -> Result<Company> {
    Ok(Company {
        id: r.get(0)?,
        name: r.get(1)?,
        industry: r.get(2)?,
        status: r.get::<_, String>(3)?.parse()?,
        plan: r.get::<_, String>(4)?.parse()?,
        created_at: r.get(5)?,
    })
}

fn wallet_from_row(r: &Row) -> Result<Wallet> {
    Ok(Wallet {
        id: r.get(0)?,
        company_id: r.get(1)?,
        name: r.get(2)?,
        r#type: r.get::<_, String>(3)?.parse()?,
        currency: r.get(4)?,
        balance: decimal_column(&r.get::<_, String>(5)?, "wallet balance")?,
        initial_balance: decimal_column(&r.get::<_, String>(6)?, "initial balance")?,
        credit_limit: decimal_column(&r.get::<_, String>(7)?, "credit limit")?,
        status: r.get::<_, String>(8)?.parse()?,
        description: r.get(9)?,
        created_at: r.get(10)?,
    })
}

fn transaction_from_row(r: &Row) -> Result<Transaction> {
    let id: String = r.get(0)?;
    let date: String = r.get(12)?;
    Ok(Transaction {
        company_id: r.get(1)?,
        wallet_id: r.get(2)?,
        r#type: r.get::<_, String>(3)?.parse()?,
        status: r.get::<_, String>(4)?.parse()?,
        amount: decimal_column(&r.get::<_, String>(5)?, "amount")?,
        currency: r.get(6)?,
        category: r.get(7)?,
        subcategory: r.get(8)?,
        description: r.get(9)?,
        invoice_number: r.get(10)?,
        related_entity: r.get(11)?,
        date: parse_date(&date).with_context(|| format!("Transaction {}", id))?,
        due_date: opt_date(r.get(13)?)?,
        paid_date: opt_date(r.get(14)?)?,
        approved_by: r.get(15)?,
        id,
    })
}

// `spent` and `status` are placeholders until `budgeting::derive` runs.
fn budget_from_row(r: &Row) -> Result<Budget> {
    Ok(Budget {
        id: r.get(0)?,
        company_id: r.get(1)?,
        wallet_id: r.get(2)?,
        department: r.get(3)?,
        category: r.get(4)?,
        subcategory: r.get(5)?,
        month: r.get(6)?,
        limit: decimal_column(&r.get::<_, String>(7)?, "budget limit")?,
        spent: Decimal::ZERO,
        forecast: decimal_column(&r.get::<_, String>(8)?, "forecast")?,
        status: BudgetStatus::Pending,
        notes: r.get(9)?,
    })
}

fn supplier_from_row(r: &Row) -> Result<Supplier> {
    Ok(Supplier {
        id: r.get(0)?,
        company_id: r.get(1)?,
        name: r.get(2)?,
        r#type: r.get(3)?,
        email: r.get(4)?,
        phone: r.get(5)?,
        city: r.get(6)?,
        country: r.get(7)?,
        payment_terms: r.get(8)?,
        status: r.get::<_, String>(9)?.parse()?,
        created_at: r.get(10)?,
    })
}

fn collect<T>(
    conn: &Connection,
    sql: &str,
    p: impl rusqlite::Params,
    map: fn(&Row) -> Result<T>,
) -> Result<Vec<T>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(p)?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        out.push(map(r)?);
    }
    Ok(out)
}

fn first<T>(
    conn: &Connection,
    sql: &str,
    p: impl rusqlite::Params,
    map: fn(&Row) -> Result<T>,
) -> Result<Option<T>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(p)?;
    match rows.next()? {
        Some(r) => Ok(Some(map(r)?)),
        None => Ok(None),
    }
}

// ----- companies -----

pub fn upsert_company(conn: &Connection, c: &Company) -> Result<()> {
    conn.execute(
        "INSERT INTO companies(id, name, industry, status, plan) VALUES (?1,?2,?3,?4,?5)
         ON CONFLICT(id) DO UPDATE SET name=excluded.name, industry=excluded.industry,
            status=excluded.status, plan=excluded.plan",
        params![c.id, c.name, c.industry, c.status.as_str(), c.plan.as_str()],
    )?;
    Ok(())
}

pub fn list_companies(conn: &Connection) -> Result<Vec<Company>> {
    collect(
        conn,
        &format!("SELECT {COMPANY_COLS} FROM companies ORDER BY name"),
        [],
        company_from_row,
    )
}

pub fn get_company(conn: &Connection, id: &str) -> Result<Company> {
    first(
        conn,
        &format!("SELECT {COMPANY_COLS} FROM companies WHERE id=?1"),
        params![id],
        company_from_row,
    )?
    .ok_or_else(|| FundsightError::CompanyNotFound(id.to_string()).into())
}

pub fn company_exists(conn: &Connection, id: &str) -> Result<bool> {
    let v: Option<i64> = conn
        .query_row("SELECT 1 FROM companies WHERE id=?1", params![id], |r| {
            r.get(0)
        })
        .optional()?;
    Ok(v.is_some())
}

// ----- wallets -----

pub fn upsert_wallet(conn: &Connection, w: &Wallet) -> Result<()> {
    conn.execute(
        "INSERT INTO wallets(id, company_id, name, type, currency, balance, initial_balance, credit_limit, status, description)
         VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10)
         ON CONFLICT(id) DO UPDATE SET name=excluded.name, type=excluded.type, currency=excluded.currency,
            balance=excluded.balance, initial_balance=excluded.initial_balance,
            credit_limit=excluded.credit_limit, status=excluded.status, description=excluded.description",
        params![
            w.id,
            w.company_id,
            w.name,
            w.r#type.as_str(),
            w.currency,
            w.balance.to_string(),
            w.initial_balance.to_string(),
            w.credit_limit.to_string(),
            w.status.as_str(),
            w.description
        ],
    )?;
    Ok(())
}

pub fn list_wallets(conn: &Connection, company_id: &str) -> Result<Vec<Wallet>> {
    collect(
        conn,
        &format!("SELECT {WALLET_COLS} FROM wallets WHERE company_id=?1 ORDER BY name"),
        params![company_id],
        wallet_from_row,
    )
}

pub fn get_wallet(conn: &Connection, company_id: &str, id: &str) -> Result<Wallet> {
    first(
        conn,
        &format!("SELECT {WALLET_COLS} FROM wallets WHERE company_id=?1 AND id=?2"),
        params![company_id, id],
        wallet_from_row,
    )?
    .ok_or_else(|| FundsightError::WalletNotFound(id.to_string()).into())
}

fn adjust_wallet_balance(conn: &Connection, wallet: &Wallet, delta: Decimal) -> Result<()> {
    let next = wallet
        .balance
        .checked_add(delta)
        .ok_or_else(|| FundsightError::BalanceOverflow(wallet.id.clone()))?;
    conn.execute(
        "UPDATE wallets SET balance=?1 WHERE id=?2",
        params![next.to_string(), wallet.id],
    )?;
    debug!(wallet = %wallet.id, %delta, balance = %next, "wallet balance adjusted");
    Ok(())
}

pub fn delete_wallet(conn: &Connection, company_id: &str, id: &str) -> Result<()> {
    let n = conn.execute(
        "DELETE FROM wallets WHERE company_id=?1 AND id=?2",
        params![company_id, id],
    )?;
    if n == 0 {
        return Err(FundsightError::WalletNotFound(id.to_string()).into());
    }
    Ok(())
}

// ----- transactions -----

/// Inserts or replaces a row without touching wallet balances.
pub fn upsert_transaction(conn: &Connection, t: &Transaction) -> Result<()> {
    conn.execute(
        &format!(
            "INSERT INTO transactions({TX_COLS}) VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14,?15,?16)
             ON CONFLICT(id) DO UPDATE SET status=excluded.status, approved_by=excluded.approved_by,
                paid_date=excluded.paid_date"
        ),
        params![
            t.id,
            t.company_id,
            t.wallet_id,
            t.r#type.as_str(),
            t.status.as_str(),
            t.amount.to_string(),
            t.currency,
            t.category,
            t.subcategory,
            t.description,
            t.invoice_number,
            t.related_entity,
            t.date.to_string(),
            t.due_date.map(|d| d.to_string()),
            t.paid_date.map(|d| d.to_string()),
            t.approved_by
        ],
    )?;
    Ok(())
}

/// Stores a new transaction and moves its wallet balance by the signed amount.
///
/// A debit beyond balance plus credit line fails unless `allow_overdraft`.
pub fn record_transaction(
    conn: &mut Connection,
    t: &Transaction,
    allow_overdraft: bool,
) -> Result<()> {
    if t.amount.is_sign_negative() && !t.amount.is_zero() {
        return Err(FundsightError::NegativeAmount(t.amount).into());
    }
    let db_tx = conn.transaction()?;
    let wallet = get_wallet(&db_tx, &t.company_id, &t.wallet_id)?;
    if !t.r#type.is_credit() && !allow_overdraft && !wallet.can_debit(t.amount) {
        return Err(FundsightError::InsufficientFunds {
            wallet: wallet.id.clone(),
            needed: t.amount,
            available: wallet.available(),
        }
        .into());
    }
    upsert_transaction(&db_tx, t)?;
    adjust_wallet_balance(&db_tx, &wallet, t.signed_amount())?;
    db_tx.commit()?;
    info!(id = %t.id, kind = %t.r#type, amount = %t.amount, "transaction recorded");
    Ok(())
}

/// Company transactions in insertion order.
pub fn list_transactions(conn: &Connection, company_id: &str) -> Result<Vec<Transaction>> {
    collect(
        conn,
        &format!("SELECT {TX_COLS} FROM transactions WHERE company_id=?1 ORDER BY rowid"),
        params![company_id],
        transaction_from_row,
    )
}

/// Optional filters for listing transactions; unset fields match everything.
#[derive(Debug, Default, Clone)]
pub struct TransactionQuery {
    pub r#type: Option<TransactionType>,
    pub status: Option<TransactionStatus>,
    pub category: Option<String>,
    pub wallet_id: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    /// Case-insensitive match on description or invoice number.
    pub search: Option<String>,
    pub limit: Option<usize>,
}

/// Newest first.
pub fn query_transactions(
    conn: &Connection,
    company_id: &str,
    q: &TransactionQuery,
) -> Result<Vec<Transaction>> {
    let mut sql = format!("SELECT {TX_COLS} FROM transactions WHERE company_id=?");
    let mut params_vec: Vec<String> = vec![company_id.to_string()];

    if let Some(t) = q.r#type {
        sql.push_str(" AND type=?");
        params_vec.push(t.as_str().into());
    }
    if let Some(s) = q.status {
        sql.push_str(" AND status=?");
        params_vec.push(s.as_str().into());
    }
    if let Some(cat) = &q.category {
        sql.push_str(" AND category=?");
        params_vec.push(cat.clone());
    }
    if let Some(w) = &q.wallet_id {
        sql.push_str(" AND wallet_id=?");
        params_vec.push(w.clone());
    }
    if let Some(from) = q.from {
        sql.push_str(" AND date>=?");
        params_vec.push(from.to_string());
    }
    if let Some(to) = q.to {
        sql.push_str(" AND date<=?");
        params_vec.push(to.to_string());
    }
    if let Some(needle) = &q.search {
        let pattern = format!("%{}%", needle.to_lowercase());
        sql.push_str(" AND (lower(description) LIKE ? OR lower(IFNULL(invoice_number,'')) LIKE ?)");
        params_vec.push(pattern.clone());
        params_vec.push(pattern);
    }
    sql.push_str(" ORDER BY date DESC, rowid DESC");
    if let Some(limit) = q.limit {
        sql.push_str(" LIMIT ?");
        params_vec.push(limit.to_string());
    }
    debug!(%sql, "transaction query");

    collect(
        conn,
        &sql,
        rusqlite::params_from_iter(params_vec.iter()),
        transaction_from_row,
    )
}

pub fn get_transaction(conn: &Connection, company_id: &str, id: &str) -> Result<Transaction> {
    first(
        conn,
        &format!("SELECT {TX_COLS} FROM transactions WHERE company_id=?1 AND id=?2"),
        params![company_id, id],
        transaction_from_row,
    )?
    .ok_or_else(|| FundsightError::TransactionNotFound(id.to_string()).into())
}

/// Moves a transaction to `next`, enforcing the allowed status changes.
///
/// Only status, approver and paid date ever change after insertion.
pub fn transition(
    conn: &Connection,
    company_id: &str,
    id: &str,
    next: TransactionStatus,
    approved_by: Option<&str>,
    paid_on: Option<NaiveDate>,
) -> Result<Transaction> {
    let mut t = get_transaction(conn, company_id, id)?;
    if !t.status.can_transition_to(next) {
        return Err(FundsightError::InvalidTransition {
            from: t.status,
            to: next,
        }
        .into());
    }
    t.status = next;
    if let Some(who) = approved_by {
        t.approved_by = Some(who.to_string());
    }
    if next == TransactionStatus::Paid {
        t.paid_date = paid_on.or(t.paid_date);
    }
    conn.execute(
        "UPDATE transactions SET status=?1, approved_by=?2, paid_date=?3 WHERE company_id=?4 AND id=?5",
        params![
            t.status.as_str(),
            t.approved_by,
            t.paid_date.map(|d| d.to_string()),
            company_id,
            id
        ],
    )?;
    info!(%id, status = %next, "transaction status changed");
    Ok(t)
}

pub fn delete_transaction(conn: &Connection, company_id: &str, id: &str) -> Result<()> {
    let n = conn.execute(
        "DELETE FROM transactions WHERE company_id=?1 AND id=?2",
        params![company_id, id],
    )?;
    if n == 0 {
        return Err(FundsightError::TransactionNotFound(id.to_string()).into());
    }
    Ok(())
}

// ----- budgets -----

/// The budget's `spent` and `status` are never written.
pub fn upsert_budget(conn: &Connection, b: &Budget) -> Result<()> {
    if b.limit <= Decimal::ZERO {
        return Err(FundsightError::NonPositiveLimit(b.limit).into());
    }
    let month = parse_month(&b.month)?;
    store_budget_row(conn, &Budget { month, ..b.clone() })
}

/// Like `upsert_budget` but accepts any limit, for data synced from elsewhere.
///
/// Months are zero-padded when they parse; anything else is kept for `doctor`.
pub fn import_budget(conn: &Connection, b: &Budget) -> Result<()> {
    match canonical_month(&b.month) {
        Some(month) if month != b.month => store_budget_row(conn, &Budget { month, ..b.clone() }),
        _ => store_budget_row(conn, b),
    }
}

fn store_budget_row(conn: &Connection, b: &Budget) -> Result<()> {
    conn.execute(
        &format!(
            "INSERT INTO budgets({BUDGET_COLS}) VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10)
             ON CONFLICT(id) DO UPDATE SET wallet_id=excluded.wallet_id, department=excluded.department,
                category=excluded.category, subcategory=excluded.subcategory, month=excluded.month,
                limit_amount=excluded.limit_amount, forecast=excluded.forecast, notes=excluded.notes"
        ),
        params![
            b.id,
            b.company_id,
            b.wallet_id,
            b.department,
            b.category,
            b.subcategory,
            b.month,
            b.limit.to_string(),
            b.forecast.to_string(),
            b.notes
        ],
    )?;
    Ok(())
}

pub fn list_budgets(conn: &Connection, company_id: &str) -> Result<Vec<Budget>> {
    collect(
        conn,
        &format!("SELECT {BUDGET_COLS} FROM budgets WHERE company_id=?1 ORDER BY month DESC, category, rowid"),
        params![company_id],
        budget_from_row,
    )
}

pub fn get_budget(conn: &Connection, company_id: &str, id: &str) -> Result<Budget> {
    first(
        conn,
        &format!("SELECT {BUDGET_COLS} FROM budgets WHERE company_id=?1 AND id=?2"),
        params![company_id, id],
        budget_from_row,
    )?
    .ok_or_else(|| FundsightError::BudgetNotFound(id.to_string()).into())
}

pub fn delete_budget(conn: &Connection, company_id: &str, id: &str) -> Result<()> {
    let n = conn.execute(
        "DELETE FROM budgets WHERE company_id=?1 AND id=?2",
        params![company_id, id],
    )?;
    if n == 0 {
        return Err(FundsightError::BudgetNotFound(id.to_string()).into());
    }
    Ok(())
}

// ----- suppliers -----

pub fn upsert_supplier(conn: &Connection, s: &Supplier) -> Result<()> {
    conn.execute(
        &format!(
            "INSERT INTO suppliers({SUPPLIER_COLS}) VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,datetime('now'))
             ON CONFLICT(id) DO UPDATE SET name=excluded.name, type=excluded.type, email=excluded.email,
                phone=excluded.phone, city=excluded.city, country=excluded.country,
                payment_terms=excluded.payment_terms, status=excluded.status"
        ),
        params![
            s.id,
            s.company_id,
            s.name,
            s.r#type,
            s.email,
            s.phone,
            s.city,
            s.country,
            s.payment_terms,
            s.status.as_str()
        ],
    )?;
    Ok(())
}

pub fn list_suppliers(conn: &Connection, company_id: &str) -> Result<Vec<Supplier>> {
    collect(
        conn,
        &format!("SELECT {SUPPLIER_COLS} FROM suppliers WHERE company_id=?1 ORDER BY name"),
        params![company_id],
        supplier_from_row,
    )
}

/// Case-insensitive match on name, email or city.
pub fn search_suppliers(conn: &Connection, company_id: &str, query: &str) -> Result<Vec<Supplier>> {
    let pattern = format!("%{}%", query.to_lowercase());
    collect(
        conn,
        &format!(
            "SELECT {SUPPLIER_COLS} FROM suppliers WHERE company_id=?1
             AND (lower(name) LIKE ?2 OR lower(email) LIKE ?2 OR lower(city) LIKE ?2)
             ORDER BY name"
        ),
        params![company_id, pattern],
        supplier_from_row,
    )
}

pub fn delete_supplier(conn: &Connection, company_id: &str, id: &str) -> Result<()> {
    let n = conn.execute(
        "DELETE FROM suppliers WHERE company_id=?1 AND id=?2",
        params![company_id, id],
    )?;
    if n == 0 {
        return Err(FundsightError::SupplierNotFound(id.to_string()).into());
    }
    Ok(())
}
