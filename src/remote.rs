// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Where company data comes from, and an explicit cache in front of it.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::models::{Budget, Transaction, Wallet};
use crate::store;
use crate::utils::http_client;

/// A provider of one company's records.
pub trait DataSource {
    fn transactions(&self, company_id: &str) -> Result<Vec<Transaction>>;
    fn budgets(&self, company_id: &str) -> Result<Vec<Budget>>;
    fn wallets(&self, company_id: &str) -> Result<Vec<Wallet>>;
}

/// Client for a json-server style backend (`GET /{resource}?companyId=`).
pub struct RestClient {
    base_url: String,
    http: reqwest::blocking::Client,
}

impl RestClient {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: http_client()?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn fetch<T: DeserializeOwned>(&self, resource: &str, company_id: &str) -> Result<Vec<T>> {
        let url = format!("{}/{}", self.base_url, resource);
        debug!(%url, company = %company_id, "GET");
        let resp = self
            .http
            .get(&url)
            .query(&[("companyId", company_id)])
            .send()
            .with_context(|| format!("Request to {} failed", url))?
            .error_for_status()?;
        let items: Vec<T> = resp
            .json()
            .with_context(|| format!("Unexpected payload from {}", url))?;
        Ok(items)
    }
}

impl DataSource for RestClient {
    // The server-side filter is advisory; results are filtered again here.
    fn transactions(&self, company_id: &str) -> Result<Vec<Transaction>> {
        let mut v: Vec<Transaction> = self.fetch("transactions", company_id)?;
        v.retain(|t| t.company_id == company_id);
        Ok(v)
    }

    fn budgets(&self, company_id: &str) -> Result<Vec<Budget>> {
        let mut v: Vec<Budget> = self.fetch("budgets", company_id)?;
        v.retain(|b| b.company_id == company_id);
        Ok(v)
    }

    fn wallets(&self, company_id: &str) -> Result<Vec<Wallet>> {
        let mut v: Vec<Wallet> = self.fetch("wallets", company_id)?;
        v.retain(|w| w.company_id == company_id);
        Ok(v)
    }
}

/// The local SQLite store seen as a data source.
pub struct SqliteSource<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteSource<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl DataSource for SqliteSource<'_> {
    fn transactions(&self, company_id: &str) -> Result<Vec<Transaction>> {
        store::list_transactions(self.conn, company_id)
    }

    fn budgets(&self, company_id: &str) -> Result<Vec<Budget>> {
        store::list_budgets(self.conn, company_id)
    }

    fn wallets(&self, company_id: &str) -> Result<Vec<Wallet>> {
        store::list_wallets(self.conn, company_id)
    }
}

/// Everything fetched for one company at one point in time.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub company_id: String,
    pub fetched_at: DateTime<Utc>,
    pub transactions: Vec<Transaction>,
    pub budgets: Vec<Budget>,
    pub wallets: Vec<Wallet>,
}

/// Holds the last snapshot, keyed by company.
///
/// Nothing refreshes on its own: switching company or calling `refresh`
/// are the only ways new data is fetched.
pub struct SnapshotCache<S> {
    source: S,
    current: Option<Snapshot>,
}

impl<S: DataSource> SnapshotCache<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            current: None,
        }
    }

    /// Cached snapshot for `company_id`, fetching only on a key miss.
    pub fn load(&mut self, company_id: &str) -> Result<&Snapshot> {
        let hit = self
            .current
            .as_ref()
            .is_some_and(|s| s.company_id == company_id);
        if !hit {
            return self.refresh(company_id);
        }
        debug!(company = %company_id, "snapshot cache hit");
        self.current
            .as_ref()
            .context("snapshot cache emptied during load")
    }

    pub fn refresh(&mut self, company_id: &str) -> Result<&Snapshot> {
        let snapshot = Snapshot {
            company_id: company_id.to_string(),
            fetched_at: Utc::now(),
            transactions: self.source.transactions(company_id)?,
            budgets: self.source.budgets(company_id)?,
            wallets: self.source.wallets(company_id)?,
        };
        info!(
            company = %company_id,
            transactions = snapshot.transactions.len(),
            budgets = snapshot.budgets.len(),
            wallets = snapshot.wallets.len(),
            "snapshot fetched"
        );
        Ok(&*self.current.insert(snapshot))
    }

    pub fn invalidate(&mut self) {
        self.current = None;
    }

    pub fn cached_company(&self) -> Option<&str> {
        self.current.as_ref().map(|s| s.company_id.as_str())
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}
