// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use std::env;
use std::path::PathBuf;

use crate::error::FundsightError;
use crate::utils::{get_setting, set_setting};

pub const ENV_DB: &str = "FUNDSIGHT_DB";
pub const ENV_API_URL: &str = "FUNDSIGHT_API_URL";
pub const ENV_LOG: &str = "FUNDSIGHT_LOG";

pub const DEFAULT_API_URL: &str = "http://localhost:3000";
pub const DEFAULT_LOG_FILTER: &str = "fundsight=info";

const KEY_CURRENT_COMPANY: &str = "current_company";
const KEY_API_URL: &str = "api_url";

pub fn db_path() -> Result<PathBuf> {
    match env::var_os(ENV_DB) {
        Some(p) if !p.is_empty() => Ok(PathBuf::from(p)),
        _ => crate::db::default_db_path(),
    }
}

pub fn log_filter() -> String {
    env::var(ENV_LOG).unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string())
}

/// REST base URL: environment first, then the stored setting, then localhost.
pub fn api_url(conn: &Connection) -> Result<String> {
    if let Ok(v) = env::var(ENV_API_URL) {
        if !v.trim().is_empty() {
            return Ok(v.trim_end_matches('/').to_string());
        }
    }
    Ok(get_setting(conn, KEY_API_URL)?
        .map(|v| v.trim_end_matches('/').to_string())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string()))
}

pub fn set_api_url(conn: &Connection, url: &str) -> Result<()> {
    set_setting(conn, KEY_API_URL, url.trim_end_matches('/'))
}

pub fn current_company(conn: &Connection) -> Result<Option<String>> {
    get_setting(conn, KEY_CURRENT_COMPANY)
}

pub fn set_current_company(conn: &Connection, id: &str) -> Result<()> {
    set_setting(conn, KEY_CURRENT_COMPANY, id)
}

/// The company every command runs against.
///
/// An explicit `--company` wins over the stored selection.
pub fn resolve_company(conn: &Connection, flag: Option<&str>) -> Result<String> {
    if let Some(id) = flag {
        return Ok(id.to_string());
    }
    current_company(conn)?.ok_or_else(|| FundsightError::NoCompanySelected.into())
}
