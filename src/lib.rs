// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod alerts;
pub mod budgeting;
pub mod cli;
pub mod commands;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod remote;
pub mod report;
pub mod store;
pub mod utils;

pub use dashboard::{compute_dashboard, DashboardData};
pub use error::FundsightError;
