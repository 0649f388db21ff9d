// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::TransactionStatus;

/// Domain errors raised by the store and the command layer.
#[derive(Debug, Error)]
pub enum FundsightError {
    #[error("No company selected: pass --company or run `company use <id>`")]
    NoCompanySelected,

    #[error("Company '{0}' not found")]
    CompanyNotFound(String),

    #[error("Wallet '{0}' not found")]
    WalletNotFound(String),

    #[error("Transaction '{0}' not found")]
    TransactionNotFound(String),

    #[error("Budget '{0}' not found")]
    BudgetNotFound(String),

    #[error("Supplier '{0}' not found")]
    SupplierNotFound(String),

    #[error("Cannot move transaction from {from} to {to}")]
    InvalidTransition {
        from: TransactionStatus,
        to: TransactionStatus,
    },

    #[error("Insufficient funds in wallet '{wallet}': need {needed}, available {available}")]
    InsufficientFunds {
        wallet: String,
        needed: Decimal,
        available: Decimal,
    },

    #[error("Balance of wallet '{0}' would overflow")]
    BalanceOverflow(String),

    #[error("Budget limit must be positive, got {0}")]
    NonPositiveLimit(Decimal),

    #[error("Amount cannot be negative, got {0}")]
    NegativeAmount(Decimal),

    #[error("Invalid {field} '{value}'")]
    InvalidValue { field: &'static str, value: String },
}
