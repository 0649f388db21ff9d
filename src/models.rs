// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::FundsightError;

/// Declares a closed set of lowercase string values shared by serde, SQLite and the CLI.
macro_rules! string_enum {
    ($(#[$meta:meta])* $name:ident, $field:literal { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $text)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = FundsightError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($text => Ok($name::$variant),)+
                    _ => Err(FundsightError::InvalidValue {
                        field: $field,
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

string_enum!(CompanyStatus, "company status" {
    Active => "active",
    Suspended => "suspended",
    Archived => "archived",
});

string_enum!(CompanyPlan, "company plan" {
    Starter => "starter",
    Standard => "standard",
    Premium => "premium",
    Enterprise => "enterprise",
});

string_enum!(WalletType, "wallet type" {
    Operational => "operational",
    Savings => "savings",
    ClientFunds => "client_funds",
    Investment => "investment",
    Reserve => "reserve",
});

string_enum!(WalletStatus, "wallet status" {
    Active => "active",
    Frozen => "frozen",
    Suspended => "suspended",
});

string_enum!(
    /// Sign of a transaction's amount is implied by its type.
    TransactionType, "transaction type" {
    Invoice => "invoice",
    Expense => "expense",
    Transfer => "transfer",
    Income => "income",
    Adjustment => "adjustment",
});

string_enum!(TransactionStatus, "transaction status" {
    Pending => "pending",
    Confirmed => "confirmed",
    Paid => "paid",
    Rejected => "rejected",
    Completed => "completed",
});

string_enum!(BudgetStatus, "budget status" {
    Healthy => "healthy",
    Warning => "warning",
    Exceeded => "exceeded",
    Pending => "pending",
});

string_enum!(SupplierStatus, "supplier status" {
    Active => "active",
    Inactive => "inactive",
    Blocked => "blocked",
});

string_enum!(AlertType, "alert type" {
    LowBalance => "low_balance",
    BudgetWarning => "budget_warning",
    InvoicePending => "invoice_pending",
    InvoiceOverdue => "invoice_overdue",
    TransactionAnomaly => "transaction_anomaly",
    ApprovalRequired => "approval_required",
});

string_enum!(AlertSeverity, "alert severity" {
    Info => "info",
    Warning => "warning",
    Danger => "danger",
});

impl TransactionType {
    /// Income and invoices credit a wallet; everything else debits it.
    pub fn is_credit(&self) -> bool {
        matches!(self, TransactionType::Income | TransactionType::Invoice)
    }
}

impl TransactionStatus {
    pub fn can_transition_to(&self, next: TransactionStatus) -> bool {
        use TransactionStatus::*;
        match (*self, next) {
            (Pending, Confirmed) => true,
            (Pending | Confirmed, Rejected) => true,
            (Pending | Confirmed, Paid) => true,
            (Paid, Completed) => true,
            _ => false,
        }
    }
}

impl Default for BudgetStatus {
    fn default() -> Self {
        BudgetStatus::Pending
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub industry: String,
    pub status: CompanyStatus,
    pub plan: CompanyPlan,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    pub id: String,
    pub company_id: String,
    pub name: String,
    pub r#type: WalletType,
    pub currency: String,
    pub balance: Decimal,
    #[serde(default)]
    pub initial_balance: Decimal,
    #[serde(default)]
    pub credit_limit: Decimal,
    pub status: WalletStatus,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub created_at: String,
}

impl Wallet {
    /// Funds available for a debit, including the credit line.
    pub fn available(&self) -> Decimal {
        self.balance.saturating_add(self.credit_limit)
    }

    pub fn can_debit(&self, amount: Decimal) -> bool {
        amount <= self.available()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub company_id: String,
    pub wallet_id: String,
    pub r#type: TransactionType,
    pub status: TransactionStatus,
    pub amount: Decimal,
    pub currency: String,
    pub category: String,
    #[serde(default)]
    pub subcategory: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_entity: Option<String>,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<String>,
}

impl Transaction {
    /// Amount with the sign implied by the transaction type.
    pub fn signed_amount(&self) -> Decimal {
        if self.r#type.is_credit() {
            self.amount
        } else {
            -self.amount
        }
    }

    pub fn is_expense(&self) -> bool {
        self.r#type == TransactionType::Expense
    }

    /// Paid income or paid invoice.
    pub fn is_realized_income(&self) -> bool {
        self.r#type.is_credit() && self.status == TransactionStatus::Paid
    }

    pub fn is_unpaid_invoice(&self) -> bool {
        self.r#type == TransactionType::Invoice && self.status != TransactionStatus::Paid
    }

    pub fn is_awaiting_approval(&self) -> bool {
        self.status == TransactionStatus::Pending && self.approved_by.is_none()
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.is_unpaid_invoice() && self.due_date.is_some_and(|d| d < today)
    }

    /// Year-month bucket key, e.g. `2024-01`.
    pub fn month_key(&self) -> String {
        self.date.format("%Y-%m").to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: String,
    pub company_id: String,
    pub wallet_id: String,
    #[serde(default)]
    pub department: String,
    pub category: String,
    #[serde(default)]
    pub subcategory: String,
    pub month: String, // YYYY-MM
    pub limit: Decimal,
    /// Always recomputed from transactions; see `budgeting::derive`.
    #[serde(default)]
    pub spent: Decimal,
    #[serde(default)]
    pub forecast: Decimal,
    #[serde(default)]
    pub status: BudgetStatus,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub id: String,
    pub company_id: String,
    pub name: String,
    #[serde(default)]
    pub r#type: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub payment_terms: String,
    pub status: SupplierStatus,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    pub company_id: String,
    pub r#type: AlertType,
    pub severity: AlertSeverity,
    pub title: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_value: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub read: bool,
}
