//! Command structs for engine write operations.
//!
//! These types group parameters for the mutating operations, keeping call
//! sites readable and avoiding long argument lists.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{AccountKind, Money, TransactionStatus};

/// Create an account.
///
/// `initial_balance` stays a decimal string as submitted by the form; the
/// engine parses and validates it before any write.
#[derive(Clone, Debug)]
pub struct CreateAccountCmd {
    pub user_id: String,
    pub name: String,
    pub kind: AccountKind,
    pub initial_balance: String,
    /// `None` means the caller expressed no preference. The first account of
    /// a user becomes default regardless of this field.
    pub is_default: Option<bool>,
}

impl CreateAccountCmd {
    #[must_use]
    pub fn new(
        user_id: impl Into<String>,
        name: impl Into<String>,
        kind: AccountKind,
        initial_balance: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            name: name.into(),
            kind,
            initial_balance: initial_balance.into(),
            is_default: None,
        }
    }

    #[must_use]
    pub fn default_account(mut self, is_default: bool) -> Self {
        self.is_default = Some(is_default);
        self
    }
}

/// Record an income or expense transaction.
#[derive(Clone, Debug)]
pub struct RecordCmd {
    pub user_id: String,
    pub account_id: Uuid,
    pub amount: Money,
    pub category: String,
    pub note: Option<String>,
    pub status: TransactionStatus,
    pub occurred_at: DateTime<Utc>,
}

impl RecordCmd {
    #[must_use]
    pub fn new(
        user_id: impl Into<String>,
        account_id: Uuid,
        amount: Money,
        category: impl Into<String>,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            account_id,
            amount,
            category: category.into(),
            note: None,
            status: TransactionStatus::default(),
            occurred_at,
        }
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    #[must_use]
    pub fn status(mut self, status: TransactionStatus) -> Self {
        self.status = status;
        self
    }
}
