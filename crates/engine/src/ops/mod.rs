use sea_orm::DatabaseConnection;
use serde::Serialize;

use crate::{LedgerError, ResultLedger};

mod accounts;
mod budgets;
mod seed;
mod transactions;

pub use accounts::{AccountStatement, AccountSummary};
pub use seed::SeedOutcome;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// The ledger consistency engine.
///
/// Every mutating operation runs inside one atomic unit of work: either all
/// of its writes take effect or none do.
#[derive(Debug)]
pub struct Ledger {
    database: DatabaseConnection,
}

impl Ledger {
    /// Return a builder for `Ledger`.
    pub fn builder() -> LedgerBuilder {
        LedgerBuilder::default()
    }
}

/// Rejects operations invoked without a resolved user identity.
fn require_user(user_id: &str) -> ResultLedger<()> {
    if user_id.trim().is_empty() {
        return Err(LedgerError::Unauthorized);
    }
    Ok(())
}

fn normalize_required_name(value: &str, label: &str) -> ResultLedger<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::InvalidAmount(format!(
            "{label} name must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

/// Tagged result for mutations invoked from user-facing forms.
///
/// Form handlers render the message instead of propagating an error, so
/// these operations never raise past the engine boundary.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FormOutcome<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> FormOutcome<T> {
    pub(crate) fn from_result(result: ResultLedger<T>) -> Self {
        match result {
            Ok(data) => Self {
                success: true,
                data: Some(data),
                error: None,
            },
            Err(LedgerError::Database(err)) => {
                tracing::error!("database error: {err}");
                Self {
                    success: false,
                    data: None,
                    error: Some("internal error".to_string()),
                }
            }
            Err(err) => Self {
                success: false,
                data: None,
                error: Some(err.to_string()),
            },
        }
    }
}

/// The builder for `Ledger`.
#[derive(Default)]
pub struct LedgerBuilder {
    database: DatabaseConnection,
}

impl LedgerBuilder {
    /// Pass the required database.
    pub fn database(mut self, db: DatabaseConnection) -> LedgerBuilder {
        self.database = db;
        self
    }

    /// Construct `Ledger`.
    pub fn build(self) -> Ledger {
        Ledger {
            database: self.database,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_identity_is_unauthorized() {
        assert_eq!(require_user(""), Err(LedgerError::Unauthorized));
        assert_eq!(require_user("   "), Err(LedgerError::Unauthorized));
        assert_eq!(require_user("alice"), Ok(()));
    }

    #[test]
    fn database_errors_are_collapsed_into_a_generic_message() {
        let result: ResultLedger<()> =
            Err(sea_orm::DbErr::Custom("connection lost".to_string()).into());
        let outcome = FormOutcome::from_result(result);

        assert!(!outcome.success);
        assert_eq!(outcome.error.as_deref(), Some("internal error"));
    }

    #[test]
    fn form_outcome_serializes_with_tagged_success() {
        let outcome = FormOutcome::from_result(Ok(3u64));
        let json = serde_json::to_value(&outcome).unwrap();

        assert_eq!(json["success"], serde_json::Value::Bool(true));
        assert_eq!(json["data"], serde_json::json!(3));
        assert_eq!(json["error"], serde_json::Value::Null);
    }
}
