//! The module contains the errors the ledger engine can raise.
//!
//! - [`Unauthorized`] when an operation is invoked without a resolved user
//!   identity.
//! - [`NotFound`] when a referenced entity is absent or owned by another user.
//! - [`InvalidAmount`] when a monetary input fails validation.
//! - [`Consistency`] when an atomic unit cannot be applied as a whole.
//!
//!  [`Unauthorized`]: LedgerError::Unauthorized
//!  [`NotFound`]: LedgerError::NotFound
//!  [`InvalidAmount`]: LedgerError::InvalidAmount
//!  [`Consistency`]: LedgerError::Consistency
use sea_orm::DbErr;
use thiserror::Error;

/// Ledger engine custom errors.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("unauthorized: no resolved user identity")]
    Unauthorized,
    #[error("\"{0}\" not found")]
    NotFound(String),
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    #[error("ledger inconsistency: {0}")]
    Consistency(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for LedgerError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Unauthorized, Self::Unauthorized) => true,
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::Consistency(a), Self::Consistency(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
