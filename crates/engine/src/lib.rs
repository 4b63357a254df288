//! Centime ledger engine.
//!
//! The consistency core of a personal-finance ledger: accounts with
//! denormalized balances, income/expense transactions, a single default
//! account per user, a monthly budget, and a synthetic history generator.
//!
//! Every mutating operation runs inside one atomic unit of work against the
//! database; balances are maintained by deltas applied in the same unit as
//! the transaction writes, so `balance == sum of signed transaction amounts`
//! holds after every operation. The presentation layer (forms, pages,
//! transport) is an external collaborator that calls into [`Ledger`] and
//! renders its results.

pub use accounts::{Account, AccountKind};
pub use budgets::{Budget, BudgetUsage, Severity};
pub use commands::{CreateAccountCmd, RecordCmd};
pub use error::LedgerError;
pub use money::Money;
pub use ops::{AccountStatement, AccountSummary, FormOutcome, Ledger, LedgerBuilder, SeedOutcome};
pub use seed::{RandomSource, SeedBatch, ThreadRandom, generate_history};
pub use transactions::{Transaction, TransactionKind, TransactionStatus};

pub mod accounts;
pub mod budgets;
mod commands;
mod error;
mod money;
mod ops;
pub mod seed;
pub mod transactions;

pub type ResultLedger<T> = Result<T, LedgerError>;
