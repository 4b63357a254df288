//! Seeding: replace an account's history with generated data.

use sea_orm::{QueryFilter, TransactionTrait, prelude::*, sea_query::Expr};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    LedgerError, ResultLedger, accounts,
    seed::{RandomSource, generate_history},
    transactions,
};

use super::{Ledger, require_user, with_tx};

/// Tagged result of a seeding run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SeedOutcome {
    pub success: bool,
    pub message: String,
}

impl Ledger {
    /// Replaces the target account's history with a generated 91-day one.
    ///
    /// In one atomic unit: deletes every existing transaction of the
    /// account, bulk-inserts the generated set, then sets the balance to the
    /// generated total. The balance is set directly, not as a delta, because
    /// the whole history is replaced.
    pub async fn seed_transactions(
        &self,
        account_id: Uuid,
        user_id: &str,
        rng: &mut dyn RandomSource,
    ) -> SeedOutcome {
        match self.try_seed_transactions(account_id, user_id, rng).await {
            Ok(created) => SeedOutcome {
                success: true,
                message: format!("created {created} transactions"),
            },
            Err(LedgerError::Database(err)) => {
                tracing::error!("database error: {err}");
                SeedOutcome {
                    success: false,
                    message: "internal error".to_string(),
                }
            }
            Err(err) => SeedOutcome {
                success: false,
                message: err.to_string(),
            },
        }
    }

    async fn try_seed_transactions(
        &self,
        account_id: Uuid,
        user_id: &str,
        rng: &mut dyn RandomSource,
    ) -> ResultLedger<usize> {
        require_user(user_id)?;

        let batch = generate_history(rng, user_id, account_id, chrono::Utc::now());

        with_tx!(self, |db_tx| {
            let owned = accounts::Entity::find_by_id(account_id.to_string())
                .filter(accounts::Column::UserId.eq(user_id))
                .one(&db_tx)
                .await?;
            if owned.is_none() {
                return Err(LedgerError::NotFound("account".to_string()));
            }

            transactions::Entity::delete_many()
                .filter(transactions::Column::AccountId.eq(account_id.to_string()))
                .exec(&db_tx)
                .await?;

            // insert_many rejects an empty set; the generator always emits
            // at least one transaction per day, but guard anyway.
            if !batch.transactions.is_empty() {
                transactions::Entity::insert_many(
                    batch.transactions.iter().map(transactions::ActiveModel::from),
                )
                .exec(&db_tx)
                .await?;
            }

            accounts::Entity::update_many()
                .col_expr(
                    accounts::Column::BalanceMinor,
                    Expr::value(batch.total.minor()),
                )
                .filter(accounts::Column::Id.eq(account_id.to_string()))
                .exec(&db_tx)
                .await?;

            tracing::debug!(
                created = batch.transactions.len(),
                balance = %batch.total,
                "seeded account history"
            );
            Ok(batch.transactions.len())
        })
    }
}
