//! Transaction operations: recording and bulk deletion.
//!
//! Balance deltas are expressed as in-place column increments inside the
//! same atomic unit as the transaction-row writes, so concurrent mutations
//! of the same account cannot lose an update.

use std::collections::HashMap;

use sea_orm::{
    DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*, sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    LedgerError, Money, RecordCmd, ResultLedger, Transaction, TransactionKind, accounts,
    transactions,
};

use super::{FormOutcome, Ledger, require_user, with_tx};

impl Ledger {
    /// Records an income transaction (increases the account balance).
    pub async fn income(&self, cmd: RecordCmd) -> ResultLedger<Transaction> {
        self.record(TransactionKind::Income, cmd).await
    }

    /// Records an expense transaction (decreases the account balance).
    pub async fn expense(&self, cmd: RecordCmd) -> ResultLedger<Transaction> {
        self.record(TransactionKind::Expense, cmd).await
    }

    async fn record(&self, kind: TransactionKind, cmd: RecordCmd) -> ResultLedger<Transaction> {
        require_user(&cmd.user_id)?;

        with_tx!(self, |db_tx| {
            let owned = accounts::Entity::find_by_id(cmd.account_id.to_string())
                .filter(accounts::Column::UserId.eq(cmd.user_id.clone()))
                .one(&db_tx)
                .await?;
            if owned.is_none() {
                return Err(LedgerError::NotFound("account".to_string()));
            }

            let tx = Transaction::new(
                cmd.user_id,
                cmd.account_id,
                kind,
                cmd.amount,
                cmd.occurred_at,
                cmd.category,
                cmd.note,
                cmd.status,
            )?;
            transactions::ActiveModel::from(&tx).insert(&db_tx).await?;
            Self::apply_delta(&db_tx, &tx.account_id.to_string(), tx.signed_amount()).await?;

            Ok(tx)
        })
    }

    /// Adds `delta` to the stored balance of one account.
    ///
    /// The increment happens in place (`balance = balance + delta`) so the
    /// store serializes conflicting updates; no error for a delta that
    /// drives the balance negative.
    async fn apply_delta(
        db_tx: &DatabaseTransaction,
        account_id: &str,
        delta: Money,
    ) -> ResultLedger<()> {
        let result = accounts::Entity::update_many()
            .col_expr(
                accounts::Column::BalanceMinor,
                Expr::col(accounts::Column::BalanceMinor).add(delta.minor()),
            )
            .filter(accounts::Column::Id.eq(account_id))
            .exec(db_tx)
            .await?;

        if result.rows_affected != 1 {
            return Err(LedgerError::Consistency(format!(
                "balance delta touched {} rows for account {account_id}",
                result.rows_affected
            )));
        }
        Ok(())
    }

    /// Deletes a batch of the caller's transactions and re-applies the
    /// inverse of their balance contributions, all in one atomic unit.
    ///
    /// Ids that are unknown or owned by another user are silently dropped
    /// from the delete set. An empty resolved set is a no-op success.
    pub async fn bulk_delete_transactions(
        &self,
        transaction_ids: &[Uuid],
        user_id: &str,
    ) -> FormOutcome<u64> {
        FormOutcome::from_result(self.try_bulk_delete(transaction_ids, user_id).await)
    }

    async fn try_bulk_delete(
        &self,
        transaction_ids: &[Uuid],
        user_id: &str,
    ) -> ResultLedger<u64> {
        require_user(user_id)?;

        let ids: Vec<String> = transaction_ids.iter().map(ToString::to_string).collect();
        let models = transactions::Entity::find()
            .filter(transactions::Column::Id.is_in(ids.clone()))
            .filter(transactions::Column::UserId.eq(user_id))
            .all(&self.database)
            .await?;
        if models.is_empty() {
            return Ok(0);
        }

        // Inverse contribution per account: deleting an expense restores
        // the amount, deleting an income removes it.
        let mut deltas: HashMap<String, i64> = HashMap::new();
        for model in &models {
            let kind = TransactionKind::try_from(model.kind.as_str())?;
            let inverse = -kind.signed(Money::new(model.amount_minor));
            *deltas.entry(model.account_id.clone()).or_insert(0) += inverse.minor();
        }

        with_tx!(self, |db_tx| {
            let deleted = transactions::Entity::delete_many()
                .filter(transactions::Column::Id.is_in(ids))
                .filter(transactions::Column::UserId.eq(user_id))
                .exec(&db_tx)
                .await?
                .rows_affected;

            for (account_id, delta_minor) in &deltas {
                Self::apply_delta(&db_tx, account_id, Money::new(*delta_minor)).await?;
            }

            tracing::debug!(deleted, accounts = deltas.len(), "bulk delete applied");
            Ok(deleted)
        })
    }

    /// Every transaction of the caller, newest first, for dashboard
    /// aggregates.
    pub async fn dashboard_transactions(&self, user_id: &str) -> ResultLedger<Vec<Transaction>> {
        require_user(user_id)?;

        let models = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id))
            .order_by_desc(transactions::Column::OccurredAt)
            .all(&self.database)
            .await?;

        let mut txs = Vec::with_capacity(models.len());
        for model in models {
            txs.push(Transaction::try_from(model)?);
        }
        Ok(txs)
    }
}
