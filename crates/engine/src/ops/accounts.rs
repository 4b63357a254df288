//! Account operations: reads, creation, deletion, default re-designation.

use sea_orm::{
    ActiveValue, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
    sea_query::Expr,
};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    Account, CreateAccountCmd, LedgerError, Money, ResultLedger, Transaction, accounts,
    transactions,
};

use super::{FormOutcome, Ledger, normalize_required_name, require_user, with_tx};

/// An account plus its transaction count, as listed on the dashboard.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AccountSummary {
    pub account: Account,
    pub transaction_count: u64,
}

/// An account with its full transaction history, newest first.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AccountStatement {
    pub account: Account,
    pub transactions: Vec<Transaction>,
}

impl Ledger {
    /// Lists the caller's accounts, newest first, with transaction counts.
    pub async fn user_accounts(&self, user_id: &str) -> ResultLedger<Vec<AccountSummary>> {
        require_user(user_id)?;

        let models = accounts::Entity::find()
            .filter(accounts::Column::UserId.eq(user_id))
            .order_by_desc(accounts::Column::CreatedAt)
            .all(&self.database)
            .await?;

        let mut summaries = Vec::with_capacity(models.len());
        for model in models {
            let transaction_count = transactions::Entity::find()
                .filter(transactions::Column::AccountId.eq(model.id.clone()))
                .count(&self.database)
                .await?;
            summaries.push(AccountSummary {
                account: Account::try_from(model)?,
                transaction_count,
            });
        }
        Ok(summaries)
    }

    /// Returns one account with its transactions (date descending), or
    /// `None` when the account is absent or owned by another user.
    pub async fn account_with_transactions(
        &self,
        account_id: Uuid,
        user_id: &str,
    ) -> ResultLedger<Option<AccountStatement>> {
        require_user(user_id)?;

        let Some(model) = accounts::Entity::find_by_id(account_id.to_string())
            .filter(accounts::Column::UserId.eq(user_id))
            .one(&self.database)
            .await?
        else {
            return Ok(None);
        };

        let tx_models = transactions::Entity::find()
            .filter(transactions::Column::AccountId.eq(model.id.clone()))
            .order_by_desc(transactions::Column::OccurredAt)
            .all(&self.database)
            .await?;

        let mut txs = Vec::with_capacity(tx_models.len());
        for tx_model in tx_models {
            txs.push(Transaction::try_from(tx_model)?);
        }

        Ok(Some(AccountStatement {
            account: Account::try_from(model)?,
            transactions: txs,
        }))
    }

    /// Creates an account from form input.
    ///
    /// The user's first account becomes default regardless of the requested
    /// flag; when the resolved flag is true, every other default is unset in
    /// the same atomic unit.
    pub async fn create_account(&self, cmd: CreateAccountCmd) -> FormOutcome<Account> {
        FormOutcome::from_result(self.try_create_account(cmd).await)
    }

    async fn try_create_account(&self, cmd: CreateAccountCmd) -> ResultLedger<Account> {
        require_user(&cmd.user_id)?;
        let name = normalize_required_name(&cmd.name, "account")?;
        let balance: Money = cmd.initial_balance.parse()?;

        with_tx!(self, |db_tx| {
            let existing = accounts::Entity::find()
                .filter(accounts::Column::UserId.eq(cmd.user_id.clone()))
                .count(&db_tx)
                .await?;
            let is_default = if existing == 0 {
                true
            } else {
                cmd.is_default.unwrap_or(false)
            };

            if is_default {
                accounts::Entity::update_many()
                    .col_expr(accounts::Column::IsDefault, Expr::value(false))
                    .filter(accounts::Column::UserId.eq(cmd.user_id.clone()))
                    .filter(accounts::Column::IsDefault.eq(true))
                    .exec(&db_tx)
                    .await?;
            }

            let account = Account::new(
                cmd.user_id.clone(),
                name,
                cmd.kind,
                balance,
                is_default,
                chrono::Utc::now(),
            );
            accounts::ActiveModel::from(&account).insert(&db_tx).await?;
            Ok(account)
        })
    }

    /// Deletes an account and all of its transactions in one atomic unit.
    ///
    /// Returns the number of cascaded transactions.
    pub async fn delete_account(&self, account_id: Uuid, user_id: &str) -> FormOutcome<u64> {
        FormOutcome::from_result(self.try_delete_account(account_id, user_id).await)
    }

    async fn try_delete_account(&self, account_id: Uuid, user_id: &str) -> ResultLedger<u64> {
        require_user(user_id)?;

        with_tx!(self, |db_tx| {
            let Some(model) = accounts::Entity::find_by_id(account_id.to_string())
                .filter(accounts::Column::UserId.eq(user_id))
                .one(&db_tx)
                .await?
            else {
                return Err(LedgerError::NotFound("account".to_string()));
            };

            let cascaded = transactions::Entity::delete_many()
                .filter(transactions::Column::AccountId.eq(model.id.clone()))
                .exec(&db_tx)
                .await?
                .rows_affected;
            accounts::Entity::delete_by_id(model.id).exec(&db_tx).await?;

            Ok(cascaded)
        })
    }

    /// Makes `account_id` the caller's single default account.
    ///
    /// Always unsets every other default first, then sets the target, inside
    /// one atomic unit. Idempotent.
    pub async fn update_default_account(
        &self,
        account_id: Uuid,
        user_id: &str,
    ) -> FormOutcome<Account> {
        FormOutcome::from_result(self.try_update_default_account(account_id, user_id).await)
    }

    async fn try_update_default_account(
        &self,
        account_id: Uuid,
        user_id: &str,
    ) -> ResultLedger<Account> {
        require_user(user_id)?;

        with_tx!(self, |db_tx| {
            let Some(model) = accounts::Entity::find_by_id(account_id.to_string())
                .filter(accounts::Column::UserId.eq(user_id))
                .one(&db_tx)
                .await?
            else {
                return Err(LedgerError::NotFound("account".to_string()));
            };

            accounts::Entity::update_many()
                .col_expr(accounts::Column::IsDefault, Expr::value(false))
                .filter(accounts::Column::UserId.eq(user_id))
                .filter(accounts::Column::IsDefault.eq(true))
                .exec(&db_tx)
                .await?;

            let active = accounts::ActiveModel {
                id: ActiveValue::Set(model.id.clone()),
                is_default: ActiveValue::Set(true),
                ..Default::default()
            };
            let updated = active.update(&db_tx).await?;

            Ok(Account::try_from(updated)?)
        })
    }
}
