//! Budget operations.
//!
//! The monthly budget is tracked against expenses on the default account
//! only; evaluation of percent-used and severity lives in
//! [`crate::BudgetUsage`] and stays pure.

use chrono::{DateTime, Datelike, TimeZone, Utc};
use sea_orm::{
    FromQueryResult, QueryFilter, QuerySelect, prelude::*, sea_query::OnConflict,
};

use crate::{
    Budget, LedgerError, Money, ResultLedger, TransactionKind, accounts, budgets, transactions,
};

use super::{Ledger, require_user};

#[derive(FromQueryResult)]
struct ExpenseTotal {
    total: Option<i64>,
}

impl Ledger {
    /// Creates or replaces the caller's budget. Rejects non-positive
    /// amounts before any write.
    pub async fn update_budget(&self, user_id: &str, amount: Money) -> ResultLedger<Budget> {
        require_user(user_id)?;
        let budget = Budget::new(user_id.to_string(), amount, Utc::now())?;

        budgets::Entity::insert(budgets::ActiveModel::from(&budget))
            .on_conflict(
                OnConflict::column(budgets::Column::UserId)
                    .update_columns([budgets::Column::AmountMinor, budgets::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec(&self.database)
            .await?;

        Ok(budget)
    }

    /// Returns the caller's budget (if any) together with the sum of expense
    /// transactions on the default account dated within the calendar month
    /// of `now`.
    ///
    /// Without a default account the expense total is zero.
    pub async fn current_budget(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> ResultLedger<(Option<Budget>, Money)> {
        require_user(user_id)?;

        let budget = budgets::Entity::find_by_id(user_id)
            .one(&self.database)
            .await?
            .map(Budget::from);

        let Some(default_account) = accounts::Entity::find()
            .filter(accounts::Column::UserId.eq(user_id))
            .filter(accounts::Column::IsDefault.eq(true))
            .one(&self.database)
            .await?
        else {
            return Ok((budget, Money::ZERO));
        };

        let (month_start, month_end) = month_bounds(now)?;
        let row = transactions::Entity::find()
            .select_only()
            .column_as(transactions::Column::AmountMinor.sum(), "total")
            .filter(transactions::Column::AccountId.eq(default_account.id))
            .filter(transactions::Column::Kind.eq(TransactionKind::Expense.as_str()))
            .filter(transactions::Column::OccurredAt.gte(month_start))
            .filter(transactions::Column::OccurredAt.lt(month_end))
            .into_model::<ExpenseTotal>()
            .one(&self.database)
            .await?;

        let expenses = Money::new(row.and_then(|r| r.total).unwrap_or(0));
        Ok((budget, expenses))
    }
}

/// First instants of the month of `now` and of the following month.
fn month_bounds(now: DateTime<Utc>) -> ResultLedger<(DateTime<Utc>, DateTime<Utc>)> {
    let invalid = || LedgerError::Consistency("invalid calendar month bounds".to_string());

    let start = Utc
        .with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
        .single()
        .ok_or_else(invalid)?;
    let (next_year, next_month) = if now.month() == 12 {
        (now.year() + 1, 1)
    } else {
        (now.year(), now.month() + 1)
    };
    let end = Utc
        .with_ymd_and_hms(next_year, next_month, 1, 0, 0, 0)
        .single()
        .ok_or_else(invalid)?;

    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_bounds_cover_the_calendar_month() {
        let now = Utc.with_ymd_and_hms(2026, 8, 29, 15, 30, 0).unwrap();
        let (start, end) = month_bounds(now).unwrap();

        assert_eq!(start, Utc.with_ymd_and_hms(2026, 8, 1, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2026, 9, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn month_bounds_roll_over_december() {
        let now = Utc.with_ymd_and_hms(2026, 12, 31, 23, 59, 59).unwrap();
        let (start, end) = month_bounds(now).unwrap();

        assert_eq!(start, Utc.with_ymd_and_hms(2026, 12, 1, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2027, 1, 1, 0, 0, 0).unwrap());
    }
}
