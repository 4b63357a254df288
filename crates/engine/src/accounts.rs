//! Account primitives and their persistence model.
//!
//! An `Account` is a container of transactions with a denormalized balance.
//! The engine keeps the stored balance equal to the signed sum of the
//! account's transactions after every mutation.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{LedgerError, Money, ResultLedger};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    Current,
    Savings,
}

impl AccountKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Current => "current",
            Self::Savings => "savings",
        }
    }
}

impl TryFrom<&str> for AccountKind {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "current" => Ok(Self::Current),
            "savings" => Ok(Self::Savings),
            other => Err(LedgerError::Consistency(format!(
                "invalid account kind: {other}"
            ))),
        }
    }
}

/// An account owned by a single user.
///
/// At most one account per user has `is_default = true`, and exactly one
/// whenever the user owns at least one account. The default account drives
/// budget tracking.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub kind: AccountKind,
    /// Signed balance in cents; negative balances are valid (overdraft).
    pub balance: Money,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn new(
        user_id: String,
        name: String,
        kind: AccountKind,
        balance: Money,
        is_default: bool,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            name,
            kind,
            balance,
            is_default,
            created_at,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub kind: String,
    pub balance_minor: i64,
    pub is_default: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Account> for ActiveModel {
    fn from(account: &Account) -> Self {
        Self {
            id: ActiveValue::Set(account.id.to_string()),
            user_id: ActiveValue::Set(account.user_id.clone()),
            name: ActiveValue::Set(account.name.clone()),
            kind: ActiveValue::Set(account.kind.as_str().to_string()),
            balance_minor: ActiveValue::Set(account.balance.minor()),
            is_default: ActiveValue::Set(account.is_default),
            created_at: ActiveValue::Set(account.created_at),
        }
    }
}

impl TryFrom<Model> for Account {
    type Error = LedgerError;

    fn try_from(model: Model) -> ResultLedger<Self> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| LedgerError::Consistency("stored account id is not a uuid".to_string()))?,
            user_id: model.user_id,
            name: model.name,
            kind: AccountKind::try_from(model.kind.as_str())?,
            balance: Money::new(model.balance_minor),
            is_default: model.is_default,
            created_at: model.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_round_trip_keeps_balance_sign() {
        let account = Account::new(
            "alice".to_string(),
            "Checking".to_string(),
            AccountKind::Current,
            Money::new(-12_50),
            true,
            Utc::now(),
        );

        let model_id = account.id.to_string();
        let active = ActiveModel::from(&account);
        assert_eq!(active.id, ActiveValue::Set(model_id));
        assert_eq!(active.balance_minor, ActiveValue::Set(-1250));
        assert_eq!(active.kind, ActiveValue::Set("current".to_string()));
    }

    #[test]
    fn corrupt_kind_is_a_consistency_error() {
        let model = Model {
            id: Uuid::new_v4().to_string(),
            user_id: "alice".to_string(),
            name: "Checking".to_string(),
            kind: "pension".to_string(),
            balance_minor: 0,
            is_default: false,
            created_at: Utc::now(),
        };

        assert!(matches!(
            Account::try_from(model),
            Err(LedgerError::Consistency(_))
        ));
    }
}
