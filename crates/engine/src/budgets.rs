//! Monthly budget and its utilization.
//!
//! A user has at most one budget, implicitly scoped to the default account.
//! [`BudgetUsage`] turns a budget plus the current-month expense total into
//! display-ready utilization numbers and a severity bucket.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::{LedgerError, Money, ResultLedger};

/// A monthly spending limit for one user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub user_id: String,
    pub amount: Money,
    pub updated_at: DateTime<Utc>,
}

impl Budget {
    pub fn new(user_id: String, amount: Money, updated_at: DateTime<Utc>) -> ResultLedger<Self> {
        if !amount.is_positive() {
            return Err(LedgerError::InvalidAmount(
                "budget amount must be > 0".to_string(),
            ));
        }
        Ok(Self {
            user_id,
            amount,
            updated_at,
        })
    }
}

/// Severity bucket derived from the clamped percent of budget used.
///
/// Plain thresholds, no hysteresis: reclassification depends only on the
/// current percent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Normal,
    Warning,
    Critical,
}

impl Severity {
    const WARNING_PERCENT: f64 = 75.0;
    const CRITICAL_PERCENT: f64 = 90.0;

    #[must_use]
    pub fn from_percent(clamped_percent: f64) -> Self {
        if clamped_percent >= Self::CRITICAL_PERCENT {
            Self::Critical
        } else if clamped_percent >= Self::WARNING_PERCENT {
            Self::Warning
        } else {
            Self::Normal
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }
}

/// Display-ready budget utilization for the current month.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct BudgetUsage {
    /// Unclamped percent, kept for label text ("134.2% used").
    pub percent_used: f64,
    /// Percent capped to `[0, 100]` for the visual bar.
    pub clamped_percent: f64,
    /// Absent when no budget is set.
    pub severity: Option<Severity>,
}

impl BudgetUsage {
    #[must_use]
    pub fn evaluate(budget: Option<&Budget>, current_expenses: Money) -> Self {
        let Some(budget) = budget else {
            return Self {
                percent_used: 0.0,
                clamped_percent: 0.0,
                severity: None,
            };
        };

        let percent_used =
            current_expenses.minor() as f64 / budget.amount.minor() as f64 * 100.0;
        let clamped_percent = percent_used.clamp(0.0, 100.0);

        Self {
            percent_used,
            clamped_percent,
            severity: Some(Severity::from_percent(clamped_percent)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: String,
    pub amount_minor: i64,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Budget> for ActiveModel {
    fn from(budget: &Budget) -> Self {
        Self {
            user_id: ActiveValue::Set(budget.user_id.clone()),
            amount_minor: ActiveValue::Set(budget.amount.minor()),
            updated_at: ActiveValue::Set(budget.updated_at),
        }
    }
}

impl From<Model> for Budget {
    fn from(model: Model) -> Self {
        Self {
            user_id: model.user_id,
            amount: Money::new(model.amount_minor),
            updated_at: model.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn budget(minor: i64) -> Budget {
        Budget::new("alice".to_string(), Money::new(minor), Utc::now()).unwrap()
    }

    #[test]
    fn ninety_five_percent_is_critical() {
        let usage = BudgetUsage::evaluate(Some(&budget(1000_00)), Money::new(950_00));

        assert_eq!(usage.percent_used, 95.0);
        assert_eq!(usage.clamped_percent, 95.0);
        assert_eq!(usage.severity, Some(Severity::Critical));
    }

    #[test]
    fn thresholds_are_inclusive() {
        let at = |spent: i64| BudgetUsage::evaluate(Some(&budget(100_00)), Money::new(spent));

        assert_eq!(at(74_99).severity, Some(Severity::Normal));
        assert_eq!(at(75_00).severity, Some(Severity::Warning));
        assert_eq!(at(89_99).severity, Some(Severity::Warning));
        assert_eq!(at(90_00).severity, Some(Severity::Critical));
    }

    #[test]
    fn overspend_clamps_bar_but_keeps_label_percent() {
        let usage = BudgetUsage::evaluate(Some(&budget(1000_00)), Money::new(1342_00));

        assert_eq!(usage.clamped_percent, 100.0);
        assert!((usage.percent_used - 134.2).abs() < f64::EPSILON * 100.0);
        assert_eq!(usage.severity, Some(Severity::Critical));
    }

    #[test]
    fn missing_budget_has_no_severity() {
        let usage = BudgetUsage::evaluate(None, Money::new(950_00));

        assert_eq!(usage.percent_used, 0.0);
        assert_eq!(usage.severity, None);
    }

    #[test]
    fn budget_must_be_positive() {
        assert!(Budget::new("alice".to_string(), Money::ZERO, Utc::now()).is_err());
        assert!(Budget::new("alice".to_string(), Money::new(-1), Utc::now()).is_err());
    }
}
