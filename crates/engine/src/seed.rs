//! Synthetic ledger generation.
//!
//! Produces a statistically plausible 91-day transaction history (today and
//! 90 days back) for demos and testing. The generated set is internally
//! consistent: the running signed total equals the balance the account is
//! left with after seeding.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use uuid::Uuid;

use crate::{Money, Transaction, TransactionKind, TransactionStatus};

/// Probability that a generated transaction is income rather than expense.
const INCOME_PROBABILITY: f64 = 0.4;
/// Number of days of history, today included.
const HISTORY_DAYS: i64 = 90;
/// Maximum transactions generated per day.
const MAX_PER_DAY: f64 = 3.0;

struct CategoryDef {
    name: &'static str,
    min_minor: i64,
    max_minor: i64,
}

const INCOME_CATEGORIES: &[CategoryDef] = &[
    CategoryDef { name: "salary", min_minor: 5000_00, max_minor: 8000_00 },
    CategoryDef { name: "freelance", min_minor: 1000_00, max_minor: 3000_00 },
    CategoryDef { name: "investments", min_minor: 500_00, max_minor: 2000_00 },
    CategoryDef { name: "other-income", min_minor: 100_00, max_minor: 1000_00 },
];

const EXPENSE_CATEGORIES: &[CategoryDef] = &[
    CategoryDef { name: "housing", min_minor: 1000_00, max_minor: 2000_00 },
    CategoryDef { name: "transportation", min_minor: 100_00, max_minor: 500_00 },
    CategoryDef { name: "groceries", min_minor: 200_00, max_minor: 600_00 },
    CategoryDef { name: "utilities", min_minor: 100_00, max_minor: 300_00 },
    CategoryDef { name: "entertainment", min_minor: 50_00, max_minor: 200_00 },
    CategoryDef { name: "food", min_minor: 50_00, max_minor: 150_00 },
    CategoryDef { name: "shopping", min_minor: 100_00, max_minor: 500_00 },
    CategoryDef { name: "healthcare", min_minor: 100_00, max_minor: 1000_00 },
    CategoryDef { name: "education", min_minor: 200_00, max_minor: 1000_00 },
    CategoryDef { name: "travel", min_minor: 500_00, max_minor: 2000_00 },
];

/// Uniform random source for the generator.
///
/// Injectable so tests can script exact draws; production uses
/// [`ThreadRandom`].
pub trait RandomSource {
    /// A uniform draw in `[0, 1)`.
    fn next_f64(&mut self) -> f64;
}

/// Thread-local `rand`-backed source.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_f64(&mut self) -> f64 {
        rand::thread_rng().r#gen::<f64>()
    }
}

/// A generated history plus its running signed total.
#[derive(Clone, Debug)]
pub struct SeedBatch {
    pub transactions: Vec<Transaction>,
    /// Signed sum of every generated transaction; the balance the target
    /// account must end up with.
    pub total: Money,
}

fn pick<'a>(rng: &mut dyn RandomSource, categories: &'a [CategoryDef]) -> &'a CategoryDef {
    let index = (rng.next_f64() * categories.len() as f64) as usize;
    &categories[index.min(categories.len() - 1)]
}

fn draw_amount(rng: &mut dyn RandomSource, category: &CategoryDef) -> Money {
    let span = (category.max_minor - category.min_minor) as f64;
    Money::new(category.min_minor + (rng.next_f64() * span).round() as i64)
}

/// Generates the full history for one account.
///
/// For each day offset from [`HISTORY_DAYS`] down to 0: 1..=3 transactions,
/// each income with probability [`INCOME_PROBABILITY`], category uniform
/// within its kind, amount uniform in the category range (whole cents).
pub fn generate_history(
    rng: &mut dyn RandomSource,
    user_id: &str,
    account_id: Uuid,
    today: DateTime<Utc>,
) -> SeedBatch {
    let mut transactions = Vec::new();
    let mut total = Money::ZERO;

    for day_offset in (0..=HISTORY_DAYS).rev() {
        let date = today - Duration::days(day_offset);
        let per_day = (rng.next_f64() * MAX_PER_DAY) as i64 + 1;

        for _ in 0..per_day {
            let kind = if rng.next_f64() < INCOME_PROBABILITY {
                TransactionKind::Income
            } else {
                TransactionKind::Expense
            };
            let category = match kind {
                TransactionKind::Income => pick(rng, INCOME_CATEGORIES),
                TransactionKind::Expense => pick(rng, EXPENSE_CATEGORIES),
            };
            let amount = draw_amount(rng, category);
            let verb = match kind {
                TransactionKind::Income => "Received",
                TransactionKind::Expense => "Paid for",
            };

            let tx = Transaction {
                id: Uuid::new_v4(),
                user_id: user_id.to_string(),
                account_id,
                kind,
                amount,
                occurred_at: date,
                category: category.name.to_string(),
                note: Some(format!("{verb} {}", category.name)),
                status: TransactionStatus::Completed,
                created_at: date,
            };

            total += tx.signed_amount();
            transactions.push(tx);
        }
    }

    SeedBatch { transactions, total }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Replays a fixed sequence of draws, cycling when exhausted.
    struct Script {
        values: Vec<f64>,
        cursor: usize,
    }

    impl Script {
        fn new(values: Vec<f64>) -> Self {
            Self { values, cursor: 0 }
        }
    }

    impl RandomSource for Script {
        fn next_f64(&mut self) -> f64 {
            let value = self.values[self.cursor % self.values.len()];
            self.cursor += 1;
            value
        }
    }

    #[test]
    fn all_zero_draws_give_one_minimum_salary_per_day() {
        let mut rng = Script::new(vec![0.0]);
        let account_id = Uuid::new_v4();
        let batch = generate_history(&mut rng, "alice", account_id, Utc::now());

        assert_eq!(batch.transactions.len(), 91);
        for tx in &batch.transactions {
            assert_eq!(tx.kind, TransactionKind::Income);
            assert_eq!(tx.category, "salary");
            assert_eq!(tx.amount, Money::new(5000_00));
            assert_eq!(tx.account_id, account_id);
            assert_eq!(tx.note.as_deref(), Some("Received salary"));
        }
        assert_eq!(batch.total, Money::new(91 * 5000_00));
    }

    #[test]
    fn total_equals_signed_sum_of_generated_transactions() {
        // Draws cycle through: 2 per day, expense, last category, max amount.
        let mut rng = Script::new(vec![0.5, 0.9, 0.99, 0.999]);
        let batch = generate_history(&mut rng, "alice", Uuid::new_v4(), Utc::now());

        let sum = batch
            .transactions
            .iter()
            .fold(Money::ZERO, |acc, tx| acc + tx.signed_amount());
        assert_eq!(batch.total, sum);
        assert!(batch.transactions.len() >= 91);
    }

    #[test]
    fn dates_cover_ninety_days_back_in_order() {
        let mut rng = Script::new(vec![0.0]);
        let today = Utc::now();
        let batch = generate_history(&mut rng, "alice", Uuid::new_v4(), today);

        let first = batch.transactions.first().map(|tx| tx.occurred_at);
        let last = batch.transactions.last().map(|tx| tx.occurred_at);
        assert_eq!(first, Some(today - Duration::days(90)));
        assert_eq!(last, Some(today));
    }

    #[test]
    fn amounts_stay_inside_the_category_range() {
        let mut rng = Script::new(vec![0.7, 0.45, 0.3, 0.85, 0.1]);
        let batch = generate_history(&mut rng, "alice", Uuid::new_v4(), Utc::now());

        for tx in &batch.transactions {
            let table = match tx.kind {
                TransactionKind::Income => INCOME_CATEGORIES,
                TransactionKind::Expense => EXPENSE_CATEGORIES,
            };
            let def = table
                .iter()
                .find(|def| def.name == tx.category)
                .unwrap_or_else(|| panic!("unknown category {}", tx.category));
            assert!(tx.amount.minor() >= def.min_minor);
            assert!(tx.amount.minor() <= def.max_minor);
        }
    }
}
