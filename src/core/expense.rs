use crate::core::participant::ParticipantName;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque identifier of a recorded expense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(Uuid);

impl ExpenseId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for ExpenseId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for ExpenseId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A shared cost paid by one participant on behalf of the whole group.
///
/// Expenses are immutable once created. The payer is credited with the full
/// amount; every participant is charged a weight-proportional share of it.
///
/// # Examples
///
/// ```
/// use split_engine::core::expense::Expense;
/// use split_engine::core::participant::ParticipantName;
/// use rust_decimal_macros::dec;
///
/// let dinner = Expense::new(ParticipantName::new("Alice"), dec!(120), "Sushi");
/// assert_eq!(dinner.amount(), dec!(120));
/// assert_eq!(dinner.description(), "Sushi");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    id: ExpenseId,
    payer: ParticipantName,
    /// Must be positive.
    amount: Decimal,
    description: String,
    created_at: DateTime<Utc>,
}

impl Expense {
    /// Create a new expense with a fresh identifier.
    ///
    /// # Panics
    ///
    /// Panics if `amount` is not positive. Use
    /// [`Group::add_expense`](crate::core::group::Group::add_expense) for
    /// fallible construction from user input.
    pub fn new(payer: ParticipantName, amount: Decimal, description: impl Into<String>) -> Self {
        Self::with_id(ExpenseId::new(), payer, amount, description)
    }

    /// Create an expense with a specific ID (useful for testing / determinism).
    pub fn with_id(
        id: ExpenseId,
        payer: ParticipantName,
        amount: Decimal,
        description: impl Into<String>,
    ) -> Self {
        assert!(
            amount > Decimal::ZERO,
            "Expense amount must be positive, got {}",
            amount
        );
        Self {
            id,
            payer,
            amount,
            description: description.into(),
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> ExpenseId {
        self.id
    }

    pub fn payer(&self) -> &ParticipantName {
        &self.payer
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Total of all expense amounts.
///
/// Panics if the total does not fit in a `Decimal`; the group store refuses
/// expenses that would get there. See [`checked_total_amount`].
pub fn total_amount<'a>(expenses: impl IntoIterator<Item = &'a Expense>) -> Decimal {
    expenses.into_iter().map(Expense::amount).sum()
}

/// Total of all expense amounts, or `None` on overflow.
pub fn checked_total_amount<'a>(expenses: impl IntoIterator<Item = &'a Expense>) -> Option<Decimal> {
    expenses
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, e| acc.checked_add(e.amount()))
}
