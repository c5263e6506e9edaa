use crate::core::participant::ParticipantName;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single directed transfer: `from` pays `to` the given `amount`.
///
/// `from` is always a net debtor and `to` a net creditor, so the two names
/// never coincide. The amount is rounded to the currency's minor unit and is
/// strictly positive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub from: ParticipantName,
    pub to: ParticipantName,
    pub amount: Decimal,
}

impl Settlement {
    pub fn new(from: ParticipantName, to: ParticipantName, amount: Decimal) -> Self {
        Self { from, to, amount }
    }
}

impl fmt::Display for Settlement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}: {}", self.from, self.to, self.amount)
    }
}
