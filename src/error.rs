use crate::core::participant::ParticipantName;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised by the group store and the settlement core.
///
/// Validation variants are produced at the [`Group`](crate::core::group::Group)
/// boundary. `InvalidWeight` and `UnknownPayer` can also come out of
/// [`compute_balances`](crate::settlement::calculator::compute_balances) when a
/// hand-built snapshot skips that boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettleError {
    #[error("participant '{name}' has non-positive weight {weight}")]
    InvalidWeight {
        name: ParticipantName,
        weight: Decimal,
    },

    #[error("expense payer '{0}' is not a participant")]
    UnknownPayer(ParticipantName),

    #[error("no participant named '{0}'")]
    UnknownParticipant(ParticipantName),

    #[error("participant '{0}' already exists")]
    DuplicateParticipant(ParticipantName),

    #[error("participant name must not be empty")]
    EmptyName,

    #[error("expense description must not be empty")]
    EmptyDescription,

    #[error("expense amount must be positive, got {0}")]
    InvalidAmount(Decimal),

    #[error("cannot settle a group with no participants")]
    EmptyParticipantSet,

    #[error("amounts or weights are too large to add up")]
    AmountOverflow,

    #[error(
        "settlement did not converge: {unmatched_debt} of debt and \
         {unmatched_credit} of credit left unmatched"
    )]
    RoundingInvariantViolation {
        unmatched_debt: Decimal,
        unmatched_credit: Decimal,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, SettleError>;
